//! `repository_dispatch` client.

use std::time::Duration;

use async_trait::async_trait;
use gateway::{DispatchError, DispatchPayload, RepositoryDispatcher, UpstreamTarget};
use reqwest::header::{ACCEPT, USER_AGENT as USER_AGENT_HEADER};
use reqwest::StatusCode;
use thiserror::Error;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};

/// Public GitHub REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Media type GitHub recommends for REST requests.
pub const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// Client identifier sent as `User-Agent`; GitHub rejects requests without one.
pub const USER_AGENT: &str = "actions-gateway";

/// Deadline for one dispatch call: the send and, on a non-204 answer, the
/// error-body read share it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for [`GithubClient`].
#[derive(Debug, Clone)]
pub struct GithubClientConfig {
    /// REST API base URL, without trailing slash. Override for GitHub
    /// Enterprise Server or a local stand-in.
    pub api_url: String,
    /// Upper bound on the whole outbound exchange, measured from the start of
    /// the send to the end of any error-body read.
    pub timeout: Duration,
}

impl Default for GithubClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Failure to construct the underlying HTTP client.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Sends `repository_dispatch` events to GitHub.
///
/// Holds a pooled `reqwest::Client`; cloning is cheap and shares the pool.
/// Each [`RepositoryDispatcher::dispatch`] call makes exactly one request.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    config: GithubClientConfig,
}

impl GithubClient {
    /// Creates a client with the given settings.
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError`] if the TLS backend cannot be initialised.
    pub fn new(config: GithubClientConfig) -> Result<Self, ClientBuildError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, config })
    }

    /// The dispatch endpoint for `target`.
    pub fn dispatch_url(&self, target: &UpstreamTarget) -> String {
        format!(
            "{}/repos/{}/{}/dispatches",
            self.config.api_url.trim_end_matches('/'),
            target.owner,
            target.repo
        )
    }
}

#[async_trait]
impl RepositoryDispatcher for GithubClient {
    async fn dispatch(
        &self,
        target: &UpstreamTarget,
        payload: &DispatchPayload,
    ) -> Result<(), DispatchError> {
        let url = self.dispatch_url(target);
        let request = self
            .http
            .post(&url)
            .bearer_auth(&target.token)
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .header(USER_AGENT_HEADER, USER_AGENT)
            .json(payload);

        // One deadline shared by the send and the error-body read.
        let deadline = Instant::now() + self.config.timeout;

        let response = match timeout_at(deadline, request.send()).await {
            Err(_) => {
                warn!(
                    %url,
                    timeout_ms = self.config.timeout.as_millis() as u64,
                    "Dispatch timed out"
                );
                return Err(DispatchError::Timeout(self.config.timeout));
            }
            Ok(Err(err)) => {
                warn!(%url, error = %err, "Dispatch request failed");
                return Err(DispatchError::Transport(err.to_string()));
            }
            Ok(Ok(response)) => response,
        };

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            debug!(%url, "GitHub accepted dispatch");
            return Ok(());
        }

        // The body is informational only; an unreadable body is dropped.
        let body = match timeout_at(deadline, response.text()).await {
            Ok(Ok(text)) => Some(text),
            Ok(Err(err)) => {
                debug!(error = %err, "Could not read GitHub error body");
                None
            }
            Err(_) => {
                debug!("Deadline elapsed while reading GitHub error body");
                None
            }
        };

        warn!(%url, status = status.as_u16(), "GitHub rejected dispatch");
        Err(DispatchError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
