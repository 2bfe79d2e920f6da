//! Error taxonomy for the gateway.
//!
//! [`GatewayError`] covers every terminal rejection the dispatch pipeline can
//! produce. Each variant maps to one stable machine-readable code, one HTTP
//! status, and one [`ErrorCategory`]. [`DispatchError`] is the narrower error
//! returned by a [`crate::RepositoryDispatcher`] implementation and is wrapped
//! by [`GatewayError::Upstream`].
//!
//! The `error` code is the contract with callers. `detail`, `allowed`,
//! `status` and `response` are for humans and may change shape.

use std::time::Duration;

use serde_json::{json, Value};
use thiserror::Error;

use crate::config::UpstreamPresence;

// ---------------------------------------------------------------------------
// Taxonomy
// ---------------------------------------------------------------------------

/// Who is expected to fix the condition behind an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Server-side and deployer-fixable: missing credentials or upstream settings.
    Configuration,
    /// Caller-side: the presented credential is absent or not accepted.
    Auth,
    /// Caller-side: the request body, action, or arguments are malformed.
    Validation,
    /// Dependency-side: the GitHub call failed or was refused.
    Upstream,
}

// ---------------------------------------------------------------------------
// Upstream call errors
// ---------------------------------------------------------------------------

/// Failure of the single outbound `repository_dispatch` call.
///
/// No variant is retried. The caller sees the failure on the same request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The HTTP exchange could not complete (DNS, connect, TLS, reset).
    #[error("{0}")]
    Transport(String),

    /// The configured deadline elapsed before GitHub answered.
    #[error("dispatch request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// GitHub answered with a status other than `204 No Content`.
    ///
    /// `body` is `None` when the response body itself could not be read.
    #[error("GitHub responded with status {status}")]
    Rejected {
        /// HTTP status returned by GitHub.
        status: u16,
        /// Raw response text, when readable.
        body: Option<String>,
    },
}

// ---------------------------------------------------------------------------
// Gateway errors
// ---------------------------------------------------------------------------

/// Every terminal rejection of a `/v1/dispatch` request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// No accepted API key is configured at all.
    #[error("no API keys are configured")]
    MissingApiKeyConfig,

    /// The `x-api-key` header is absent or not in the accepted set.
    #[error("missing or unaccepted API key")]
    Unauthorized,

    /// The body could not be read or decoded as JSON.
    #[error("request body is not valid JSON")]
    InvalidJson,

    /// `action` is missing, not a string, or blank.
    #[error("`action` must be a non-empty string")]
    InvalidAction,

    /// `args` is missing or not a JSON object.
    #[error("`args` must be a JSON object")]
    InvalidArgs,

    /// `action` names no registered action.
    #[error("action `{action}` is not allowed")]
    ActionNotAllowed {
        /// The rejected action name, as sent.
        action: String,
        /// Every registered action name, in registry order.
        allowed: Vec<&'static str>,
    },

    /// The action's argument rule rejected `args`.
    #[error("invalid arguments: {detail}")]
    ArgsNotValid {
        /// Human-readable reason produced by the rule.
        detail: String,
    },

    /// One or more of owner, repository, or token is not configured.
    #[error("GitHub dispatch target is not fully configured")]
    MissingGithubConfig(UpstreamPresence),

    /// The outbound call failed or GitHub refused it.
    #[error("GitHub dispatch failed: {0}")]
    Upstream(#[from] DispatchError),
}

impl GatewayError {
    /// Stable machine-readable code placed in the `error` field.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingApiKeyConfig => "missing_api_key_config",
            Self::Unauthorized => "unauthorized",
            Self::InvalidJson => "invalid_json",
            Self::InvalidAction => "invalid_action",
            Self::InvalidArgs => "invalid_args",
            Self::ActionNotAllowed { .. } => "action_not_allowed",
            Self::ArgsNotValid { .. } => "args_not_valid",
            Self::MissingGithubConfig(_) => "missing_github_config",
            Self::Upstream(_) => "github_dispatch_failed",
        }
    }

    /// HTTP status code the rejection is reported with.
    pub fn status(&self) -> u16 {
        match self.category() {
            ErrorCategory::Configuration => 500,
            ErrorCategory::Auth => 401,
            ErrorCategory::Validation => 400,
            ErrorCategory::Upstream => 502,
        }
    }

    /// Taxonomy class of the rejection.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingApiKeyConfig | Self::MissingGithubConfig(_) => {
                ErrorCategory::Configuration
            }
            Self::Unauthorized => ErrorCategory::Auth,
            Self::InvalidJson
            | Self::InvalidAction
            | Self::InvalidArgs
            | Self::ActionNotAllowed { .. }
            | Self::ArgsNotValid { .. } => ErrorCategory::Validation,
            Self::Upstream(_) => ErrorCategory::Upstream,
        }
    }

    /// JSON body returned to the caller.
    ///
    /// Always carries `ok: false` and the stable `error` code. Raw
    /// configuration values never appear; upstream configuration is reported
    /// as presence booleans only.
    pub fn to_body(&self) -> Value {
        let mut body = json!({ "ok": false, "error": self.code() });
        match self {
            Self::ActionNotAllowed { allowed, .. } => {
                body["allowed"] = json!(allowed);
            }
            Self::ArgsNotValid { detail } => {
                body["detail"] = json!(detail);
            }
            Self::MissingGithubConfig(presence) => {
                body["detail"] = json!(presence);
            }
            Self::Upstream(DispatchError::Rejected { status, body: response }) => {
                body["status"] = json!(status);
                if let Some(response) = response {
                    body["response"] = json!(response);
                }
            }
            Self::Upstream(err) => {
                body["detail"] = json!(err.to_string());
            }
            _ => {}
        }
        body
    }
}
