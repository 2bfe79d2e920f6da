//! Command-line and environment configuration.
//!
//! Every setting can be given as a flag or an environment variable. Secret
//! values are hidden from `--help` output and never logged; empty strings are
//! treated as unset.

use std::net::SocketAddr;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use gateway::{CredentialSources, GatewayConfig, UpstreamConfig};
use github::GithubClientConfig;
use listener::ListenerConfig;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// Human-readable lines.
    Pretty,
}

/// Stateless HTTP gateway that forwards validated actions to GitHub
/// `repository_dispatch`.
#[derive(Parser)]
#[command(name = "actions-gateway", version, about)]
pub struct Cli {
    /// Primary accepted API key.
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Alias accepted API key.
    #[arg(long, env = "WRANGLER_API_KEY", hide_env_values = true)]
    pub wrangler_api_key: Option<String>,

    /// Comma-separated list of additional accepted API keys.
    #[arg(long, env = "API_KEYS", hide_env_values = true)]
    pub api_keys: Option<String>,

    /// Owner of the repository receiving dispatch events.
    #[arg(long, env = "GH_OWNER")]
    pub gh_owner: Option<String>,

    /// Repository receiving dispatch events.
    #[arg(long, env = "GH_REPO")]
    pub gh_repo: Option<String>,

    /// Token used to call the dispatch endpoint.
    #[arg(long, env = "GH_TOKEN", hide_env_values = true)]
    pub gh_token: Option<String>,

    /// Address the HTTP listener binds.
    #[arg(long, env = "GATEWAY_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// GitHub REST API base URL.
    #[arg(long, env = "GITHUB_API_URL", default_value = github::DEFAULT_API_URL)]
    pub github_api_url: String,

    /// Deadline for the outbound dispatch call, in seconds.
    #[arg(long, env = "DISPATCH_TIMEOUT_SECS", default_value_t = 10)]
    pub dispatch_timeout_secs: u64,

    /// Largest accepted dispatch request body, in bytes.
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = listener::server::DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,

    /// OTLP gRPC endpoint; traces are exported only when set.
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

impl Cli {
    /// Credential and upstream settings for the dispatch pipeline.
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            credentials: CredentialSources {
                primary: non_empty(&self.api_key),
                alias: non_empty(&self.wrangler_api_key),
                list: non_empty(&self.api_keys),
            },
            upstream: UpstreamConfig {
                owner: non_empty(&self.gh_owner),
                repo: non_empty(&self.gh_repo),
                token: non_empty(&self.gh_token),
            },
        }
    }

    /// Settings for the outbound GitHub client.
    pub fn github_client_config(&self) -> GithubClientConfig {
        GithubClientConfig {
            api_url: self.github_api_url.clone(),
            timeout: Duration::from_secs(self.dispatch_timeout_secs),
        }
    }

    /// Settings for the HTTP listener.
    pub fn listener_config(&self) -> ListenerConfig {
        ListenerConfig {
            bind: self.bind,
            max_body_bytes: self.max_body_bytes,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.is_empty())
}
