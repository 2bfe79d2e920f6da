//! Gateway configuration and presence checks.
//!
//! [`GatewayConfig`] is built once at process start by the composition root
//! and shared read-only with every request. Nothing in this module reads the
//! environment; checks are pure functions over the struct.
//!
//! Secrets are redacted from `Debug` output. The `/debug-env` report
//! ([`ConfigPresence`]) exposes booleans and a count, never values.

use serde::Serialize;

use crate::credentials::CredentialSet;
use crate::errors::GatewayError;
use crate::identifiers::{OwnerName, RepositoryName};

// ---------------------------------------------------------------------------
// Credential sources
// ---------------------------------------------------------------------------

/// The three places accepted API keys can come from.
#[derive(Clone, Default)]
pub struct CredentialSources {
    /// Primary key (`API_KEY`).
    pub primary: Option<String>,
    /// Alias key (`WRANGLER_API_KEY`).
    pub alias: Option<String>,
    /// Comma-separated list of additional keys (`API_KEYS`).
    pub list: Option<String>,
}

impl CredentialSources {
    /// Expands the sources into the deduplicated accepted set.
    pub fn credential_set(&self) -> CredentialSet {
        CredentialSet::from_sources(
            self.primary.as_deref(),
            self.alias.as_deref(),
            self.list.as_deref(),
        )
    }
}

impl std::fmt::Debug for CredentialSources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialSources")
            .field("primary", &is_set(&self.primary))
            .field("alias", &is_set(&self.alias))
            .field("list", &is_set(&self.list))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Upstream settings
// ---------------------------------------------------------------------------

/// GitHub coordinates and token for the outbound dispatch.
#[derive(Clone, Default)]
pub struct UpstreamConfig {
    /// Repository owner (`GH_OWNER`).
    pub owner: Option<String>,
    /// Repository name (`GH_REPO`).
    pub repo: Option<String>,
    /// Access token sent as a bearer credential (`GH_TOKEN`).
    pub token: Option<String>,
}

impl UpstreamConfig {
    /// Which of the three settings are present.
    pub fn presence(&self) -> UpstreamPresence {
        UpstreamPresence {
            owner: is_set(&self.owner),
            repo: is_set(&self.repo),
            token: is_set(&self.token),
        }
    }

    /// Resolves the complete dispatch target.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MissingGithubConfig`] naming the absent
    /// settings when any of owner, repository, or token is missing or empty.
    pub fn target(&self) -> Result<UpstreamTarget, GatewayError> {
        let owner = self.owner.clone().and_then(OwnerName::new);
        let repo = self.repo.clone().and_then(RepositoryName::new);
        let token = self.token.clone().filter(|t| !t.is_empty());

        match (owner, repo, token) {
            (Some(owner), Some(repo), Some(token)) => Ok(UpstreamTarget { owner, repo, token }),
            _ => Err(GatewayError::MissingGithubConfig(self.presence())),
        }
    }
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("token", &is_set(&self.token).then_some("<redacted>"))
            .finish()
    }
}

/// Presence flags for the upstream settings, reported as the `detail` of a
/// `missing_github_config` rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct UpstreamPresence {
    /// `GH_OWNER` is set.
    pub owner: bool,
    /// `GH_REPO` is set.
    pub repo: bool,
    /// `GH_TOKEN` is set.
    pub token: bool,
}

/// A fully configured dispatch target.
#[derive(Clone)]
pub struct UpstreamTarget {
    /// Repository owner.
    pub owner: OwnerName,
    /// Repository name.
    pub repo: RepositoryName,
    /// Bearer token for the dispatch call.
    pub token: String,
}

impl std::fmt::Debug for UpstreamTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamTarget")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("token", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Top-level configuration
// ---------------------------------------------------------------------------

/// Everything the dispatch pipeline needs from the deployment.
#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
    /// Sources of accepted caller API keys.
    pub credentials: CredentialSources,
    /// GitHub dispatch target.
    pub upstream: UpstreamConfig,
}

impl GatewayConfig {
    /// Builds the `/debug-env` presence report.
    pub fn presence(&self) -> ConfigPresence {
        let upstream = self.upstream.presence();
        ConfigPresence {
            api_key_set: is_set(&self.credentials.primary),
            wrangler_api_key_set: is_set(&self.credentials.alias),
            api_keys_set: is_set(&self.credentials.list),
            accepted_keys_count: self.credentials.credential_set().len(),
            gh_owner_set: upstream.owner,
            gh_repo_set: upstream.repo,
            gh_token_set: upstream.token,
        }
    }
}

/// Body of the `/debug-env` response.
///
/// Field names match the deployment's environment variable names so an
/// operator can see at a glance which variable is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigPresence {
    #[serde(rename = "API_KEY_set")]
    pub api_key_set: bool,
    #[serde(rename = "WRANGLER_API_KEY_set")]
    pub wrangler_api_key_set: bool,
    #[serde(rename = "API_KEYS_set")]
    pub api_keys_set: bool,
    /// Size of the deduplicated accepted key set.
    pub accepted_keys_count: usize,
    #[serde(rename = "GH_OWNER_set")]
    pub gh_owner_set: bool,
    #[serde(rename = "GH_REPO_set")]
    pub gh_repo_set: bool,
    #[serde(rename = "GH_TOKEN_set")]
    pub gh_token_set: bool,
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn upstream(owner: &str, repo: &str, token: &str) -> UpstreamConfig {
        let opt = |v: &str| Some(v.to_string());
        UpstreamConfig {
            owner: opt(owner),
            repo: opt(repo),
            token: opt(token),
        }
    }

    #[test]
    fn complete_upstream_resolves_target() {
        let target = upstream("octo", "infra", "ghp_x").target().unwrap();
        assert_eq!(target.owner.as_str(), "octo");
        assert_eq!(target.repo.as_str(), "infra");
        assert_eq!(target.token, "ghp_x");
    }

    #[test]
    fn empty_values_count_as_missing() {
        let err = upstream("octo", "", "").target().unwrap_err();
        assert_eq!(
            err,
            GatewayError::MissingGithubConfig(UpstreamPresence {
                owner: true,
                repo: false,
                token: false,
            })
        );
    }

    #[test]
    fn default_upstream_is_entirely_missing() {
        let presence = UpstreamConfig::default().presence();
        assert!(!presence.owner && !presence.repo && !presence.token);
    }

    #[test]
    fn debug_output_redacts_token() {
        let rendered = format!("{:?}", upstream("octo", "infra", "ghp_secret"));
        assert!(!rendered.contains("ghp_secret"));

        let target = upstream("octo", "infra", "ghp_secret").target().unwrap();
        assert!(!format!("{target:?}").contains("ghp_secret"));

        let sources = CredentialSources {
            primary: Some("k-secret".into()),
            ..Default::default()
        };
        assert!(!format!("{sources:?}").contains("k-secret"));
    }

    #[test]
    fn presence_report_uses_env_names_and_counts_keys() {
        let config = GatewayConfig {
            credentials: CredentialSources {
                primary: Some("a".into()),
                alias: Some("a".into()),
                list: Some("b, c ,,".into()),
            },
            upstream: upstream("octo", "infra", ""),
        };
        assert_eq!(
            serde_json::to_value(config.presence()).unwrap(),
            json!({
                "API_KEY_set": true,
                "WRANGLER_API_KEY_set": true,
                "API_KEYS_set": true,
                "accepted_keys_count": 3,
                "GH_OWNER_set": true,
                "GH_REPO_set": true,
                "GH_TOKEN_set": false,
            })
        );
    }
}
