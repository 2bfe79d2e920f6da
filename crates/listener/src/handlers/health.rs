//! Unauthenticated health and configuration-presence endpoints.

use axum::extract::State;
use axum::Json;
use gateway::ConfigPresence;
use serde_json::{json, Value};

use super::AppState;

/// Liveness check. Always `200 {"ok": true}`.
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// Reports which configuration values are set, never the values themselves.
pub async fn debug_env_handler(State(state): State<AppState>) -> Json<ConfigPresence> {
    Json(state.service.presence())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gateway::{
        CredentialSources, DispatchError, DispatchPayload, DispatchService, GatewayConfig,
        RepositoryDispatcher, UpstreamConfig, UpstreamTarget,
    };
    use std::sync::Arc;

    struct Unused;

    #[async_trait]
    impl RepositoryDispatcher for Unused {
        async fn dispatch(
            &self,
            _target: &UpstreamTarget,
            _payload: &DispatchPayload,
        ) -> Result<(), DispatchError> {
            unreachable!("presence endpoints never dispatch")
        }
    }

    fn state(config: GatewayConfig) -> AppState {
        AppState {
            service: DispatchService::new(config, Arc::new(Unused)),
            max_body_bytes: 1024,
        }
    }

    #[tokio::test]
    async fn health_is_ok() {
        assert_eq!(health_handler().await.0, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn debug_env_reports_presence_without_values() {
        let config = GatewayConfig {
            credentials: CredentialSources {
                primary: Some("key-one".into()),
                ..Default::default()
            },
            upstream: UpstreamConfig {
                owner: Some("octo".into()),
                repo: None,
                token: Some("ghp_secret".into()),
            },
        };

        let report = debug_env_handler(State(state(config))).await.0;
        assert!(report.api_key_set);
        assert!(!report.wrangler_api_key_set);
        assert!(!report.api_keys_set);
        assert_eq!(report.accepted_keys_count, 1);
        assert!(report.gh_owner_set);
        assert!(!report.gh_repo_set);
        assert!(report.gh_token_set);

        let rendered = serde_json::to_string(&report).unwrap();
        assert!(!rendered.contains("key-one"));
        assert!(!rendered.contains("ghp_secret"));
        assert!(!rendered.contains("octo"));
    }
}
