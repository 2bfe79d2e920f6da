//! The dispatch pipeline.
//!
//! [`DispatchService`] owns the immutable configuration, the accepted key set
//! derived from it, and the [`RepositoryDispatcher`] port. Each call runs the
//! stages in order and stops at the first rejection:
//!
//! 1. [`DispatchService::authenticate`] — API key check.
//! 2. [`DispatchService::dispatch`] — parse → registry lookup → argument rule
//!    → upstream presence → one outbound call.
//!
//! Authentication is a separate method so the HTTP layer can refuse a caller
//! before reading the request body.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{info, info_span, Instrument};

use crate::actions::Action;
use crate::config::{ConfigPresence, GatewayConfig};
use crate::credentials::CredentialSet;
use crate::errors::GatewayError;
use crate::identifiers::RequestId;
use crate::payload::{DispatchPayload, RepositoryDispatcher};
use crate::request::IncomingRequest;

/// Successful outcome of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    /// Correlation id echoed to the caller.
    pub request_id: RequestId,
    /// The action that was forwarded.
    pub action: Action,
}

impl Dispatched {
    /// JSON body returned to the caller.
    pub fn to_body(&self) -> Value {
        json!({ "ok": true, "dispatched": true, "request_id": self.request_id })
    }
}

/// Stateless request pipeline shared by every inbound request.
#[derive(Clone)]
pub struct DispatchService {
    config: Arc<GatewayConfig>,
    credentials: Arc<CredentialSet>,
    dispatcher: Arc<dyn RepositoryDispatcher>,
}

impl DispatchService {
    /// Creates the service, expanding the accepted key set once.
    pub fn new(config: GatewayConfig, dispatcher: Arc<dyn RepositoryDispatcher>) -> Self {
        let credentials = config.credentials.credential_set();
        Self {
            config: Arc::new(config),
            credentials: Arc::new(credentials),
            dispatcher,
        }
    }

    /// The configuration this service was built with.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Presence report for `/debug-env`.
    pub fn presence(&self) -> ConfigPresence {
        self.config.presence()
    }

    /// Checks the caller's `x-api-key` value.
    ///
    /// # Errors
    ///
    /// See [`CredentialSet::authenticate`].
    pub fn authenticate(&self, api_key: Option<&str>) -> Result<(), GatewayError> {
        self.credentials.authenticate(api_key)
    }

    /// Validates `body` and forwards it upstream.
    ///
    /// Makes at most one outbound call, and only once every check has passed.
    ///
    /// # Errors
    ///
    /// Returns the [`GatewayError`] of the first stage that rejects the request.
    pub async fn dispatch(&self, body: &[u8]) -> Result<Dispatched, GatewayError> {
        let request = IncomingRequest::parse(body)?;
        let action = Action::resolve(&request.action)?;
        action.validate(&request.args)?;
        let target = self.config.upstream.target()?;

        let request_id = request.request_id;
        let payload = DispatchPayload::new(request_id.clone(), action, request.args);

        let span = info_span!(
            "dispatch",
            request_id = %request_id,
            action = action.name(),
            label = action.label(),
            owner = %target.owner,
            repo = %target.repo,
        );
        self.dispatcher
            .dispatch(&target, &payload)
            .instrument(span)
            .await?;

        info!(request_id = %request_id, action = action.name(), "Dispatched");
        Ok(Dispatched { request_id, action })
    }
}

impl std::fmt::Debug for DispatchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchService")
            .field("config", &self.config)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CredentialSources, UpstreamConfig, UpstreamTarget};
    use crate::errors::DispatchError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingDispatcher {
        calls: Mutex<Vec<DispatchPayload>>,
        fail_with: Option<DispatchError>,
    }

    #[async_trait]
    impl RepositoryDispatcher for RecordingDispatcher {
        async fn dispatch(
            &self,
            _target: &UpstreamTarget,
            payload: &DispatchPayload,
        ) -> Result<(), DispatchError> {
            self.calls.lock().unwrap().push(payload.clone());
            match &self.fail_with {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }
    }

    fn config() -> GatewayConfig {
        GatewayConfig {
            credentials: CredentialSources {
                list: Some("A,B".into()),
                ..Default::default()
            },
            upstream: UpstreamConfig {
                owner: Some("octo".into()),
                repo: Some("infra".into()),
                token: Some("ghp_x".into()),
            },
        }
    }

    fn service(config: GatewayConfig, dispatcher: Arc<RecordingDispatcher>) -> DispatchService {
        DispatchService::new(config, dispatcher)
    }

    #[test]
    fn authenticate_uses_configured_keys() {
        let svc = service(config(), Arc::default());
        assert!(svc.authenticate(Some("B")).is_ok());
        assert_eq!(svc.authenticate(Some("C")), Err(GatewayError::Unauthorized));
    }

    #[tokio::test]
    async fn valid_deploy_makes_exactly_one_call() {
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let svc = service(config(), Arc::clone(&dispatcher));

        let body = br#"{"action":"deploy","args":{"env":"prod","version":"1.0"},"request_id":"r-1"}"#;
        let outcome = svc.dispatch(body).await.unwrap();

        assert_eq!(outcome.request_id.as_str(), "r-1");
        assert_eq!(outcome.action, Action::Deploy);

        let calls = dispatcher.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].client_payload.action, "deploy");
        assert_eq!(calls[0].client_payload.args["version"], "1.0");
        assert_eq!(calls[0].client_payload.request_id.as_str(), "r-1");
    }

    #[tokio::test]
    async fn rejected_requests_never_reach_upstream() {
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let svc = service(config(), Arc::clone(&dispatcher));

        let bodies: [&[u8]; 4] = [
            b"not json",
            br#"{"action":"nuke","args":{}}"#,
            br#"{"action":"deploy","args":{"env":"qa","version":"1.0"}}"#,
            br#"{"action":"scan","args":null}"#,
        ];
        for body in bodies {
            assert!(svc.dispatch(body).await.is_err());
        }
        assert!(dispatcher.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_upstream_config_is_reported_after_validation() {
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let mut cfg = config();
        cfg.upstream.token = None;
        let svc = service(cfg, Arc::clone(&dispatcher));

        let err = svc.dispatch(br#"{"action":"scan","args":{}}"#).await.unwrap_err();
        assert_eq!(err.code(), "missing_github_config");

        let err = svc.dispatch(br#"{"action":"nuke","args":{}}"#).await.unwrap_err();
        assert_eq!(err.code(), "action_not_allowed");
        assert!(dispatcher.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn upstream_failure_is_propagated() {
        let dispatcher = Arc::new(RecordingDispatcher {
            fail_with: Some(DispatchError::Rejected {
                status: 500,
                body: Some("server error".into()),
            }),
            ..Default::default()
        });
        let svc = service(config(), Arc::clone(&dispatcher));

        let err = svc.dispatch(br#"{"action":"report","args":{}}"#).await.unwrap_err();
        assert_eq!(err.status(), 502);
        assert_eq!(err.to_body()["response"], "server error");
        assert_eq!(dispatcher.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn repeated_request_id_is_not_deduplicated() {
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let svc = service(config(), Arc::clone(&dispatcher));
        let body = br#"{"action":"ping","args":{},"request_id":"same"}"#;

        let first = svc.dispatch(body).await.unwrap();
        let second = svc.dispatch(body).await.unwrap();

        assert_eq!(first.request_id, second.request_id);
        assert_eq!(dispatcher.calls.lock().unwrap().len(), 2);
    }

    #[test]
    fn success_body_echoes_request_id() {
        let outcome = Dispatched {
            request_id: RequestId::from_caller("r-9").unwrap(),
            action: Action::Scan,
        };
        assert_eq!(
            outcome.to_body(),
            json!({ "ok": true, "dispatched": true, "request_id": "r-9" })
        );
    }
}
