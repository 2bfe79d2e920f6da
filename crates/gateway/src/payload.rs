//! The outbound `repository_dispatch` payload and the dispatcher port.

use async_trait::async_trait;
use serde::Serialize;

use crate::actions::{Action, Args};
use crate::config::UpstreamTarget;
use crate::errors::DispatchError;
use crate::identifiers::RequestId;

/// `event_type` sent for every action.
///
/// The listening workflow subscribes with
/// `on: repository_dispatch: types: [dispatch]` and branches on
/// `client_payload.action`.
pub const DISPATCH_EVENT_TYPE: &str = "dispatch";

/// Body of `POST /repos/{owner}/{repo}/dispatches`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchPayload {
    /// Always [`DISPATCH_EVENT_TYPE`].
    pub event_type: &'static str,
    /// Data forwarded verbatim to the workflow run.
    pub client_payload: ClientPayload,
}

/// The `client_payload` object seen by the workflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientPayload {
    pub request_id: RequestId,
    pub action: &'static str,
    pub args: Args,
}

impl DispatchPayload {
    /// Builds the payload for a validated action.
    pub fn new(request_id: RequestId, action: Action, args: Args) -> Self {
        Self {
            event_type: DISPATCH_EVENT_TYPE,
            client_payload: ClientPayload {
                request_id,
                action: action.name(),
                args,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Port
// ---------------------------------------------------------------------------

/// Performs the single outbound dispatch call.
///
/// Implementations make exactly one attempt per invocation and never retry.
/// A `204 No Content` answer is `Ok(())`; everything else is a
/// [`DispatchError`].
#[async_trait]
pub trait RepositoryDispatcher: Send + Sync {
    /// Sends `payload` to the dispatch endpoint of `target`.
    async fn dispatch(
        &self,
        target: &UpstreamTarget,
        payload: &DispatchPayload,
    ) -> Result<(), DispatchError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_nests_request_under_client_payload() {
        let mut args = Args::new();
        args.insert("env".into(), json!("prod"));
        args.insert("version".into(), json!("1.0"));

        let payload = DispatchPayload::new(
            RequestId::from_caller("req-1").unwrap(),
            Action::Deploy,
            args,
        );

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "event_type": "dispatch",
                "client_payload": {
                    "request_id": "req-1",
                    "action": "deploy",
                    "args": { "env": "prod", "version": "1.0" },
                },
            })
        );
    }

    #[test]
    fn event_type_is_fixed_for_every_action() {
        for action in Action::ALL {
            let payload = DispatchPayload::new(RequestId::generate(), action, Args::new());
            assert_eq!(payload.event_type, DISPATCH_EVENT_TYPE);
        }
    }
}
