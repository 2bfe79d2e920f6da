//! Decoding of the `/v1/dispatch` request body.
//!
//! The body is decoded as a generic JSON value first so that each field can
//! be rejected with its own error code. A body that is valid JSON but not an
//! object (`[]`, `null`, `"x"`) has no `action` and is reported as
//! [`GatewayError::InvalidAction`], not as invalid JSON.

use serde_json::Value;

use crate::actions::Args;
use crate::errors::GatewayError;
use crate::identifiers::RequestId;

/// A decoded, shape-checked dispatch request.
///
/// `action` is only known to be a non-blank string here; registry lookup
/// happens in the next stage.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingRequest {
    /// Requested action name, exactly as sent.
    pub action: String,
    /// Argument object.
    pub args: Args,
    /// Caller-supplied or freshly generated correlation id.
    pub request_id: RequestId,
}

impl IncomingRequest {
    /// Decodes a raw request body.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::InvalidJson`] when `body` is not JSON.
    /// - [`GatewayError::InvalidAction`] when `action` is missing, not a
    ///   string, or blank after trimming.
    /// - [`GatewayError::InvalidArgs`] when `args` is missing or not an object
    ///   (arrays and `null` included).
    pub fn parse(body: &[u8]) -> Result<Self, GatewayError> {
        let value: Value = serde_json::from_slice(body).map_err(|_| GatewayError::InvalidJson)?;

        let request_id =
            RequestId::from_caller_or_generate(value.get("request_id").and_then(Value::as_str));

        let action = match value.get("action").and_then(Value::as_str) {
            Some(action) if !action.trim().is_empty() => action.to_owned(),
            _ => return Err(GatewayError::InvalidAction),
        };

        let args = match value.get("args") {
            Some(Value::Object(args)) => args.clone(),
            _ => return Err(GatewayError::InvalidArgs),
        };

        Ok(Self {
            action,
            args,
            request_id,
        })
    }
}
