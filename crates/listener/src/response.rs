//! JSON responses returned by every route.
//!
//! All answers, including rejections and unknown routes, are
//! `application/json` with an `ok` flag so callers never have to handle a
//! bare transport-level error page.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gateway::{ErrorCategory, GatewayError};
use serde_json::{json, Value};
use tracing::{error, warn};

/// A status code plus JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    /// `200 OK` with `body`.
    pub fn ok(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    /// Maps a pipeline rejection to its status and body, logging it.
    ///
    /// Caller-side rejections log at `warn`; configuration and upstream
    /// failures log at `error` since they need an operator.
    pub fn rejected(err: &GatewayError) -> Self {
        let code = err.code();
        match err.category() {
            ErrorCategory::Auth | ErrorCategory::Validation => {
                warn!(error = code, reason = %err, "Dispatch request rejected");
            }
            ErrorCategory::Configuration | ErrorCategory::Upstream => {
                error!(error = code, reason = %err, "Dispatch request failed");
            }
        }

        Self {
            status: StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body: err.to_body(),
        }
    }

    /// `404` for any path the gateway does not serve.
    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: json!({ "ok": false, "error": "not_found" }),
        }
    }

    /// `405` for the dispatch path under a method other than `POST`.
    pub fn method_not_allowed() -> Self {
        Self {
            status: StatusCode::METHOD_NOT_ALLOWED,
            body: json!({ "ok": false, "error": "method_not_allowed" }),
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
