//! `POST /v1/dispatch`.

use axum::body::{to_bytes, Body};
use axum::extract::State;
use axum::http::HeaderMap;
use gateway::{GatewayError, API_KEY_HEADER};
use tracing::debug;

use super::AppState;
use crate::response::ApiResponse;

/// Authenticates the caller, then reads the body and runs the pipeline.
///
/// The body is only read once the API key has been accepted. A body that
/// cannot be read (aborted upload, over the size cap) is reported the same
/// way as one that is not JSON.
pub async fn dispatch_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> ApiResponse {
    let api_key = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());
    if let Err(err) = state.service.authenticate(api_key) {
        return ApiResponse::rejected(&err);
    }

    let bytes = match to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(err) => {
            debug!(error = %err, "Could not read dispatch body");
            return ApiResponse::rejected(&GatewayError::InvalidJson);
        }
    };

    match state.service.dispatch(&bytes).await {
        Ok(dispatched) => ApiResponse::ok(dispatched.to_body()),
        Err(err) => ApiResponse::rejected(&err),
    }
}
