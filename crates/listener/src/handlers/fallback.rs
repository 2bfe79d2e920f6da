//! Terminal answers for unknown routes and disallowed methods.

use crate::response::ApiResponse;

/// Any path other than `/health`, `/debug-env`, and `/v1/dispatch`.
pub async fn not_found_handler() -> ApiResponse {
    ApiResponse::not_found()
}

/// `/v1/dispatch` under any method except `POST`.
pub async fn method_not_allowed_handler() -> ApiResponse {
    ApiResponse::method_not_allowed()
}
