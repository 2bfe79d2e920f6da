//! Actions gateway HTTP surface.
//!
//! Exposes the [`gateway::DispatchService`] pipeline over HTTP with axum:
//!
//! | Path | Method | Auth | Handler |
//! |------|--------|------|---------|
//! | `/health` | any | none | [`handlers::health_handler`] |
//! | `/debug-env` | any | none | [`handlers::debug_env_handler`] |
//! | `/v1/dispatch` | `POST` | `x-api-key` | [`handlers::dispatch_handler`] |
//! | `/v1/dispatch` | other | — | `405 method_not_allowed` |
//! | anything else | any | — | `404 not_found` |
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Routing, body reading, HTTP status mapping, and the
//! server lifecycle live here. Validation rules and error codes come from the
//! [`gateway`] crate.

pub mod handlers;
pub mod response;
pub mod server;

pub use handlers::AppState;
pub use response::ApiResponse;
pub use server::{build_router, GatewayServer, ListenerConfig, ServerError};
