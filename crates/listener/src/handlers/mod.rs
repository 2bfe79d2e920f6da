//! Route handlers and the shared state they receive.
//!
//! `AppState` is carried through axum's `State` extractor. It holds only the
//! immutable [`DispatchService`] and a body size cap, so cloning is cheap and
//! requests share no mutable state.

pub mod dispatch;
pub mod fallback;
pub mod health;

pub use dispatch::dispatch_handler;
pub use fallback::{method_not_allowed_handler, not_found_handler};
pub use health::{debug_env_handler, health_handler};

use gateway::DispatchService;

/// Shared application state passed to all handlers via `State` extraction.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The validation-and-forwarding pipeline.
    pub service: DispatchService,
    /// Largest dispatch body read before the request is refused as invalid JSON.
    pub max_body_bytes: usize,
}
