//! Router assembly and server lifecycle.
//!
//! Follows a deferred startup pattern: [`GatewayServer::new`] holds the
//! configuration, [`GatewayServer::start`] binds the TCP listener, and
//! [`GatewayServer::serve`] accepts connections until the shutdown future
//! resolves.

use std::future::Future;
use std::net::SocketAddr;

use axum::routing::{any, post};
use axum::Router;
use gateway::DispatchService;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers::{
    debug_env_handler, dispatch_handler, health_handler, method_not_allowed_handler,
    not_found_handler, AppState,
};

/// Default cap on the dispatch request body.
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

/// Listener settings.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Address to bind. Port 0 means OS-assigned.
    pub bind: SocketAddr,
    /// Largest accepted dispatch body.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Errors from the server lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("serve() called before start()")]
    NotStarted,

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Assembles the axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", any(health_handler))
        .route("/debug-env", any(debug_env_handler))
        .route(
            "/v1/dispatch",
            post(dispatch_handler).fallback(method_not_allowed_handler),
        )
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Owns the listener socket and the router state.
pub struct GatewayServer {
    config: ListenerConfig,
    service: DispatchService,
    listener: Option<TcpListener>,
}

impl GatewayServer {
    /// Creates the server without binding any port.
    pub fn new(config: ListenerConfig, service: DispatchService) -> Self {
        Self {
            config,
            service,
            listener: None,
        }
    }

    /// Binds the configured address and returns the actual local address.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the address cannot be bound.
    pub async fn start(&mut self) -> Result<SocketAddr, ServerError> {
        let addr = self.config.bind;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        let local = listener.local_addr()?;

        info!(%local, "TCP listener bound");
        self.listener = Some(listener);
        Ok(local)
    }

    /// Serves requests until `shutdown` resolves, then drains in-flight
    /// requests and returns.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::NotStarted`] if [`start`](Self::start) was not
    /// called, or [`ServerError::Io`] on a fatal accept-loop error.
    pub async fn serve(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let listener = self.listener.ok_or(ServerError::NotStarted)?;
        let router = build_router(AppState {
            service: self.service,
            max_body_bytes: self.config.max_body_bytes,
        });

        info!("Serving HTTP connections");
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Server stopped");
        Ok(())
    }
}
