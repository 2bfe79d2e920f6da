//! Actions gateway entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Parse configuration** — read flags and environment variables once with
//!    `clap` and build the immutable [`gateway::GatewayConfig`].
//! 2. **Wire observability** — configure `tracing-subscriber` with a JSON (or
//!    pretty) layer and, when an endpoint is configured, an OpenTelemetry OTLP
//!    exporter. All `tracing` spans and events from every crate flow through it.
//! 3. **Construct infrastructure** — create the [`github::GithubClient`] and
//!    inject it into [`gateway::DispatchService`].
//! 4. **Serve** — bind the listener and serve until Ctrl-C or SIGTERM.

mod config;
mod telemetry;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use gateway::DispatchService;
use github::GithubClient;
use listener::GatewayServer;
use tracing::info;

use crate::config::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let telemetry = telemetry::init(cli.log_format, cli.otlp_endpoint.as_deref())?;

    let gateway_config = cli.gateway_config();
    let presence = gateway_config.presence();
    info!(
        accepted_keys = presence.accepted_keys_count,
        gh_owner_set = presence.gh_owner_set,
        gh_repo_set = presence.gh_repo_set,
        gh_token_set = presence.gh_token_set,
        "Configuration loaded"
    );

    let client = GithubClient::new(cli.github_client_config()).context("building GitHub client")?;
    let service = DispatchService::new(gateway_config, Arc::new(client));

    let mut server = GatewayServer::new(cli.listener_config(), service);
    let addr = server.start().await?;
    info!(%addr, "Actions gateway listening");

    let result = server.serve(shutdown_signal()).await;
    telemetry.shutdown();
    result.map_err(Into::into)
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Ctrl-C received, shutting down"),
        () = terminate => info!("SIGTERM received, shutting down"),
    }
}
