//! Tracing subscriber and OpenTelemetry exporter setup.

use anyhow::Context;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::TracerProvider;
use opentelemetry_sdk::{runtime, Resource};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LogFormat;

const SERVICE_NAME: &str = "actions-gateway";

/// Keeps the exporter alive for the life of the process.
pub struct Telemetry {
    provider: Option<TracerProvider>,
}

impl Telemetry {
    /// Flushes buffered spans. Call once, after the server has stopped.
    pub fn shutdown(self) {
        if let Some(provider) = self.provider {
            if let Err(err) = provider.shutdown() {
                tracing::warn!(error = %err, "Failed to flush OpenTelemetry spans");
            }
        }
    }
}

/// Installs the global subscriber.
///
/// `RUST_LOG` controls filtering (default `info`). When `otlp_endpoint` is
/// set, spans are also exported over OTLP/gRPC.
///
/// # Errors
///
/// Fails if the exporter cannot be built or a global subscriber is already set.
pub fn init(format: LogFormat, otlp_endpoint: Option<&str>) -> anyhow::Result<Telemetry> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (json, pretty) = match format {
        LogFormat::Json => (Some(fmt::layer().json().with_current_span(true)), None),
        LogFormat::Pretty => (None, Some(fmt::layer())),
    };

    let provider = otlp_endpoint.map(build_provider).transpose()?;
    let otel = provider
        .as_ref()
        .map(|p| tracing_opentelemetry::layer().with_tracer(p.tracer(SERVICE_NAME)));

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(pretty)
        .with(otel)
        .try_init()
        .context("installing tracing subscriber")?;

    Ok(Telemetry { provider })
}

fn build_provider(endpoint: &str) -> anyhow::Result<TracerProvider> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .context("building OTLP span exporter")?;

    Ok(TracerProvider::builder()
        .with_batch_exporter(exporter, runtime::Tokio)
        .with_resource(Resource::new([KeyValue::new("service.name", SERVICE_NAME)]))
        .build())
}
