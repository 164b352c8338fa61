//! Subscriber setup.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::exporter::file_tracer_provider;
use super::{SERVICE_NAME, TRACE_FILE_NAME};
use crate::Config;

/// Installs the global subscriber exporting spans to the trace file.
///
/// The filter is `RUST_LOG` when set, else [`Config::effective_trace_level`].
/// Returns the provider so the caller can flush it on exit, or `None` if
/// the data directory cannot be created or a subscriber is already installed.
pub fn init_tracing(config: &Config) -> Option<TracerProvider> {
    let data_dir = config.resolved_data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return None;
    }

    let resource = Resource::new(vec![
        KeyValue::new("service.name", SERVICE_NAME),
        KeyValue::new("service.version", crate::APP_VERSION),
    ]);
    let provider = file_tracer_provider(data_dir.join(TRACE_FILE_NAME), resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.effective_trace_level()));

    tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .try_init()
        .ok()?;

    tracing::debug!(data_dir = %data_dir.display(), "tracing initialised");
    Some(provider)
}
