//! OpenTelemetry and `tracing` setup for applications using jroh
//!
//! The client crates only emit `tracing` events and OpenTelemetry metrics;
//! they never install a subscriber themselves. Applications that want those
//! signals exported call [`init_observability`] once at startup, usually via
//! `ClientBuilder::with_observability`.
//!
//! What gets installed:
//!
//! - a tracer provider exporting spans over OTLP/gRPC (when traces are enabled)
//! - a meter provider with a periodic OTLP reader (when metrics are enabled)
//! - a `tracing-subscriber` registry with an `EnvFilter` and a JSON fmt layer,
//!   plus the OpenTelemetry layer when traces are enabled
//!
//! `RUST_LOG` overrides the configured log level and
//! `OTEL_EXPORTER_OTLP_ENDPOINT` provides the default collector address.
//! Debug wire traces from `TracingSink` use the `jroh::wire` target; turn
//! them on with [`ObservabilityConfig::with_wire_traces`].
//!
//! ```rust,no_run
//! use jroh_core::ObservabilityConfig;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ObservabilityConfig::new("billing-client").with_log_level("debug");
//!     jroh_core::init_observability(config).expect("observability");
//!
//!     // ... make calls ...
//!
//!     jroh_core::shutdown_observability();
//! }
//! ```

use opentelemetry::{global, KeyValue};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How often metrics are pushed to the collector
const METRICS_EXPORT_INTERVAL: Duration = Duration::from_secs(30);

const WIRE_TRACE_DIRECTIVE: &str = "jroh::wire=debug";

/// Observability configuration
///
/// Defaults: service name `"jroh"`, the crate version, the OTLP endpoint from
/// `OTEL_EXPORTER_OTLP_ENDPOINT` (else `http://localhost:4317`), traces,
/// metrics and logs all on, log level from `RUST_LOG` (else `"info"`).
///
/// ```rust
/// use jroh_core::ObservabilityConfig;
///
/// let config = ObservabilityConfig::new("inventory-sync")
///     .with_endpoint("http://collector:4317")
///     .with_metrics(false);
/// assert_eq!(config.service_name, "inventory-sync");
/// assert!(!config.enable_metrics);
/// ```
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Service name attached to every span and metric
    pub service_name: String,
    /// Service version attached to every span and metric
    pub service_version: String,
    /// OTLP/gRPC collector endpoint
    pub otlp_endpoint: String,
    /// Export spans
    pub enable_traces: bool,
    /// Export metrics
    pub enable_metrics: bool,
    /// Emit structured logs
    pub enable_logs: bool,
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_level: String,
    /// Let `jroh::wire` debug events through regardless of `log_level`
    pub wire_traces: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: "jroh".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            otlp_endpoint: std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:4317".to_string()),
            enable_traces: true,
            enable_metrics: true,
            enable_logs: true,
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            wire_traces: false,
        }
    }
}

impl ObservabilityConfig {
    /// Default configuration with a custom service name
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Default::default()
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.otlp_endpoint = endpoint.into();
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.service_version = version.into();
        self
    }

    pub fn with_traces(mut self, enable: bool) -> Self {
        self.enable_traces = enable;
        self
    }

    pub fn with_metrics(mut self, enable: bool) -> Self {
        self.enable_metrics = enable;
        self
    }

    pub fn with_logs(mut self, enable: bool) -> Self {
        self.enable_logs = enable;
        self
    }

    pub fn with_wire_traces(mut self, enable: bool) -> Self {
        self.wire_traces = enable;
        self
    }

    fn resource(&self) -> opentelemetry_sdk::Resource {
        opentelemetry_sdk::Resource::builder_empty()
            .with_attributes(vec![
                KeyValue::new(
                    opentelemetry_semantic_conventions::resource::SERVICE_NAME,
                    self.service_name.clone(),
                ),
                KeyValue::new(
                    opentelemetry_semantic_conventions::resource::SERVICE_VERSION,
                    self.service_version.clone(),
                ),
            ])
            .build()
    }
}

/// Install the providers and subscriber described by `config`
///
/// Call once per process. The global `tracing` subscriber can only be set
/// once, so a second call fails.
pub fn init_observability(
    config: ObservabilityConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let tracer = if config.enable_traces {
        Some(init_tracer(&config)?)
    } else {
        None
    };

    if config.enable_metrics {
        init_metrics(&config)?;
    }

    if config.enable_logs || tracer.is_some() {
        init_tracing_subscriber(&config, tracer)?;
    }

    tracing::info!(
        service_name = %config.service_name,
        otlp_endpoint = %config.otlp_endpoint,
        traces = config.enable_traces,
        metrics = config.enable_metrics,
        logs = config.enable_logs,
        "OpenTelemetry initialized"
    );

    Ok(())
}

fn init_tracer(
    config: &ObservabilityConfig,
) -> Result<opentelemetry_sdk::trace::Tracer, Box<dyn std::error::Error + Send + Sync>> {
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::trace::{RandomIdGenerator, Sampler};

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(config.otlp_endpoint.clone())
        .build()?;

    let provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(config.resource())
        .with_sampler(Sampler::AlwaysOn)
        .with_id_generator(RandomIdGenerator::default())
        .build();

    // The subscriber layer needs a tracer before the provider goes global
    let tracer = provider.tracer(config.service_name.clone());
    global::set_tracer_provider(provider);

    Ok(tracer)
}

fn init_metrics(config: &ObservabilityConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use opentelemetry_otlp::WithExportConfig;

    let exporter = opentelemetry_otlp::MetricExporter::builder()
        .with_tonic()
        .with_endpoint(config.otlp_endpoint.clone())
        .build()?;

    let reader = opentelemetry_sdk::metrics::PeriodicReader::builder(exporter)
        .with_interval(METRICS_EXPORT_INTERVAL)
        .build();

    let provider = opentelemetry_sdk::metrics::SdkMeterProvider::builder()
        .with_reader(reader)
        .with_resource(config.resource())
        .build();

    global::set_meter_provider(provider);
    Ok(())
}

fn init_tracing_subscriber(
    config: &ObservabilityConfig,
    tracer: Option<opentelemetry_sdk::trace::Tracer>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_level))?;
    if config.wire_traces {
        env_filter = env_filter.add_directive(WIRE_TRACE_DIRECTIVE.parse()?);
    }

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .json();

    // Option<Layer> is itself a layer, so one registry covers both cases
    let telemetry_layer = tracer.map(|t| tracing_opentelemetry::layer().with_tracer(t));

    tracing_subscriber::registry()
        .with(telemetry_layer)
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Flush and release telemetry resources
///
/// SDK providers flush when dropped; this marks the end of the process's
/// telemetry in the logs and is safe to call more than once.
pub fn shutdown_observability() {
    tracing::info!("Shutting down OpenTelemetry");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.service_name, "jroh");
        assert_eq!(config.service_version, env!("CARGO_PKG_VERSION"));
        assert!(config.enable_traces);
        assert!(config.enable_metrics);
        assert!(config.enable_logs);
        assert!(!config.wire_traces);
    }

    #[test]
    fn test_wire_trace_directive_parses() {
        let directive: tracing_subscriber::filter::Directive = WIRE_TRACE_DIRECTIVE.parse().unwrap();
        assert_eq!(directive.to_string(), WIRE_TRACE_DIRECTIVE);
    }

    #[test]
    fn test_builder_chaining() {
        let config = ObservabilityConfig::new("test-service")
            .with_endpoint("http://custom:4317")
            .with_log_level("debug")
            .with_version("1.0.0")
            .with_traces(false)
            .with_metrics(false)
            .with_logs(true)
            .with_wire_traces(true);

        assert_eq!(config.service_name, "test-service");
        assert_eq!(config.otlp_endpoint, "http://custom:4317");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.service_version, "1.0.0");
        assert!(!config.enable_traces);
        assert!(!config.enable_metrics);
        assert!(config.enable_logs);
        assert!(config.wire_traces);
    }

    #[test]
    fn test_init_all_disabled_installs_nothing() {
        let config = ObservabilityConfig::new("test-none")
            .with_traces(false)
            .with_metrics(false)
            .with_logs(false);

        assert!(init_observability(config).is_ok());
    }

    #[test]
    fn test_shutdown_idempotent() {
        shutdown_observability();
        shutdown_observability();
    }
}
