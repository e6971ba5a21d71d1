//! Client builder for transport, header and dispatch options
//!
//! The `ClientBuilder` provides a fluent API for configuring a client before
//! it is created. It allows you to:
//! - Set the timeout and TLS verification of the HTTP transport
//! - Add extra headers and HTTP Basic credentials
//! - Choose argument flattening, debug tracing and batch correlation
//! - Configure observability (OpenTelemetry)
//! - Plug in a custom transport or trace sink
//!
//! # Examples
//!
//! ```rust,no_run
//! use jroh_client::ClientBuilder;
//! use std::time::Duration;
//!
//! # async fn example() -> jroh_core::Result<()> {
//! let mut client = ClientBuilder::new("https://rpc.example.com/")
//!     .timeout(Duration::from_secs(10))
//!     .header("X-Api-Key", "secret")
//!     .credentials("user", "pass")
//!     .build()?;
//!
//! let sum: i64 = client.call("add", serde_json::json!([2, 3])).await?;
//!
//! // With observability
//! let client2 = ClientBuilder::new("https://rpc.example.com/")
//!     .with_default_observability()
//!     .service_name("my-client")
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use crate::batch::BatchCorrelation;
use crate::client::{ClientConfig, RpcClient};
use crate::headers::HeaderSet;
use crate::trace_sink::{TraceSink, TracingSink};
use crate::transport::{HttpTransport, ReqwestTransport};
use jroh_core::{EnvelopeBuilder, Error, Result};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

/// Builder for configuring and creating an RpcClient
pub struct ClientBuilder {
    config: ClientConfig,
    extra_headers: Vec<(String, String)>,
    credentials: Option<(String, String)>,
    overlay: Map<String, Value>,
    transport: Option<Box<dyn HttpTransport>>,
    sink: Option<Box<dyn TraceSink>>,
    observability_config: Option<jroh_core::ObservabilityConfig>,
    service_name: Option<String>,
}

impl ClientBuilder {
    /// Create a new client builder
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            config: ClientConfig::new(url),
            extra_headers: Vec::new(),
            credentials: None,
            overlay: Map::new(),
            transport: None,
            sink: None,
            observability_config: None,
            service_name: None,
        }
    }

    /// Whole-request timeout (default 3 seconds)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.transport.timeout = timeout;
        self
    }

    /// Verify the server's TLS certificate (default on)
    pub fn ssl_verify_peer(mut self, verify: bool) -> Self {
        self.config.transport.ssl_verify_peer = verify;
        self
    }

    /// Add one header on top of the defaults
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }

    /// Add several headers on top of the defaults
    pub fn headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.extra_headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Send HTTP Basic credentials with every request
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Treat a lone object argument as named params (default on)
    pub fn named_arguments(mut self, enabled: bool) -> Self {
        self.config.named_arguments = enabled;
        self
    }

    /// Send request/response traces to the trace sink (default off)
    pub fn debug(mut self, enabled: bool) -> Self {
        self.config.debug = enabled;
        self
    }

    /// How batch results are matched to requests (default positional)
    pub fn batch_correlation(mut self, correlation: BatchCorrelation) -> Self {
        self.config.correlation = correlation;
        self
    }

    /// Extra top-level members merged into every request envelope
    pub fn with_payload(mut self, overlay: Map<String, Value>) -> Self {
        self.overlay = overlay;
        self
    }

    /// Use a custom transport instead of the reqwest one
    pub fn with_transport(mut self, transport: impl HttpTransport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Use a custom sink for debug traces
    pub fn with_trace_sink(mut self, sink: impl TraceSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Enable OpenTelemetry observability with custom configuration
    pub fn with_observability(mut self, config: jroh_core::ObservabilityConfig) -> Self {
        self.observability_config = Some(config);
        self
    }

    /// Enable OpenTelemetry observability with default configuration
    pub fn with_default_observability(mut self) -> Self {
        self.observability_config = Some(jroh_core::ObservabilityConfig::default());
        self
    }

    /// Set service name for observability (used if observability is enabled)
    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    /// Build the client
    ///
    /// No connection is made; the first call opens one. Fails if an extra
    /// header is not a valid HTTP header.
    pub fn build(self) -> Result<RpcClient> {
        let metrics = if let Some(mut config) = self.observability_config {
            if let Some(name) = self.service_name {
                config.service_name = name;
            }
            if self.config.debug {
                config.wire_traces = true;
            }

            jroh_core::init_observability(config.clone())
                .map_err(|e| Error::Internal(format!("Failed to initialize observability: {}", e)))?;

            Some(Arc::new(crate::ClientMetrics::new(&config.service_name)))
        } else {
            None
        };

        let transport: Box<dyn HttpTransport> = match self.transport {
            Some(mut custom) => {
                custom.reconfigure(&self.config.transport)?;
                custom
            }
            None => Box::new(ReqwestTransport::new(self.config.transport)?),
        };
        let sink = self.sink.unwrap_or_else(|| Box::new(TracingSink));

        tracing::debug!(url = %self.config.url, "Creating JSON-RPC client");

        let mut client = RpcClient::from_parts(
            self.config,
            HeaderSet::assemble(self.extra_headers)?,
            EnvelopeBuilder::with_overlay(self.overlay),
            transport,
            sink,
            metrics,
        );
        if let Some((username, password)) = self.credentials {
            client.authentication(username, password);
        }
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_defaults() {
        let builder = ClientBuilder::new("http://localhost:8080");

        assert_eq!(builder.config.url, "http://localhost:8080");
        assert_eq!(builder.config.transport.timeout, Duration::from_secs(3));
        assert!(builder.config.transport.ssl_verify_peer);
        assert!(builder.config.named_arguments);
        assert!(!builder.config.debug);
        assert_eq!(builder.config.correlation, BatchCorrelation::Positional);
        assert!(builder.extra_headers.is_empty());
        assert!(builder.credentials.is_none());
        assert!(builder.observability_config.is_none());
        assert!(builder.service_name.is_none());
    }

    #[test]
    fn test_builder_chaining() {
        let builder = ClientBuilder::new("http://localhost:8080")
            .timeout(Duration::from_millis(500))
            .ssl_verify_peer(false)
            .header("X-One", "1")
            .headers([("X-Two", "2")])
            .credentials("user", "pass")
            .named_arguments(false)
            .debug(true)
            .batch_correlation(BatchCorrelation::ById);

        assert_eq!(builder.config.transport.timeout, Duration::from_millis(500));
        assert!(!builder.config.transport.ssl_verify_peer);
        assert_eq!(builder.extra_headers.len(), 2);
        assert!(builder.credentials.is_some());
        assert!(!builder.config.named_arguments);
        assert!(builder.config.debug);
        assert_eq!(builder.config.correlation, BatchCorrelation::ById);
    }

    #[test]
    fn test_build_assembles_headers() {
        let client = ClientBuilder::new("http://localhost:8080")
            .header("X-Api-Key", "k")
            .header("Accept", "application/json-rpc")
            .credentials("Aladdin", "open sesame")
            .build()
            .unwrap();

        let headers = client.headers();
        assert_eq!(headers.get("x-api-key"), Some("k"));
        assert_eq!(headers.get("accept"), Some("application/json-rpc"));
        assert_eq!(headers.get("Content-Type"), Some("application/json"));
        assert_eq!(
            headers.get("Authorization"),
            Some("Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==")
        );
    }

    #[test]
    fn test_build_rejects_invalid_header() {
        let result = ClientBuilder::new("http://localhost:8080")
            .header("X-Bad", "line\nbreak")
            .build();

        let error = result.unwrap_err();
        assert_eq!(error.kind(), jroh_core::ErrorKind::Internal);
        assert!(error.to_string().contains("X-Bad"));
    }

    #[test]
    fn test_build_applies_payload_overlay() {
        let overlay = json!({"session": "abc"}).as_object().unwrap().clone();
        let client = ClientBuilder::new("http://localhost:8080")
            .with_payload(overlay)
            .build()
            .unwrap();

        let request = client.prepare_request("ping", ());
        assert_eq!(request.extra.get("session"), Some(&json!("abc")));
    }

    #[test]
    fn test_builder_observability_config() {
        let config = jroh_core::ObservabilityConfig::new("test-client")
            .with_endpoint("http://localhost:4317")
            .with_log_level("debug");

        let builder = ClientBuilder::new("http://localhost:8080").with_observability(config);

        let obs_config = builder.observability_config.unwrap();
        assert_eq!(obs_config.service_name, "test-client");
        assert_eq!(obs_config.log_level, "debug");
    }

    #[test]
    fn test_builder_default_observability() {
        let builder = ClientBuilder::new("http://localhost:8080")
            .with_default_observability()
            .service_name("my-service");

        let obs_config = builder.observability_config.unwrap();
        assert_eq!(obs_config.service_name, "jroh");
        assert_eq!(builder.service_name, Some("my-service".to_string()));
    }
}
