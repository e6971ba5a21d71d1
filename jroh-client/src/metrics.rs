//! Client metrics
//!
//! OpenTelemetry instruments recorded by [`crate::RpcClient`] when
//! observability is enabled through the builder:
//!
//! - `jroh.client.requests.total` (counter): HTTP exchanges by procedure and status
//! - `jroh.client.request.duration` (histogram): exchange latency in seconds
//! - `jroh.client.errors.total` (counter): failures by error kind
//! - `jroh.client.batch.size` (histogram): requests per flushed batch
//!
//! Without an installed meter provider the instruments are no-ops.

use jroh_core::ErrorKind;
use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter},
    KeyValue,
};

/// Instruments for one client
pub struct ClientMetrics {
    pub requests_total: Counter<u64>,
    pub request_duration: Histogram<f64>,
    pub errors_total: Counter<u64>,
    pub batch_size: Histogram<u64>,
}

impl ClientMetrics {
    /// Instruments from the global meter named after the service
    pub fn new(service_name: impl Into<String>) -> Self {
        let name: &'static str = Box::leak(service_name.into().into_boxed_str());
        let meter = global::meter(name);
        Self::new_with_meter(&meter)
    }

    /// Instruments from a caller-supplied meter
    pub fn new_with_meter(meter: &Meter) -> Self {
        Self {
            requests_total: meter
                .u64_counter("jroh.client.requests.total")
                .with_description("Total number of HTTP exchanges")
                .build(),
            request_duration: meter
                .f64_histogram("jroh.client.request.duration")
                .with_description("HTTP exchange duration in seconds")
                .build(),
            errors_total: meter
                .u64_counter("jroh.client.errors.total")
                .with_description("Total number of failed calls by error kind")
                .build(),
            batch_size: meter
                .u64_histogram("jroh.client.batch.size")
                .with_description("Number of requests per flushed batch")
                .build(),
        }
    }

    /// Record one exchange; `procedure` is `"batch"` for batch flushes
    pub fn record_request(&self, procedure: &str, status: &str, duration_secs: f64) {
        let attributes = &[
            KeyValue::new("procedure", procedure.to_string()),
            KeyValue::new("status", status.to_string()),
        ];
        self.requests_total.add(1, attributes);
        self.request_duration.record(duration_secs, attributes);
    }

    pub fn record_error(&self, kind: ErrorKind) {
        self.errors_total
            .add(1, &[KeyValue::new("error_kind", kind.as_str())]);
    }

    pub fn record_batch(&self, size: u64) {
        self.batch_size.record(size, &[]);
    }
}
