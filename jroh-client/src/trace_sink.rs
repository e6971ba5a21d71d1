//! Debug output for wire traffic
//!
//! With `debug` switched on, the client hands every outgoing request body and
//! every incoming response body, pretty-printed, to a [`TraceSink`] before the
//! call returns. The default [`TracingSink`] writes them as `tracing` events
//! under the `jroh::wire` target so they can be filtered independently:
//!
//! ```text
//! RUST_LOG=jroh::wire=debug
//! ```

/// Receiver of request/response traces
pub trait TraceSink: Send + Sync {
    /// An outgoing request body
    fn request(&self, url: &str, payload: &str);

    /// An incoming response body with its HTTP status
    fn response(&self, url: &str, status: u16, payload: &str);
}

/// Sink that emits traces through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn request(&self, url: &str, payload: &str) {
        tracing::debug!(target: "jroh::wire", url, "==> Request:\n{}", payload);
    }

    fn response(&self, url: &str, status: u16, payload: &str) {
        tracing::debug!(target: "jroh::wire", url, status, "<== Response:\n{}", payload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_sink_without_subscriber() {
        let sink = TracingSink;
        sink.request("http://localhost", "{}");
        sink.response("http://localhost", 200, "{}");
    }
}
