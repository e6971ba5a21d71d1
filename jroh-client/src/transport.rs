//! HTTP transport seam
//!
//! The dispatcher only needs one capability from the network: POST a body
//! with some headers to a URL and get back a status code and the raw body.
//! [`HttpTransport`] is that capability. [`ReqwestTransport`] is the default
//! implementation; tests and embedders can supply their own.
//!
//! Transports report failures to *reach* the server (refused connection, DNS,
//! timeout) as errors. A server that answers at all, whatever the status, is
//! an `Ok(HttpReply)`; status classification happens in the dispatcher.

use crate::headers::HeaderSet;
use async_trait::async_trait;
use jroh_core::{Error, Result};
use std::time::Duration;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Status and raw body of one HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Settings a transport is expected to honour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportOptions {
    /// Whole-request timeout
    pub timeout: Duration,
    /// Verify the server's TLS certificate
    pub ssl_verify_peer: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            ssl_verify_peer: true,
        }
    }
}

/// One POST exchange with a JSON-RPC endpoint
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST `body` to `url` with `headers`
    async fn send(&self, url: &str, headers: &HeaderSet, body: String) -> Result<HttpReply>;

    /// Apply new options; transports without tunables can ignore them
    fn reconfigure(&mut self, _options: &TransportOptions) -> Result<()> {
        Ok(())
    }
}

/// Transport backed by a `reqwest` client
pub struct ReqwestTransport {
    client: reqwest::Client,
    options: TransportOptions,
}

impl ReqwestTransport {
    pub fn new(options: TransportOptions) -> Result<Self> {
        Ok(Self {
            client: build_client(&options)?,
            options,
        })
    }

    pub fn options(&self) -> &TransportOptions {
        &self.options
    }
}

fn build_client(options: &TransportOptions) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(options.timeout)
        .danger_accept_invalid_certs(!options.ssl_verify_peer)
        .build()
        .map_err(|e| Error::Transport {
            status: None,
            message: format!("Failed to create HTTP client: {}", e),
        })
}

fn map_send_error(error: reqwest::Error, timeout: Duration) -> Error {
    if error.is_connect() {
        Error::ConnectionFailure(format!("Unable to establish a connection: {}", error))
    } else if error.is_timeout() {
        Error::Transport {
            status: None,
            message: format!("Request timeout after {}s", timeout.as_secs_f64()),
        }
    } else {
        Error::Transport {
            status: None,
            message: format!("HTTP request failed: {}", error),
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, url: &str, headers: &HeaderSet, body: String) -> Result<HttpReply> {
        let mut request = self.client.post(url).body(body);
        for (name, value) in headers.iter() {
            request = request.header(name, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| map_send_error(e, self.options.timeout))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| map_send_error(e, self.options.timeout))?;

        tracing::trace!(status, bytes = body.len(), "HTTP exchange complete");
        Ok(HttpReply { status, body })
    }

    fn reconfigure(&mut self, options: &TransportOptions) -> Result<()> {
        if *options != self.options {
            self.client = build_client(options)?;
            self.options = *options;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = TransportOptions::default();
        assert_eq!(options.timeout, Duration::from_secs(3));
        assert!(options.ssl_verify_peer);
    }

    #[test]
    fn test_reconfigure_replaces_options() {
        let mut transport = ReqwestTransport::new(TransportOptions::default()).unwrap();
        let relaxed = TransportOptions {
            timeout: Duration::from_secs(10),
            ssl_verify_peer: false,
        };
        transport.reconfigure(&relaxed).unwrap();
        assert_eq!(transport.options(), &relaxed);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_connection_failure() {
        let transport = ReqwestTransport::new(TransportOptions::default()).unwrap();
        // Port 9 (discard) on loopback is not expected to accept connections
        let result = transport
            .send("http://127.0.0.1:9/", &HeaderSet::defaults(), "{}".into())
            .await;
        let error = result.unwrap_err();
        assert!(error.is_transport());
    }
}
