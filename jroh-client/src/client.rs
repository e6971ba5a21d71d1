//! JSON-RPC client over HTTP
//!
//! [`RpcClient`] is the dispatcher: it builds request envelopes, decides
//! whether a call goes out now or joins an open batch, performs the HTTP
//! exchange through its [`HttpTransport`], and classifies the reply.
//!
//! # Call flow
//!
//! 1. **Build**: the envelope builder produces a request with a fresh id
//! 2. **Dispatch**: immediate mode sends it; batching mode queues it
//! 3. **Exchange**: the transport POSTs the body and returns status + body
//! 4. **Classify**: a failing HTTP status short-circuits; otherwise the body is
//!    decoded and each envelope's `error`/`result` inspected
//!
//! # One call at a time
//!
//! Every method that talks to the server takes `&mut self`, so a client can
//! never have two exchanges in flight and cannot be shared mutably between
//! tasks. Callers wanting parallel calls build one client per task; each has
//! its own headers, credentials and batch session.
//!
//! Timeouts belong to the transport (see [`TransportOptions`]); nothing is
//! retried.

use crate::batch::{BatchCorrelation, DispatchMode, Dispatched, PendingBatch};
use crate::headers::HeaderSet;
use crate::trace_sink::TraceSink;
use crate::transport::{HttpTransport, TransportOptions};
use crate::{ClientBuilder, ClientMetrics};
use jroh_core::{
    classify_http_status, codec, correlate_by_id, flatten_arguments, parse_response, EnvelopeBuilder,
    Error, JsonRpcRequest, Params, ParsedResponse, Result,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Settings a client carries after construction
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Endpoint every request is POSTed to
    pub url: String,
    /// Timeout and TLS settings handed to the transport
    pub transport: TransportOptions,
    /// Treat a lone object argument of [`RpcClient::call_args`] as named params
    pub named_arguments: bool,
    /// Send wire traces to the trace sink
    pub debug: bool,
    /// How batch results are lined up with requests
    pub correlation: BatchCorrelation,
}

impl ClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            transport: TransportOptions::default(),
            named_arguments: true,
            debug: false,
            correlation: BatchCorrelation::default(),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
struct Credentials {
    username: String,
    password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// JSON-RPC 2.0 client over HTTP
pub struct RpcClient {
    pub(crate) config: ClientConfig,
    /// Defaults plus construction-time extra headers
    pub(crate) base_headers: HeaderSet,
    /// `base_headers` plus authorization, sent with every request
    pub(crate) headers: HeaderSet,
    credentials: Option<Credentials>,
    pub(crate) envelopes: EnvelopeBuilder,
    mode: DispatchMode,
    pub(crate) transport: Box<dyn HttpTransport>,
    pub(crate) sink: Box<dyn TraceSink>,
    pub(crate) metrics: Option<Arc<ClientMetrics>>,
}

impl fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcClient")
            .field("config", &self.config)
            .field("headers", &self.headers.without("Authorization"))
            .field("credentials", &self.credentials)
            .field("mode", &self.mode)
            .field("transport", &"<dyn HttpTransport>")
            .finish()
    }
}

impl RpcClient {
    /// Client for `url` with default settings and the reqwest transport
    pub fn new(url: impl Into<String>) -> Result<Self> {
        ClientBuilder::new(url).build()
    }

    /// Start configuring a client for `url`
    pub fn builder(url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(url)
    }

    pub(crate) fn from_parts(
        config: ClientConfig,
        base_headers: HeaderSet,
        envelopes: EnvelopeBuilder,
        transport: Box<dyn HttpTransport>,
        sink: Box<dyn TraceSink>,
        metrics: Option<Arc<ClientMetrics>>,
    ) -> Self {
        Self {
            config,
            headers: base_headers.clone(),
            base_headers,
            credentials: None,
            envelopes,
            mode: DispatchMode::Immediate,
            transport,
            sink,
            metrics,
        }
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Headers sent with every request
    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }

    pub fn is_batching(&self) -> bool {
        self.mode.is_batching()
    }

    /// Number of requests queued in the open batch
    pub fn pending_len(&self) -> usize {
        self.mode.pending_len()
    }

    /// Send HTTP Basic credentials with every following request
    pub fn authentication(&mut self, username: impl Into<String>, password: impl Into<String>) -> &mut Self {
        let credentials = Credentials {
            username: username.into(),
            password: password.into(),
        };
        self.headers = self
            .base_headers
            .with_basic_auth(&credentials.username, &credentials.password);
        self.credentials = Some(credentials);
        self
    }

    /// Stop sending credentials
    pub fn clear_authentication(&mut self) -> &mut Self {
        self.credentials = None;
        self.headers = self.base_headers.clone();
        self
    }

    /// Replace the construction-time extra headers
    ///
    /// The defaults are rebuilt, `extra` applied on top, and credentials set
    /// through [`RpcClient::authentication`] re-applied. An invalid header
    /// leaves the current headers untouched.
    pub fn with_headers<K, V>(&mut self, extra: impl IntoIterator<Item = (K, V)>) -> Result<&mut Self>
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.base_headers = HeaderSet::assemble(extra)?;
        self.headers = match &self.credentials {
            Some(c) => self.base_headers.with_basic_auth(&c.username, &c.password),
            None => self.base_headers.clone(),
        };
        Ok(self)
    }

    pub fn set_named_arguments(&mut self, enabled: bool) -> &mut Self {
        self.config.named_arguments = enabled;
        self
    }

    pub fn set_debug(&mut self, enabled: bool) -> &mut Self {
        self.config.debug = enabled;
        self
    }

    pub fn set_batch_correlation(&mut self, correlation: BatchCorrelation) -> &mut Self {
        self.config.correlation = correlation;
        self
    }

    /// Extra top-level members merged into every request envelope
    pub fn with_payload(&mut self, overlay: Map<String, Value>) -> &mut Self {
        self.envelopes = EnvelopeBuilder::with_overlay(overlay);
        self
    }

    pub fn set_trace_sink(&mut self, sink: impl TraceSink + 'static) -> &mut Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn set_ssl_verify_peer(&mut self, verify: bool) -> Result<&mut Self> {
        let options = TransportOptions {
            ssl_verify_peer: verify,
            ..self.config.transport
        };
        self.apply_transport_options(options)
    }

    pub fn set_timeout(&mut self, timeout: Duration) -> Result<&mut Self> {
        let options = TransportOptions {
            timeout,
            ..self.config.transport
        };
        self.apply_transport_options(options)
    }

    fn apply_transport_options(&mut self, options: TransportOptions) -> Result<&mut Self> {
        self.transport.reconfigure(&options)?;
        self.config.transport = options;
        Ok(self)
    }

    /// Build the envelope a call to `procedure` would send, without sending it
    pub fn prepare_request(&self, procedure: &str, params: impl Into<Params>) -> JsonRpcRequest {
        self.envelopes.prepare_request(procedure, params.into())
    }

    /// Open a batch session, discarding any requests still queued
    pub fn batch(&mut self) -> &mut Self {
        if self.mode.pending_len() > 0 {
            tracing::warn!(
                dropped = self.mode.pending_len(),
                "Discarding unsent batch requests"
            );
        }
        self.mode.begin();
        self
    }

    /// Queue a call in the batch, opening one if needed
    ///
    /// Chaining form of [`RpcClient::execute`] for batch sessions:
    ///
    /// ```rust,no_run
    /// # async fn example(client: &mut jroh_client::RpcClient) -> jroh_core::Result<()> {
    /// let results = client
    ///     .batch()
    ///     .enqueue("random", serde_json::json!([1, 100]))
    ///     .enqueue("random", serde_json::json!([1, 100]))
    ///     .send()
    ///     .await?;
    /// assert_eq!(results.len(), 2);
    /// # Ok(())
    /// # }
    /// ```
    pub fn enqueue(&mut self, procedure: &str, params: impl Into<Params>) -> &mut Self {
        let request = self.envelopes.prepare_request(procedure, params.into());
        match &mut self.mode {
            DispatchMode::Batching(pending) => {
                pending.push(request);
            }
            DispatchMode::Immediate => {
                let mut pending = PendingBatch::new();
                pending.push(request);
                self.mode = DispatchMode::Batching(pending);
            }
        }
        self
    }

    /// Call `procedure`, or queue it when a batch is open
    #[tracing::instrument(skip_all, fields(procedure = %procedure))]
    pub async fn execute(&mut self, procedure: &str, params: impl Into<Params>) -> Result<Dispatched> {
        let params = params.into();
        if let DispatchMode::Batching(pending) = &mut self.mode {
            let position = pending.push(self.envelopes.prepare_request(procedure, params));
            tracing::debug!(position, "Queued in batch");
            return Ok(Dispatched::Queued { position });
        }
        self.call_now(procedure, params).await.map(Dispatched::Completed)
    }

    /// Call `procedure` with the argument list of a generic invocation
    ///
    /// A single object argument becomes named params when `named_arguments`
    /// is on; anything else is sent positionally.
    pub async fn call_args(&mut self, procedure: &str, args: Vec<Value>) -> Result<Dispatched> {
        let params = flatten_arguments(args, self.config.named_arguments);
        self.execute(procedure, params).await
    }

    /// Call `procedure` right away and decode its result
    ///
    /// Fails with `Error::Internal` while a batch is open, since the call
    /// could neither be queued nor answered.
    pub async fn call<R>(&mut self, procedure: &str, params: impl Into<Params>) -> Result<R>
    where
        R: DeserializeOwned,
    {
        if self.mode.is_batching() {
            return Err(Error::Internal(format!(
                "`{}` called while a batch is open; use execute() and send()",
                procedure
            )));
        }
        let value = self.call_now(procedure, params.into()).await?;
        serde_json::from_value(value)
            .map_err(|e| self.record_failure(Error::Serialization(e.to_string())))
    }

    /// Send the open batch as one request and return the results in order
    ///
    /// Always leaves the client in immediate mode with nothing queued, even
    /// when the exchange fails. With nothing queued, no request is made.
    pub async fn send(&mut self) -> Result<Vec<Value>> {
        let pending = self.mode.take();
        if pending.is_empty() {
            tracing::debug!("No queued requests to send");
            return Ok(Vec::new());
        }

        tracing::debug!(batch_size = pending.len(), "Sending batch");
        if let Some(ref m) = self.metrics {
            m.record_batch(pending.len() as u64);
        }

        let outcome = match codec::encode_batch(pending.requests()) {
            Ok(body) => self.exchange("batch", body).await,
            Err(e) => Err(e),
        };
        let results = outcome.and_then(|raw| match self.config.correlation {
            BatchCorrelation::Positional => parse_response(raw).map(ParsedResponse::into_batch),
            BatchCorrelation::ById => correlate_by_id(&pending.request_ids(), raw),
        });
        results.map_err(|e| self.record_failure(e))
    }

    async fn call_now(&mut self, procedure: &str, params: Params) -> Result<Value> {
        let request = self.envelopes.prepare_request(procedure, params);
        let outcome = match codec::encode_request(&request) {
            Ok(body) => self.exchange(procedure, body).await,
            Err(e) => Err(e),
        };
        outcome
            .and_then(|raw| parse_response(raw).map(ParsedResponse::into_single))
            .map_err(|e| self.record_failure(e))
    }

    /// One HTTP exchange: trace, send, classify status, decode body
    async fn exchange(&self, label: &str, body: String) -> Result<Value> {
        if self.config.debug {
            self.sink.request(&self.config.url, &codec::pretty_body(&body));
        }

        let start = Instant::now();
        let outcome = self
            .transport
            .send(&self.config.url, &self.headers, body)
            .await;
        let duration = start.elapsed().as_secs_f64();

        let reply = match outcome {
            Ok(reply) => reply,
            Err(e) => {
                if let Some(ref m) = self.metrics {
                    m.record_request(label, "error", duration);
                }
                return Err(e);
            }
        };

        if self.config.debug {
            self.sink
                .response(&self.config.url, reply.status, &codec::pretty_body(&reply.body));
        }

        let status_error = classify_http_status(reply.status);
        if let Some(ref m) = self.metrics {
            let status = if status_error.is_some() { "error" } else { "success" };
            m.record_request(label, status, duration);
        }
        if let Some(error) = status_error {
            return Err(error);
        }

        if reply.body.is_empty() {
            return Err(Error::ConnectionFailure(
                "Unable to establish a connection: empty response body".to_string(),
            ));
        }

        tracing::debug!(status = reply.status, duration_secs = duration, "Response received");
        Ok(codec::decode_body(&reply.body))
    }

    fn record_failure(&self, error: Error) -> Error {
        if let Some(ref m) = self.metrics {
            m.record_error(error.kind());
        }
        tracing::warn!(url = %self.config.url, error = %error, "JSON-RPC call failed");
        error
    }
}
