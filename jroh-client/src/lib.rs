//! JSON-RPC 2.0 client implementation over HTTP
//!
//! This crate provides a JSON-RPC 2.0 client that POSTs request envelopes to
//! an HTTP endpoint and classifies what comes back into results or typed
//! errors.
//!
//! # Core Features
//!
//! - **HTTP Transport**: reqwest-backed, with timeout and TLS verification settings
//! - **Request-Response**: untyped `execute` or typed `call::<R>`
//! - **Batch Requests**: queue calls and send them as one JSON array
//! - **Error Mapping**: HTTP statuses and JSON-RPC codes become [`Error`] variants
//! - **Headers and Auth**: default headers, extra headers, HTTP Basic credentials
//! - **Debug Tracing**: pretty-printed wire traces through a [`TraceSink`]
//! - **Observability**: OpenTelemetry integration for traces and metrics
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use jroh_client::RpcClient;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = RpcClient::new("http://localhost:8080/rpc")?;
//!
//!     // Make a call
//!     let sum: i64 = client.call("add", json!([5, 3])).await?;
//!     println!("Result: {}", sum);
//!
//!     // Batch two calls into one HTTP request
//!     let results = client
//!         .batch()
//!         .enqueue("add", json!([1, 2]))
//!         .enqueue("echo", json!({"message": "hi"}))
//!         .send()
//!         .await?;
//!     println!("Batch: {:?}", results);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Handling Errors
//!
//! ```rust,no_run
//! use jroh_client::{Error, RpcClient};
//!
//! # async fn example(client: &mut RpcClient) {
//! match client.execute("missing", ()).await {
//!     Ok(outcome) => println!("{:?}", outcome),
//!     Err(Error::MethodNotFound(data)) => println!("no such procedure: {}", data.message),
//!     Err(e) if e.is_transport() => println!("transport trouble: {}", e),
//!     Err(e) => println!("failed: {}", e),
//! }
//! # }
//! ```

mod batch;
mod client;
mod client_builder;
mod headers;
mod metrics;
mod trace_sink;
mod transport;

pub use batch::{BatchCorrelation, DispatchMode, Dispatched, PendingBatch};
pub use client::{ClientConfig, RpcClient};
pub use client_builder::ClientBuilder;
pub use headers::{basic_auth_value, HeaderSet, USER_AGENT};
pub use metrics::ClientMetrics;
pub use trace_sink::{TraceSink, TracingSink};
pub use transport::{HttpReply, HttpTransport, ReqwestTransport, TransportOptions, DEFAULT_TIMEOUT};

// Re-exported so callers and generated proxies need only this crate
pub use jroh_core::{encode_arg, serde_json, Error, ErrorKind, Id, JsonRpcErrorData, Params, Result};
