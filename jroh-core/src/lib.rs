//! Core JSON-RPC 2.0 envelopes and classification for jroh
//!
//! This crate holds everything about a JSON-RPC call that does not depend on
//! how bytes move:
//!
//! - **Types**: request/response envelopes, ids, and procedure params
//! - **Envelope**: request construction with random ids and a payload overlay
//! - **Response**: single vs. batch classification and result extraction
//! - **Mapper**: HTTP status and JSON-RPC error code classification
//! - **Codec**: strict request encoding, lenient response decoding
//! - **Observability**: OpenTelemetry and `tracing` setup
//!
//! The `jroh-client` crate builds the HTTP dispatcher on top of it.
//!
//! # Example
//!
//! ```rust
//! use jroh_core::{parse_response, EnvelopeBuilder, Params, ParsedResponse};
//! use serde_json::json;
//!
//! let request = EnvelopeBuilder::new().prepare_request("add", Params::from(json!([5, 3])));
//! assert_eq!(request.method, "add");
//!
//! // What a server would answer
//! let reply = json!({"jsonrpc": "2.0", "result": 8, "id": request.id});
//! assert_eq!(parse_response(reply).unwrap(), ParsedResponse::Single(json!(8)));
//! ```

pub mod codec;
pub mod envelope;
pub mod error;
pub mod mapper;
pub mod observability;
pub mod response;
pub mod types;

/// Value of the `jsonrpc` member in every envelope
pub const JSONRPC_VERSION: &str = "2.0";

/// Reserved JSON-RPC 2.0 error codes
pub mod codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

pub use envelope::{flatten_arguments, generate_id, EnvelopeBuilder};
pub use error::{Error, ErrorKind, JsonRpcErrorData, Result};
pub use mapper::{classify, classify_http_status};
pub use observability::{init_observability, shutdown_observability, ObservabilityConfig};
pub use response::{correlate_by_id, get_result, is_batch_response, parse_response, ParsedResponse};
pub use types::{encode_arg, Id, JsonRpcRequest, JsonRpcResponse, Params};

// Re-exported so generated proxy code can name it without an extra dependency
pub use serde_json;
