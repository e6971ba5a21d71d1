//! Wire encoding for request bodies and lenient decoding of response bodies
//!
//! Encoding is strict: a request that cannot be serialized is a
//! `Serialization` error before anything is sent.
//!
//! Decoding is deliberately forgiving. A response body that is not JSON, or is
//! JSON but not an object or array, carries no envelopes and is read as
//! `null`, which the classifier turns into an empty result set. Faults are only
//! ever reported through an `error` member or the HTTP status, never inferred
//! from a garbled body.
//!
//! # Examples
//!
//! ```rust
//! use jroh_core::{codec, JsonRpcRequest};
//! use serde_json::{json, Value};
//!
//! let body = codec::encode_batch(&[
//!     JsonRpcRequest::new("a", None, 1),
//!     JsonRpcRequest::new("b", None, 2),
//! ])
//! .unwrap();
//! assert!(body.starts_with('['));
//!
//! assert_eq!(codec::decode_body(r#"{"result": 1, "id": 1}"#), json!({"result": 1, "id": 1}));
//! assert_eq!(codec::decode_body("<html>"), Value::Null);
//! ```

use crate::error::{Error, Result};
use crate::types::JsonRpcRequest;
use serde::Serialize;
use serde_json::Value;

/// Encode any serializable value as compact JSON
pub fn encode<T: Serialize + ?Sized>(msg: &T) -> Result<String> {
    serde_json::to_string(msg).map_err(|e| Error::Serialization(e.to_string()))
}

/// Encode a value as indented JSON for debug traces
pub fn encode_pretty<T: Serialize + ?Sized>(msg: &T) -> Result<String> {
    serde_json::to_string_pretty(msg).map_err(|e| Error::Serialization(e.to_string()))
}

/// Encode one request envelope
pub fn encode_request(req: &JsonRpcRequest) -> Result<String> {
    encode(req)
}

/// Encode a batch of request envelopes as a JSON array
pub fn encode_batch(batch: &[JsonRpcRequest]) -> Result<String> {
    encode(batch)
}

/// Decode a response body, yielding `null` for anything that is not a container
pub fn decode_body(body: &str) -> Value {
    match serde_json::from_str::<Value>(body) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => value,
        _ => Value::Null,
    }
}

/// Render a response body for debug traces, falling back to the raw text
pub fn pretty_body(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| encode_pretty(&value).ok())
        .unwrap_or_else(|| body.to_string())
}
