//! Request envelope construction
//!
//! [`EnvelopeBuilder`] turns a procedure name and its arguments into a
//! [`JsonRpcRequest`]. Building is pure: nothing here touches the network or
//! any client state, so the same builder can be shared by immediate calls and
//! batch sessions alike.
//!
//! # Ids
//!
//! Every envelope gets a fresh random id in `1..=2^53-1`. The upper bound keeps
//! ids exact for servers that store numbers as IEEE doubles. Uniqueness is
//! probabilistic, which is all request/response correlation needs.
//!
//! # Payload overlay
//!
//! A builder may carry extra top-level members (an auth token some servers
//! expect beside `method`, for instance). Overlay members are applied first and
//! the builder's own members win on conflict, so an overlay can never replace
//! `jsonrpc`, `method`, `id`, or params the caller actually passed.
//!
//! # Examples
//!
//! ```rust
//! use jroh_core::{EnvelopeBuilder, Params};
//! use serde_json::json;
//!
//! let builder = EnvelopeBuilder::new();
//! let request = builder.prepare_request("sum", Params::from(json!([1, 2, 3])));
//! assert_eq!(request.jsonrpc, "2.0");
//! assert_eq!(request.params, Some(json!([1, 2, 3])));
//!
//! let bare = builder.prepare_request("ping", Params::None);
//! assert!(bare.params.is_none());
//! ```

use crate::types::{JsonRpcRequest, Params};
use rand::Rng;
use serde_json::{Map, Value};

/// Largest id that survives a round trip through a double-precision number
pub const MAX_REQUEST_ID: i64 = (1 << 53) - 1;

/// Top-level member names the builder always owns
const RESERVED_MEMBERS: [&str; 3] = ["jsonrpc", "method", "id"];

/// Produce a new random request id
pub fn generate_id() -> i64 {
    rand::thread_rng().gen_range(1..=MAX_REQUEST_ID)
}

/// Builds request envelopes, optionally merging a persistent payload overlay
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvelopeBuilder {
    overlay: Map<String, Value>,
}

impl EnvelopeBuilder {
    /// Builder with no overlay
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder that adds `overlay` to every envelope
    pub fn with_overlay(overlay: Map<String, Value>) -> Self {
        Self { overlay }
    }

    /// The overlay currently applied
    pub fn overlay(&self) -> &Map<String, Value> {
        &self.overlay
    }

    /// Build one request envelope with a freshly generated id
    pub fn prepare_request(&self, procedure: impl Into<String>, params: Params) -> JsonRpcRequest {
        self.prepare_request_with_id(procedure, params, generate_id())
    }

    /// Build one request envelope with a caller-chosen id
    pub fn prepare_request_with_id(
        &self,
        procedure: impl Into<String>,
        params: Params,
        id: i64,
    ) -> JsonRpcRequest {
        let mut extra: Map<String, Value> = self
            .overlay
            .iter()
            .filter(|(key, _)| !RESERVED_MEMBERS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let params = match params.into_value() {
            Some(value) => {
                extra.remove("params");
                Some(value)
            }
            // An overlay may supply default params when the caller passed none
            None => extra.remove("params"),
        };

        JsonRpcRequest {
            jsonrpc: crate::JSONRPC_VERSION.to_string(),
            method: procedure.into(),
            params,
            id,
            extra,
        }
    }
}

/// Turn the argument list of a generic call into params
///
/// With `named_arguments` enabled, a call made with exactly one argument that
/// is itself an object is treated as a named-parameter call and that object
/// becomes the params. Every other argument list is sent positionally.
///
/// # Examples
///
/// ```rust
/// use jroh_core::{flatten_arguments, Params};
/// use serde_json::json;
///
/// let named = flatten_arguments(vec![json!({"a": 1})], true);
/// assert_eq!(named, Params::from(json!({"a": 1})));
///
/// let positional = flatten_arguments(vec![json!({"a": 1})], false);
/// assert_eq!(positional, Params::from(json!([{"a": 1}])));
/// ```
pub fn flatten_arguments(mut args: Vec<Value>, named_arguments: bool) -> Params {
    if named_arguments && args.len() == 1 && args[0].is_object() {
        if let Some(Value::Object(map)) = args.pop() {
            return Params::Named(map);
        }
    }
    Params::Positional(args)
}
