//! JSON-RPC 2.0 envelope types as seen by an HTTP client
//!
//! This module holds the data structures that travel over the wire
//! (https://www.jsonrpc.org/specification):
//!
//! - **Id**: the request identifier echoed back by the server
//! - **Params**: positional or named procedure arguments
//! - **JsonRpcRequest**: one request envelope, optionally carrying extra top-level fields
//! - **JsonRpcResponse**: one response envelope, mostly used to build replies in tests
//!   and mock transports
//!
//! Incoming responses are deliberately *not* decoded into `JsonRpcResponse` by the
//! client. Servers in the wild send envelopes with missing or extra members, so the
//! response classifier works on raw `serde_json::Value`s and only pulls out the
//! members it needs.

use crate::error::{Error, JsonRpcErrorData, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// JSON-RPC 2.0 request ID
///
/// The client always generates numeric ids, but servers may answer with any
/// of the shapes the protocol allows, so responses are matched against this
/// full enum.
///
/// # Examples
///
/// ```rust
/// use jroh_core::Id;
///
/// let id: Id = 42i64.into();
/// assert_eq!(id.to_string(), "42");
///
/// let named: Id = "req-1".into();
/// assert_eq!(named.to_string(), "\"req-1\"");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    /// Numeric identifier, the only kind this client emits
    Number(i64),
    /// String identifier
    String(String),
    /// Null identifier (servers use it when the request id could not be read)
    Null,
}

impl Id {
    /// Read an id out of a raw response member, tolerating absent or odd values
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Number(n)) => n.as_i64().map(Id::Number).unwrap_or(Id::Null),
            Some(Value::String(s)) => Id::String(s.clone()),
            _ => Id::Null,
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Number(n) => write!(f, "{}", n),
            Id::String(s) => write!(f, "\"{}\"", s),
            Id::Null => write!(f, "null"),
        }
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Id::Number(n)
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id::String(s)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::String(s.to_string())
    }
}

/// Procedure arguments
///
/// JSON-RPC 2.0 accepts either a positional array or a named object. `None`
/// and empty containers all mean "no arguments" and cause the `params` member
/// to be left out of the request envelope entirely.
///
/// # Examples
///
/// ```rust
/// use jroh_core::Params;
/// use serde_json::json;
///
/// let positional = Params::from(json!([1, 2]));
/// assert!(matches!(positional, Params::Positional(_)));
///
/// let named = Params::from(json!({"a": 1}));
/// assert!(matches!(named, Params::Named(_)));
///
/// assert!(Params::from(json!([])).is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Params {
    /// No arguments
    #[default]
    None,
    /// Arguments by position
    Positional(Vec<Value>),
    /// Arguments by name
    Named(Map<String, Value>),
}

impl Params {
    /// Build positional params from already-encoded values
    pub fn positional(values: Vec<Value>) -> Self {
        Params::Positional(values)
    }

    /// Build named params from `(name, value)` pairs, keeping their order
    pub fn named<K: Into<String>>(pairs: impl IntoIterator<Item = (K, Value)>) -> Self {
        Params::Named(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Encode any serializable value into params
    ///
    /// Structs and maps become named params, sequences become positional
    /// params, `()`/`None` become no params, and a bare scalar is wrapped in a
    /// one-element positional list.
    pub fn from_serialize<P: Serialize>(params: &P) -> Result<Self> {
        Ok(Params::from(encode_arg(params)?))
    }

    /// True when the envelope must omit `params`
    pub fn is_empty(&self) -> bool {
        match self {
            Params::None => true,
            Params::Positional(values) => values.is_empty(),
            Params::Named(map) => map.is_empty(),
        }
    }

    /// Number of arguments carried
    pub fn len(&self) -> usize {
        match self {
            Params::None => 0,
            Params::Positional(values) => values.len(),
            Params::Named(map) => map.len(),
        }
    }

    /// Wire value for the `params` member, or `None` when it must be omitted
    pub fn into_value(self) -> Option<Value> {
        if self.is_empty() {
            return None;
        }
        match self {
            Params::None => None,
            Params::Positional(values) => Some(Value::Array(values)),
            Params::Named(map) => Some(Value::Object(map)),
        }
    }
}

/// Encode one argument for use in [`Params`]
pub fn encode_arg<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| Error::Serialization(e.to_string()))
}

impl From<Value> for Params {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Params::None,
            Value::Array(values) => Params::Positional(values),
            Value::Object(map) => Params::Named(map),
            scalar => Params::Positional(vec![scalar]),
        }
    }
}

impl From<Vec<Value>> for Params {
    fn from(values: Vec<Value>) -> Self {
        Params::Positional(values)
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Params::Named(map)
    }
}

impl From<()> for Params {
    fn from(_: ()) -> Self {
        Params::None
    }
}

impl From<Option<Value>> for Params {
    fn from(value: Option<Value>) -> Self {
        value.map(Params::from).unwrap_or_default()
    }
}

/// JSON-RPC 2.0 request envelope
///
/// Built by [`crate::envelope::EnvelopeBuilder`]. `extra` holds the caller's
/// persistent payload overlay; it is flattened into the top level of the
/// encoded object and never contains the protocol's own member names.
///
/// # Examples
///
/// ```rust
/// use jroh_core::JsonRpcRequest;
/// use serde_json::json;
///
/// let request = JsonRpcRequest::new("subtract", Some(json!([42, 23])), 1);
/// let encoded = serde_json::to_value(&request).unwrap();
/// assert_eq!(encoded["jsonrpc"], "2.0");
/// assert_eq!(encoded["params"], json!([42, 23]));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version, always "2.0"
    pub jsonrpc: String,
    /// Procedure name
    pub method: String,
    /// Arguments; absent from the wire when `None`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    /// Correlation id
    pub id: i64,
    /// Extra top-level members from the payload overlay
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JsonRpcRequest {
    /// Create a request with no overlay members
    pub fn new(method: impl Into<String>, params: Option<Value>, id: i64) -> Self {
        Self {
            jsonrpc: crate::JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id,
            extra: Map::new(),
        }
    }

    /// The request id in the form servers echo back
    pub fn request_id(&self) -> Id {
        Id::Number(self.id)
    }
}

/// JSON-RPC 2.0 response envelope
///
/// Exactly one of `result` and `error` is set when built through
/// [`JsonRpcResponse::success`] or [`JsonRpcResponse::error`].
///
/// # Examples
///
/// ```rust
/// use jroh_core::{Id, JsonRpcErrorData, JsonRpcResponse};
/// use serde_json::json;
///
/// let ok = JsonRpcResponse::success(json!(3), Id::Number(7));
/// assert!(ok.is_success());
///
/// let failed = JsonRpcResponse::error(JsonRpcErrorData::method_not_found("nope"), Id::Number(8));
/// assert!(failed.is_error());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Protocol version, always "2.0"
    pub jsonrpc: String,
    /// Result on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcErrorData>,
    /// Id copied from the request
    pub id: Id,
}

impl JsonRpcResponse {
    /// Successful response
    pub fn success(result: Value, id: Id) -> Self {
        Self {
            jsonrpc: crate::JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Error response
    pub fn error(error: JsonRpcErrorData, id: Id) -> Self {
        Self {
            jsonrpc: crate::JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_some()
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Raw JSON form, as a transport would hand it to the classifier
    pub fn to_value(&self) -> Result<Value> {
        encode_arg(self)
    }
}
