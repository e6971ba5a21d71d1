//! Error types for jroh
//!
//! Every failure a caller can observe is an [`Error`]. The variants form a
//! closed set split across two tiers:
//!
//! - **Transport tier**: `ConnectionFailure`, `AccessDenied`, `ServerError`,
//!   `Transport`. These come from the HTTP exchange and are decided before the
//!   body is ever read as JSON-RPC.
//! - **Protocol tier**: `ParseError`, `InvalidRequest`, `MethodNotFound`,
//!   `InvalidParams`, `Application`. These come from the `error` member of a
//!   response envelope and carry the server's [`JsonRpcErrorData`] verbatim.
//!
//! `Serialization` and `Internal` cover local failures (encoding arguments,
//! decoding a typed result, misuse of the batch session).
//!
//! # Reserved error codes
//!
//! - `-32700`: Parse error
//! - `-32600`: Invalid Request
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error
//! - `-32000 to -32099`: Server error (implementation-defined)
//!
//! Only the first four get a dedicated variant; anything else is an
//! application error.
//!
//! # Examples
//!
//! ```rust
//! use jroh_core::{Error, ErrorKind, JsonRpcErrorData};
//!
//! let error = Error::MethodNotFound(JsonRpcErrorData::new(-32601, "frobnicate"));
//! assert_eq!(error.kind(), ErrorKind::MethodNotFound);
//! assert_eq!(error.code(), Some(-32601));
//! assert!(error.to_string().contains("frobnicate"));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across the jroh crates
pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a JSON-RPC call
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The server could not be reached, answered 404, or sent an empty body
    #[error("Connection failure: {0}")]
    ConnectionFailure(String),

    /// The server answered 401 or 403
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// The server answered 500
    #[error("Server error: {0}")]
    ServerError(String),

    /// Any other non-2xx status, or an I/O failure inside the transport
    #[error("Transport error{}: {message}", status_suffix(.status))]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// Error code -32700
    #[error("Parse error: {}", .0.message)]
    ParseError(JsonRpcErrorData),

    /// Error code -32600
    #[error("Invalid Request: {}", .0.message)]
    InvalidRequest(JsonRpcErrorData),

    /// Error code -32601
    #[error("Procedure not found: {}", .0.message)]
    MethodNotFound(JsonRpcErrorData),

    /// Error code -32602
    #[error("Invalid arguments: {}", .0.message)]
    InvalidParams(JsonRpcErrorData),

    /// Any other error code, including the -32603 and -32000..-32099 ranges
    #[error("{}", .0.message)]
    Application(JsonRpcErrorData),

    /// Local encode/decode failure
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Client misuse or an inconsistency in a server reply
    #[error("Internal error: {0}")]
    Internal(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

/// Discriminant of [`Error`], handy for matching and metric labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ConnectionFailure,
    AccessDenied,
    ServerError,
    Transport,
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    Application,
    Serialization,
    Internal,
}

impl ErrorKind {
    /// Stable snake_case label
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ConnectionFailure => "connection_failure",
            ErrorKind::AccessDenied => "access_denied",
            ErrorKind::ServerError => "server_error",
            ErrorKind::Transport => "transport",
            ErrorKind::ParseError => "parse_error",
            ErrorKind::InvalidRequest => "invalid_request",
            ErrorKind::MethodNotFound => "method_not_found",
            ErrorKind::InvalidParams => "invalid_params",
            ErrorKind::Application => "application",
            ErrorKind::Serialization => "serialization",
            ErrorKind::Internal => "internal",
        }
    }
}

impl Error {
    /// Which of the closed set of kinds this is
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ConnectionFailure(_) => ErrorKind::ConnectionFailure,
            Error::AccessDenied(_) => ErrorKind::AccessDenied,
            Error::ServerError(_) => ErrorKind::ServerError,
            Error::Transport { .. } => ErrorKind::Transport,
            Error::ParseError(_) => ErrorKind::ParseError,
            Error::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Error::MethodNotFound(_) => ErrorKind::MethodNotFound,
            Error::InvalidParams(_) => ErrorKind::InvalidParams,
            Error::Application(_) => ErrorKind::Application,
            Error::Serialization(_) => ErrorKind::Serialization,
            Error::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Server-provided error payload for protocol-tier errors
    pub fn rpc_error(&self) -> Option<&JsonRpcErrorData> {
        match self {
            Error::ParseError(data)
            | Error::InvalidRequest(data)
            | Error::MethodNotFound(data)
            | Error::InvalidParams(data)
            | Error::Application(data) => Some(data),
            _ => None,
        }
    }

    /// Numeric JSON-RPC code, for protocol-tier errors
    pub fn code(&self) -> Option<i32> {
        self.rpc_error().map(|e| e.code)
    }

    /// The `data` member of the server's error, if any
    pub fn data(&self) -> Option<&serde_json::Value> {
        self.rpc_error().and_then(|e| e.data.as_ref())
    }

    /// HTTP status behind a transport-tier error, when one was received
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Error::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// True for errors decided by the HTTP exchange
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::ConnectionFailure(_)
                | Error::AccessDenied(_)
                | Error::ServerError(_)
                | Error::Transport { .. }
        )
    }

    /// True for errors reported inside a response envelope
    pub fn is_protocol(&self) -> bool {
        self.rpc_error().is_some()
    }
}

/// Error member of a JSON-RPC 2.0 response
///
/// # Examples
///
/// ```rust
/// use jroh_core::JsonRpcErrorData;
/// use serde_json::json;
///
/// let error = JsonRpcErrorData::with_data(-32000, "quota exceeded", json!({"retry_in": 30}));
/// assert_eq!(error.to_string(), "[-32000] quota exceeded");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorData {
    /// Error code
    pub code: i32,

    /// Short description
    pub message: String,

    /// Optional structured details, passed through untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcErrorData {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(code: i32, message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn parse_error() -> Self {
        Self::new(crate::codes::PARSE_ERROR, "Parse error")
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::new(crate::codes::INVALID_REQUEST, msg)
    }

    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::new(
            crate::codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", method.into()),
        )
    }

    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::new(crate::codes::INVALID_PARAMS, msg)
    }

    pub fn internal_error(msg: impl Into<String>) -> Self {
        Self::new(crate::codes::INTERNAL_ERROR, msg)
    }
}

impl std::fmt::Display for JsonRpcErrorData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for JsonRpcErrorData {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_jsonrpc_error_with_data() {
        let error = JsonRpcErrorData::with_data(
            -32602,
            "Invalid params",
            json!({"missing": ["username", "password"]}),
        );

        assert_eq!(error.code, -32602);
        assert_eq!(error.message, "Invalid params");

        let data = error.data.expect("data present");
        assert_eq!(data["missing"][0], "username");
        assert_eq!(data["missing"][1], "password");
    }

    #[test]
    fn test_all_standard_constructors() {
        let errors = vec![
            (JsonRpcErrorData::parse_error(), -32700),
            (JsonRpcErrorData::invalid_request("test"), -32600),
            (JsonRpcErrorData::method_not_found("test"), -32601),
            (JsonRpcErrorData::invalid_params("test"), -32602),
            (JsonRpcErrorData::internal_error("test"), -32603),
        ];

        for (error, expected_code) in errors {
            assert_eq!(error.code, expected_code);
            assert!(!error.message.is_empty());
        }
    }

    #[test]
    fn test_error_deserialization_without_data() {
        let json = r#"{"code":-32601,"message":"Method not found"}"#;
        let error: JsonRpcErrorData = serde_json::from_str(json).unwrap();

        assert_eq!(error.code, -32601);
        assert_eq!(error.message, "Method not found");
        assert!(error.data.is_none());
    }

    #[test]
    fn test_protocol_error_display_prefixes() {
        let data = JsonRpcErrorData::new(0, "x");
        assert_eq!(Error::ParseError(data.clone()).to_string(), "Parse error: x");
        assert_eq!(Error::InvalidRequest(data.clone()).to_string(), "Invalid Request: x");
        assert_eq!(Error::MethodNotFound(data.clone()).to_string(), "Procedure not found: x");
        assert_eq!(Error::InvalidParams(data.clone()).to_string(), "Invalid arguments: x");
        assert_eq!(Error::Application(data).to_string(), "x");
    }

    #[test]
    fn test_transport_error_display() {
        let with_status = Error::Transport {
            status: Some(418),
            message: "teapot".into(),
        };
        assert_eq!(with_status.to_string(), "Transport error (HTTP 418): teapot");
        assert_eq!(with_status.http_status(), Some(418));

        let without_status = Error::Transport {
            status: None,
            message: "reset".into(),
        };
        assert_eq!(without_status.to_string(), "Transport error: reset");
    }

    #[test]
    fn test_error_tiers() {
        let protocol = Error::Application(JsonRpcErrorData::with_data(-1, "y", json!({"foo": 1})));
        assert!(protocol.is_protocol());
        assert!(!protocol.is_transport());
        assert_eq!(protocol.code(), Some(-1));
        assert_eq!(protocol.data().unwrap()["foo"], 1);

        let transport = Error::AccessDenied("401".into());
        assert!(transport.is_transport());
        assert!(!transport.is_protocol());
        assert_eq!(transport.code(), None);
        assert_eq!(transport.data(), None);
    }

    #[test]
    fn test_kind_labels_are_distinct() {
        let kinds = [
            ErrorKind::ConnectionFailure,
            ErrorKind::AccessDenied,
            ErrorKind::ServerError,
            ErrorKind::Transport,
            ErrorKind::ParseError,
            ErrorKind::InvalidRequest,
            ErrorKind::MethodNotFound,
            ErrorKind::InvalidParams,
            ErrorKind::Application,
            ErrorKind::Serialization,
            ErrorKind::Internal,
        ];
        let labels: std::collections::HashSet<_> = kinds.iter().map(|k| k.as_str()).collect();
        assert_eq!(labels.len(), kinds.len());
    }
}
