//! Error classification
//!
//! Two tables live here:
//!
//! - [`classify_http_status`] decides transport-tier failures from the HTTP
//!   status alone. It runs before the body is looked at, so a failing status
//!   always wins over whatever the body says.
//! - [`classify`] maps the `error` member of a response envelope onto the
//!   protocol-tier variants of [`Error`].
//!
//! | status | error |
//! |---|---|
//! | 2xx | none |
//! | 401, 403 | `AccessDenied` |
//! | 404 | `ConnectionFailure` |
//! | 500 | `ServerError` |
//! | other | `Transport` |
//!
//! | code | error |
//! |---|---|
//! | -32700 | `ParseError` |
//! | -32600 | `InvalidRequest` |
//! | -32601 | `MethodNotFound` |
//! | -32602 | `InvalidParams` |
//! | other | `Application` |

use crate::codes;
use crate::error::{Error, JsonRpcErrorData};
use serde_json::Value;

/// Map a JSON-RPC error payload onto its error kind
///
/// Never yields success; callers return the result as `Err`.
///
/// # Examples
///
/// ```rust
/// use jroh_core::{classify, ErrorKind, JsonRpcErrorData};
///
/// let error = classify(JsonRpcErrorData::new(-32601, "x"));
/// assert_eq!(error.kind(), ErrorKind::MethodNotFound);
/// assert!(error.to_string().contains("x"));
/// ```
pub fn classify(error: JsonRpcErrorData) -> Error {
    match error.code {
        codes::PARSE_ERROR => Error::ParseError(error),
        codes::INVALID_REQUEST => Error::InvalidRequest(error),
        codes::METHOD_NOT_FOUND => Error::MethodNotFound(error),
        codes::INVALID_PARAMS => Error::InvalidParams(error),
        _ => Error::Application(error),
    }
}

/// Read a raw `error` member leniently and classify it
///
/// Returns `None` when the member carries no usable `code`, in which case the
/// envelope is not treated as a fault. Missing messages become empty strings,
/// fractional codes truncate, codes outside the `i32` range saturate, and
/// `data` is kept verbatim.
pub fn classify_value(error: &Value) -> Option<Error> {
    let code = error.get("code").filter(|code| !code.is_null())?;
    let code = match code {
        Value::Number(n) => number_code(n),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .map(saturate)
                .or_else(|_| s.parse::<f64>().map(|f| f as i32))
                .unwrap_or(0)
        }
        _ => 0,
    };
    let message = match error.get("message") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    let data = error.get("data").cloned();

    Some(classify(JsonRpcErrorData {
        code,
        message,
        data,
    }))
}

fn saturate(code: i64) -> i32 {
    code.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Fractions truncate toward zero; float-to-int `as` saturates
fn number_code(n: &serde_json::Number) -> i32 {
    if let Some(code) = n.as_i64() {
        saturate(code)
    } else if n.as_u64().is_some() {
        i32::MAX
    } else {
        n.as_f64().map(|f| f as i32).unwrap_or(0)
    }
}

/// Decide the transport-tier outcome of an HTTP status
///
/// `None` means the exchange succeeded at the HTTP level and the body should
/// be read as JSON-RPC.
///
/// # Examples
///
/// ```rust
/// use jroh_core::{classify_http_status, ErrorKind};
///
/// assert!(classify_http_status(200).is_none());
/// assert_eq!(classify_http_status(404).unwrap().kind(), ErrorKind::ConnectionFailure);
/// ```
pub fn classify_http_status(status: u16) -> Option<Error> {
    match status {
        200..=299 => None,
        401 | 403 => Some(Error::AccessDenied(format!(
            "Access denied (HTTP {})",
            status
        ))),
        404 => Some(Error::ConnectionFailure(
            "Endpoint not found (HTTP 404)".to_string(),
        )),
        500 => Some(Error::ServerError(
            "Internal server error (HTTP 500)".to_string(),
        )),
        other => Some(Error::Transport {
            status: Some(other),
            message: format!("Unexpected HTTP status {}", other),
        }),
    }
}
