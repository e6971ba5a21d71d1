//! Response classification
//!
//! Turns a decoded response body into call results. The body is inspected
//! structurally: a JSON array is a batch response, anything else is a single
//! envelope. Each envelope goes through [`get_result`], which hands faults to
//! the error mapper and otherwise yields `result` (or `null` when the server
//! sent neither `result` nor `error`).
//!
//! Batches fail fast: the first faulting member, in received order, becomes the
//! error of the whole batch.
//!
//! [`correlate_by_id`] is the id-based alternative to positional batch results,
//! for servers that reorder batch replies.

use crate::error::{Error, Result};
use crate::mapper;
use crate::types::Id;
use serde_json::Value;
use std::collections::HashMap;

/// Outcome of classifying one response body
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedResponse {
    /// A single envelope's result
    Single(Value),
    /// Batch results in received order
    Batch(Vec<Value>),
}

impl ParsedResponse {
    /// Collapse to one value; batch results become a JSON array
    pub fn into_single(self) -> Value {
        match self {
            ParsedResponse::Single(value) => value,
            ParsedResponse::Batch(values) => Value::Array(values),
        }
    }

    /// Expand to a list of results; a `null` single result means "no data"
    pub fn into_batch(self) -> Vec<Value> {
        match self {
            ParsedResponse::Batch(values) => values,
            ParsedResponse::Single(Value::Null) => Vec::new(),
            ParsedResponse::Single(value) => vec![value],
        }
    }
}

/// True when the body is a batch response
pub fn is_batch_response(raw: &Value) -> bool {
    raw.is_array()
}

/// Classify a decoded response body
///
/// # Examples
///
/// ```rust
/// use jroh_core::{parse_response, ParsedResponse};
/// use serde_json::json;
///
/// let single = parse_response(json!({"jsonrpc": "2.0", "result": 7, "id": 1})).unwrap();
/// assert_eq!(single, ParsedResponse::Single(json!(7)));
///
/// let batch = parse_response(json!([{"result": 1, "id": 1}, {"result": 2, "id": 2}])).unwrap();
/// assert_eq!(batch, ParsedResponse::Batch(vec![json!(1), json!(2)]));
/// ```
pub fn parse_response(mut raw: Value) -> Result<ParsedResponse> {
    if !is_batch_response(&raw) {
        return get_result(raw).map(ParsedResponse::Single);
    }
    raw.as_array_mut()
        .map(std::mem::take)
        .unwrap_or_default()
        .into_iter()
        .map(get_result)
        .collect::<Result<Vec<_>>>()
        .map(ParsedResponse::Batch)
}

/// Extract the result of one response envelope
///
/// An envelope with a coded `error` member fails with the mapped error. An
/// envelope with neither `result` nor `error` succeeds with `null`.
pub fn get_result(envelope: Value) -> Result<Value> {
    let Value::Object(mut members) = envelope else {
        return Ok(Value::Null);
    };
    if let Some(error) = members.get("error").and_then(mapper::classify_value) {
        return Err(error);
    }
    Ok(members.remove("result").unwrap_or(Value::Null))
}

/// Order batch results by request id instead of by position
///
/// `request_ids` is the order the requests were sent in. Each response member
/// is matched on its `id`; members without a recognisable id are ignored. A
/// request with no matching response fails the batch, as does the first
/// faulting member in request order.
///
/// A body that is not an array (some servers answer a whole batch with one
/// error envelope) is classified as usual.
pub fn correlate_by_id(request_ids: &[Id], raw: Value) -> Result<Vec<Value>> {
    let members = match raw {
        Value::Array(members) => members,
        other => return parse_response(other).map(ParsedResponse::into_batch),
    };

    let mut by_id: HashMap<Id, Value> = HashMap::with_capacity(members.len());
    for member in members {
        let id = Id::from_value(member.get("id"));
        if id != Id::Null {
            by_id.entry(id).or_insert(member);
        }
    }

    request_ids
        .iter()
        .map(|id| {
            let member = by_id
                .remove(id)
                .ok_or_else(|| Error::Internal(format!("No response for ID: {}", id)))?;
            get_result(member)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_single_result() {
        let parsed = parse_response(json!({"jsonrpc": "2.0", "result": {"a": 1}, "id": 3}));
        assert_eq!(parsed.unwrap(), ParsedResponse::Single(json!({"a": 1})));
    }

    #[test]
    fn test_missing_result_is_null() {
        let parsed = parse_response(json!({"jsonrpc": "2.0", "id": 3})).unwrap();
        assert_eq!(parsed, ParsedResponse::Single(Value::Null));
    }

    #[test]
    fn test_non_object_envelope_is_null() {
        assert_eq!(get_result(json!(12)).unwrap(), Value::Null);
        assert_eq!(get_result(Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_batch_keeps_received_order() {
        let raw = json!([
            {"result": "c", "id": 3},
            {"result": "a", "id": 1},
            {"id": 2}
        ]);
        let parsed = parse_response(raw).unwrap();
        assert_eq!(
            parsed,
            ParsedResponse::Batch(vec![json!("c"), json!("a"), Value::Null])
        );
    }

    #[test]
    fn test_batch_detection_is_structural() {
        assert!(is_batch_response(&json!([])));
        assert!(is_batch_response(&json!([{"result": 1}])));
        assert!(!is_batch_response(&json!({"result": [1, 2]})));
        assert!(!is_batch_response(&Value::Null));
        assert_eq!(
            parse_response(json!({"result": [1, 2]})).unwrap(),
            ParsedResponse::Single(json!([1, 2]))
        );
    }

    #[test]
    fn test_empty_array_is_empty_batch() {
        assert_eq!(parse_response(json!([])).unwrap(), ParsedResponse::Batch(vec![]));
    }

    #[test]
    fn test_batch_fails_fast_on_first_fault() {
        let raw = json!([
            {"result": 1, "id": 1},
            {"error": {"code": -32602, "message": "first"}, "id": 2},
            {"error": {"code": -32601, "message": "second"}, "id": 3}
        ]);
        let error = parse_response(raw).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidParams);
        assert!(error.to_string().contains("first"));
    }

    #[test]
    fn test_error_without_code_returns_result() {
        let raw = json!({"error": {"message": "ignored"}, "result": 5, "id": 1});
        assert_eq!(parse_response(raw).unwrap(), ParsedResponse::Single(json!(5)));
    }

    #[test]
    fn test_single_error_raised() {
        let raw = json!({"error": {"code": -32700, "message": "bad json"}, "id": null});
        let error = parse_response(raw).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ParseError);
    }

    #[test]
    fn test_into_single_and_into_batch() {
        assert_eq!(
            ParsedResponse::Batch(vec![json!(1)]).into_single(),
            json!([1])
        );
        assert_eq!(ParsedResponse::Single(Value::Null).into_batch(), Vec::<Value>::new());
        assert_eq!(ParsedResponse::Single(json!(2)).into_batch(), vec![json!(2)]);
    }

    #[test]
    fn test_correlate_by_id_reorders() {
        let ids = vec![Id::Number(10), Id::Number(20), Id::Number(30)];
        let raw = json!([
            {"result": "thirty", "id": 30},
            {"result": "ten", "id": 10},
            {"result": "twenty", "id": 20}
        ]);
        let results = correlate_by_id(&ids, raw).unwrap();
        assert_eq!(results, vec![json!("ten"), json!("twenty"), json!("thirty")]);
    }

    #[test]
    fn test_correlate_by_id_missing_member() {
        let ids = vec![Id::Number(1), Id::Number(2)];
        let raw = json!([{"result": 1, "id": 1}]);
        let error = correlate_by_id(&ids, raw).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Internal);
        assert!(error.to_string().contains("2"));
    }

    #[test]
    fn test_correlate_by_id_fault_in_request_order() {
        let ids = vec![Id::Number(1), Id::Number(2)];
        let raw = json!([
            {"error": {"code": -32601, "message": "late"}, "id": 2},
            {"error": {"code": -1, "message": "early"}, "id": 1}
        ]);
        let error = correlate_by_id(&ids, raw).unwrap_err();
        assert_eq!(error.to_string(), "early");
    }

    #[test]
    fn test_correlate_by_id_single_error_envelope() {
        let ids = vec![Id::Number(1)];
        let raw = json!({"error": {"code": -32600, "message": "batch rejected"}, "id": null});
        let error = correlate_by_id(&ids, raw).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidRequest);
    }
}
