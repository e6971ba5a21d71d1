//! Common test utilities for jroh-client integration tests
//!
//! This module provides an in-memory transport and trace sink for testing
//! client behavior without a real HTTP server.

#![allow(dead_code)]

use async_trait::async_trait;
use jroh_client::{ClientBuilder, HeaderSet, HttpReply, HttpTransport, RpcClient, TraceSink};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// One request as the transport saw it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: HeaderSet,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

type Handler = dyn Fn(&str) -> HttpReply + Send + Sync;

/// In-memory transport answering through a handler function
///
/// Clones share the request log, so a test can keep one clone and hand the
/// other to the client.
#[derive(Clone)]
pub struct MockTransport {
    handler: Arc<Handler>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockTransport {
    /// Answers every envelope with its own params as the result
    pub fn echo() -> Self {
        Self::with_handler(|body| HttpReply::new(200, echo_body(body)))
    }

    /// Always answers with the given status and body
    pub fn fixed(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        Self::with_handler(move |_| HttpReply::new(status, body.clone()))
    }

    pub fn with_handler<F>(handler: F) -> Self
    where
        F: Fn(&str) -> HttpReply + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, url: &str, headers: &HeaderSet, body: String) -> jroh_client::Result<HttpReply> {
        let reply = (self.handler)(&body);
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            headers: headers.clone(),
            body,
        });
        Ok(reply)
    }
}

/// Response echoing each request's params back as its result
pub fn echo_body(body: &str) -> String {
    let request: Value = serde_json::from_str(body).unwrap();
    match request {
        Value::Array(batch) => Value::Array(batch.iter().map(echo_envelope).collect()).to_string(),
        single => echo_envelope(&single).to_string(),
    }
}

fn echo_envelope(request: &Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "result": request.get("params").cloned().unwrap_or(Value::Null),
        "id": request["id"],
    })
}

/// Client on a mock endpoint with the given transport
pub fn client_with(transport: &MockTransport) -> RpcClient {
    ClientBuilder::new("http://rpc.test/endpoint")
        .with_transport(transport.clone())
        .build()
        .unwrap()
}

/// Helper to create a mock JSON-RPC response
pub fn mock_response(id: i64, result: Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "result": result,
        "id": id
    })
    .to_string()
}

/// Helper to create a mock JSON-RPC error response
pub fn mock_error_response(id: i64, code: i32, message: &str) -> String {
    json!({
        "jsonrpc": "2.0",
        "error": {
            "code": code,
            "message": message
        },
        "id": id
    })
    .to_string()
}

/// One trace handed to a [`RecordingSink`]
#[derive(Debug, Clone, PartialEq)]
pub enum Trace {
    Request(String),
    Response(u16, String),
}

/// Trace sink collecting everything it is given
#[derive(Clone, Default)]
pub struct RecordingSink {
    traces: Arc<Mutex<Vec<Trace>>>,
}

impl RecordingSink {
    pub fn traces(&self) -> Vec<Trace> {
        self.traces.lock().unwrap().clone()
    }
}

impl TraceSink for RecordingSink {
    fn request(&self, _url: &str, payload: &str) {
        self.traces.lock().unwrap().push(Trace::Request(payload.to_string()));
    }

    fn response(&self, _url: &str, status: u16, payload: &str) {
        self.traces
            .lock()
            .unwrap()
            .push(Trace::Response(status, payload.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echo_body_single() {
        let reply: Value =
            serde_json::from_str(&echo_body(r#"{"jsonrpc":"2.0","method":"m","params":[1],"id":7}"#)).unwrap();
        assert_eq!(reply["result"], json!([1]));
        assert_eq!(reply["id"], 7);
    }

    #[test]
    fn test_echo_body_batch() {
        let reply: Value = serde_json::from_str(&echo_body(
            r#"[{"method":"a","id":1},{"method":"b","params":{"k":2},"id":2}]"#,
        ))
        .unwrap();
        assert_eq!(reply[0]["result"], Value::Null);
        assert_eq!(reply[1]["result"], json!({"k": 2}));
    }

    #[test]
    fn test_mock_error_response_format() {
        let response = mock_error_response(1, -32601, "Method not found");
        assert!(response.contains("\"error\""));
        assert!(response.contains("-32601"));
    }
}
