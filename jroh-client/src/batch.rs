//! Batch session state
//!
//! A client is always in exactly one of two modes:
//!
//! - **Immediate**: every call is sent on its own and answered right away
//! - **Batching**: calls are appended to a [`PendingBatch`] and nothing is sent
//!   until the batch is flushed
//!
//! The pending batch only exists inside the `Batching` variant, so there is
//! no way to queue into, or forget to clear, a batch while in immediate mode.
//!
//! # Result ordering
//!
//! JSON-RPC 2.0 only promises that each response echoes its request's `id`;
//! batch members may come back in any order. [`BatchCorrelation::Positional`]
//! takes the server's order as-is, [`BatchCorrelation::ById`] re-orders results
//! to match the requests.

use jroh_core::{Id, JsonRpcRequest};
use serde_json::Value;

/// Requests queued during a batch session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingBatch {
    requests: Vec<JsonRpcRequest>,
}

impl PendingBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a request and return its zero-based position
    pub fn push(&mut self, request: JsonRpcRequest) -> usize {
        self.requests.push(request);
        self.requests.len() - 1
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn requests(&self) -> &[JsonRpcRequest] {
        &self.requests
    }

    /// Ids in the order the requests were queued
    pub fn request_ids(&self) -> Vec<Id> {
        self.requests.iter().map(JsonRpcRequest::request_id).collect()
    }
}

/// Current dispatch mode of a client
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DispatchMode {
    /// Send each call as soon as it is made
    #[default]
    Immediate,
    /// Queue calls until the batch is sent
    Batching(PendingBatch),
}

impl DispatchMode {
    pub fn is_batching(&self) -> bool {
        matches!(self, DispatchMode::Batching(_))
    }

    /// Number of queued requests (always 0 in immediate mode)
    pub fn pending_len(&self) -> usize {
        match self {
            DispatchMode::Immediate => 0,
            DispatchMode::Batching(pending) => pending.len(),
        }
    }

    /// Enter batching mode with an empty batch, dropping anything queued before
    pub fn begin(&mut self) {
        *self = DispatchMode::Batching(PendingBatch::new());
    }

    /// Return to immediate mode, handing back whatever was queued
    pub fn take(&mut self) -> PendingBatch {
        match std::mem::take(self) {
            DispatchMode::Immediate => PendingBatch::new(),
            DispatchMode::Batching(pending) => pending,
        }
    }
}

/// How batch results are lined up with the requests that produced them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BatchCorrelation {
    /// Result `i` is response member `i`
    #[default]
    Positional,
    /// Results are matched to requests by `id` and returned in request order
    ById,
}

/// What happened to one `execute` call
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatched {
    /// Sent immediately; carries the procedure's result
    Completed(Value),
    /// Queued in the open batch at this position
    Queued { position: usize },
}

impl Dispatched {
    pub fn is_queued(&self) -> bool {
        matches!(self, Dispatched::Queued { .. })
    }

    /// The result of an immediate call, `None` when the call was queued
    pub fn into_value(self) -> Option<Value> {
        match self {
            Dispatched::Completed(value) => Some(value),
            Dispatched::Queued { .. } => None,
        }
    }
}
