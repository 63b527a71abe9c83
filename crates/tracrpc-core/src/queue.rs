//! Call staging and request building.
//!
//! Calls accumulate on an ordered queue, each with a monotonically
//! increasing id starting at 1 per session. Flushing seals the queue into
//! one of two explicitly-typed payloads: a bare single request, or a
//! `system.multicall` wrapper carrying the whole queue in order.

use serde_json::Value;

use crate::error::ClientError;
use crate::types::{Call, MULTICALL_METHOD};

/// Ordered list of pending calls plus the session id counter.
#[derive(Debug, Default)]
pub struct CallQueue {
    calls: Vec<Call>,
    last_id: u64,
}

impl CallQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a call and return its freshly assigned id.
    ///
    /// Rejects an empty method name with [`ClientError::InvalidCall`]
    /// without touching the queue.
    pub fn enqueue(&mut self, method: &str, params: Vec<Value>) -> Result<u64, ClientError> {
        if method.trim().is_empty() {
            return Err(ClientError::InvalidCall("method name is empty".into()));
        }

        let id = self.next_id();
        self.calls.push(Call::new(id, method, params));
        tracing::debug!("queued call {} '{}'", id, method);
        Ok(id)
    }

    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

/// A sealed single-call payload, ready for the transport.
#[derive(Debug)]
pub struct SinglePayload {
    /// Serialized `{method, params, id}` object (not array-wrapped).
    pub body: String,
    /// Id of the call the payload carries.
    pub id: u64,
}

/// A sealed `system.multicall` payload.
#[derive(Debug)]
pub struct BatchPayload {
    /// Serialized multicall request object.
    pub body: String,
    /// Ids of the wrapped calls, in queue order. The decoder matches
    /// response-array positions against this list.
    pub ids: Vec<u64>,
    /// Fresh id assigned to the wrapping call itself.
    pub wrapper_id: u64,
}

/// Turns staged calls into sealed payloads.
#[derive(Debug, Default)]
pub struct RequestBuilder {
    queue: CallQueue,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a call; see [`CallQueue::enqueue`].
    pub fn enqueue(&mut self, method: &str, params: Vec<Value>) -> Result<u64, ClientError> {
        self.queue.enqueue(method, params)
    }

    /// Number of staged calls.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Seal exactly one queued call as a bare request object.
    pub fn flush_single(&mut self) -> Result<SinglePayload, ClientError> {
        match self.queue.len() {
            1 => {
                let call = self.queue.calls.remove(0);
                Ok(SinglePayload {
                    body: call.to_wire().to_string(),
                    id: call.id,
                })
            }
            0 => Err(ClientError::EmptyQueue("no call staged".into())),
            n => Err(ClientError::EmptyQueue(format!(
                "{} calls staged; enable batch mode to send more than one",
                n
            ))),
        }
    }

    /// Seal the entire queue as one `system.multicall` request.
    ///
    /// The wrapper gets a fresh id of its own; the queue is cleared.
    pub fn flush_batch(&mut self) -> Result<BatchPayload, ClientError> {
        if self.queue.is_empty() {
            return Err(ClientError::EmptyQueue("no calls staged for batch".into()));
        }

        let calls = std::mem::take(&mut self.queue.calls);
        let ids: Vec<u64> = calls.iter().map(|c| c.id).collect();
        let params: Vec<Value> = calls.iter().map(Call::to_wire).collect();

        let wrapper = Call::new(self.queue.next_id(), MULTICALL_METHOD, params);
        tracing::debug!(
            "sealed batch of {} calls as multicall {}",
            ids.len(),
            wrapper.id
        );

        Ok(BatchPayload {
            body: wrapper.to_wire().to_string(),
            ids,
            wrapper_id: wrapper.id,
        })
    }
}
