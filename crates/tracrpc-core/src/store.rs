//! Per-session result and error lookup.
//!
//! The decoder is the only writer; callers read by request id. One store
//! lives as long as its session and is replaced wholesale on every
//! non-batch request.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Decoded results and remote faults keyed by request id.
#[derive(Debug, Default)]
pub struct ResultStore {
    results: BTreeMap<u64, Value>,
    errors: BTreeMap<u64, Option<Map<String, Value>>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, id: u64, value: Value) {
        self.results.insert(id, value);
    }

    /// Record the remote fault for an id; `None` marks "no error".
    pub(crate) fn set_error(&mut self, id: u64, error: Option<Map<String, Value>>) {
        self.errors.insert(id, error);
    }

    /// Decoded result for a single id.
    pub fn get(&self, id: u64) -> Option<&Value> {
        self.results.get(&id)
    }

    /// Results for a set of ids. Missing ids are silently omitted.
    pub fn get_many(&self, ids: &[u64]) -> BTreeMap<u64, &Value> {
        ids.iter()
            .filter_map(|id| self.results.get(id).map(|v| (*id, v)))
            .collect()
    }

    /// The current entry, for single-call callers that never saw an id.
    pub fn get_default(&self) -> Option<&Value> {
        self.results.values().next()
    }

    /// Remote fault recorded for an id.
    ///
    /// `None` means no error (the PHP client's `false`); an empty-but-
    /// present mapping is a real remote fault and comes back as
    /// `Some(empty)`.
    pub fn get_error(&self, id: u64) -> Option<&Map<String, Value>> {
        self.errors.get(&id).and_then(|e| e.as_ref())
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
