//! Response parsing and multicall demultiplexing.
//!
//! The decoder turns raw transport bytes into an [`Envelope`], then
//! resolves the envelope into [`ResultStore`] entries: tagged scalars are
//! converted to native values, nested multicall envelopes are flattened,
//! and each result or remote fault lands under its request id.

use serde_json::{Map, Value};

use crate::codec::resolve_value;
use crate::error::ClientError;
use crate::store::ResultStore;
use crate::types::Envelope;

/// Stateless decoder over one session's result store.
pub struct ResponseDecoder;

impl ResponseDecoder {
    /// Parse raw response bytes into the wire envelope shape.
    pub fn decode(raw: &[u8]) -> Result<Envelope, ClientError> {
        let text = std::str::from_utf8(raw)
            .map_err(|e| ClientError::MalformedResponse(format!("response is not UTF-8: {}", e)))?;
        let value: Value = serde_json::from_str(text.trim())
            .map_err(|e| ClientError::MalformedResponse(format!("response is not JSON: {}", e)))?;
        Envelope::from_value(value)
    }

    /// Resolve an envelope into the store, matching sub-results by their
    /// embedded ids.
    ///
    /// Envelope-shaped elements of a result array are recursively
    /// flattened into entries of their own; everything else goes through
    /// the tagged-value codec. An absent or null envelope id defaults to
    /// 0, which is where content-negotiated single responses land.
    pub fn resolve(store: &mut ResultStore, envelope: Envelope) {
        let id = envelope.id.unwrap_or(0);

        if let Some(result) = envelope.result {
            let resolved = Self::resolve_result(store, result);
            store.insert(id, resolved);
        }
        store.set_error(id, error_mapping(envelope.error));
    }

    /// Demultiplex a multicall response onto the ids of the flushed batch.
    ///
    /// Sub-results are matched by response-array position, not by any id
    /// they happen to echo; the wrapper envelope itself gets no entry.
    pub fn resolve_batch(
        store: &mut ResultStore,
        envelope: Envelope,
        ids: &[u64],
    ) -> Result<(), ClientError> {
        let items = match envelope.result {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(ClientError::MalformedResponse(format!(
                    "multicall result is not an array: {}",
                    other
                )));
            }
            None => {
                // Wrapper-level fault: the whole batch failed remotely.
                // Record it under the wrapper's id so it stays queryable.
                let id = envelope.id.unwrap_or(0);
                tracing::warn!("multicall {} failed as a whole", id);
                store.set_error(id, error_mapping(envelope.error));
                return Ok(());
            }
        };

        if items.len() != ids.len() {
            return Err(ClientError::MalformedResponse(format!(
                "expected {} multicall sub-results, got {}",
                ids.len(),
                items.len()
            )));
        }

        for (id, item) in ids.iter().copied().zip(items) {
            if Envelope::looks_like(&item) {
                let sub = Envelope::from_value(item)?;
                if let Some(result) = sub.result {
                    let resolved = Self::resolve_result(store, result);
                    store.insert(id, resolved);
                }
                store.set_error(id, error_mapping(sub.error));
            } else {
                store.insert(id, resolve_value(item));
                store.set_error(id, None);
            }
        }

        Ok(())
    }

    /// Resolve one envelope's result value.
    ///
    /// Array elements that look like envelopes (a deeper multicall layer)
    /// recurse through [`Self::resolve`] and stay in place; all other
    /// nodes go through the codec.
    fn resolve_result(store: &mut ResultStore, result: Value) -> Value {
        match result {
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| {
                        if Envelope::looks_like(&item) {
                            if let Ok(sub) = Envelope::from_value(item.clone()) {
                                Self::resolve(store, sub);
                            }
                            item
                        } else {
                            resolve_value(item)
                        }
                    })
                    .collect(),
            ),
            other => resolve_value(other),
        }
    }
}

/// Keep a non-null error only when it is a mapping, merged key-for-key.
fn error_mapping(error: Option<Value>) -> Option<Map<String, Value>> {
    match error {
        Some(Value::Object(map)) => Some(map),
        _ => None,
    }
}
