//! Wire-level protocol types.
//!
//! The Trac RPC plugin exchanges plain JSON objects: requests are
//! `{method, params, id}`, responses are `{id, result, error}`. A batched
//! request is a single `system.multicall` call whose params array carries
//! the individually staged request objects.

use serde_json::{Map, Value};

use crate::error::ClientError;

/// Method name used to wrap a queue of calls into one round-trip.
pub const MULTICALL_METHOD: &str = "system.multicall";

/// Sentinel key marking a tagged scalar value (`datetime`, `binary`).
pub const JSONCLASS_KEY: &str = "__jsonclass__";

/// One logical remote-procedure invocation pending serialization.
///
/// Immutable once created; consumed exactly once, either alone or as an
/// element of a multicall params array.
#[derive(Debug, Clone)]
pub struct Call {
    /// Session-scoped request id, assigned by the queue starting at 1.
    pub id: u64,
    /// Remote method name, e.g. `"wiki.getPage"`.
    pub method: String,
    /// Positional arguments.
    pub params: Vec<Value>,
}

impl Call {
    pub fn new(id: u64, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            id,
            method: method.into(),
            params,
        }
    }

    /// Render the `{method, params, id}` request object.
    ///
    /// The remote protocol distinguishes "no positional args" from an
    /// empty struct argument, so an empty params sequence (and any empty
    /// array nested in the arguments) must serialize as `{}`, never `[]`.
    pub fn to_wire(&self) -> Value {
        let params = if self.params.is_empty() {
            Value::Object(Map::new())
        } else {
            empty_arrays_to_objects(Value::Array(self.params.clone()))
        };

        serde_json::json!({
            "method": self.method,
            "params": params,
            "id": self.id,
        })
    }
}

/// Replace empty JSON arrays with empty objects, recursively.
///
/// Non-empty sequences are left as arrays; only truly empty ones are
/// substituted.
fn empty_arrays_to_objects(value: Value) -> Value {
    match value {
        Value::Array(items) => {
            if items.is_empty() {
                Value::Object(Map::new())
            } else {
                Value::Array(items.into_iter().map(empty_arrays_to_objects).collect())
            }
        }
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, empty_arrays_to_objects(v)))
                .collect(),
        ),
        other => other,
    }
}

/// The `{id, result, error}` wire response shape.
///
/// A successful multicall response is an envelope whose `result` is an
/// array of nested envelopes (or bare values), one per queued call, in
/// call order.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// Request id echoed by the remote. Absent or null for
    /// content-negotiated single calls; the decoder then defaults to 0.
    pub id: Option<u64>,
    pub result: Option<Value>,
    pub error: Option<Value>,
}

impl Envelope {
    /// Parse a JSON value into an envelope.
    ///
    /// The value must be an object carrying at least one of `result` /
    /// `error` in a recognizable shape.
    pub fn from_value(value: Value) -> Result<Self, ClientError> {
        let mut map = match value {
            Value::Object(map) => map,
            other => {
                return Err(ClientError::MalformedResponse(format!(
                    "expected a response object, got {}",
                    json_kind(&other)
                )));
            }
        };

        if !map.contains_key("result") && !map.contains_key("error") {
            return Err(ClientError::MalformedResponse(
                "response object has neither 'result' nor 'error'".into(),
            ));
        }

        // An absent or null id defaults to 0 downstream; anything else
        // must be a non-negative integer. Filing a string or negative id
        // under 0 would shadow a legitimate id-0 entry.
        let id = match map.remove("id") {
            None | Some(Value::Null) => None,
            Some(value) => match value.as_u64() {
                Some(id) => Some(id),
                None => {
                    return Err(ClientError::MalformedResponse(format!(
                        "response id is not a non-negative integer: {}",
                        value
                    )));
                }
            },
        };
        let result = map.remove("result").filter(|v| !v.is_null());
        let error = map.remove("error").filter(|v| !v.is_null());

        Ok(Self { id, result, error })
    }

    /// Shallow shape check: does this value look like a response envelope?
    ///
    /// Used by the decoder to tell a nested multicall sub-result apart
    /// from an ordinary result mapping.
    pub fn looks_like(value: &Value) -> bool {
        match value {
            Value::Object(map) => map.contains_key("result") || map.contains_key("error"),
            _ => false,
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_params_serialize_as_object() {
        let call = Call::new(1, "ticket.status.getAll", vec![]);
        let wire = call.to_wire();
        assert_eq!(wire["params"], json!({}));
        assert!(!call.to_wire().to_string().contains("[]"));
    }

    #[test]
    fn test_nonempty_params_stay_an_array() {
        let call = Call::new(2, "wiki.getPage", vec![json!("TracGuide")]);
        assert_eq!(call.to_wire()["params"], json!(["TracGuide"]));
    }

    #[test]
    fn test_nested_empty_array_substituted() {
        let call = Call::new(3, "ticket.create", vec![json!("summary"), json!([])]);
        assert_eq!(call.to_wire()["params"], json!(["summary", {}]));
    }

    #[test]
    fn test_envelope_requires_result_or_error() {
        let err = Envelope::from_value(json!({"id": 1})).unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse(_)));

        let err = Envelope::from_value(json!("nope")).unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse(_)));
    }

    #[test]
    fn test_envelope_rejects_non_integer_id() {
        for bad in [json!("2"), json!(-3), json!(1.5), json!([1])] {
            let err = Envelope::from_value(json!({"id": bad, "result": "x", "error": null}))
                .unwrap_err();
            assert!(matches!(err, ClientError::MalformedResponse(_)));
        }
    }

    #[test]
    fn test_envelope_null_id_is_absent() {
        let env = Envelope::from_value(json!({"id": null, "result": 42, "error": null})).unwrap();
        assert_eq!(env.id, None);
        assert_eq!(env.result, Some(json!(42)));
        assert_eq!(env.error, None);
    }

    #[test]
    fn test_envelope_shape_check() {
        assert!(Envelope::looks_like(&json!({"id": 1, "result": "x", "error": null})));
        assert!(Envelope::looks_like(&json!({"error": {"code": 1}})));
        assert!(!Envelope::looks_like(&json!({"status": "closed"})));
        assert!(!Envelope::looks_like(&json!(["a", "b"])));
    }
}
