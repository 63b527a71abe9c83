//! Tagged-value codec.
//!
//! JSON has no datetime or binary type, so the Trac RPC plugin carries
//! both as tagged mappings:
//!
//! ```json
//! {"__jsonclass__": ["datetime", "2011-01-01T00:00:00+00:00"]}
//! {"__jsonclass__": ["binary", "aGVsbG8="]}
//! ```
//!
//! Any mapping whose keys include the sentinel key is treated as a tagged
//! value, never as a regular mapping. A tag that fails to decode (bad date
//! string, invalid base64, unknown kind) is a recoverable condition: the
//! raw mapping is passed through unchanged instead of aborting the decode
//! of the rest of the envelope.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use crate::types::JSONCLASS_KEY;

/// Wire format for tagged datetimes, UTC offset spelled out.
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S+00:00";

/// A non-JSON-native scalar carried over the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaggedValue {
    /// A point in time as a Unix timestamp (seconds).
    Datetime(i64),
    /// An opaque byte sequence.
    Binary(Vec<u8>),
}

impl TaggedValue {
    /// Render the `{"__jsonclass__": [kind, payload]}` wire mapping.
    pub fn encode(&self) -> Value {
        let (kind, payload) = match self {
            TaggedValue::Datetime(ts) => ("datetime", format_timestamp(*ts)),
            TaggedValue::Binary(bytes) => ("binary", BASE64.encode(bytes)),
        };
        serde_json::json!({ JSONCLASS_KEY: [kind, payload] })
    }

    /// Decode a tagged mapping back into a native value.
    ///
    /// Returns `None` when the tag payload is unparseable or the kind is
    /// unknown; the caller keeps the raw mapping in that case.
    pub fn decode(value: &Value) -> Option<TaggedValue> {
        let parts = value.get(JSONCLASS_KEY)?.as_array()?;
        let kind = parts.first()?.as_str()?;
        let payload = parts.get(1)?.as_str()?;

        match kind {
            "datetime" => parse_wire_datetime(payload).map(TaggedValue::Datetime),
            "binary" => BASE64.decode(payload).ok().map(TaggedValue::Binary),
            _ => None,
        }
    }
}

fn format_timestamp(ts: i64) -> String {
    match Utc.timestamp_opt(ts, 0).single() {
        Some(dt) => dt.format(DATETIME_FORMAT).to_string(),
        // Out-of-range timestamps cannot occur for i64 seconds chrono
        // supports; fall back to the epoch rather than panic.
        None => Utc
            .timestamp_opt(0, 0)
            .single()
            .map(|dt| dt.format(DATETIME_FORMAT).to_string())
            .unwrap_or_default(),
    }
}

/// Parse a wire date string into a Unix timestamp.
///
/// Trac emits both offset-carrying (`2011-01-01T00:00:00+00:00`) and bare
/// (`2011-01-01T00:00:00`) forms; bare forms are read as UTC.
fn parse_wire_datetime(text: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp());
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc().timestamp())
}

/// Structural classification of a decoded JSON node.
enum Node {
    Tagged,
    Sequence,
    Mapping,
    Scalar,
}

fn classify(value: &Value) -> Node {
    match value {
        Value::Array(_) => Node::Sequence,
        Value::Object(map) if map.contains_key(JSONCLASS_KEY) => Node::Tagged,
        Value::Object(_) => Node::Mapping,
        _ => Node::Scalar,
    }
}

/// Recursively replace tagged mappings with their native values.
///
/// Datetimes become integer Unix timestamps. Binary payloads become
/// strings when the decoded bytes are valid UTF-8; otherwise the tag is
/// left in place so no data is lost on lookup.
pub fn resolve_value(value: Value) -> Value {
    match (classify(&value), value) {
        (Node::Tagged, tagged) => match TaggedValue::decode(&tagged) {
            Some(TaggedValue::Datetime(ts)) => Value::from(ts),
            Some(TaggedValue::Binary(bytes)) => match String::from_utf8(bytes) {
                Ok(text) => Value::String(text),
                Err(_) => tagged,
            },
            None => {
                tracing::debug!("unresolvable tagged value passed through: {}", tagged);
                tagged
            }
        },
        (Node::Sequence, Value::Array(items)) => {
            Value::Array(items.into_iter().map(resolve_value).collect())
        }
        (Node::Mapping, Value::Object(map)) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, resolve_value(v)))
                .collect(),
        ),
        (_, scalar) => scalar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_datetime_round_trip() {
        for ts in [0i64, 1_293_840_000, 1_700_000_123] {
            let encoded = TaggedValue::Datetime(ts).encode();
            assert_eq!(
                TaggedValue::decode(&encoded),
                Some(TaggedValue::Datetime(ts))
            );
        }
    }

    #[test]
    fn test_datetime_wire_format() {
        let encoded = TaggedValue::Datetime(1_293_840_000).encode();
        assert_eq!(
            encoded,
            json!({"__jsonclass__": ["datetime", "2011-01-01T00:00:00+00:00"]})
        );
    }

    #[test]
    fn test_binary_round_trip() {
        for bytes in [b"".to_vec(), b"hello".to_vec(), vec![0u8, 159, 146, 150]] {
            let encoded = TaggedValue::Binary(bytes.clone()).encode();
            assert_eq!(TaggedValue::decode(&encoded), Some(TaggedValue::Binary(bytes)));
        }
    }

    #[test]
    fn test_bare_datetime_parses_as_utc() {
        let tagged = json!({"__jsonclass__": ["datetime", "2011-01-01T00:00:00"]});
        assert_eq!(
            TaggedValue::decode(&tagged),
            Some(TaggedValue::Datetime(1_293_840_000))
        );
    }

    #[test]
    fn test_unparseable_tag_is_a_recoverable_miss() {
        let bad_date = json!({"__jsonclass__": ["datetime", "last tuesday"]});
        assert_eq!(TaggedValue::decode(&bad_date), None);

        let bad_base64 = json!({"__jsonclass__": ["binary", "not base64!!"]});
        assert_eq!(TaggedValue::decode(&bad_base64), None);

        let unknown_kind = json!({"__jsonclass__": ["widget", "x"]});
        assert_eq!(TaggedValue::decode(&unknown_kind), None);
    }

    #[test]
    fn test_resolve_value_walks_structures() {
        let input = json!({
            "due": {"__jsonclass__": ["datetime", "2011-01-01T00:00:00+00:00"]},
            "attachments": [
                {"__jsonclass__": ["binary", "aGVsbG8="]},
                "plain"
            ],
            "nested": {"untagged": [1, 2]}
        });

        let resolved = resolve_value(input);
        assert_eq!(resolved["due"], json!(1_293_840_000));
        assert_eq!(resolved["attachments"], json!(["hello", "plain"]));
        assert_eq!(resolved["nested"], json!({"untagged": [1, 2]}));
    }

    #[test]
    fn test_sentinel_key_takes_precedence_over_mapping() {
        // Extra keys next to the sentinel do not demote it to a mapping.
        let input = json!({
            "__jsonclass__": ["datetime", "2011-01-01T00:00:00+00:00"],
            "ignored": true
        });
        assert_eq!(resolve_value(input), json!(1_293_840_000));
    }

    #[test]
    fn test_unresolvable_tag_passes_through_unchanged() {
        let input = json!({"__jsonclass__": ["datetime", "garbage"]});
        assert_eq!(resolve_value(input.clone()), input);
    }

    #[test]
    fn test_non_utf8_binary_stays_tagged() {
        let encoded = TaggedValue::Binary(vec![0xff, 0xfe]).encode();
        assert_eq!(resolve_value(encoded.clone()), encoded);
    }
}
