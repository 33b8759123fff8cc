//! Lenient readers for untyped JSON objects.
//!
//! Shared by the storage snapshot decoder and the photo-analysis payload
//! parser, so default substitution is defined in exactly one place:
//! - absent, `null` or unparsable numbers read as `None` (callers use `0`);
//! - numeric strings are parsed (`"12.5"` reads as `12.5`);
//! - blank strings read as `None`;
//! - timestamps are epoch milliseconds or RFC 3339 strings.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

pub(crate) type JsonObject = Map<String, Value>;

/// First non-blank string value among `keys`, trimmed.
pub(crate) fn read_text(object: &JsonObject, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match object.get(*key) {
        Some(Value::String(value)) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    })
}

/// First numeric value among `keys`.
pub(crate) fn read_number(object: &JsonObject, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .find_map(|key| object.get(*key).and_then(number_from_value))
}

/// First integral value among `keys`; fractional input is truncated.
pub(crate) fn read_i64(object: &JsonObject, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|key| match object.get(*key) {
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|v| v.is_finite()).map(|v| v as i64)),
        Some(Value::String(text)) => text.trim().parse::<i64>().ok(),
        _ => None,
    })
}

/// Boolean value at `key`; `"true"`/`"false"` strings are accepted.
pub(crate) fn read_bool(object: &JsonObject, key: &str) -> Option<bool> {
    match object.get(key) {
        Some(Value::Bool(value)) => Some(*value),
        Some(Value::String(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Timestamp at `key` as epoch milliseconds.
pub(crate) fn read_epoch_ms(object: &JsonObject, key: &str) -> Option<i64> {
    if let Some(Value::String(text)) = object.get(key) {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(text.trim()) {
            return Some(parsed.timestamp_millis());
        }
    }
    read_i64(object, &[key])
}

/// `2025-11-29T10:00:00.000Z` form of an epoch-millisecond timestamp.
pub(crate) fn epoch_ms_to_rfc3339(epoch_ms: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms)
        .map(|at| at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Replaces negative and non-finite values with `0`.
pub(crate) fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}
