//! JSON rendering of values
//!
//! Used when a non-JSON column is scanned into a `serde_json::Value` field.

use crate::types::Value;
use serde_json::Number;

/// Convert a decoded value into the closest JSON representation
pub fn value_to_json(value: Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(b),
        Value::SmallInt(v) => serde_json::Value::from(v),
        Value::Integer(v) => serde_json::Value::from(v),
        Value::BigInt(v) => serde_json::Value::from(v),
        Value::Float(f) => Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Text(s) => serde_json::Value::String(s),
        Value::Bytes(b) => serde_json::Value::String(String::from_utf8_lossy(&b).into_owned()),
        Value::Uuid(u) => serde_json::Value::String(u.to_string()),
        Value::Timestamp(t) => serde_json::Value::String(t.to_rfc3339()),
        // Keep precision: a decimal only becomes a JSON number when it round-trips
        Value::Decimal(s) => match s.parse::<i64>() {
            Ok(i) => serde_json::Value::from(i),
            Err(_) => serde_json::Value::String(s),
        },
        Value::Json(j) => j,
        Value::Array(items) => {
            serde_json::Value::Array(items.into_iter().map(value_to_json).collect())
        }
    }
}
