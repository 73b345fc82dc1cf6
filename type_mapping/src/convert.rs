//! Coercion of decoded values into Rust field types
//!
//! The rules follow what SQL drivers usually do when assigning a column to a
//! destination: integers widen freely and narrow with a range check, text is
//! parsed into numbers, booleans, UUIDs and timestamps, and `NULL` is only
//! accepted by `Option<T>` (plus `Value` and `serde_json::Value`, which can
//! represent it).

use crate::errors::ConversionError;
use crate::json::value_to_json;
use crate::types::Value;
use chrono::{DateTime, NaiveDateTime, Utc};
use uuid::Uuid;

/// Conversion from a decoded column value
pub trait FromValue: Sized {
    /// Type name reported in conversion errors
    const TARGET: &'static str;

    fn from_value(value: Value) -> Result<Self, ConversionError>;
}

/// A mutable destination a cursor can write one column into
///
/// Record fields are handed to cursors as `&mut dyn Scan`.
pub trait Scan {
    fn scan(&mut self, value: Value) -> Result<(), ConversionError>;
}

impl<T: FromValue> Scan for T {
    fn scan(&mut self, value: Value) -> Result<(), ConversionError> {
        *self = T::from_value(value)?;
        Ok(())
    }
}

fn mismatch(value: &Value, target: &'static str) -> ConversionError {
    if value.is_null() {
        ConversionError::UnexpectedNull { target }
    } else {
        ConversionError::Mismatch {
            found: value.kind(),
            target,
        }
    }
}

fn utf8(bytes: Vec<u8>, target: &'static str) -> Result<String, ConversionError> {
    String::from_utf8(bytes).map_err(|e| ConversionError::Parse {
        input: String::from_utf8_lossy(e.as_bytes()).into_owned(),
        target,
        reason: e.to_string(),
    })
}

fn integer(value: Value, target: &'static str) -> Result<i64, ConversionError> {
    match value {
        Value::SmallInt(v) => Ok(i64::from(v)),
        Value::Integer(v) => Ok(i64::from(v)),
        Value::BigInt(v) => Ok(v),
        Value::Float(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            Ok(f as i64)
        }
        Value::Float(f) => Err(ConversionError::OutOfRange {
            value: f.to_string(),
            target,
        }),
        Value::Text(s) | Value::Decimal(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| ConversionError::parse(&s, target, e)),
        Value::Bytes(b) => {
            let s = utf8(b, target)?;
            s.trim()
                .parse::<i64>()
                .map_err(|e| ConversionError::parse(&s, target, e))
        }
        other => Err(mismatch(&other, target)),
    }
}

macro_rules! integer_from_value {
    ($($t:ty),*) => {
        $(
            impl FromValue for $t {
                const TARGET: &'static str = stringify!($t);

                fn from_value(value: Value) -> Result<Self, ConversionError> {
                    let n = integer(value, Self::TARGET)?;
                    <$t>::try_from(n).map_err(|_| ConversionError::OutOfRange {
                        value: n.to_string(),
                        target: Self::TARGET,
                    })
                }
            }
        )*
    };
}

integer_from_value!(i16, i32, i64, u32);

impl FromValue for u64 {
    const TARGET: &'static str = "u64";

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            // Decimal text may hold values past i64::MAX
            Value::Text(s) | Value::Decimal(s) => s
                .trim()
                .parse::<u64>()
                .map_err(|e| ConversionError::parse(&s, Self::TARGET, e)),
            other => {
                let n = integer(other, Self::TARGET)?;
                u64::try_from(n).map_err(|_| ConversionError::OutOfRange {
                    value: n.to_string(),
                    target: Self::TARGET,
                })
            }
        }
    }
}

fn float(value: Value, target: &'static str) -> Result<f64, ConversionError> {
    match value {
        Value::Float(f) => Ok(f),
        Value::SmallInt(v) => Ok(f64::from(v)),
        Value::Integer(v) => Ok(f64::from(v)),
        Value::BigInt(v) => Ok(v as f64),
        Value::Text(s) | Value::Decimal(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| ConversionError::parse(&s, target, e)),
        other => Err(mismatch(&other, target)),
    }
}

impl FromValue for f64 {
    const TARGET: &'static str = "f64";

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        float(value, Self::TARGET)
    }
}

impl FromValue for f32 {
    const TARGET: &'static str = "f32";

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        float(value, Self::TARGET).map(|f| f as f32)
    }
}

impl FromValue for bool {
    const TARGET: &'static str = "bool";

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Boolean(b) => Ok(b),
            Value::SmallInt(_) | Value::Integer(_) | Value::BigInt(_) => {
                match value.as_i64() {
                    Some(0) => Ok(false),
                    Some(1) => Ok(true),
                    _ => Err(ConversionError::OutOfRange {
                        value: format!("{:?}", value),
                        target: Self::TARGET,
                    }),
                }
            }
            Value::Text(s) => match s.trim() {
                "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
                "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
                _ => Err(ConversionError::parse(&s, Self::TARGET, "not a boolean literal")),
            },
            other => Err(mismatch(&other, Self::TARGET)),
        }
    }
}

impl FromValue for String {
    const TARGET: &'static str = "String";

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Text(s) | Value::Decimal(s) => Ok(s),
            Value::Bytes(b) => utf8(b, Self::TARGET),
            Value::Boolean(b) => Ok(b.to_string()),
            Value::SmallInt(v) => Ok(v.to_string()),
            Value::Integer(v) => Ok(v.to_string()),
            Value::BigInt(v) => Ok(v.to_string()),
            Value::Float(v) => Ok(v.to_string()),
            Value::Uuid(u) => Ok(u.to_string()),
            Value::Timestamp(t) => Ok(t.to_rfc3339()),
            Value::Json(j) => Ok(j.to_string()),
            other => Err(mismatch(&other, Self::TARGET)),
        }
    }
}

impl FromValue for Vec<u8> {
    const TARGET: &'static str = "Vec<u8>";

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Bytes(b) => Ok(b),
            Value::Text(s) => Ok(s.into_bytes()),
            other => Err(mismatch(&other, Self::TARGET)),
        }
    }
}

impl FromValue for Uuid {
    const TARGET: &'static str = "Uuid";

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Uuid(u) => Ok(u),
            Value::Text(s) => {
                Uuid::parse_str(s.trim()).map_err(|e| ConversionError::parse(&s, Self::TARGET, e))
            }
            Value::Bytes(b) if b.len() == 16 => {
                Uuid::from_slice(&b).map_err(|e| ConversionError::parse("<16 bytes>", Self::TARGET, e))
            }
            Value::Bytes(b) => {
                let s = utf8(b, Self::TARGET)?;
                Uuid::parse_str(s.trim()).map_err(|e| ConversionError::parse(&s, Self::TARGET, e))
            }
            other => Err(mismatch(&other, Self::TARGET)),
        }
    }
}

impl FromValue for DateTime<Utc> {
    const TARGET: &'static str = "DateTime<Utc>";

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Timestamp(t) => Ok(t),
            Value::Text(s) => DateTime::parse_from_rfc3339(s.trim())
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| ConversionError::parse(&s, Self::TARGET, e)),
            other => Err(mismatch(&other, Self::TARGET)),
        }
    }
}

impl FromValue for NaiveDateTime {
    const TARGET: &'static str = "NaiveDateTime";

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Timestamp(t) => Ok(t.naive_utc()),
            Value::Text(s) => {
                let trimmed = s.trim();
                NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f")
                    .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f"))
                    .map_err(|e| ConversionError::parse(&s, Self::TARGET, e))
            }
            other => Err(mismatch(&other, Self::TARGET)),
        }
    }
}

/// `NULL` becomes JSON `null`; text and bytes are parsed as JSON documents.
impl FromValue for serde_json::Value {
    const TARGET: &'static str = "serde_json::Value";

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Json(j) => Ok(j),
            Value::Text(s) => {
                serde_json::from_str(&s).map_err(|e| ConversionError::parse(&s, Self::TARGET, e))
            }
            Value::Bytes(b) => serde_json::from_slice(&b).map_err(|e| {
                ConversionError::parse(&String::from_utf8_lossy(&b), Self::TARGET, e)
            }),
            other => Ok(value_to_json(other)),
        }
    }
}

impl FromValue for Value {
    const TARGET: &'static str = "Value";

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        Ok(value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    const TARGET: &'static str = T::TARGET;

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

macro_rules! array_from_value {
    ($($t:ty => $name:literal),*) => {
        $(
            impl FromValue for Vec<$t> {
                const TARGET: &'static str = $name;

                fn from_value(value: Value) -> Result<Self, ConversionError> {
                    match value {
                        Value::Array(items) => items.into_iter().map(<$t>::from_value).collect(),
                        other => Err(mismatch(&other, Self::TARGET)),
                    }
                }
            }
        )*
    };
}

array_from_value!(
    String => "Vec<String>",
    i16 => "Vec<i16>",
    i32 => "Vec<i32>",
    i64 => "Vec<i64>",
    f64 => "Vec<f64>",
    bool => "Vec<bool>",
    Uuid => "Vec<Uuid>"
);
