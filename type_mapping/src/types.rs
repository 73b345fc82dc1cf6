//! Value definitions
//!
//! [`Value`] is what a cursor hands to a field handle and what a caller
//! passes as a query argument.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single decoded column value or query argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Boolean(bool),
    SmallInt(i16),
    Integer(i32),
    BigInt(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Uuid(Uuid),
    Timestamp(chrono::DateTime<chrono::Utc>),
    Decimal(String), // Store as string to preserve precision
    Json(serde_json::Value),
    Array(Vec<Value>),
}

impl Value {
    /// Short name of the variant, used in conversion errors
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Boolean(_) => "boolean",
            Value::SmallInt(_) => "smallint",
            Value::Integer(_) => "integer",
            Value::BigInt(_) => "bigint",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Uuid(_) => "uuid",
            Value::Timestamp(_) => "timestamp",
            Value::Decimal(_) => "decimal",
            Value::Json(_) => "json",
            Value::Array(_) => "array",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Integer payload widened to i64, if this is an integer variant
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::SmallInt(v) => Some(i64::from(*v)),
            Value::Integer(v) => Some(i64::from(*v)),
            Value::BigInt(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<String> for Value {
    fn from(val: String) -> Self {
        Value::Text(val)
    }
}

impl From<&str> for Value {
    fn from(val: &str) -> Self {
        Value::Text(val.to_string())
    }
}

impl From<i32> for Value {
    fn from(val: i32) -> Self {
        Value::Integer(val)
    }
}

impl From<i64> for Value {
    fn from(val: i64) -> Self {
        Value::BigInt(val)
    }
}

impl From<i16> for Value {
    fn from(val: i16) -> Self {
        Value::SmallInt(val)
    }
}

impl From<u32> for Value {
    fn from(val: u32) -> Self {
        Value::BigInt(i64::from(val))
    }
}

impl From<u64> for Value {
    fn from(val: u64) -> Self {
        // Values past i64::MAX keep their digits as a decimal
        match i64::try_from(val) {
            Ok(v) => Value::BigInt(v),
            Err(_) => Value::Decimal(val.to_string()),
        }
    }
}

impl From<f32> for Value {
    fn from(val: f32) -> Self {
        Value::Float(f64::from(val))
    }
}

impl From<f64> for Value {
    fn from(val: f64) -> Self {
        Value::Float(val)
    }
}

impl From<bool> for Value {
    fn from(val: bool) -> Self {
        Value::Boolean(val)
    }
}

impl From<Vec<u8>> for Value {
    fn from(val: Vec<u8>) -> Self {
        Value::Bytes(val)
    }
}

impl From<Uuid> for Value {
    fn from(val: Uuid) -> Self {
        Value::Uuid(val)
    }
}

impl From<chrono::DateTime<chrono::Utc>> for Value {
    fn from(val: chrono::DateTime<chrono::Utc>) -> Self {
        Value::Timestamp(val)
    }
}

impl From<chrono::NaiveDateTime> for Value {
    fn from(val: chrono::NaiveDateTime) -> Self {
        Value::Timestamp(val.and_utc())
    }
}

impl From<serde_json::Value> for Value {
    fn from(val: serde_json::Value) -> Self {
        Value::Json(val)
    }
}

macro_rules! array_into_value {
    ($($t:ty),*) => {
        $(
            impl From<Vec<$t>> for Value {
                fn from(val: Vec<$t>) -> Self {
                    Value::Array(val.into_iter().map(Value::from).collect())
                }
            }
        )*
    };
}

array_into_value!(String, i16, i32, i64, f64, bool, Uuid);

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(val: Option<T>) -> Self {
        match val {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_none_becomes_null() {
        let value: Value = Option::<i32>::None.into();
        assert!(value.is_null());

        let value: Value = Some("x").into();
        assert_eq!(value, Value::Text("x".to_string()));
    }

    #[test]
    fn test_string_vec_becomes_text_array() {
        let value = Value::from(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(
            value,
            Value::Array(vec![Value::Text("a".into()), Value::Text("b".into())])
        );
    }

    #[test]
    fn test_u64_beyond_i64_becomes_decimal() {
        assert_eq!(Value::from(42u64), Value::BigInt(42));
        assert_eq!(Value::from(u64::MAX), Value::Decimal("18446744073709551615".into()));
    }

    #[test]
    fn test_typed_vecs_become_arrays() {
        assert_eq!(
            Value::from(vec![1i64, 2]),
            Value::Array(vec![Value::BigInt(1), Value::BigInt(2)])
        );
        assert_eq!(Value::from(Vec::<bool>::new()), Value::Array(vec![]));
    }

    #[test]
    fn test_as_i64_widens_integers() {
        assert_eq!(Value::SmallInt(-3).as_i64(), Some(-3));
        assert_eq!(Value::Integer(7).as_i64(), Some(7));
        assert_eq!(Value::BigInt(i64::MAX).as_i64(), Some(i64::MAX));
        assert_eq!(Value::Text("7".into()).as_i64(), None);
    }
}
