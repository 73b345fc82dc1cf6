//! Conversion errors raised while coercing a [`Value`](crate::Value) into a field type

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("cannot scan NULL into {target}")]
    UnexpectedNull { target: &'static str },

    #[error("cannot convert {found} into {target}")]
    Mismatch {
        found: &'static str,
        target: &'static str,
    },

    #[error("value {value} is out of range for {target}")]
    OutOfRange { value: String, target: &'static str },

    #[error("cannot parse {input:?} as {target}: {reason}")]
    Parse {
        input: String,
        target: &'static str,
        reason: String,
    },
}

impl ConversionError {
    pub(crate) fn parse(input: &str, target: &'static str, reason: impl ToString) -> Self {
        ConversionError::Parse {
            input: input.to_string(),
            target,
            reason: reason.to_string(),
        }
    }
}
