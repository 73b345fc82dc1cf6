//! Error types for descriptor construction

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("{type_name} is not a struct with named fields")]
    NotAStruct { type_name: &'static str },

    #[error("{type_name}: fields `{first}` and `{second}` both resolve to column `{column}`")]
    DuplicateField {
        type_name: &'static str,
        column: String,
        first: &'static str,
        second: &'static str,
    },
}
