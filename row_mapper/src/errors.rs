use field_map::DescriptorError;
use thiserror::Error;
use type_mapping::ConversionError;

/// Errors returned by the row mapper and its collaborators
#[derive(Error, Debug)]
pub enum MapError {
    /// Destination cannot receive rows through this session
    #[error("invalid destination: {0}")]
    InvalidDestination(String),

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error("missing destination name {0}")]
    UnmappedColumn(String),

    #[error("column {0} appears more than once in the result set")]
    DuplicateColumn(String),

    #[error("no rows in result set")]
    NoRows,

    #[error("error scanning column {column}: {source}")]
    Scan {
        column: String,
        #[source]
        source: ConversionError,
    },

    #[error("expected {expected} destination arguments in scan, not {got}")]
    ColumnCount { expected: usize, got: usize },

    #[error("scan called without a current row")]
    NoCurrentRow,

    #[error("cursor is closed")]
    CursorClosed,

    #[error("could not find name {0} in the argument source")]
    MissingParam(String),

    #[error("invalid named query: {0}")]
    NamedQuery(String),

    /// Failure reported by the database access layer
    #[error("database error: {0}")]
    Database(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl MapError {
    pub fn database<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        MapError::Database(error.into())
    }
}
