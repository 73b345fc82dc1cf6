//! Error types for the rowmap crate
//!
//! Mapping failures keep their own type ([`MapError`]); this enum adds the
//! connection and configuration failures of the PostgreSQL collaborator.

use config::ConfigError;
use row_mapper::MapError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RowmapError {
    #[error("Database connection error: {0}")]
    DatabaseConnection(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Map(#[from] MapError),
}
