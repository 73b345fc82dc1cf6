//! Convenience re-exports for common rowmap usage
//!
//! # Example
//!
//! ```rust
//! use rowmap::prelude::*;
//!
//! #[record]
//! pub struct Person {
//!     pub id: i64,
//!     pub name: String,
//! }
//! ```

// Core rowmap components
pub use crate::core::Db;
pub use crate::errors::RowmapError;
pub use crate::tx::Tx;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, MapperConfig};

// Query functions, sessions and capabilities
pub use row_mapper::prelude::*;
pub use row_mapper::{MemoryDb, ResultSet, args};

// Record traits and their derives
pub use field_map::{Element, Params, Record};
pub use record_derive::{Params, Record, record};
pub use type_mapping::FromValue;

// Re-export field_map module for macro-generated code
pub use field_map;

// Common external dependencies
pub use anyhow;
pub use async_trait;
pub use sqlx;
pub use tokio;

pub use sqlx::PgPool;
