//! # rowmap
//!
//! Maps SQL query results onto Rust records by column name. Records describe
//! their fields with `#[derive(Record)]`; queries run through any collaborator
//! that can query and execute, with a PostgreSQL one built on `sqlx`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rowmap::prelude::*;
//!
//! #[record]
//! pub struct Person {
//!     #[column("id")]
//!     pub person_id: i64,
//!     pub name: String,
//!     pub email: Option<String>,
//! }
//!
//! #[record(params)]
//! pub struct NewPerson {
//!     pub name: String,
//!     pub email: Option<String>,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::new(
//!         "localhost".to_string(), 5432, "rowmap".to_string(),
//!         "postgres".to_string(), "password".to_string(),
//!         1, 5, 30, 600, 3600,
//!     );
//!     let db = Db::connect(&config).await?;
//!
//!     let new_person = NewPerson {
//!         name: "Ann".to_string(),
//!         email: None,
//!     };
//!     db.named_exec("INSERT INTO person (name, email) VALUES (:name, :email)", &new_person)
//!         .await?;
//!
//!     let mut people: Vec<Person> = Vec::new();
//!     db.select(&mut people, "SELECT id, name, email FROM person WHERE name = $1", args!["Ann"])
//!         .await?;
//!
//!     let mut ann = Person::default();
//!     db.get(&mut ann, "SELECT name, id FROM person LIMIT 1", args![]).await?;
//!     println!("{} has id {}", ann.name, ann.person_id);
//!
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

/// Inherent query methods shared by [`Db`] and [`Tx`]
macro_rules! impl_mapping_methods {
    ($session:ty) => {
        impl $session {
            /// Run a query and append one record per row to `dest`
            pub async fn select<E: field_map::Element>(
                &self,
                dest: &mut Vec<E>,
                sql: &str,
                args: Vec<type_mapping::Value>,
            ) -> Result<(), row_mapper::MapError> {
                row_mapper::select(self, dest, sql, args).await
            }

            /// Run a query and scan its first row into `dest`
            pub async fn get<R: field_map::Record>(
                &self,
                dest: &mut R,
                sql: &str,
                args: Vec<type_mapping::Value>,
            ) -> Result<(), row_mapper::MapError> {
                row_mapper::get(self, dest, sql, args).await
            }

            pub async fn exec(
                &self,
                sql: &str,
                args: Vec<type_mapping::Value>,
            ) -> Result<row_mapper::ExecResult, row_mapper::MapError> {
                row_mapper::Execer::execute(self, sql, args).await
            }

            pub async fn queryx(
                &self,
                sql: &str,
                args: Vec<type_mapping::Value>,
            ) -> Result<row_mapper::Rows<row_mapper::BufferedCursor>, row_mapper::MapError> {
                row_mapper::queryx(self, sql, args).await
            }

            pub async fn query_row(
                &self,
                sql: &str,
                args: Vec<type_mapping::Value>,
            ) -> Result<row_mapper::Row<row_mapper::BufferedCursor>, row_mapper::MapError> {
                row_mapper::query_row(self, sql, args).await
            }

            /// Query with `:name` parameters bound from the fields of `params`
            pub async fn named_query<P: field_map::Params>(
                &self,
                sql: &str,
                params: &P,
            ) -> Result<row_mapper::Rows<row_mapper::BufferedCursor>, row_mapper::MapError> {
                row_mapper::named_query(self, sql, params).await
            }

            /// Execute with `:name` parameters bound from the fields of `params`
            pub async fn named_exec<P: field_map::Params>(
                &self,
                sql: &str,
                params: &P,
            ) -> Result<row_mapper::ExecResult, row_mapper::MapError> {
                row_mapper::named_exec(self, sql, params).await
            }

            /// Execute the contents of a SQL file as one statement
            pub async fn load_file(
                &self,
                path: impl AsRef<std::path::Path>,
            ) -> Result<row_mapper::ExecResult, row_mapper::MapError> {
                row_mapper::load_file(self, path).await
            }
        }
    };
}

pub mod core;
pub mod errors;
pub mod pg;
pub mod prelude;
pub mod tx;

// Re-export the main public types for convenience
pub use crate::core::Db;
pub use crate::errors::RowmapError;
pub use crate::tx::Tx;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, MapperConfig};

// Re-export internal crates used by macros and public API
// These MUST be public for the generated macro code to work correctly
pub use field_map;
pub use record_derive;
pub use row_mapper;
pub use type_mapping;

// Re-export external dependencies used in public API
pub use async_trait;
pub use sqlx;
