//! Driver-neutral values and the conversions between them and Rust field types
//!
//! Every collaborator decodes result columns into [`Value`] and every record
//! field is written through the [`Scan`] handle, so coercion rules live in
//! exactly one place.

pub mod convert;
pub mod errors;
pub mod json;
pub mod types;

pub use convert::{FromValue, Scan};
pub use errors::ConversionError;
pub use json::value_to_json;
pub use types::Value;
