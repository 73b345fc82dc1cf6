//! Record shapes and the process-wide field-map cache
//!
//! A record type describes its fields through [`Record::record_type`]. The
//! [`RecordDescriptor`] built from that shape maps every resolved column name
//! to a field position, and [`DescriptorCache`] keeps one descriptor per type
//! for the lifetime of the process.

// Lets the derive output (which names `field_map::...`) compile inside this crate's tests
extern crate self as field_map;

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

pub mod descriptor;
pub mod errors;
pub mod manager;
pub mod prelude;
pub mod record;

pub use descriptor::{resolve_name, RecordDescriptor};
pub use errors::DescriptorError;
pub use manager::{descriptor_for, CacheStats, DescriptorCache};
pub use record::{Element, ElementKind, FieldDef, Params, Record, RecordType, Shape};

// Used by the derive output
pub use type_mapping::{Scan, Value};
