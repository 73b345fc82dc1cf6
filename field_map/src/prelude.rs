//! Convenience re-exports for common field-map usage

pub use crate::descriptor::RecordDescriptor;
pub use crate::errors::DescriptorError;
pub use crate::manager::{descriptor_for, DescriptorCache};
pub use crate::record::{Element, ElementKind, FieldDef, Params, Record, RecordType, Shape};

pub use type_mapping::{FromValue, Scan, Value};
