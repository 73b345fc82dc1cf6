//! Record descriptor construction
//!
//! A descriptor is the name -> field position map for one record type. It is
//! built once from the type's [`RecordType`] and never changes afterwards.

use crate::errors::DescriptorError;
use crate::record::{FieldDef, RecordType, Shape};
use std::collections::HashMap;

/// Immutable column name -> field position map for one record type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDescriptor {
    type_name: &'static str,
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

/// Resolved column name of a field: the override if present, otherwise the
/// declared name folded to lower case.
pub fn resolve_name(field: &FieldDef) -> String {
    match field.column {
        Some(column) => column.to_string(),
        None => {
            let ident = field.ident.strip_prefix("r#").unwrap_or(field.ident);
            ident.to_lowercase()
        }
    }
}

impl RecordDescriptor {
    /// Build a descriptor, rejecting shapes without field names and
    /// two fields resolving to the same name.
    pub fn build(record_type: &RecordType) -> Result<Self, DescriptorError> {
        let fields = match record_type.shape {
            Shape::Named(fields) => fields,
            Shape::Tuple(_) | Shape::Unit => {
                return Err(DescriptorError::NotAStruct {
                    type_name: record_type.name,
                })
            }
        };

        let mut names = Vec::with_capacity(fields.len());
        let mut positions: HashMap<String, usize> = HashMap::with_capacity(fields.len());

        for (position, field) in fields.iter().enumerate() {
            let name = resolve_name(field);
            if let Some(&earlier) = positions.get(&name) {
                return Err(DescriptorError::DuplicateField {
                    type_name: record_type.name,
                    column: name,
                    first: fields[earlier].ident,
                    second: field.ident,
                });
            }
            positions.insert(name.clone(), position);
            names.push(name);
        }

        Ok(Self {
            type_name: record_type.name,
            names,
            positions,
        })
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Field position for a resolved column name (exact match)
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn name_at(&self, position: usize) -> Option<&str> {
        self.names.get(position).map(String::as_str)
    }

    /// Resolved names in field declaration order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
