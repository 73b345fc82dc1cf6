//! Column to field resolution

use crate::errors::MapError;
use field_map::RecordDescriptor;
use std::collections::HashSet;

/// Field position for each column, parallel to `columns`.
///
/// Matching is exact: descriptors already hold lower-cased names, so the
/// database must report columns in the same case. The first column with no
/// field fails the whole resolution. A column listed twice would need two
/// handles to the same field and is rejected.
pub fn resolve(descriptor: &RecordDescriptor, columns: &[String]) -> Result<Vec<usize>, MapError> {
    let mut positions = Vec::with_capacity(columns.len());
    let mut seen = HashSet::with_capacity(columns.len());

    for column in columns {
        let position = descriptor
            .position(column)
            .ok_or_else(|| MapError::UnmappedColumn(column.clone()))?;
        if !seen.insert(position) {
            return Err(MapError::DuplicateColumn(column.clone()));
        }
        positions.push(position);
    }

    field_map::trace_log!(
        "resolved {} columns for {}: {:?}",
        columns.len(),
        descriptor.type_name(),
        positions
    );
    Ok(positions)
}
