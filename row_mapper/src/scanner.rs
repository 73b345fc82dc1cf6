//! Record scanner
//!
//! Turns a record's field handles into the column-ordered destination list a
//! cursor writes into. Values are never interpreted here; coercion happens in
//! each field's `Scan` impl.

use crate::cursor::Cursor;
use crate::errors::MapError;
use field_map::{Record, Scan};

/// Reorder field handles into column order.
///
/// `positions` must come from [`resolve`](crate::resolver::resolve) for the
/// same record type, so every entry is a distinct, valid field position.
pub fn order_handles<'a>(
    type_name: &str,
    fields: Vec<&'a mut dyn Scan>,
    positions: &[usize],
) -> Result<Vec<&'a mut dyn Scan>, MapError> {
    let field_count = fields.len();
    let mut slots: Vec<Option<&'a mut dyn Scan>> = fields.into_iter().map(Some).collect();

    positions
        .iter()
        .map(|&position| {
            slots
                .get_mut(position)
                .and_then(Option::take)
                .ok_or_else(|| {
                    MapError::InvalidDestination(format!(
                        "{} has {} mapped fields, field {} is missing or already bound",
                        type_name, field_count, position
                    ))
                })
        })
        .collect()
}

/// Scan the cursor's current row into `dest`
pub fn scan_record<C, R>(cursor: &mut C, positions: &[usize], dest: &mut R) -> Result<(), MapError>
where
    C: Cursor + ?Sized,
    R: Record,
{
    let type_name = R::record_type().name;
    let mut handles = order_handles(type_name, dest.fields_mut(), positions)?;
    cursor.scan(&mut handles)
}
