//! Collection materializer

use crate::cursor::Cursor;
use crate::errors::MapError;
use crate::rows::Rows;
use field_map::Element;

/// Scan every remaining row into a new record and append it to `dest`.
///
/// Columns are resolved before the first row is read, so an unmapped column
/// leaves `dest` untouched. A scan error on a later row stops the loop;
/// records appended before it stay in `dest`. The cursor is exhausted but not
/// closed.
pub fn materialize_all<C, E>(rows: &mut Rows<C>, dest: &mut Vec<E>) -> Result<(), MapError>
where
    C: Cursor,
    E: Element,
{
    rows.bind::<E::Record>()?;

    while rows.advance()? {
        let mut record = E::Record::default();
        rows.struct_scan(&mut record)?;
        dest.push(E::wrap(record));
    }

    field_map::debug_log!(
        "materialized rows into {} {:?} elements",
        dest.len(),
        E::KIND
    );
    Ok(())
}
