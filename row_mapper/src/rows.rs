//! Cursor sessions
//!
//! [`Rows`] wraps a cursor for row-by-row reading and caches the column to
//! field mapping of the first record type scanned through it. [`Row`] reads
//! exactly one row. Both close their cursor when dropped.

use crate::cursor::Cursor;
use crate::errors::MapError;
use crate::resolver::resolve;
use crate::scanner::scan_record;
use field_map::{descriptor_for, Record, Scan};
use std::any::{type_name, TypeId};
use std::fmt::Debug;

#[derive(Debug)]
struct Binding {
    type_id: TypeId,
    type_name: &'static str,
    positions: Vec<usize>,
}

/// Row-by-row reader over an executed query
///
/// `struct_scan` resolves columns once and reuses the result for every later
/// row, so a session must only ever be scanned into one record type.
pub struct Rows<C: Cursor> {
    cursor: C,
    binding: Option<Binding>,
}

impl<C: Cursor> Debug for Rows<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rows")
            .field("closed", &self.cursor.is_closed())
            .field("binding", &self.binding)
            .finish()
    }
}

impl<C: Cursor> Rows<C> {
    pub fn new(cursor: C) -> Self {
        Self {
            cursor,
            binding: None,
        }
    }

    pub fn columns(&self) -> Result<&[String], MapError> {
        self.cursor.columns()
    }

    /// Move to the next row; `false` once the result set is exhausted
    pub fn advance(&mut self) -> Result<bool, MapError> {
        self.cursor.advance()
    }

    /// Scan the current row into explicit destinations, one per column
    pub fn scan(&mut self, dest: &mut [&mut dyn Scan]) -> Result<(), MapError> {
        self.cursor.scan(dest)
    }

    /// Scan the current row into a record
    pub fn struct_scan<R: Record>(&mut self, dest: &mut R) -> Result<(), MapError> {
        self.bind::<R>()?;
        let positions = match &self.binding {
            Some(binding) => binding.positions.as_slice(),
            None => return Err(MapError::InvalidDestination(type_name::<R>().to_string())),
        };
        scan_record(&mut self.cursor, positions, dest)
    }

    /// Resolve the column mapping for `R`, or check that the session is
    /// already bound to `R`.
    pub(crate) fn bind<R: Record>(&mut self) -> Result<(), MapError> {
        if let Some(binding) = &self.binding {
            if binding.type_id != TypeId::of::<R>() {
                return Err(MapError::InvalidDestination(format!(
                    "rows already scanned into {}, cannot scan into {}",
                    binding.type_name,
                    type_name::<R>()
                )));
            }
            return Ok(());
        }

        let descriptor = descriptor_for::<R>()?;
        let positions = resolve(&descriptor, self.cursor.columns()?)?;
        self.binding = Some(Binding {
            type_id: TypeId::of::<R>(),
            type_name: type_name::<R>(),
            positions,
        });
        Ok(())
    }

    pub fn close(&mut self) -> Result<(), MapError> {
        self.cursor.close()
    }

    pub fn is_closed(&self) -> bool {
        self.cursor.is_closed()
    }
}

impl<C: Cursor> Drop for Rows<C> {
    fn drop(&mut self) {
        if let Err(e) = self.cursor.close() {
            tracing::warn!("failed to close cursor: {}", e);
        }
    }
}

/// Single-row reader
///
/// Extra rows are ignored. The cursor is closed by every scan, whether it
/// succeeds or not.
pub struct Row<C: Cursor> {
    cursor: C,
}

impl<C: Cursor> Debug for Row<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Row")
            .field("closed", &self.cursor.is_closed())
            .finish()
    }
}

impl<C: Cursor> Row<C> {
    pub fn new(cursor: C) -> Self {
        Self { cursor }
    }

    pub fn columns(&self) -> Result<&[String], MapError> {
        self.cursor.columns()
    }

    /// Scan the first row into explicit destinations, one per column
    pub fn scan(mut self, dest: &mut [&mut dyn Scan]) -> Result<(), MapError> {
        let result = self.first().and_then(|()| self.cursor.scan(dest));
        let closed = self.cursor.close();
        result.and(closed)
    }

    /// Scan the first row into a record
    ///
    /// Fields whose columns are absent from the result keep their values.
    pub fn struct_scan<R: Record>(mut self, dest: &mut R) -> Result<(), MapError> {
        let result = self.scan_first_into(dest);
        let closed = self.cursor.close();
        result.and(closed)
    }

    fn scan_first_into<R: Record>(&mut self, dest: &mut R) -> Result<(), MapError> {
        let descriptor = descriptor_for::<R>()?;
        let positions = resolve(&descriptor, self.cursor.columns()?)?;
        self.first()?;
        scan_record(&mut self.cursor, &positions, dest)
    }

    fn first(&mut self) -> Result<(), MapError> {
        if self.cursor.advance()? {
            Ok(())
        } else {
            Err(MapError::NoRows)
        }
    }
}

impl<C: Cursor> Drop for Row<C> {
    fn drop(&mut self) {
        if let Err(e) = self.cursor.close() {
            tracing::warn!("failed to close cursor: {}", e);
        }
    }
}
