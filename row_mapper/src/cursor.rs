//! Row cursors
//!
//! A cursor walks the rows of one executed query. It is owned by exactly one
//! reader at a time and must be closed when that reader is done with it.

use crate::errors::MapError;
use std::collections::VecDeque;
use std::fmt::Debug;
use type_mapping::{Scan, Value};

/// Sequential access to the rows of one result set
pub trait Cursor: Send {
    /// Column names in the order the database reported them
    fn columns(&self) -> Result<&[String], MapError>;

    /// Move to the next row; `false` once the result set is exhausted
    fn advance(&mut self) -> Result<bool, MapError>;

    /// Write the current row into `dest`, one handle per column
    fn scan(&mut self, dest: &mut [&mut dyn Scan]) -> Result<(), MapError>;

    /// Release the cursor. Closing twice is a no-op.
    fn close(&mut self) -> Result<(), MapError>;

    fn is_closed(&self) -> bool;
}

type CloseHook = Box<dyn FnOnce() + Send>;

/// Cursor over rows that have already been fetched into memory
pub struct BufferedCursor {
    columns: Vec<String>,
    pending: VecDeque<Vec<Value>>,
    current: Option<Vec<Value>>,
    closed: bool,
    on_close: Option<CloseHook>,
}

impl Debug for BufferedCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferedCursor")
            .field("columns", &self.columns)
            .field("pending", &self.pending.len())
            .field("closed", &self.closed)
            .finish()
    }
}

impl BufferedCursor {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns,
            pending: rows.into(),
            current: None,
            closed: false,
            on_close: None,
        }
    }

    /// Run `hook` the first time the cursor is closed
    pub fn with_close_hook<F>(mut self, hook: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.on_close = Some(Box::new(hook));
        self
    }

    /// Rows not yet reached by `advance`
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl Cursor for BufferedCursor {
    fn columns(&self) -> Result<&[String], MapError> {
        if self.closed {
            return Err(MapError::CursorClosed);
        }
        Ok(&self.columns)
    }

    fn advance(&mut self) -> Result<bool, MapError> {
        if self.closed {
            return Ok(false);
        }
        self.current = self.pending.pop_front();
        Ok(self.current.is_some())
    }

    fn scan(&mut self, dest: &mut [&mut dyn Scan]) -> Result<(), MapError> {
        if self.closed {
            return Err(MapError::CursorClosed);
        }
        let row = self.current.as_ref().ok_or(MapError::NoCurrentRow)?;
        if dest.len() != row.len() {
            return Err(MapError::ColumnCount {
                expected: row.len(),
                got: dest.len(),
            });
        }

        for ((handle, value), column) in dest.iter_mut().zip(row).zip(&self.columns) {
            handle
                .scan(value.clone())
                .map_err(|source| MapError::Scan {
                    column: column.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), MapError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.current = None;
        self.pending.clear();
        if let Some(hook) = self.on_close.take() {
            hook();
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use type_mapping::ConversionError;

    fn people() -> BufferedCursor {
        BufferedCursor::new(
            vec!["id".into(), "name".into()],
            vec![
                vec![Value::Integer(1), Value::Text("Ann".into())],
                vec![Value::Integer(2), Value::Null],
            ],
        )
    }

    #[test]
    fn test_scan_walks_rows_in_order() {
        let mut cursor = people();
        let mut id = 0i64;
        let mut name: Option<String> = None;

        assert!(cursor.advance().unwrap());
        cursor.scan(&mut [&mut id as &mut dyn Scan, &mut name]).unwrap();
        assert_eq!((id, name.as_deref()), (1, Some("Ann")));

        assert!(cursor.advance().unwrap());
        cursor.scan(&mut [&mut id as &mut dyn Scan, &mut name]).unwrap();
        assert_eq!((id, name.as_deref()), (2, None));

        assert!(!cursor.advance().unwrap());
        assert!(matches!(
            cursor.scan(&mut [&mut id as &mut dyn Scan, &mut name]),
            Err(MapError::NoCurrentRow)
        ));
    }

    #[test]
    fn test_scan_checks_destination_count() {
        let mut cursor = people();
        let mut id = 0i64;
        cursor.advance().unwrap();

        let err = cursor.scan(&mut [&mut id as &mut dyn Scan]).unwrap_err();
        assert!(matches!(err, MapError::ColumnCount { expected: 2, got: 1 }));
    }

    #[test]
    fn test_scan_names_failing_column() {
        let mut cursor = people();
        let mut id = 0i64;
        let mut name = String::new();
        cursor.advance().unwrap();
        cursor.advance().unwrap();

        match cursor.scan(&mut [&mut id as &mut dyn Scan, &mut name]) {
            Err(MapError::Scan { column, source }) => {
                assert_eq!(column, "name");
                assert_eq!(source, ConversionError::UnexpectedNull { target: "String" });
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_close_is_idempotent_and_runs_hook_once() {
        let closes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&closes);
        let mut cursor = people().with_close_hook(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        cursor.close().unwrap();
        cursor.close().unwrap();

        assert!(cursor.is_closed());
        assert_eq!(closes.load(Ordering::SeqCst), 1);
        assert!(matches!(cursor.columns(), Err(MapError::CursorClosed)));
        assert!(!cursor.advance().unwrap());
    }
}
