//! In-memory collaborator
//!
//! [`MemoryDb`] answers queries from canned result sets keyed by SQL text and
//! records every statement it receives. It also counts cursor opens and
//! closes so callers can check that no cursor is left open.

use crate::cursor::BufferedCursor;
use crate::errors::MapError;
use crate::traits::{Binder, ExecResult, Execer, Queryer};
use async_trait::async_trait;
use field_map::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    #[error("no result registered for query: {0}")]
    UnknownQuery(String),

    #[error("{0}")]
    Failed(String),
}

/// Columns and rows returned for one query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row(mut self, values: Vec<Value>) -> Self {
        self.rows.push(values);
        self
    }
}

/// A statement received by [`MemoryDb`]
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<Value>,
}

#[derive(Debug, Default)]
struct State {
    results: HashMap<String, ResultSet>,
    exec_results: HashMap<String, ExecResult>,
    failures: HashMap<String, String>,
    statements: Vec<Statement>,
}

/// Canned-result database for tests and examples
#[derive(Debug)]
pub struct MemoryDb {
    driver_name: String,
    state: Mutex<State>,
    opened: AtomicUsize,
    closed: Arc<AtomicUsize>,
}

impl MemoryDb {
    pub fn new(driver_name: impl Into<String>) -> Self {
        Self {
            driver_name: driver_name.into(),
            state: Mutex::new(State::default()),
            opened: AtomicUsize::new(0),
            closed: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Rows returned whenever `sql` is queried
    pub fn add_result(&self, sql: impl Into<String>, result: ResultSet) {
        self.state().results.insert(sql.into(), result);
    }

    /// Affected-row count reported whenever `sql` is executed
    ///
    /// Statements without a registered result report zero rows.
    pub fn add_exec(&self, sql: impl Into<String>, rows_affected: u64) {
        self.state().exec_results.insert(
            sql.into(),
            ExecResult {
                rows_affected,
                last_insert_id: None,
            },
        );
    }

    /// Make every query or execution of `sql` fail with `message`
    pub fn fail(&self, sql: impl Into<String>, message: impl Into<String>) {
        self.state().failures.insert(sql.into(), message.into());
    }

    /// Every statement received so far, queries and executions alike
    pub fn statements(&self) -> Vec<Statement> {
        self.state().statements.clone()
    }

    pub fn cursors_opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn cursors_closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    /// Cursors handed out and not yet closed
    pub fn open_cursors(&self) -> usize {
        self.cursors_opened() - self.cursors_closed()
    }

    fn record(&self, sql: &str, args: Vec<Value>) -> Result<(), MapError> {
        let mut state = self.state();
        state.statements.push(Statement {
            sql: sql.to_string(),
            args,
        });
        match state.failures.get(sql) {
            Some(message) => Err(MapError::database(MemoryError::Failed(message.clone()))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Queryer for MemoryDb {
    type Cursor = BufferedCursor;

    async fn query(&self, sql: &str, args: Vec<Value>) -> Result<BufferedCursor, MapError> {
        self.record(sql, args)?;
        let result = self
            .state()
            .results
            .get(sql)
            .cloned()
            .ok_or_else(|| MapError::database(MemoryError::UnknownQuery(sql.to_string())))?;

        self.opened.fetch_add(1, Ordering::SeqCst);
        let closed = Arc::clone(&self.closed);
        Ok(BufferedCursor::new(result.columns, result.rows).with_close_hook(move || {
            closed.fetch_add(1, Ordering::SeqCst);
        }))
    }
}

#[async_trait]
impl Execer for MemoryDb {
    async fn execute(&self, sql: &str, args: Vec<Value>) -> Result<ExecResult, MapError> {
        self.record(sql, args)?;
        Ok(self
            .state()
            .exec_results
            .get(sql)
            .copied()
            .unwrap_or_default())
    }
}

impl Binder for MemoryDb {
    fn driver_name(&self) -> &str {
        &self.driver_name
    }
}
