//! Failure policies layered over execution, and file loading
//!
//! The plain operations always return `Result`. These wrappers decide what a
//! failure means for callers that prefer to log, exit or panic instead.

use crate::errors::MapError;
use crate::facade::select;
use crate::traits::{ExecResult, Execer, Queryer};
use field_map::{Element, Value};
use std::path::Path;

/// Execute, logging the query and error on failure
pub async fn exec_verbose<E: Execer>(
    e: &E,
    sql: &str,
    args: Vec<Value>,
) -> Result<ExecResult, MapError> {
    let result = e.execute(sql, args).await;
    if let Err(err) = &result {
        tracing::error!(query = sql, "exec failed: {}", err);
    }
    result
}

/// Execute, logging and discarding any error
pub async fn exec_or_log<E: Execer>(e: &E, sql: &str, args: Vec<Value>) -> Option<ExecResult> {
    match e.execute(sql, args).await {
        Ok(result) => Some(result),
        Err(err) => {
            tracing::warn!(query = sql, "exec failed, continuing: {}", err);
            None
        }
    }
}

/// Execute, terminating the process with status 1 on failure
pub async fn exec_or_exit<E: Execer>(e: &E, sql: &str, args: Vec<Value>) -> ExecResult {
    match e.execute(sql, args).await {
        Ok(result) => result,
        Err(err) => {
            tracing::error!(query = sql, "exec failed, exiting: {}", err);
            std::process::exit(1)
        }
    }
}

/// Execute, panicking on failure
pub async fn must_exec<E: Execer>(e: &E, sql: &str, args: Vec<Value>) -> ExecResult {
    match e.execute(sql, args).await {
        Ok(result) => result,
        Err(err) => panic!("{}: {}", sql, err),
    }
}

/// [`select`], logging the query and error on failure
pub async fn select_verbose<Q, T>(
    q: &Q,
    dest: &mut Vec<T>,
    sql: &str,
    args: Vec<Value>,
) -> Result<(), MapError>
where
    Q: Queryer,
    T: Element,
{
    let result = select(q, dest, sql, args).await;
    if let Err(err) = &result {
        tracing::error!(query = sql, "select failed: {}", err);
    }
    result
}

/// [`select`], terminating the process with status 1 on failure
pub async fn select_or_exit<Q, T>(q: &Q, dest: &mut Vec<T>, sql: &str, args: Vec<Value>)
where
    Q: Queryer,
    T: Element,
{
    if let Err(err) = select(q, dest, sql, args).await {
        tracing::error!(query = sql, "select failed, exiting: {}", err);
        std::process::exit(1);
    }
}

/// Execute the whole contents of a file as one statement.
///
/// The file is read fully into memory, so this suits schema scripts rather
/// than large data dumps. Whether several statements in one call work depends
/// on the driver.
pub async fn load_file<E: Execer>(e: &E, path: impl AsRef<Path>) -> Result<ExecResult, MapError> {
    let path = tokio::fs::canonicalize(path.as_ref()).await?;
    let contents = tokio::fs::read_to_string(&path).await?;
    field_map::debug_log!("loading {} ({} bytes)", path.display(), contents.len());
    e.execute(&contents, Vec::new()).await
}
