//! Named-parameter queries
//!
//! Parameters are bound through the collaborator's [`Binder`] so the
//! placeholders match its driver, then the query runs as usual.

use crate::errors::MapError;
use crate::facade::queryx;
use crate::rows::Rows;
use crate::traits::{Binder, ExecResult, Execer, Queryer};
use field_map::{Params, Value};
use std::collections::HashMap;

/// Query with parameters taken from the fields of `params`
pub async fn named_query<E, P>(e: &E, sql: &str, params: &P) -> Result<Rows<E::Cursor>, MapError>
where
    E: Binder + Queryer,
    P: Params,
{
    let (sql, args) = e.bind_params(sql, params)?;
    queryx(e, &sql, args).await
}

/// Execute with parameters taken from the fields of `params`
pub async fn named_exec<E, P>(e: &E, sql: &str, params: &P) -> Result<ExecResult, MapError>
where
    E: Binder + Execer,
    P: Params,
{
    let (sql, args) = e.bind_params(sql, params)?;
    e.execute(&sql, args).await
}

/// Query with parameters looked up by name in `args`
pub async fn named_query_map<E>(
    e: &E,
    sql: &str,
    args: &HashMap<String, Value>,
) -> Result<Rows<E::Cursor>, MapError>
where
    E: Binder + Queryer,
{
    let (sql, args) = e.bind_map(sql, args)?;
    queryx(e, &sql, args).await
}

/// Execute with parameters looked up by name in `args`
pub async fn named_exec_map<E>(
    e: &E,
    sql: &str,
    args: &HashMap<String, Value>,
) -> Result<ExecResult, MapError>
where
    E: Binder + Execer,
{
    let (sql, args) = e.bind_map(sql, args)?;
    e.execute(&sql, args).await
}
