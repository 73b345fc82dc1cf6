//! Query functions over any [`Queryer`]
//!
//! `select` and `get` own the cursor they open and close it on every path,
//! including errors. `queryx` and `query_row` hand the cursor to the caller
//! inside a session that closes it when dropped.

use crate::errors::MapError;
use crate::materialize::materialize_all;
use crate::rows::{Row, Rows};
use crate::traits::Queryer;
use field_map::{descriptor_for, Element, Record, Value};

/// Run a query and wrap its cursor for row-by-row reading
pub async fn queryx<Q>(q: &Q, sql: &str, args: Vec<Value>) -> Result<Rows<Q::Cursor>, MapError>
where
    Q: Queryer,
{
    Ok(Rows::new(q.query(sql, args).await?))
}

/// Run a query whose first row is all the caller wants
pub async fn query_row<Q>(q: &Q, sql: &str, args: Vec<Value>) -> Result<Row<Q::Cursor>, MapError>
where
    Q: Queryer,
{
    Ok(Row::new(q.query(sql, args).await?))
}

/// Run a query and append one element per result row to `dest`.
///
/// On a scan error the rows read so far stay in `dest`.
pub async fn select<Q, E>(q: &Q, dest: &mut Vec<E>, sql: &str, args: Vec<Value>) -> Result<(), MapError>
where
    Q: Queryer,
    E: Element,
{
    // Reject unusable record types before running anything
    descriptor_for::<E::Record>()?;

    let mut rows = queryx(q, sql, args).await?;
    let result = materialize_all(&mut rows, dest);
    let closed = rows.close();
    result.and(closed)
}

/// Run a query and scan its first row into `dest`.
///
/// Fails with [`MapError::NoRows`] when the query returns nothing; extra rows
/// are ignored.
pub async fn get<Q, R>(q: &Q, dest: &mut R, sql: &str, args: Vec<Value>) -> Result<(), MapError>
where
    Q: Queryer,
    R: Record,
{
    descriptor_for::<R>()?;

    query_row(q, sql, args).await?.struct_scan(dest)
}
