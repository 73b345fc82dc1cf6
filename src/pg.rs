//! PostgreSQL value mapping
//!
//! Arguments are bound onto `sqlx` queries from [`Value`]s, and result
//! columns are decoded into [`Value`]s by their Postgres type name.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use row_mapper::{BufferedCursor, ExecResult, MapError};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::postgres::types::Oid;
use sqlx::postgres::{PgArgumentBuffer, PgArguments, PgQueryResult, PgRow, PgStatement, PgTypeInfo};
use sqlx::types::Decimal;
use sqlx::{Column, Postgres, Row, Statement, TypeInfo, ValueRef};
use type_mapping::{FromValue, Value, value_to_json};
use uuid::Uuid;

pub type PgQuery<'q> = sqlx::query::Query<'q, Postgres, PgArguments>;

/// NULL argument sent without a parameter type so the server infers one
/// from the statement
#[derive(Debug, Clone, Copy)]
pub struct UntypedNull;

impl sqlx::Type<Postgres> for UntypedNull {
    fn type_info() -> PgTypeInfo {
        // OID 0 leaves the parameter type unspecified
        PgTypeInfo::with_oid(Oid(0))
    }
}

impl sqlx::Encode<'_, Postgres> for UntypedNull {
    fn encode_by_ref(&self, _buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        Ok(IsNull::Yes)
    }
}

/// Bind one argument onto a query
pub fn bind_value(query: PgQuery<'_>, value: Value) -> PgQuery<'_> {
    match value {
        Value::Null => query.bind(UntypedNull),
        Value::Boolean(b) => query.bind(b),
        Value::SmallInt(v) => query.bind(v),
        Value::Integer(v) => query.bind(v),
        Value::BigInt(v) => query.bind(v),
        Value::Float(v) => query.bind(v),
        Value::Text(s) => query.bind(s),
        Value::Bytes(b) => query.bind(b),
        Value::Uuid(u) => query.bind(u),
        Value::Timestamp(t) => query.bind(t),
        Value::Decimal(s) => match s.trim().parse::<Decimal>() {
            Ok(d) => query.bind(d),
            Err(_) => query.bind(s),
        },
        Value::Json(j) => query.bind(j),
        Value::Array(items) => bind_array(query, items),
    }
}

/// Bind a list of arguments in order
pub fn bind_all(mut query: PgQuery<'_>, args: Vec<Value>) -> PgQuery<'_> {
    for value in args {
        query = bind_value(query, value);
    }
    query
}

/// Arrays bind as the Postgres array of their first element's type. Mixed
/// arrays fall back to a JSON array.
fn bind_array(query: PgQuery<'_>, items: Vec<Value>) -> PgQuery<'_> {
    let kind = items.iter().find(|v| !v.is_null()).map(Value::kind);
    let array = Value::Array(items);

    let typed = match kind {
        Some("smallint" | "integer") => Vec::<i32>::from_value(array.clone()).ok().map(TypedArray::Int4),
        Some("bigint") => Vec::<i64>::from_value(array.clone()).ok().map(TypedArray::Int8),
        Some("float") => Vec::<f64>::from_value(array.clone()).ok().map(TypedArray::Float8),
        Some("boolean") => Vec::<bool>::from_value(array.clone()).ok().map(TypedArray::Bool),
        Some("uuid") => Vec::<Uuid>::from_value(array.clone()).ok().map(TypedArray::Uuid),
        Some("text") | None => Vec::<String>::from_value(array.clone()).ok().map(TypedArray::Text),
        Some(_) => None,
    };

    match typed {
        Some(TypedArray::Int4(v)) => query.bind(v),
        Some(TypedArray::Int8(v)) => query.bind(v),
        Some(TypedArray::Float8(v)) => query.bind(v),
        Some(TypedArray::Bool(v)) => query.bind(v),
        Some(TypedArray::Uuid(v)) => query.bind(v),
        Some(TypedArray::Text(v)) => query.bind(v),
        None => query.bind(value_to_json(array)),
    }
}

enum TypedArray {
    Int4(Vec<i32>),
    Int8(Vec<i64>),
    Float8(Vec<f64>),
    Bool(Vec<bool>),
    Uuid(Vec<Uuid>),
    Text(Vec<String>),
}

fn nullable<T, F>(row: &PgRow, index: usize, wrap: F) -> Result<Value, sqlx::Error>
where
    T: for<'r> sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
    F: FnOnce(T) -> Value,
{
    Ok(row
        .try_get::<Option<T>, _>(index)?
        .map(wrap)
        .unwrap_or(Value::Null))
}

fn array<T, F>(row: &PgRow, index: usize, wrap: F) -> Result<Value, sqlx::Error>
where
    Vec<T>: for<'r> sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
    F: Fn(T) -> Value,
{
    nullable(row, index, |items: Vec<T>| {
        Value::Array(items.into_iter().map(&wrap).collect())
    })
}

/// Types without a dedicated arm are read as the UTF-8 text of their wire
/// value, which covers enums and text-like extension types. Anything else
/// is reported by type name.
fn text_fallback(row: &PgRow, index: usize, type_name: &str) -> Result<Value, sqlx::Error> {
    if row.try_get_raw(index)?.is_null() {
        return Ok(Value::Null);
    }
    row.try_get_unchecked::<String, _>(index)
        .map(Value::Text)
        .map_err(|_| sqlx::Error::ColumnDecode {
            index: index.to_string(),
            source: format!("unsupported Postgres type {}", type_name).into(),
        })
}

/// Decode one column of a row by its Postgres type
pub fn decode_column(row: &PgRow, index: usize) -> Result<Value, sqlx::Error> {
    let type_name = row.column(index).type_info().name().to_string();

    match type_name.as_str() {
        "BOOL" => nullable(row, index, Value::Boolean),
        "INT2" => nullable(row, index, Value::SmallInt),
        "INT4" => nullable(row, index, Value::Integer),
        "INT8" => nullable(row, index, Value::BigInt),
        "FLOAT4" => nullable(row, index, |f: f32| Value::Float(f64::from(f))),
        "FLOAT8" => nullable(row, index, Value::Float),
        "NUMERIC" => nullable(row, index, |d: Decimal| Value::Decimal(d.to_string())),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => nullable(row, index, Value::Text),
        "UUID" => nullable(row, index, Value::Uuid),
        "TIMESTAMPTZ" => nullable(row, index, |t: DateTime<Utc>| Value::Timestamp(t)),
        "TIMESTAMP" => nullable(row, index, |t: NaiveDateTime| Value::from(t)),
        "DATE" => nullable(row, index, |d: NaiveDate| Value::Text(d.to_string())),
        "TIME" => nullable(row, index, |t: NaiveTime| Value::Text(t.to_string())),
        "JSON" | "JSONB" => nullable(row, index, Value::Json),
        "BYTEA" => nullable(row, index, Value::Bytes),
        "BOOL[]" => array(row, index, Value::Boolean),
        "INT2[]" => array(row, index, Value::SmallInt),
        "INT4[]" => array(row, index, Value::Integer),
        "INT8[]" => array(row, index, Value::BigInt),
        "FLOAT4[]" => array(row, index, |f: f32| Value::Float(f64::from(f))),
        "FLOAT8[]" => array(row, index, Value::Float),
        "NUMERIC[]" => array(row, index, |d: Decimal| Value::Decimal(d.to_string())),
        "TEXT[]" | "VARCHAR[]" => array(row, index, Value::Text),
        "UUID[]" => array(row, index, Value::Uuid),
        other => text_fallback(row, index, other),
    }
}

/// Column names of a fetched row
pub fn row_columns(row: &PgRow) -> Vec<String> {
    row.columns()
        .iter()
        .map(|column| column.name().to_string())
        .collect()
}

/// Column names a prepared statement will return
pub fn statement_columns(statement: &PgStatement<'_>) -> Vec<String> {
    statement
        .columns()
        .iter()
        .map(|column| column.name().to_string())
        .collect()
}

/// Fetched rows as a cursor over `columns`
pub fn buffer_rows(columns: Vec<String>, rows: Vec<PgRow>) -> Result<BufferedCursor, MapError> {
    let values = rows
        .iter()
        .map(|row| {
            (0..row.len())
                .map(|index| decode_column(row, index))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(MapError::database)?;

    Ok(BufferedCursor::new(columns, values))
}

pub fn exec_result(result: PgQueryResult) -> ExecResult {
    ExecResult {
        rows_affected: result.rows_affected(),
        last_insert_id: None,
    }
}
