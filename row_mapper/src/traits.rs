//! Capabilities the row mapper needs from a database access layer
//!
//! Connections, pools and transactions implement these; everything else in
//! this crate is written against them.

use crate::bind::{self, BindType};
use crate::cursor::Cursor;
use crate::errors::MapError;
use async_trait::async_trait;
use field_map::{Params, Value};
use std::collections::HashMap;

/// Summary of a command that returns no rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    pub rows_affected: u64,
    /// Only reported by drivers that support it
    pub last_insert_id: Option<i64>,
}

/// Can run a query and hand back a cursor over its rows
#[async_trait]
pub trait Queryer: Send + Sync {
    type Cursor: Cursor;

    async fn query(&self, sql: &str, args: Vec<Value>) -> Result<Self::Cursor, MapError>;
}

/// Can run a command
#[async_trait]
pub trait Execer: Send + Sync {
    async fn execute(&self, sql: &str, args: Vec<Value>) -> Result<ExecResult, MapError>;
}

/// Rewrites queries into the driver's placeholder syntax
pub trait Binder {
    fn driver_name(&self) -> &str;

    fn bind_type(&self) -> BindType {
        BindType::from_driver(self.driver_name())
    }

    fn rebind(&self, sql: &str) -> String {
        bind::rebind(self.bind_type(), sql)
    }

    fn bind_map(
        &self,
        sql: &str,
        args: &HashMap<String, Value>,
    ) -> Result<(String, Vec<Value>), MapError> {
        bind::bind_map(self.bind_type(), sql, args)
    }

    fn bind_params<P: Params>(&self, sql: &str, params: &P) -> Result<(String, Vec<Value>), MapError>
    where
        Self: Sized,
    {
        bind::bind_params(self.bind_type(), sql, params)
    }
}

/// Can bind, query and execute
pub trait Ext: Binder + Queryer + Execer {}

impl<T> Ext for T where T: Binder + Queryer + Execer {}
