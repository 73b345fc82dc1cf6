//! Transactions
//!
//! [`Tx`] runs every statement on one `sqlx` transaction. Dropping it without
//! calling [`Tx::commit`] rolls the transaction back.

use async_trait::async_trait;
use row_mapper::{Binder, BufferedCursor, ExecResult, Execer, MapError, Queryer};
use sqlx::{Postgres, Transaction};
use std::fmt::Debug;
use tokio::sync::Mutex;
use type_mapping::Value;

use crate::core::{fetch, log_statement, run};
use crate::errors::RowmapError;

/// Open transaction that rows can be mapped from
pub struct Tx {
    // Statements borrow the connection mutably; the lock lets them take `&self`
    inner: Mutex<Transaction<'static, Postgres>>,
    driver_name: String,
    log_queries: bool,
}

impl Debug for Tx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tx")
            .field("driver_name", &self.driver_name)
            .field("log_queries", &self.log_queries)
            .finish()
    }
}

impl Tx {
    pub(crate) fn new(
        transaction: Transaction<'static, Postgres>,
        driver_name: String,
        log_queries: bool,
    ) -> Self {
        Self {
            inner: Mutex::new(transaction),
            driver_name,
            log_queries,
        }
    }

    pub async fn commit(self) -> Result<(), RowmapError> {
        self.inner.into_inner().commit().await?;
        Ok(())
    }

    pub async fn rollback(self) -> Result<(), RowmapError> {
        self.inner.into_inner().rollback().await?;
        Ok(())
    }
}

impl_mapping_methods!(Tx);

#[async_trait]
impl Queryer for Tx {
    type Cursor = BufferedCursor;

    async fn query(&self, sql: &str, args: Vec<Value>) -> Result<BufferedCursor, MapError> {
        log_statement(self.log_queries, sql, &args);
        let mut transaction = self.inner.lock().await;
        fetch(&mut **transaction, sql, args).await
    }
}

#[async_trait]
impl Execer for Tx {
    async fn execute(&self, sql: &str, args: Vec<Value>) -> Result<ExecResult, MapError> {
        log_statement(self.log_queries, sql, &args);
        let mut transaction = self.inner.lock().await;
        run(&mut **transaction, sql, args).await
    }
}

impl Binder for Tx {
    fn driver_name(&self) -> &str {
        &self.driver_name
    }
}
