//! PostgreSQL collaborator
//!
//! [`Db`] wraps an `sqlx` pool and implements the row mapper's capabilities.
//! Every result is fetched in full and handed out as a buffered cursor.

use async_trait::async_trait;
use row_mapper::{Binder, BufferedCursor, ExecResult, Execer, MapError, Queryer};
use sqlx::{Executor, PgConnection, PgPool};
use std::time::Duration;
use type_mapping::Value;

use crate::errors::RowmapError;
use crate::pg;
use crate::tx::Tx;
use config::{AppConfig, DatabaseConfig, MapperConfig};

/// Connection pool that rows can be mapped from
#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
    driver_name: String,
    log_queries: bool,
}

impl Db {
    /// Connect with the given settings and check the connection
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, RowmapError> {
        let connection_string = config.connection_string();

        let mut pool_options = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds));

        // Set max lifetime if specified
        if config.max_lifetime_seconds > 0 {
            pool_options =
                pool_options.max_lifetime(Duration::from_secs(config.max_lifetime_seconds));
        }

        let pool = pool_options.connect(&connection_string).await?;
        crate::debug_log!("connected to {}:{}/{}", config.host, config.port, config.database);

        let db = Self::from_pool(pool);
        db.ping().await?;
        Ok(db)
    }

    /// Connect using a full application configuration
    pub async fn from_config(config: &AppConfig) -> Result<Self, RowmapError> {
        Ok(Self::connect(&config.database)
            .await?
            .with_mapper_config(&config.mapper))
    }

    /// Connect using [`AppConfig::load`]
    pub async fn from_env() -> Result<Self, RowmapError> {
        let config = AppConfig::load()?;
        Self::from_config(&config).await
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        let mapper = MapperConfig::default();
        Self {
            pool,
            driver_name: mapper.driver_name,
            log_queries: mapper.log_queries,
        }
    }

    pub fn with_mapper_config(mut self, mapper: &MapperConfig) -> Self {
        self.driver_name = mapper.driver_name.clone();
        self.log_queries = mapper.log_queries;
        self
    }

    /// Get database pool reference
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database connection health
    pub async fn ping(&self) -> Result<(), RowmapError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Start a transaction
    pub async fn begin(&self) -> Result<Tx, RowmapError> {
        let transaction = self.pool.begin().await?;
        Ok(Tx::new(
            transaction,
            self.driver_name.clone(),
            self.log_queries,
        ))
    }
}

impl_mapping_methods!(Db);

pub(crate) fn log_statement(enabled: bool, sql: &str, args: &[Value]) {
    if enabled {
        tracing::debug!(query = sql, args = args.len(), "sending statement");
    }
}

/// Run a query on one connection and buffer its rows
///
/// Column names come from the statement, so an empty result still reports
/// the columns it would have had.
pub(crate) async fn fetch(
    conn: &mut PgConnection,
    sql: &str,
    args: Vec<Value>,
) -> Result<BufferedCursor, MapError> {
    let rows = pg::bind_all(sqlx::query(sql), args)
        .fetch_all(&mut *conn)
        .await
        .map_err(MapError::database)?;

    let columns = match rows.first() {
        Some(row) => pg::row_columns(row),
        // The query above left the statement in this connection's cache
        None => {
            let statement = (&mut *conn)
                .prepare(sql)
                .await
                .map_err(MapError::database)?;
            pg::statement_columns(&statement)
        }
    };
    pg::buffer_rows(columns, rows)
}

/// Run a command on any Postgres executor
pub(crate) async fn run<'c, X>(
    executor: X,
    sql: &str,
    args: Vec<Value>,
) -> Result<ExecResult, MapError>
where
    X: sqlx::PgExecutor<'c>,
{
    let result = pg::bind_all(sqlx::query(sql), args)
        .execute(executor)
        .await
        .map_err(MapError::database)?;
    Ok(pg::exec_result(result))
}

#[async_trait]
impl Queryer for Db {
    type Cursor = BufferedCursor;

    async fn query(&self, sql: &str, args: Vec<Value>) -> Result<BufferedCursor, MapError> {
        log_statement(self.log_queries, sql, &args);
        let mut conn = self.pool.acquire().await.map_err(MapError::database)?;
        fetch(&mut conn, sql, args).await
    }
}

#[async_trait]
impl Execer for Db {
    async fn execute(&self, sql: &str, args: Vec<Value>) -> Result<ExecResult, MapError> {
        log_statement(self.log_queries, sql, &args);
        run(&self.pool, sql, args).await
    }
}

impl Binder for Db {
    fn driver_name(&self) -> &str {
        &self.driver_name
    }
}
