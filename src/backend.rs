//! Storage backends
//!
//! [`SqlBackend`] is the only thing the entity store needs from a database:
//! run a statement with positional `?` binds and hand back rows or an
//! outcome. [`SqliteBackend`] implements it on an sqlx SQLite pool.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{
    SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::{Column, Row as _, Sqlite, TypeInfo, ValueRef};

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::sql::Statement;
use crate::types::{Row, SqlValue};

/// Result of a statement that does not return rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOutcome {
    pub rows_affected: u64,
    /// Row id of the last inserted row, when the backend reports one
    pub last_insert_id: Option<i64>,
}

/// Relational store reachable through positional `?` statements
///
/// Every call runs in autocommit mode except [`SqlBackend::execute_in_transaction`].
#[async_trait]
pub trait SqlBackend: Send + Sync {
    /// Run a query and return its rows
    async fn fetch(&self, statement: &Statement) -> Result<Vec<Row>>;

    /// Run a statement that returns no rows
    async fn execute(&self, statement: &Statement) -> Result<ExecOutcome>;

    /// Run all statements in one transaction; returns total rows affected
    async fn execute_in_transaction(&self, statements: &[Statement]) -> Result<u64>;
}

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// SQLite backend over an sqlx pool
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    pool: SqlitePool,
}

impl SqliteBackend {
    /// Connect using the configuration's URL and pool size
    ///
    /// In-memory databases exist per connection, so they are pinned to a
    /// single connection that is never recycled.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.database_url)
            .map_err(|e| StoreError::Connection(format!("Invalid database URL: {}", e)))?
            .create_if_missing(true);

        let pool_options = if config.is_in_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections)
        };

        let pool = pool_options.connect_with(options).await.map_err(|e| {
            StoreError::Connection(format!("Database connection failed: {}", e))
        })?;

        tracing::info!(
            url = %config.database_url,
            in_memory = config.is_in_memory(),
            "connected to sqlite"
        );

        Ok(Self { pool })
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn build_query(statement: &Statement) -> SqliteQuery<'_> {
        statement
            .binds
            .iter()
            .fold(sqlx::query(&statement.sql), Self::bind_value)
    }

    fn bind_value<'q>(query: SqliteQuery<'q>, value: &'q SqlValue) -> SqliteQuery<'q> {
        match value {
            SqlValue::Null => query.bind(None::<i64>),
            SqlValue::Bool(b) => query.bind(*b),
            SqlValue::Integer(i) => query.bind(*i),
            SqlValue::Real(f) => query.bind(*f),
            SqlValue::Text(s) => query.bind(s.as_str()),
        }
    }
}

#[async_trait]
impl SqlBackend for SqliteBackend {
    async fn fetch(&self, statement: &Statement) -> Result<Vec<Row>> {
        tracing::debug!(sql = %statement.sql, binds = ?statement.binds, "fetch");
        let rows = Self::build_query(statement).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_from_sqlite).collect())
    }

    async fn execute(&self, statement: &Statement) -> Result<ExecOutcome> {
        tracing::debug!(sql = %statement.sql, binds = ?statement.binds, "execute");
        let result = Self::build_query(statement).execute(&self.pool).await?;
        Ok(ExecOutcome {
            rows_affected: result.rows_affected(),
            last_insert_id: Some(result.last_insert_rowid()),
        })
    }

    async fn execute_in_transaction(&self, statements: &[Statement]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut affected = 0;
        for statement in statements {
            tracing::debug!(sql = %statement.sql, binds = ?statement.binds, "execute (tx)");
            let result = Self::build_query(statement).execute(&mut *tx).await?;
            affected += result.rows_affected();
        }
        tx.commit().await?;
        Ok(affected)
    }
}

fn row_from_sqlite(row: &SqliteRow) -> Row {
    row.columns()
        .iter()
        .map(|col| {
            let declared = col.type_info().name().to_uppercase();
            (col.name().to_string(), cell_to_value(row, col.ordinal(), &declared))
        })
        .collect()
}

/// Decode one cell by its storage class; BOOLEAN columns come back as `Bool`
fn cell_to_value(row: &SqliteRow, index: usize, declared: &str) -> SqlValue {
    let storage = match row.try_get_raw(index) {
        Ok(raw) if raw.is_null() => return SqlValue::Null,
        Ok(raw) => raw.type_info().name().to_uppercase(),
        Err(_) => return SqlValue::Null,
    };

    match storage.as_str() {
        "INTEGER" | "BOOLEAN" | "NUMERIC" => {
            let Ok(i) = row.try_get_unchecked::<i64, _>(index) else {
                return SqlValue::Null;
            };
            if declared == "BOOLEAN" || storage == "BOOLEAN" {
                SqlValue::Bool(i != 0)
            } else {
                SqlValue::Integer(i)
            }
        }
        "REAL" => row
            .try_get_unchecked::<f64, _>(index)
            .map(SqlValue::Real)
            .unwrap_or(SqlValue::Null),
        "BLOB" => row
            .try_get_unchecked::<Vec<u8>, _>(index)
            .map(|bytes| SqlValue::Text(String::from_utf8_lossy(&bytes).into_owned()))
            .unwrap_or(SqlValue::Null),
        _ => row
            .try_get_unchecked::<String, _>(index)
            .map(SqlValue::Text)
            .unwrap_or(SqlValue::Null),
    }
}
