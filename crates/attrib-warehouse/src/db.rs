//! Warehouse connection handling
//!
//! Each pipeline run holds exactly one exclusive connection; there is no
//! pool and no concurrent transaction. The loader's per-table transactions
//! and the reporter's probes all share this handle sequentially.

use crate::config::WarehouseConfig;
use sqlx::postgres::PgConnection;
use sqlx::Connection;
use thiserror::Error;
use tracing::debug;

/// Database operation errors with contextual information
#[derive(Error, Debug)]
pub enum DbError {
    /// SQL query or connection error
    #[error("Database query failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Warehouse configuration is invalid or missing
    #[error("Database configuration error: {0}. Check DATABASE_URL and connection settings.")]
    Config(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Open the run's exclusive warehouse connection
pub async fn connect(config: &WarehouseConfig) -> DbResult<PgConnection> {
    config
        .validate()
        .map_err(|e| DbError::Config(e.to_string()))?;

    debug!(host = %config.host, dbname = %config.dbname, "Connecting to warehouse");
    let conn = PgConnection::connect(&config.connection_url()).await?;
    Ok(conn)
}
