//! `run-sql` subcommand
//!
//! Executes SQL files against the warehouse in argument order, stopping at
//! the first failure. Used to run the downstream mart scripts this
//! pipeline feeds.

use anyhow::{Context, Result};
use sqlx::postgres::PgConnection;
use tracing::info;

/// Execute each SQL file in order
pub async fn run(conn: &mut PgConnection, files: &[String]) -> Result<()> {
    for path in files {
        let sql = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read SQL file '{}'", path))?;
        sqlx::raw_sql(&sql)
            .execute(&mut *conn)
            .await
            .with_context(|| format!("Failed to execute SQL file '{}'", path))?;
        info!(path, "Executed SQL file");
    }
    Ok(())
}
