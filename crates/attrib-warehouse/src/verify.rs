//! Verification reporter
//!
//! Post-load sanity check: a fixed list of row-count probes over the
//! warehouse tables. Read-only; never mutates state.

use crate::loader::{count_rows, EVENTS_TABLE, SPEND_TABLE};
use anyhow::Result;
use sqlx::postgres::PgConnection;
use tracing::info;

/// Tables probed by the reporter
pub const PROBED_TABLES: [&str; 2] = [EVENTS_TABLE, SPEND_TABLE];

/// Count rows in every probed table
pub async fn run(conn: &mut PgConnection) -> Result<Vec<(String, i64)>> {
    let mut counts = Vec::with_capacity(PROBED_TABLES.len());
    for table in PROBED_TABLES {
        let count = count_rows(conn, table).await?;
        info!(table, count, "Row count");
        counts.push((table.to_string(), count));
    }
    Ok(counts)
}
