//! Warehouse loader
//!
//! Truncate-and-reload protocol: canonical identifiers are regenerated
//! deterministically on every run, so a full reload is idempotent and
//! leaves no stale or duplicate rows behind. Each table loads in a single
//! transaction (TRUNCATE, then bulk inserts, then COMMIT); a failure rolls
//! that table back and propagates. Cross-table atomicity is not promised.

use anyhow::{Context, Result};
use attrib_common::types::{CanonicalEvent, CanonicalSpend};
use sqlx::postgres::PgConnection;
use sqlx::{Connection, Postgres, QueryBuilder};
use std::path::Path;
use tracing::info;

/// Warehouse table for canonical events
pub const EVENTS_TABLE: &str = "raw.raw_web_events";

/// Warehouse table for canonical spend
pub const SPEND_TABLE: &str = "raw.ad_spend";

/// Rows per INSERT statement. Events bind 10 parameters per row, and
/// Postgres caps a statement at 65535 binds, so 500 leaves ample headroom.
const INSERT_CHUNK_ROWS: usize = 500;

/// Execute the schema-definition script. The script is idempotent
/// (`CREATE SCHEMA/TABLE IF NOT EXISTS`), so running it against an
/// existing warehouse is safe.
pub async fn run_ddl(conn: &mut PgConnection, path: &str) -> Result<()> {
    let sql = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema script '{}'", path))?;
    sqlx::raw_sql(&sql)
        .execute(&mut *conn)
        .await
        .with_context(|| format!("Failed to execute schema script '{}'", path))?;
    info!(path, "Executed schema script");
    Ok(())
}

/// Read a canonical event artifact
pub fn read_events(path: &str) -> Result<Vec<CanonicalEvent>> {
    read_batch(path)
}

/// Read a canonical spend artifact
pub fn read_spend(path: &str) -> Result<Vec<CanonicalSpend>> {
    read_batch(path)
}

fn read_batch<T: serde::de::DeserializeOwned>(path: &str) -> Result<Vec<T>> {
    if !Path::new(path).exists() {
        anyhow::bail!("Missing canonical artifact '{}'; run the ingest stage first", path);
    }
    let mut reader = csv::Reader::from_path(path)?;
    reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()
        .with_context(|| format!("Failed to parse canonical artifact '{}'", path))
}

fn insert_prefix(table: &str, columns: &[&str]) -> String {
    format!("INSERT INTO {} ({}) ", table, columns.join(", "))
}

/// Load canonical events into the warehouse (one transaction)
pub async fn load_events(conn: &mut PgConnection, batch: &[CanonicalEvent]) -> Result<()> {
    let mut tx = conn.begin().await?;

    sqlx::query(&format!("TRUNCATE {}", EVENTS_TABLE))
        .execute(&mut *tx)
        .await?;

    for chunk in batch.chunks(INSERT_CHUNK_ROWS) {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(insert_prefix(EVENTS_TABLE, &CanonicalEvent::COLUMNS));
        builder.push_values(chunk, |mut row, event| {
            row.push_bind(&event.event_id)
                .push_bind(&event.user_id)
                .push_bind(event.event_ts)
                .push_bind(event.event_type.to_string())
                .push_bind(&event.utm_source)
                .push_bind(&event.utm_medium)
                .push_bind(&event.utm_campaign)
                .push_bind(&event.referrer)
                .push_bind(&event.page_url)
                .push_bind(event.revenue);
        });
        builder.build().execute(&mut *tx).await?;
    }

    tx.commit().await?;
    info!(table = EVENTS_TABLE, rows = batch.len(), "Loaded canonical events");
    Ok(())
}

/// Load canonical spend into the warehouse (one transaction)
pub async fn load_spend(conn: &mut PgConnection, batch: &[CanonicalSpend]) -> Result<()> {
    let mut tx = conn.begin().await?;

    sqlx::query(&format!("TRUNCATE {}", SPEND_TABLE))
        .execute(&mut *tx)
        .await?;

    for chunk in batch.chunks(INSERT_CHUNK_ROWS) {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(insert_prefix(SPEND_TABLE, &CanonicalSpend::COLUMNS));
        builder.push_values(chunk, |mut row, record| {
            row.push_bind(record.date)
                .push_bind(&record.utm_source)
                .push_bind(&record.utm_medium)
                .push_bind(&record.utm_campaign)
                .push_bind(record.cost);
        });
        builder.build().execute(&mut *tx).await?;
    }

    tx.commit().await?;
    info!(table = SPEND_TABLE, rows = batch.len(), "Loaded canonical spend");
    Ok(())
}

/// Row count of a warehouse table
pub async fn count_rows(conn: &mut PgConnection, table: &str) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}

/// Run the full load stage: schema script, then both tables, then a count
/// readback of what landed.
pub async fn run(
    conn: &mut PgConnection,
    ddl_path: &str,
    events_path: &str,
    spend_path: &str,
) -> Result<()> {
    run_ddl(conn, ddl_path).await?;

    let events = read_events(events_path)?;
    load_events(conn, &events).await?;

    let spend = read_spend(spend_path)?;
    load_spend(conn, &spend).await?;

    let event_count = count_rows(conn, EVENTS_TABLE).await?;
    let spend_count = count_rows(conn, SPEND_TABLE).await?;
    info!(
        events = event_count,
        spend = spend_count,
        "Load complete"
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_insert_prefix_preserves_column_order() {
        assert_eq!(
            insert_prefix(SPEND_TABLE, &CanonicalSpend::COLUMNS),
            "INSERT INTO raw.ad_spend (date, utm_source, utm_medium, utm_campaign, cost) "
        );
        assert!(insert_prefix(EVENTS_TABLE, &CanonicalEvent::COLUMNS)
            .starts_with("INSERT INTO raw.raw_web_events (event_id, user_id, event_ts,"));
    }

    #[test]
    fn test_read_events_round_trips_artifact() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "event_id,user_id,event_ts,event_type,utm_source,utm_medium,utm_campaign,referrer,page_url,revenue"
        )
        .unwrap();
        writeln!(
            file,
            "abc123,7,2021-01-01 00:07:00,signup,meta,cpc,email_blast,,,"
        )
        .unwrap();

        let batch = read_events(file.path().to_str().unwrap()).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].user_id, "7");
        assert_eq!(batch[0].revenue, None);
    }

    #[test]
    fn test_read_spend_missing_artifact_is_fatal() {
        let err = read_spend("/nonexistent/ad_spend.csv").unwrap_err();
        assert!(err.to_string().contains("run the ingest stage first"));
    }
}
