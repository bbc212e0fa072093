//! Attrib Warehouse Library
//!
//! Loads canonical batches into the Postgres warehouse and probes the
//! result.
//!
//! # Components
//!
//! - **config**: environment-based warehouse settings
//! - **db**: single exclusive connection per run (no pooling; execution is
//!   strictly sequential)
//! - **loader**: idempotent DDL + truncate-and-bulk-insert per table
//! - **verify**: read-only row-count probes
//! - **run_sql**: execute arbitrary SQL files in order

pub mod config;
pub mod db;
pub mod loader;
pub mod run_sql;
pub mod verify;

pub use config::WarehouseConfig;
pub use db::{connect, DbError, DbResult};
