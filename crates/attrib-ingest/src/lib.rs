//! Attrib Ingest Library
//!
//! Source adapters that reshape provider exports into the canonical
//! analytics schema.
//!
//! # Supported Data Sources
//!
//! - **Events**: user-interaction exports (engagement counters, conversion
//!   flags) without timestamps; the adapter synthesizes a deterministic
//!   timeline and content-hashed identifiers
//! - **Spend**: daily ad-spend exports keyed by campaign and date
//!
//! # Example
//!
//! ```no_run
//! use attrib_ingest::events;
//!
//! #[tokio::main]
//! async fn main() -> attrib_common::Result<()> {
//!     // Reshape a raw interaction export into canonical events
//!     events::ingest("data/raw_kaggle/events_source.csv", "data/events.csv").await?;
//!     Ok(())
//! }
//! ```

pub mod columns;
pub mod events;
pub mod spend;
pub mod synthesize;

mod raw;

pub use raw::RawTable;
