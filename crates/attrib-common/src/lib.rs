//! Attrib Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types and utilities for the attrib pipeline.
//!
//! # Overview
//!
//! This crate provides the functionality shared by the ingest and warehouse
//! workspace members:
//!
//! - **Error Handling**: Custom error and result types
//! - **Logging**: Centralized tracing subscriber configuration
//! - **Types**: The canonical event and spend record schema
//! - **Taxonomy**: Channel-to-UTM classification rules
//! - **Slug**: Campaign name normalization
//!
//! # Example
//!
//! ```no_run
//! use attrib_common::taxonomy::SynonymTable;
//! use attrib_common::slug::slugify;
//!
//! let table = SynonymTable::default();
//! let (source, medium) = table.classify(Some("Facebook"), Some("Email Blast!"));
//! assert_eq!((source.as_str(), medium.as_str()), ("meta", "cpc"));
//! assert_eq!(slugify(Some("Email Blast!")), "email_blast");
//! ```

pub mod error;
pub mod logging;
pub mod slug;
pub mod taxonomy;
pub mod types;

// Re-export commonly used types
pub use error::{AttribError, Result};
