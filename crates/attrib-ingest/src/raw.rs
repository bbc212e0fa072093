//! Raw provider table access
//!
//! Provider exports share no schema; columns come and go between vendors.
//! [`RawTable`] loads a CSV once and hands out rows addressed by column
//! name, where an absent column and an empty cell both read as `None`.

use attrib_common::{AttribError, Result};
use csv::StringRecord;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// A raw tabular input with by-name cell access
#[derive(Debug)]
pub struct RawTable {
    index: HashMap<String, usize>,
    rows: Vec<StringRecord>,
}

impl RawTable {
    /// Load a raw CSV file.
    ///
    /// A missing file is fatal; variable schemas are not — any column set
    /// is accepted here and validated per adapter via
    /// [`RawTable::check_expected_columns`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AttribError::InputMissing(path.display().to_string()));
        }

        let mut reader = csv::Reader::from_path(path)?;
        let index = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim().to_string(), i))
            .collect();
        let rows = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;

        info!(path = %path.display(), rows = rows.len(), "Loaded raw table");
        Ok(Self { index, rows })
    }

    /// Warn (non-fatally) about expected columns the export does not carry.
    ///
    /// Returns the missing names so adapters can adjust their fallbacks.
    pub fn check_expected_columns(&self, expected: &[&str]) -> Vec<String> {
        let missing: Vec<String> = expected
            .iter()
            .filter(|name| !self.index.contains_key(**name))
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            warn!(
                missing = ?missing,
                "Missing expected columns; proceeding best-effort"
            );
        }
        missing
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate rows with by-name access
    pub fn rows(&self) -> impl Iterator<Item = RawRow<'_>> {
        self.rows.iter().map(move |record| RawRow {
            index: &self.index,
            record,
        })
    }
}

/// One row of a [`RawTable`]
#[derive(Debug, Clone, Copy)]
pub struct RawRow<'a> {
    index: &'a HashMap<String, usize>,
    record: &'a StringRecord,
}

impl<'a> RawRow<'a> {
    /// Cell value by column name; absent columns and blank cells are `None`
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let i = *self.index.get(column)?;
        let value = self.record.get(i)?.trim();
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}
