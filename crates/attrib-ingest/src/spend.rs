//! Spend source adapter
//!
//! Reshapes a raw ad-spend export into canonical daily spend records. This
//! source has a real calendar date, so no timeline synthesis is involved;
//! the mandatory field is the date itself.

use crate::raw::RawTable;
use attrib_common::slug::slugify;
use attrib_common::taxonomy::SynonymTable;
use attrib_common::types::CanonicalSpend;
use attrib_common::Result;
use chrono::NaiveDate;
use std::path::Path;
use tracing::{info, warn};

/// Columns the adapter expects from a spend export
pub const EXPECTED_COLUMNS: [&str; 4] =
    ["Campaign_Type", "Channel_Used", "Acquisition_Cost", "Date"];

/// Date renderings seen across spend providers, tried in order
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Ingest a raw spend export and write the canonical spend batch
pub async fn ingest(input: &str, output: &str) -> Result<()> {
    let table = RawTable::load(input)?;
    let missing = table.check_expected_columns(&EXPECTED_COLUMNS);
    if missing.iter().any(|name| name == "Acquisition_Cost") {
        warn!("No Acquisition_Cost column; defaulting cost to 0");
    }

    let batch = normalize(&table);
    write_batch(output, &batch)?;

    info!(path = output, rows = batch.len(), "Wrote canonical spend");
    Ok(())
}

/// Normalize raw spend rows into canonical records.
///
/// Unparseable costs are coerced to 0 (never absent); rows without a
/// parseable date are dropped, with before/after counts logged.
pub fn normalize(table: &RawTable) -> Vec<CanonicalSpend> {
    let synonyms = SynonymTable::default();
    let before = table.len();

    let batch: Vec<CanonicalSpend> = table
        .rows()
        .filter_map(|row| {
            let date = parse_date(row.get("Date"))?;
            let (utm_source, utm_medium) =
                synonyms.classify(row.get("Channel_Used"), row.get("Campaign_Type"));
            Some(CanonicalSpend {
                date,
                utm_source,
                utm_medium,
                utm_campaign: slugify(row.get("Campaign_Type")),
                cost: parse_cost(row.get("Acquisition_Cost")),
            })
        })
        .collect();

    info!(
        rows_before = before,
        rows_after = batch.len(),
        "Dropped rows missing mandatory fields"
    );
    batch
}

/// Parse a calendar date, trying each known provider format
fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?;
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

/// Parse a cost value; absent, unparseable, non-finite, and negative
/// values all coerce to 0 so the invariant `cost >= 0` holds everywhere
fn parse_cost(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .map(|n| n.max(0.0))
        .unwrap_or(0.0)
}

/// Write the canonical batch as a CSV artifact
fn write_batch(output: &str, batch: &[CanonicalSpend]) -> Result<()> {
    if let Some(parent) = Path::new(output).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut writer = csv::Writer::from_path(output)?;
    for record in batch {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
