//! Identity and timeline synthesis
//!
//! Interaction exports carry no timestamps, no event types, and no event
//! identifiers. Everything here derives those fields deterministically so
//! re-running the pipeline on unchanged input reproduces the output byte
//! for byte.

use attrib_common::types::EventType;
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Deterministic timeline configuration.
///
/// Events are assigned `start + index * step` after a stable sort by user
/// id, giving a strict, reproducible, collision-free ordering.
#[derive(Debug, Clone, Copy)]
pub struct Timeline {
    pub start: NaiveDateTime,
    pub step_minutes: i64,
}

impl Default for Timeline {
    fn default() -> Self {
        // 2021-01-01 is a valid calendar date, so the unwrap cannot fire
        #[allow(clippy::unwrap_used)]
        let start = NaiveDate::from_ymd_opt(2021, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Self {
            start,
            step_minutes: 7,
        }
    }
}

impl Timeline {
    /// Timestamp for the row at `index` in the sorted batch
    pub fn timestamp(&self, index: usize) -> NaiveDateTime {
        self.start + Duration::minutes(self.step_minutes * index as i64)
    }
}

/// Parse a conversion indicator.
///
/// Accepts textual true/yes/y/1 and anything that parses to the number
/// 1.0. Absent or unparseable values are false, never a skip.
pub fn parse_flag(raw: Option<&str>) -> bool {
    let Some(raw) = raw else { return false };
    let value = raw.trim().to_lowercase();
    match value.as_str() {
        "true" | "yes" | "y" | "1" => true,
        _ => value.parse::<f64>().map(|n| n == 1.0).unwrap_or(false),
    }
}

/// Parse a numeric counter; absent, unparseable, and non-finite values are 0
pub fn parse_count(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

/// Infer the event type by precedence:
/// conversion flag > engagement counters > default.
pub fn infer_event_type(
    conversion: Option<&str>,
    email_opens: Option<&str>,
    email_clicks: Option<&str>,
) -> EventType {
    if parse_flag(conversion) {
        EventType::Purchase
    } else if parse_count(email_opens) > 0.0 || parse_count(email_clicks) > 0.0 {
        EventType::Signup
    } else {
        EventType::PageView
    }
}
