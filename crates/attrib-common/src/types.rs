//! Canonical record types for the attrib pipeline
//!
//! The pipeline reshapes variable provider exports into exactly two shapes:
//! [`CanonicalEvent`] rows and [`CanonicalSpend`] rows. Both are re-derived
//! fresh on every run; nothing here carries persisted identity between runs.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Timestamp rendering used for both the canonical CSV artifact and the
/// `event_id` preimage. Changing it changes every derived identifier.
pub const EVENT_TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Inferred event type, chosen by precedence:
/// conversion flag > engagement counters > default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Purchase,
    Signup,
    PageView,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventType::Purchase => write!(f, "purchase"),
            EventType::Signup => write!(f, "signup"),
            EventType::PageView => write!(f, "page_view"),
        }
    }
}

/// A normalized user-interaction event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEvent {
    pub event_id: String,
    pub user_id: String,
    #[serde(with = "event_ts_serde")]
    pub event_ts: NaiveDateTime,
    pub event_type: EventType,
    pub utm_source: String,
    pub utm_medium: String,
    pub utm_campaign: String,
    pub referrer: Option<String>,
    pub page_url: Option<String>,
    pub revenue: Option<f64>,
}

impl CanonicalEvent {
    /// Warehouse column order for `raw.raw_web_events`
    pub const COLUMNS: [&'static str; 10] = [
        "event_id",
        "user_id",
        "event_ts",
        "event_type",
        "utm_source",
        "utm_medium",
        "utm_campaign",
        "referrer",
        "page_url",
        "revenue",
    ];

    /// Derive the deterministic event identifier.
    ///
    /// `event_id = hex(sha256(user_id | "|" | event_ts | "|" | utm_campaign))`,
    /// so re-running the pipeline on unchanged input reproduces identifiers
    /// byte for byte.
    pub fn derive_id(user_id: &str, event_ts: NaiveDateTime, utm_campaign: &str) -> String {
        let ts = event_ts.format(EVENT_TS_FORMAT);
        let preimage = format!("{}|{}|{}", user_id, ts, utm_campaign);
        let mut hasher = Sha256::new();
        hasher.update(preimage.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// A normalized daily ad-spend record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalSpend {
    pub date: NaiveDate,
    pub utm_source: String,
    pub utm_medium: String,
    pub utm_campaign: String,
    pub cost: f64,
}

impl CanonicalSpend {
    /// Warehouse column order for `raw.ad_spend`
    pub const COLUMNS: [&'static str; 5] =
        ["date", "utm_source", "utm_medium", "utm_campaign", "cost"];
}

mod event_ts_serde {
    use super::EVENT_TS_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&ts.format(EVENT_TS_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, EVENT_TS_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, EVENT_TS_FORMAT).unwrap()
    }

    #[test]
    fn test_event_id_deterministic() {
        let a = CanonicalEvent::derive_id("7", ts("2021-01-01 00:07:00"), "email_blast");
        let b = CanonicalEvent::derive_id("7", ts("2021-01-01 00:07:00"), "email_blast");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_event_id_sensitive_to_each_input() {
        let base = CanonicalEvent::derive_id("7", ts("2021-01-01 00:07:00"), "email_blast");
        assert_ne!(
            base,
            CanonicalEvent::derive_id("8", ts("2021-01-01 00:07:00"), "email_blast")
        );
        assert_ne!(
            base,
            CanonicalEvent::derive_id("7", ts("2021-01-01 00:14:00"), "email_blast")
        );
        assert_ne!(
            base,
            CanonicalEvent::derive_id("7", ts("2021-01-01 00:07:00"), "seo_push")
        );
    }

    #[test]
    fn test_event_type_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&EventType::PageView).unwrap(), "\"page_view\"");
        assert_eq!(EventType::Signup.to_string(), "signup");
    }

    #[test]
    fn test_canonical_event_csv_round_trip() {
        let event = CanonicalEvent {
            event_id: CanonicalEvent::derive_id("7", ts("2021-01-01 00:00:00"), "email_blast"),
            user_id: "7".to_string(),
            event_ts: ts("2021-01-01 00:00:00"),
            event_type: EventType::Signup,
            utm_source: "meta".to_string(),
            utm_medium: "cpc".to_string(),
            utm_campaign: "email_blast".to_string(),
            referrer: None,
            page_url: None,
            revenue: None,
        };

        let mut writer = csv::Writer::from_writer(vec![]);
        writer.serialize(&event).unwrap();
        let bytes = writer.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("2021-01-01 00:00:00"));
        assert!(text.contains("signup"));

        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let back: CanonicalEvent = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_canonical_spend_columns_order() {
        assert_eq!(CanonicalSpend::COLUMNS[0], "date");
        assert_eq!(CanonicalSpend::COLUMNS[4], "cost");
        let spend = CanonicalSpend {
            date: NaiveDate::from_ymd_opt(2023, 5, 1).unwrap(),
            utm_source: "google".to_string(),
            utm_medium: "cpc".to_string(),
            utm_campaign: "seo_push".to_string(),
            cost: 0.0,
        };
        let mut writer = csv::Writer::from_writer(vec![]);
        writer.serialize(&spend).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(text.lines().next().unwrap(), "date,utm_source,utm_medium,utm_campaign,cost");
    }
}
