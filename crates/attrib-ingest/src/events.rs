//! Events source adapter
//!
//! Reshapes a raw user-interaction export into canonical events. The source
//! carries no timestamps or event identifiers, so both are synthesized
//! deterministically (see [`crate::synthesize`]).

use crate::raw::RawTable;
use crate::synthesize::{infer_event_type, Timeline};
use attrib_common::slug::slugify;
use attrib_common::taxonomy::SynonymTable;
use attrib_common::types::CanonicalEvent;
use attrib_common::Result;
use std::path::Path;
use tracing::info;

/// Columns the adapter expects from an interaction export. Gaps are warned
/// about, not fatal; downstream fields then fall back to defaults.
pub const EXPECTED_COLUMNS: [&str; 7] = [
    "CustomerID",
    "CampaignChannel",
    "CampaignType",
    "EmailOpens",
    "EmailClicks",
    "AdvertisingPlatform",
    "Conversion",
];

/// Ingest a raw interaction export and write the canonical event batch
pub async fn ingest(input: &str, output: &str) -> Result<()> {
    let table = RawTable::load(input)?;
    table.check_expected_columns(&EXPECTED_COLUMNS);

    let batch = normalize(&table, Timeline::default());
    write_batch(output, &batch)?;

    info!(path = output, rows = batch.len(), "Wrote canonical events");
    Ok(())
}

/// Raw fields pulled out of one interaction row
struct Extracted {
    user_id: Option<String>,
    channel: Option<String>,
    platform: Option<String>,
    campaign_type: Option<String>,
    email_opens: Option<String>,
    email_clicks: Option<String>,
    conversion: Option<String>,
}

/// Normalize raw interaction rows into canonical events.
///
/// Rows without a user id are dropped (never nulled); survivors are sorted
/// by user id for stable grouping, then assigned their synthetic timeline
/// position and content-hashed identifier.
pub fn normalize(table: &RawTable, timeline: Timeline) -> Vec<CanonicalEvent> {
    let synonyms = SynonymTable::default();

    let mut rows: Vec<Extracted> = table
        .rows()
        .map(|row| Extracted {
            user_id: row.get("CustomerID").map(str::to_string),
            channel: row.get("CampaignChannel").map(str::to_string),
            platform: row.get("AdvertisingPlatform").map(str::to_string),
            campaign_type: row.get("CampaignType").map(str::to_string),
            email_opens: row.get("EmailOpens").map(str::to_string),
            email_clicks: row.get("EmailClicks").map(str::to_string),
            conversion: row.get("Conversion").map(str::to_string),
        })
        .collect();

    let before = rows.len();
    rows.retain(|row| row.user_id.is_some());
    rows.sort_by(|a, b| a.user_id.cmp(&b.user_id));
    info!(
        rows_before = before,
        rows_after = rows.len(),
        "Dropped rows missing mandatory fields"
    );

    rows.iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let user_id = row.user_id.clone()?;
            let event_ts = timeline.timestamp(index);

            // Prefer the channel field; fall back to the advertising platform
            let raw_source = row.channel.as_deref().or(row.platform.as_deref());
            let (utm_source, utm_medium) =
                synonyms.classify(raw_source, row.campaign_type.as_deref());
            let utm_campaign = slugify(row.campaign_type.as_deref());

            let event_type = infer_event_type(
                row.conversion.as_deref(),
                row.email_opens.as_deref(),
                row.email_clicks.as_deref(),
            );

            Some(CanonicalEvent {
                event_id: CanonicalEvent::derive_id(&user_id, event_ts, &utm_campaign),
                user_id,
                event_ts,
                event_type,
                utm_source,
                utm_medium,
                utm_campaign,
                // This source carries no web context or revenue
                referrer: None,
                page_url: None,
                revenue: None,
            })
        })
        .collect()
}

/// Write the canonical batch as a CSV artifact
fn write_batch(output: &str, batch: &[CanonicalEvent]) -> Result<()> {
    if let Some(parent) = Path::new(output).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut writer = csv::Writer::from_path(output)?;
    for event in batch {
        writer.serialize(event)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use attrib_common::types::EventType;
    use std::io::Write;

    fn load(content: &str) -> RawTable {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        RawTable::load(file.path()).unwrap()
    }

    #[test]
    fn test_facebook_email_blast_scenario() {
        let table = load(
            "CustomerID,CampaignChannel,CampaignType,EmailOpens,EmailClicks,Conversion\n\
             7,Facebook,Email Blast!,2,0,0\n",
        );
        let batch = normalize(&table, Timeline::default());
        assert_eq!(batch.len(), 1);

        let event = &batch[0];
        assert_eq!(event.user_id, "7");
        assert_eq!(event.event_type, EventType::Signup);
        assert_eq!(event.utm_source, "meta");
        assert_eq!(event.utm_medium, "cpc");
        assert_eq!(event.utm_campaign, "email_blast");
        assert_eq!(
            event.event_id,
            CanonicalEvent::derive_id("7", event.event_ts, "email_blast")
        );
    }

    #[test]
    fn test_rows_without_user_id_are_dropped() {
        let table = load(
            "CustomerID,CampaignChannel,CampaignType\n\
             1,google,Search\n\
             ,google,Search\n\
             2,google,Search\n",
        );
        let batch = normalize(&table, Timeline::default());
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].user_id, "1");
        assert_eq!(batch[1].user_id, "2");
    }

    #[test]
    fn test_timeline_follows_user_sorted_order() {
        let table = load(
            "CustomerID,CampaignChannel,CampaignType\n\
             b,google,Search\n\
             a,google,Search\n\
             c,google,Search\n",
        );
        let timeline = Timeline::default();
        let batch = normalize(&table, timeline);

        let users: Vec<_> = batch.iter().map(|e| e.user_id.as_str()).collect();
        assert_eq!(users, ["a", "b", "c"]);
        for (index, event) in batch.iter().enumerate() {
            assert_eq!(event.event_ts, timeline.timestamp(index));
        }
    }

    #[test]
    fn test_platform_fallback_when_channel_absent() {
        let table = load(
            "CustomerID,AdvertisingPlatform,CampaignType\n\
             1,LinkedIn,Awareness\n",
        );
        let batch = normalize(&table, Timeline::default());
        assert_eq!(batch[0].utm_source, "linkedin");
        assert_eq!(batch[0].utm_medium, "cpc");
    }

    #[test]
    fn test_missing_campaign_column_falls_back_to_unknown() {
        let table = load("CustomerID,CampaignChannel\n1,direct\n");
        let batch = normalize(&table, Timeline::default());
        assert_eq!(batch[0].utm_campaign, "unknown_campaign");
        assert_eq!(batch[0].event_type, EventType::PageView);
    }

    #[test]
    fn test_regeneration_is_idempotent() {
        let table = load(
            "CustomerID,CampaignChannel,CampaignType,Conversion\n\
             9,newsletter,Drip,1\n\
             3,google,Search,0\n",
        );
        let first = normalize(&table, Timeline::default());
        let second = normalize(&table, Timeline::default());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_ingest_writes_canonical_artifact() {
        let mut input = tempfile::NamedTempFile::new().unwrap();
        input
            .write_all(b"CustomerID,CampaignChannel,CampaignType,Conversion\n7,Facebook,Email Blast!,1\n")
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("events.csv");

        ingest(
            input.path().to_str().unwrap(),
            output.to_str().unwrap(),
        )
        .await
        .unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "event_id,user_id,event_ts,event_type,utm_source,utm_medium,utm_campaign,referrer,page_url,revenue"
        );
        assert!(lines.next().unwrap().contains("purchase"));
    }

    #[tokio::test]
    async fn test_ingest_missing_input_is_fatal() {
        let err = ingest("/nonexistent/events_source.csv", "/tmp/out.csv")
            .await
            .unwrap_err();
        assert!(matches!(err, attrib_common::AttribError::InputMissing(_)));
    }
}
