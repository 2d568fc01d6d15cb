//! CSV ingestion for the externally supplied reference feeds. Each sync
//! parses a full export and replaces the target collection wholesale.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::domain::{ActivityFeedRecord, ChurnedCandidateRecord};

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("invalid feed CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("unparseable activity date '{value}'")]
    InvalidDate { value: String },
}

pub fn parse_churned_candidates<R: Read>(
    reader: R,
) -> Result<Vec<ChurnedCandidateRecord>, FeedError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for row in csv_reader.deserialize::<ChurnedRow>() {
        let row = row?;
        records.push(ChurnedCandidateRecord {
            id: row.driver_id,
            phone: row.phone,
            email: row.email,
        });
    }

    Ok(records)
}

pub fn parse_activity_feed<R: Read>(reader: R) -> Result<Vec<ActivityFeedRecord>, FeedError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for row in csv_reader.deserialize::<ActivityRow>() {
        let row = row?;
        let activity_date =
            parse_date(&row.activity_date).ok_or_else(|| FeedError::InvalidDate {
                value: row.activity_date.clone(),
            })?;
        records.push(ActivityFeedRecord {
            candidate_id: row.driver_id,
            activity_date,
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct ChurnedRow {
    #[serde(rename = "Driver ID")]
    driver_id: String,
    #[serde(rename = "Phone", default, deserialize_with = "trimmed_string")]
    phone: String,
    #[serde(rename = "Email", default, deserialize_with = "trimmed_string")]
    email: String,
}

#[derive(Debug, Deserialize)]
struct ActivityRow {
    #[serde(rename = "Driver ID")]
    driver_id: String,
    #[serde(rename = "Activity Date")]
    activity_date: String,
}

fn trimmed_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(value.trim().to_string())
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc().date());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_churned_candidate_export() {
        let csv = "Driver ID,Phone,Email\n\
                   drv-1, 5551234567 , past.driver@example.com\n\
                   drv-2,5559876543,\n";
        let rows = parse_churned_candidates(Cursor::new(csv)).expect("parse");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "drv-1");
        assert_eq!(rows[0].phone, "5551234567");
        assert_eq!(rows[1].email, "");
    }

    #[test]
    fn parses_activity_dates_in_both_formats() {
        let csv = "Driver ID,Activity Date\n\
                   drv-1,2026-08-01\n\
                   drv-2,2026-08-02T09:30:00Z\n";
        let rows = parse_activity_feed(Cursor::new(csv)).expect("parse");
        assert_eq!(
            rows[0].activity_date,
            NaiveDate::from_ymd_opt(2026, 8, 1).expect("valid")
        );
        assert_eq!(
            rows[1].activity_date,
            NaiveDate::from_ymd_opt(2026, 8, 2).expect("valid")
        );
    }

    #[test]
    fn rejects_unparseable_activity_dates() {
        let csv = "Driver ID,Activity Date\ndrv-1,last tuesday\n";
        match parse_activity_feed(Cursor::new(csv)) {
            Err(FeedError::InvalidDate { value }) => assert_eq!(value, "last tuesday"),
            other => panic!("expected invalid date error, got {other:?}"),
        }
    }
}
