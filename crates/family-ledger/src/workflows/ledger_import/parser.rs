use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug, Deserialize)]
pub(crate) struct ClaimRow {
    #[serde(rename = "Actor ID")]
    pub(crate) actor_id: String,
    #[serde(rename = "Family ID")]
    pub(crate) family_id: String,
    #[serde(rename = "Amount")]
    pub(crate) amount: String,
    #[serde(rename = "Payment Date")]
    pub(crate) payment_date: String,
    #[serde(rename = "Channel")]
    pub(crate) channel: String,
    #[serde(
        rename = "Parser Confidence",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) parser_confidence: Option<String>,
    #[serde(rename = "Has Proof")]
    pub(crate) has_proof: String,
    #[serde(rename = "Submitted At")]
    pub(crate) submitted_at: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryRow {
    #[serde(rename = "Actor ID")]
    pub(crate) actor_id: String,
    #[serde(rename = "Family ID")]
    pub(crate) family_id: String,
    #[serde(rename = "Created At")]
    pub(crate) created_at: String,
}

pub(crate) fn parse_claim_rows<R: Read>(reader: R) -> Result<Vec<ClaimRow>, csv::Error> {
    csv_reader(reader).deserialize::<ClaimRow>().collect()
}

pub(crate) fn parse_history_rows<R: Read>(reader: R) -> Result<Vec<HistoryRow>, csv::Error> {
    csv_reader(reader).deserialize::<HistoryRow>().collect()
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` and bare dates. Offset-free values are UTC.
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    None
}

pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}
