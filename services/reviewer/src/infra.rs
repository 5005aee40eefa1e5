use chrono::{DateTime, Utc};
use family_ledger::error::AppError;
use family_ledger::workflows::claims::{ClaimEvidence, InMemorySubmissionHistory};
use family_ledger::workflows::ledger_import::LedgerImporter;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| format!("failed to parse '{raw}' as an RFC 3339 timestamp ({err})"))
}

pub(crate) fn load_history(path: Option<&Path>) -> Result<InMemorySubmissionHistory, AppError> {
    match path {
        Some(path) => Ok(InMemorySubmissionHistory::with_records(
            LedgerImporter::history_from_path(path)?,
        )),
        None => Ok(InMemorySubmissionHistory::default()),
    }
}

pub(crate) fn read_claim(path: &Path) -> Result<ClaimEvidence, AppError> {
    let reader = BufReader::new(File::open(path)?);
    serde_json::from_reader(reader).map_err(|err| {
        AppError::Serialization(format!("claim file {} is invalid: {err}", path.display()))
    })
}

pub(crate) fn write_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, value)
        .map_err(|err| AppError::Serialization(err.to_string()))?;
    writeln!(handle)?;
    Ok(())
}
