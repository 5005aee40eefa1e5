//! Ledger CSV exports turned into claim evidence and submission history.

mod mapping;
mod parser;

use chrono::{DateTime, Utc};
use std::io::Read;
use std::path::Path;

use crate::workflows::claims::{ClaimEvidence, SubmissionHistoryRecord};

#[derive(Debug)]
pub enum LedgerImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: usize, reason: String },
}

impl std::fmt::Display for LedgerImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerImportError::Io(err) => write!(f, "failed to read ledger export: {}", err),
            LedgerImportError::Csv(err) => write!(f, "invalid ledger CSV data: {}", err),
            LedgerImportError::InvalidRow { line, reason } => {
                write!(f, "ledger row {} rejected: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for LedgerImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LedgerImportError::Io(err) => Some(err),
            LedgerImportError::Csv(err) => Some(err),
            LedgerImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for LedgerImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for LedgerImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// A claim row together with the moment it reached the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimSubmission {
    pub evidence: ClaimEvidence,
    pub submitted_at: DateTime<Utc>,
}

pub struct LedgerImporter;

impl LedgerImporter {
    pub fn claims_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<ClaimSubmission>, LedgerImportError> {
        let file = std::fs::File::open(path)?;
        Self::claims_from_reader(file)
    }

    /// Parses a claim export and returns the claims ordered by submission time.
    pub fn claims_from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<ClaimSubmission>, LedgerImportError> {
        let mut claims = parser::parse_claim_rows(reader)?
            .into_iter()
            .enumerate()
            .map(|(index, row)| mapping::claim_from_row(row, index + 1))
            .collect::<Result<Vec<_>, _>>()?;

        claims.sort_by_key(|claim| claim.submitted_at);
        Ok(claims)
    }

    pub fn history_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<SubmissionHistoryRecord>, LedgerImportError> {
        let file = std::fs::File::open(path)?;
        Self::history_from_reader(file)
    }

    pub fn history_from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<SubmissionHistoryRecord>, LedgerImportError> {
        parser::parse_history_rows(reader)?
            .into_iter()
            .enumerate()
            .map(|(index, row)| mapping::history_from_row(row, index + 1))
            .collect()
    }
}
