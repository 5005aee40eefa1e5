use std::str::FromStr;

use rust_decimal::Decimal;

use super::parser::{parse_flag, parse_timestamp, ClaimRow, HistoryRow};
use super::{ClaimSubmission, LedgerImportError};
use crate::workflows::claims::{
    ActorId, ClaimEvidence, FamilyId, SubmissionChannel, SubmissionHistoryRecord,
};

// Row numbers are 1-based data rows; the header is not counted.

pub(crate) fn claim_from_row(
    row: ClaimRow,
    line: usize,
) -> Result<ClaimSubmission, LedgerImportError> {
    let invalid = |reason: String| LedgerImportError::InvalidRow { line, reason };

    let amount = Decimal::from_str(row.amount.trim())
        .map_err(|err| invalid(format!("amount '{}' is not a decimal ({err})", row.amount)))?;

    let payment_date = parse_timestamp(&row.payment_date).ok_or_else(|| {
        invalid(format!(
            "payment date '{}' is not a recognised timestamp",
            row.payment_date
        ))
    })?;

    let submission_channel =
        SubmissionChannel::from_str(&row.channel).map_err(|err| invalid(err.to_string()))?;

    let parser_confidence = row
        .parser_confidence
        .as_deref()
        .map(|raw| {
            raw.trim()
                .parse::<f64>()
                .map_err(|_| invalid(format!("parser confidence '{raw}' is not a number")))
        })
        .transpose()?;

    let has_proof = parse_flag(&row.has_proof).ok_or_else(|| {
        invalid(format!(
            "has proof '{}' is not a yes/no value",
            row.has_proof
        ))
    })?;

    let submitted_at = parse_timestamp(&row.submitted_at).ok_or_else(|| {
        invalid(format!(
            "submitted at '{}' is not a recognised timestamp",
            row.submitted_at
        ))
    })?;

    let evidence = ClaimEvidence {
        actor_id: ActorId(row.actor_id),
        family_id: FamilyId(row.family_id),
        amount,
        payment_date,
        submission_channel,
        parser_confidence,
        has_proof,
    };
    evidence.validate().map_err(|err| invalid(err.to_string()))?;

    Ok(ClaimSubmission {
        evidence,
        submitted_at,
    })
}

pub(crate) fn history_from_row(
    row: HistoryRow,
    line: usize,
) -> Result<SubmissionHistoryRecord, LedgerImportError> {
    let created_at =
        parse_timestamp(&row.created_at).ok_or_else(|| LedgerImportError::InvalidRow {
            line,
            reason: format!("created at '{}' is not a recognised timestamp", row.created_at),
        })?;

    Ok(SubmissionHistoryRecord {
        actor_id: ActorId(row.actor_id),
        family_id: FamilyId(row.family_id),
        created_at,
    })
}
