use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for the member submitting a claim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub String);

/// Identifier wrapper for the family a claim is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FamilyId(pub String);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for FamilyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a contribution claim reached the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionChannel {
    /// Free-form text message run through the automated parser.
    Message,
    /// Uploaded receipt or screenshot.
    Image,
    /// Typed in by hand.
    Manual,
}

impl SubmissionChannel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Image => "image",
            Self::Manual => "manual",
        }
    }
}

impl FromStr for SubmissionChannel {
    type Err = EvidenceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "message" => Ok(Self::Message),
            "image" => Ok(Self::Image),
            "manual" => Ok(Self::Manual),
            _ => Err(EvidenceError::UnknownChannel(value.trim().to_string())),
        }
    }
}

/// Facts about a submitted payment claim, built once per scoring call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimEvidence {
    pub actor_id: ActorId,
    pub family_id: FamilyId,
    /// Claimed payment amount. No rule reads it yet.
    pub amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub submission_channel: SubmissionChannel,
    /// Extraction confidence in `[0, 1]`; `None` when nothing was parsed.
    #[serde(default)]
    pub parser_confidence: Option<f64>,
    pub has_proof: bool,
}

impl ClaimEvidence {
    /// Rejects evidence the scoring rules cannot interpret.
    pub fn validate(&self) -> Result<(), EvidenceError> {
        if self.actor_id.0.trim().is_empty() {
            return Err(EvidenceError::MissingActor);
        }
        if self.family_id.0.trim().is_empty() {
            return Err(EvidenceError::MissingFamily);
        }
        if self.amount < Decimal::ZERO {
            return Err(EvidenceError::NegativeAmount(self.amount));
        }
        if let Some(confidence) = self.parser_confidence {
            if !(0.0..=1.0).contains(&confidence) {
                return Err(EvidenceError::ConfidenceOutOfRange(confidence));
            }
        }
        Ok(())
    }
}

/// Most recent prior claim by an actor within a family, as stored by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionHistoryRecord {
    pub actor_id: ActorId,
    pub family_id: FamilyId,
    pub created_at: DateTime<Utc>,
}

impl SubmissionHistoryRecord {
    pub fn belongs_to(&self, actor_id: &ActorId, family_id: &FamilyId) -> bool {
        &self.actor_id == actor_id && &self.family_id == family_id
    }
}

/// Malformed claim evidence.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvidenceError {
    #[error("actor id must not be empty")]
    MissingActor,
    #[error("family id must not be empty")]
    MissingFamily,
    #[error("claimed amount {0} must not be negative")]
    NegativeAmount(Decimal),
    #[error("parser confidence {0} is outside [0, 1]")]
    ConfidenceOutOfRange(f64),
    #[error("unknown submission channel '{0}'")]
    UnknownChannel(String),
}
