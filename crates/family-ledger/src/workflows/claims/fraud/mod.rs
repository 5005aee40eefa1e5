mod rules;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::domain::{ClaimEvidence, EvidenceError};
use super::history::{HistoryLookupError, SubmissionHistory};

#[cfg(test)]
pub(crate) use rules::confidence_percent_for_tests;
#[cfg(test)]
pub(crate) use rules::score_evidence;

/// Upper bound of the composite score.
pub const MAX_SCORE: u8 = 100;

/// Scores a claim against the fixed fraud rubric.
///
/// Issues exactly one read against `history` for the actor's most recent submission in the
/// family. A failed read is returned as [`FraudScoringError::HistoryLookup`], never treated
/// as an empty history.
pub fn assess_risk<H>(
    evidence: &ClaimEvidence,
    history: &H,
    now: DateTime<Utc>,
) -> Result<RiskAssessment, FraudScoringError>
where
    H: SubmissionHistory + ?Sized,
{
    evidence.validate()?;

    let prior = history
        .find_most_recent_submission(&evidence.actor_id, &evidence.family_id)
        .map_err(|err| {
            error!(
                actor = %evidence.actor_id,
                family = %evidence.family_id,
                error = %err,
                "submission history lookup failed"
            );
            err
        })?;

    let assessment =
        RiskAssessment::from_components(rules::score_evidence(evidence, prior.as_ref(), now));

    info!(
        actor = %evidence.actor_id,
        family = %evidence.family_id,
        channel = evidence.submission_channel.label(),
        score = assessment.score(),
        reasons = assessment.components().len(),
        "claim risk assessed"
    );

    Ok(assessment)
}

/// Signal families. Each contributes to a score at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    Proof,
    ParserConfidence,
    Staleness,
    Velocity,
}

impl SignalCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Proof => "proof",
            Self::ParserConfidence => "parser_confidence",
            Self::Staleness => "staleness",
            Self::Velocity => "velocity",
        }
    }
}

/// Discrete contribution to a risk score, kept so reviewers can see why a claim was flagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskComponent {
    pub category: SignalCategory,
    pub points: u8,
    pub reason: String,
}

/// Clamped composite score and the triggered rules, in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    score: u8,
    components: Vec<RiskComponent>,
}

impl RiskAssessment {
    pub(crate) fn from_components(components: Vec<RiskComponent>) -> Self {
        let raw = raw_total(&components);
        let score = u8::try_from(raw.min(u16::from(MAX_SCORE))).unwrap_or(MAX_SCORE);
        Self { score, components }
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    /// Sum of contributions before clamping.
    pub fn raw_score(&self) -> u16 {
        raw_total(&self.components)
    }

    pub fn components(&self) -> &[RiskComponent] {
        &self.components
    }

    pub fn reasons(&self) -> Vec<String> {
        self.components
            .iter()
            .map(|component| component.reason.clone())
            .collect()
    }

    pub fn is_clean(&self) -> bool {
        self.components.is_empty()
    }

    pub fn view(&self) -> RiskAssessmentView {
        RiskAssessmentView {
            score: self.score,
            raw_score: self.raw_score(),
            reasons: self.reasons(),
        }
    }
}

fn raw_total(components: &[RiskComponent]) -> u16 {
    components
        .iter()
        .map(|component| u16::from(component.points))
        .sum()
}

/// Flattened representation handed to administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessmentView {
    pub score: u8,
    pub raw_score: u16,
    pub reasons: Vec<String>,
}

/// Error raised while scoring a claim.
#[derive(Debug, thiserror::Error)]
pub enum FraudScoringError {
    #[error("invalid claim evidence: {0}")]
    InvalidEvidence(#[from] EvidenceError),
    #[error(transparent)]
    HistoryLookup(#[from] HistoryLookupError),
}
