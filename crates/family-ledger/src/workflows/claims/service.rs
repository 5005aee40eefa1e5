use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{ActorId, ClaimEvidence, FamilyId};
use super::fraud::{assess_risk, FraudScoringError, RiskAssessment};
use super::history::SubmissionHistory;

/// Score at or above which a flagged claim goes to an administrator.
pub const DEFAULT_MANUAL_REVIEW_THRESHOLD: u8 = 50;

/// Routing policy applied after scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewPolicy {
    pub manual_review_threshold: u8,
}

impl Default for ReviewPolicy {
    fn default() -> Self {
        Self {
            manual_review_threshold: DEFAULT_MANUAL_REVIEW_THRESHOLD,
        }
    }
}

impl ReviewPolicy {
    pub fn route(&self, assessment: &RiskAssessment) -> ReviewRoute {
        if !assessment.is_clean() && assessment.score() >= self.manual_review_threshold {
            ReviewRoute::ManualReview {
                reasons: assessment.reasons(),
            }
        } else {
            ReviewRoute::Standard
        }
    }
}

/// Where a scored claim goes next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewRoute {
    Standard,
    ManualReview { reasons: Vec<String> },
}

impl ReviewRoute {
    pub fn label(&self) -> &'static str {
        match self {
            ReviewRoute::Standard => "standard",
            ReviewRoute::ManualReview { .. } => "manual_review",
        }
    }
}

/// Scored claim together with its routing decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimReview {
    pub actor_id: ActorId,
    pub family_id: FamilyId,
    pub assessment: RiskAssessment,
    pub route: ReviewRoute,
}

impl ClaimReview {
    pub fn requires_manual_review(&self) -> bool {
        matches!(self.route, ReviewRoute::ManualReview { .. })
    }

    pub fn summary(&self) -> String {
        match &self.route {
            ReviewRoute::Standard if self.assessment.is_clean() => {
                "no risk signals".to_string()
            }
            ReviewRoute::Standard => format!(
                "risk score {} below review threshold: {}",
                self.assessment.score(),
                self.assessment.reasons().join("; ")
            ),
            ReviewRoute::ManualReview { reasons } => format!(
                "manual review required (score {}): {}",
                self.assessment.score(),
                reasons.join("; ")
            ),
        }
    }

    pub fn view(&self) -> ClaimReviewView {
        ClaimReviewView {
            actor_id: self.actor_id.clone(),
            family_id: self.family_id.clone(),
            route: self.route.label(),
            summary: self.summary(),
            assessment: self.assessment.view(),
        }
    }
}

/// Sanitized representation of a review for administrator tooling.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimReviewView {
    pub actor_id: ActorId,
    pub family_id: FamilyId,
    pub route: &'static str,
    pub summary: String,
    #[serde(flatten)]
    pub assessment: super::fraud::RiskAssessmentView,
}

/// Service composing the history store, the scoring engine, and the routing policy.
pub struct ClaimReviewService<H> {
    history: Arc<H>,
    policy: ReviewPolicy,
}

impl<H> ClaimReviewService<H>
where
    H: SubmissionHistory + 'static,
{
    pub fn new(history: Arc<H>, policy: ReviewPolicy) -> Self {
        Self { history, policy }
    }

    pub fn policy(&self) -> ReviewPolicy {
        self.policy
    }

    /// Score a claim as of `now` and decide whether it needs an administrator.
    pub fn review(
        &self,
        evidence: &ClaimEvidence,
        now: DateTime<Utc>,
    ) -> Result<ClaimReview, ClaimReviewError> {
        let assessment = assess_risk(evidence, self.history.as_ref(), now)?;
        let route = self.policy.route(&assessment);

        if let ReviewRoute::ManualReview { reasons } = &route {
            warn!(
                actor = %evidence.actor_id,
                family = %evidence.family_id,
                score = assessment.score(),
                threshold = self.policy.manual_review_threshold,
                reasons = %reasons.join("; "),
                "claim routed to manual review"
            );
        }

        Ok(ClaimReview {
            actor_id: evidence.actor_id.clone(),
            family_id: evidence.family_id.clone(),
            assessment,
            route,
        })
    }
}

/// Error raised by the claim review service.
#[derive(Debug, thiserror::Error)]
pub enum ClaimReviewError {
    #[error(transparent)]
    Scoring(#[from] FraudScoringError),
}
