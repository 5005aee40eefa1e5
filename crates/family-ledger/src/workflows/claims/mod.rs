//! Contribution claim scoring and review routing.
//!
//! [`assess_risk`] is the fraud engine: it validates the evidence, reads the actor's most
//! recent submission once, and adds up the triggered rules into a score clamped to
//! [`MAX_SCORE`]. [`ClaimReviewService`] wraps it with the routing policy that decides
//! which claims an administrator must look at.

pub mod domain;
pub(crate) mod fraud;
pub mod history;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ActorId, ClaimEvidence, EvidenceError, FamilyId, SubmissionChannel, SubmissionHistoryRecord,
};
pub use fraud::{
    assess_risk, FraudScoringError, RiskAssessment, RiskAssessmentView, RiskComponent,
    SignalCategory, MAX_SCORE,
};
pub use history::{
    AsOfSubmissionHistory, HistoryLookupError, InMemorySubmissionHistory, SubmissionHistory,
};
pub use service::{
    ClaimReview, ClaimReviewError, ClaimReviewService, ClaimReviewView, ReviewPolicy,
    ReviewRoute, DEFAULT_MANUAL_REVIEW_THRESHOLD,
};
