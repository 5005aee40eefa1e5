use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::workflows::claims::domain::{
    ActorId, ClaimEvidence, FamilyId, SubmissionChannel, SubmissionHistoryRecord,
};
use crate::workflows::claims::history::{
    HistoryLookupError, InMemorySubmissionHistory, SubmissionHistory,
};
use crate::workflows::claims::service::{ClaimReviewService, ReviewPolicy};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn actor() -> ActorId {
    ActorId("member-ama".to_string())
}

pub(super) fn family() -> FamilyId {
    FamilyId("family-boateng".to_string())
}

/// Image upload with proof, paid today: triggers no rule.
pub(super) fn clean_evidence() -> ClaimEvidence {
    ClaimEvidence {
        actor_id: actor(),
        family_id: family(),
        amount: Decimal::new(12_500, 2),
        payment_date: now(),
        submission_channel: SubmissionChannel::Image,
        parser_confidence: None,
        has_proof: true,
    }
}

pub(super) fn message_evidence(confidence: Option<f64>) -> ClaimEvidence {
    ClaimEvidence {
        submission_channel: SubmissionChannel::Message,
        parser_confidence: confidence,
        ..clean_evidence()
    }
}

pub(super) fn paid_days_ago(evidence: ClaimEvidence, days: i64) -> ClaimEvidence {
    ClaimEvidence {
        payment_date: now() - Duration::days(days),
        ..evidence
    }
}

pub(super) fn prior_submission(minutes_ago: i64) -> SubmissionHistoryRecord {
    prior_submission_elapsed(Duration::minutes(minutes_ago))
}

pub(super) fn prior_submission_elapsed(elapsed: Duration) -> SubmissionHistoryRecord {
    SubmissionHistoryRecord {
        actor_id: actor(),
        family_id: family(),
        created_at: now() - elapsed,
    }
}

pub(super) fn history_with(records: Vec<SubmissionHistoryRecord>) -> InMemorySubmissionHistory {
    InMemorySubmissionHistory::with_records(records)
}

pub(super) fn build_service(
    history: InMemorySubmissionHistory,
) -> ClaimReviewService<InMemorySubmissionHistory> {
    ClaimReviewService::new(Arc::new(history), ReviewPolicy::default())
}

/// Counts lookups so tests can assert the engine reads history exactly once.
pub(super) struct CountingHistory {
    inner: InMemorySubmissionHistory,
    lookups: AtomicUsize,
}

impl CountingHistory {
    pub(super) fn with_records(records: Vec<SubmissionHistoryRecord>) -> Self {
        Self {
            inner: InMemorySubmissionHistory::with_records(records),
            lookups: AtomicUsize::new(0),
        }
    }

    pub(super) fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl SubmissionHistory for CountingHistory {
    fn find_most_recent_submission(
        &self,
        actor_id: &ActorId,
        family_id: &FamilyId,
    ) -> Result<Option<SubmissionHistoryRecord>, HistoryLookupError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_most_recent_submission(actor_id, family_id)
    }
}

pub(super) struct UnavailableHistory;

impl SubmissionHistory for UnavailableHistory {
    fn find_most_recent_submission(
        &self,
        _actor_id: &ActorId,
        _family_id: &FamilyId,
    ) -> Result<Option<SubmissionHistoryRecord>, HistoryLookupError> {
        Err(HistoryLookupError::Unavailable("database offline".to_string()))
    }
}
