use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::domain::{ActorId, FamilyId, SubmissionHistoryRecord};

/// Read access to prior claims so the scoring engine can be exercised in isolation.
///
/// Implementations return at most one record: the newest by `created_at` among records
/// sharing both `actor_id` and `family_id`.
pub trait SubmissionHistory: Send + Sync {
    fn find_most_recent_submission(
        &self,
        actor_id: &ActorId,
        family_id: &FamilyId,
    ) -> Result<Option<SubmissionHistoryRecord>, HistoryLookupError>;
}

/// Error enumeration for history store failures.
#[derive(Debug, thiserror::Error)]
pub enum HistoryLookupError {
    #[error("submission history unavailable: {0}")]
    Unavailable(String),
    #[error("submission history lookup timed out after {0:?}")]
    TimedOut(Duration),
}

/// Process-local history used for batch replays and tests.
#[derive(Debug, Default, Clone)]
pub struct InMemorySubmissionHistory {
    records: Arc<Mutex<Vec<SubmissionHistoryRecord>>>,
}

impl InMemorySubmissionHistory {
    pub fn with_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = SubmissionHistoryRecord>,
    {
        Self {
            records: Arc::new(Mutex::new(records.into_iter().collect())),
        }
    }

    pub fn record(&self, record: SubmissionHistoryRecord) {
        self.records
            .lock()
            .expect("history mutex poisoned")
            .push(record);
    }

    pub fn len(&self) -> usize {
        self.records.lock().expect("history mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live view of the same records that ignores anything created after `cutoff`.
    pub fn as_of(&self, cutoff: DateTime<Utc>) -> AsOfSubmissionHistory {
        AsOfSubmissionHistory {
            records: Arc::clone(&self.records),
            cutoff,
        }
    }
}

impl SubmissionHistory for InMemorySubmissionHistory {
    fn find_most_recent_submission(
        &self,
        actor_id: &ActorId,
        family_id: &FamilyId,
    ) -> Result<Option<SubmissionHistoryRecord>, HistoryLookupError> {
        Ok(newest_matching(&self.records, actor_id, family_id, None))
    }
}

/// In-memory history bounded to records created at or before a cutoff.
#[derive(Debug, Clone)]
pub struct AsOfSubmissionHistory {
    records: Arc<Mutex<Vec<SubmissionHistoryRecord>>>,
    cutoff: DateTime<Utc>,
}

impl AsOfSubmissionHistory {
    pub fn cutoff(&self) -> DateTime<Utc> {
        self.cutoff
    }
}

impl SubmissionHistory for AsOfSubmissionHistory {
    fn find_most_recent_submission(
        &self,
        actor_id: &ActorId,
        family_id: &FamilyId,
    ) -> Result<Option<SubmissionHistoryRecord>, HistoryLookupError> {
        Ok(newest_matching(
            &self.records,
            actor_id,
            family_id,
            Some(self.cutoff),
        ))
    }
}

fn newest_matching(
    records: &Mutex<Vec<SubmissionHistoryRecord>>,
    actor_id: &ActorId,
    family_id: &FamilyId,
    cutoff: Option<DateTime<Utc>>,
) -> Option<SubmissionHistoryRecord> {
    let guard = records.lock().expect("history mutex poisoned");
    guard
        .iter()
        .filter(|record| record.belongs_to(actor_id, family_id))
        .filter(|record| cutoff.map_or(true, |cutoff| record.created_at <= cutoff))
        .max_by_key(|record| record.created_at)
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(actor: &str, family: &str, hour: u32) -> SubmissionHistoryRecord {
        SubmissionHistoryRecord {
            actor_id: ActorId(actor.to_string()),
            family_id: FamilyId(family.to_string()),
            created_at: Utc
                .with_ymd_and_hms(2025, 3, 1, hour, 0, 0)
                .single()
                .expect("valid timestamp"),
        }
    }

    #[test]
    fn returns_newest_record_for_actor_and_family() {
        let history = InMemorySubmissionHistory::with_records([
            record("amara", "okafor", 9),
            record("amara", "okafor", 14),
            record("amara", "okafor", 11),
        ]);

        let found = history
            .find_most_recent_submission(
                &ActorId("amara".to_string()),
                &FamilyId("okafor".to_string()),
            )
            .expect("lookup succeeds")
            .expect("record present");
        assert_eq!(found, record("amara", "okafor", 14));
    }

    #[test]
    fn ignores_records_from_other_actors_or_families() {
        let history = InMemorySubmissionHistory::with_records([
            record("amara", "mensah", 15),
            record("kojo", "okafor", 16),
        ]);
        history.record(record("amara", "okafor", 8));

        let found = history
            .find_most_recent_submission(
                &ActorId("amara".to_string()),
                &FamilyId("okafor".to_string()),
            )
            .expect("lookup succeeds");
        assert_eq!(found, Some(record("amara", "okafor", 8)));
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn as_of_view_ignores_records_after_cutoff() {
        let history = InMemorySubmissionHistory::with_records([
            record("amara", "okafor", 10),
            record("amara", "okafor", 13),
        ]);
        let cutoff = Utc
            .with_ymd_and_hms(2025, 3, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp");

        let bounded = history.as_of(cutoff);
        let found = bounded
            .find_most_recent_submission(
                &ActorId("amara".to_string()),
                &FamilyId("okafor".to_string()),
            )
            .expect("lookup succeeds");

        assert_eq!(bounded.cutoff(), cutoff);
        assert_eq!(found, Some(record("amara", "okafor", 10)));
    }

    #[test]
    fn as_of_view_sees_records_added_later_within_cutoff() {
        let history = InMemorySubmissionHistory::default();
        let bounded = history.as_of(
            Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0)
                .single()
                .expect("valid timestamp"),
        );
        history.record(record("amara", "okafor", 12));

        let found = bounded
            .find_most_recent_submission(
                &ActorId("amara".to_string()),
                &FamilyId("okafor".to_string()),
            )
            .expect("lookup succeeds");
        assert_eq!(found, Some(record("amara", "okafor", 12)));
    }

    #[test]
    fn empty_history_returns_none() {
        let history = InMemorySubmissionHistory::default();
        assert!(history.is_empty());
        let found = history
            .find_most_recent_submission(
                &ActorId("amara".to_string()),
                &FamilyId("okafor".to_string()),
            )
            .expect("lookup succeeds");
        assert!(found.is_none());
    }
}
