use crate::infra::{load_history, parse_timestamp, read_claim, write_json};
use chrono::{DateTime, Utc};
use clap::Args;
use family_ledger::config::AppConfig;
use family_ledger::error::AppError;
use family_ledger::workflows::claims::{
    ClaimEvidence, ClaimReview, ClaimReviewError, ClaimReviewService, ClaimReviewView,
    InMemorySubmissionHistory, ReviewPolicy, SubmissionHistoryRecord,
};
use family_ledger::workflows::ledger_import::{ClaimSubmission, LedgerImporter};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file describing the claim evidence
    #[arg(long)]
    pub(crate) claim: PathBuf,
    /// CSV export of prior submissions (Actor ID, Family ID, Created At)
    #[arg(long)]
    pub(crate) history: Option<PathBuf>,
    /// Scoring time in RFC 3339 (defaults to the current time)
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) now: Option<DateTime<Utc>>,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV export of claims to replay
    #[arg(long)]
    pub(crate) claims: PathBuf,
    /// CSV export of submissions made before the batch
    #[arg(long)]
    pub(crate) history: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct BatchReport {
    reviewed: usize,
    manual_review: usize,
    reviews: Vec<ClaimReviewView>,
}

pub(crate) fn run_score(args: ScoreArgs, config: &AppConfig) -> Result<(), AppError> {
    let history = load_history(args.history.as_deref())?;
    let evidence = read_claim(&args.claim)?;
    let now = args.now.unwrap_or_else(Utc::now);

    let review = review_as_of(&evidence, &history, now, config.review)?;

    write_json(&review.view())
}

pub(crate) fn run_batch(args: BatchArgs, config: &AppConfig) -> Result<(), AppError> {
    let history = load_history(args.history.as_deref())?;
    let claims = LedgerImporter::claims_from_path(&args.claims)?;
    info!(
        claims = claims.len(),
        prior_submissions = history.len(),
        threshold = config.review.manual_review_threshold,
        "replaying ledger batch"
    );

    let reviews = replay(&claims, history, config.review)?;
    let manual_review = reviews
        .iter()
        .filter(|review| review.requires_manual_review())
        .count();
    info!(reviewed = reviews.len(), manual_review, "ledger batch complete");

    write_json(&BatchReport {
        reviewed: reviews.len(),
        manual_review,
        reviews: reviews.iter().map(ClaimReview::view).collect(),
    })
}

/// Reviews `evidence` against only the submissions recorded at or before `now`.
fn review_as_of(
    evidence: &ClaimEvidence,
    history: &InMemorySubmissionHistory,
    now: DateTime<Utc>,
    policy: ReviewPolicy,
) -> Result<ClaimReview, ClaimReviewError> {
    ClaimReviewService::new(Arc::new(history.as_of(now)), policy).review(evidence, now)
}

/// Scores each claim at its own submission time, then records it so later claims in the
/// batch see it as prior history.
fn replay(
    claims: &[ClaimSubmission],
    history: InMemorySubmissionHistory,
    policy: ReviewPolicy,
) -> Result<Vec<ClaimReview>, ClaimReviewError> {
    let mut reviews = Vec::with_capacity(claims.len());

    for claim in claims {
        reviews.push(review_as_of(
            &claim.evidence,
            &history,
            claim.submitted_at,
            policy,
        )?);
        history.record(SubmissionHistoryRecord {
            actor_id: claim.evidence.actor_id.clone(),
            family_id: claim.evidence.family_id.clone(),
            created_at: claim.submitted_at,
        });
    }

    Ok(reviews)
}
