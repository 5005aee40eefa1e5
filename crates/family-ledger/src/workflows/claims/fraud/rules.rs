use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::workflows::claims::domain::{ClaimEvidence, SubmissionChannel, SubmissionHistoryRecord};
use crate::workflows::claims::fraud::{RiskComponent, SignalCategory};

const PROOFLESS_POINTS: u8 = 50;
const UNPARSED_MESSAGE_POINTS: u8 = 30;
const LOW_CONFIDENCE_POINTS: u8 = 20;
const STALE_90_DAY_POINTS: u8 = 30;
const STALE_30_DAY_POINTS: u8 = 10;
const RAPID_SUBMISSION_POINTS: u8 = 30;
const FREQUENT_SUBMISSION_POINTS: u8 = 10;

const CONFIDENCE_FLOOR: f64 = 0.8;
const STALE_LONG_DAYS: f64 = 90.0;
const STALE_SHORT_DAYS: f64 = 30.0;
const RAPID_MINUTES: f64 = 5.0;
const FREQUENT_MINUTES: f64 = 15.0;

const MILLIS_PER_MINUTE: f64 = 60_000.0;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Applies every rule in evaluation order. Each category yields at most one component.
pub(crate) fn score_evidence(
    evidence: &ClaimEvidence,
    prior: Option<&SubmissionHistoryRecord>,
    now: DateTime<Utc>,
) -> Vec<RiskComponent> {
    let components: Vec<RiskComponent> = [
        proof_rule(evidence),
        parser_confidence_rule(evidence),
        staleness_rule(evidence.payment_date, now),
        velocity_rule(prior, now),
    ]
    .into_iter()
    .flatten()
    .collect();

    for component in &components {
        debug!(
            category = component.category.label(),
            points = component.points,
            reason = %component.reason,
            "fraud rule triggered"
        );
    }

    components
}

fn proof_rule(evidence: &ClaimEvidence) -> Option<RiskComponent> {
    if evidence.has_proof {
        return None;
    }

    Some(RiskComponent {
        category: SignalCategory::Proof,
        points: PROOFLESS_POINTS,
        reason: "Proofless claim (manual entry)".to_string(),
    })
}

fn parser_confidence_rule(evidence: &ClaimEvidence) -> Option<RiskComponent> {
    if evidence.submission_channel != SubmissionChannel::Message {
        return None;
    }

    match evidence.parser_confidence {
        None => Some(RiskComponent {
            category: SignalCategory::ParserConfidence,
            points: UNPARSED_MESSAGE_POINTS,
            reason: "Message could not be parsed automatically".to_string(),
        }),
        Some(confidence) if confidence < CONFIDENCE_FLOOR => Some(RiskComponent {
            category: SignalCategory::ParserConfidence,
            points: LOW_CONFIDENCE_POINTS,
            reason: format!(
                "Low parser confidence ({}%)",
                confidence_percent(confidence)
            ),
        }),
        Some(_) => None,
    }
}

fn staleness_rule(payment_date: DateTime<Utc>, now: DateTime<Utc>) -> Option<RiskComponent> {
    let elapsed_days = elapsed_millis(payment_date, now) / MILLIS_PER_DAY;

    if elapsed_days > STALE_LONG_DAYS {
        Some(RiskComponent {
            category: SignalCategory::Staleness,
            points: STALE_90_DAY_POINTS,
            reason: "Payment is over 90 days old".to_string(),
        })
    } else if elapsed_days > STALE_SHORT_DAYS {
        Some(RiskComponent {
            category: SignalCategory::Staleness,
            points: STALE_30_DAY_POINTS,
            reason: "Payment is over 30 days old".to_string(),
        })
    } else {
        None
    }
}

fn velocity_rule(
    prior: Option<&SubmissionHistoryRecord>,
    now: DateTime<Utc>,
) -> Option<RiskComponent> {
    let prior = prior?;
    let elapsed_minutes = elapsed_millis(prior.created_at, now) / MILLIS_PER_MINUTE;

    if elapsed_minutes < 0.0 {
        warn!(
            actor = %prior.actor_id,
            family = %prior.family_id,
            created_at = %prior.created_at,
            "prior submission is dated after the scoring time; skipping velocity rule"
        );
        return None;
    }

    if elapsed_minutes < RAPID_MINUTES {
        Some(RiskComponent {
            category: SignalCategory::Velocity,
            points: RAPID_SUBMISSION_POINTS,
            reason: "Rapid submission (less than 5 mins since last)".to_string(),
        })
    } else if elapsed_minutes < FREQUENT_MINUTES {
        Some(RiskComponent {
            category: SignalCategory::Velocity,
            points: FREQUENT_SUBMISSION_POINTS,
            reason: "Frequent submission (less than 15 mins since last)".to_string(),
        })
    } else {
        None
    }
}

fn elapsed_millis(since: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - since).num_milliseconds() as f64
}

/// Whole percentage, rounding half away from zero. Confidence is validated to `[0, 1]`.
fn confidence_percent(confidence: f64) -> u8 {
    (confidence * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
pub(crate) fn confidence_percent_for_tests(confidence: f64) -> u8 {
    confidence_percent(confidence)
}
