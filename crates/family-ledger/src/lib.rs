//! Fraud risk scoring for family contribution claims.
//!
//! The [`workflows::claims`] module holds the scoring engine and the review service that
//! routes risky claims to administrators. [`workflows::ledger_import`] turns ledger CSV
//! exports into claim evidence and submission history for batch replays.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
