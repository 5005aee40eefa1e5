use crate::commands::{run_batch, run_score, BatchArgs, ScoreArgs};
use clap::{Parser, Subcommand};
use family_ledger::config::AppConfig;
use family_ledger::error::AppError;
use family_ledger::telemetry;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "Family Ledger Reviewer",
    about = "Score contribution claims for fraud risk and route them for review",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a single claim described by a JSON file
    Score(ScoreArgs),
    /// Replay a CSV export of claims in submission order
    Batch(BatchArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(
        environment = ?config.environment,
        manual_review_threshold = config.review.manual_review_threshold,
        "reviewer configured"
    );

    match cli.command {
        Command::Score(args) => run_score(args, &config),
        Command::Batch(args) => run_batch(args, &config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn score_accepts_optional_history_and_now() {
        let cli = Cli::try_parse_from([
            "reviewer",
            "score",
            "--claim",
            "claim.json",
            "--history",
            "history.csv",
            "--now",
            "2025-06-15T12:00:00Z",
        ])
        .expect("arguments parse");

        match cli.command {
            Command::Score(args) => {
                assert_eq!(args.claim.to_str(), Some("claim.json"));
                assert!(args.history.is_some());
                assert!(args.now.is_some());
            }
            other => panic!("expected score command, got {other:?}"),
        }
    }

    #[test]
    fn batch_requires_claims_file() {
        assert!(Cli::try_parse_from(["reviewer", "batch"]).is_err());
    }

    #[test]
    fn rejects_malformed_now() {
        assert!(Cli::try_parse_from([
            "reviewer",
            "score",
            "--claim",
            "claim.json",
            "--now",
            "yesterday",
        ])
        .is_err());
    }
}
