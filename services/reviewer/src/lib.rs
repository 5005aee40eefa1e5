mod cli;
mod commands;
mod infra;

use family_ledger::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
