pub mod claims;
pub mod ledger_import;
