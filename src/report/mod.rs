//! Input and output of match logs and rating results
//!
//! Reads the cleaned match log handed over by ingestion and writes the
//! engine's structures as CSV tables or a JSON report.

pub mod input;
pub mod output;

// Re-export commonly used types
pub use input::{read_match_log, read_match_log_file};
pub use output::{
    write_leaderboard_csv, write_ledger_csv, write_outputs, write_snapshots_csv, RatingReport,
    RunSummary,
};
