//! Elo rating engine and the analytics derived from it
//!
//! This module folds a match log into ratings, tracks who held first place
//! period by period, and extracts records and leaderboards from the result.

pub mod calculator;
pub mod engine;
pub mod leaderboard;
pub mod records;
pub mod streak;

// Re-export commonly used types
pub use calculator::{EloRatingCalculator, RatingCalculator, RatingUpdate};
pub use engine::{HistoryPoint, RatingEngine, RatingRun, RunStatus};
pub use leaderboard::{LeaderboardRow, LeaderboardView, ResultTally};
pub use records::{RatingExtremes, RecordsExtractor, ResultKind, ResultStreak};
pub use streak::{leader_of, StreakTracker};
