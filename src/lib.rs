//! League Elo - rating engine for fantasy-league match history
//!
//! This crate folds a chronological log of head-to-head matches into Elo
//! ratings and derives leaderboards, #1 streaks, and rating records from it.

pub mod config;
pub mod error;
pub mod rating;
pub mod report;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{MatchRejection, RatingError, Result};
pub use types::*;

// Re-export key components
pub use rating::{LeaderboardView, RatingEngine, RatingRun, RecordsExtractor, StreakTracker};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
