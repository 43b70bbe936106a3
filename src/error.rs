//! Error types for the rating engine
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application.

use serde::{Deserialize, Serialize};

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating scenarios
#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Failed to read match log: {message}")]
    Input { message: String },

    #[error("Invalid match at row {row}: {reason}")]
    InvalidMatch { row: usize, reason: MatchRejection },
}

/// Why a match row was excluded from the fold.
///
/// These are recovered locally: the row is dropped and counted, the fold
/// carries on with the remaining matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum MatchRejection {
    #[error("missing score")]
    MissingScore,

    #[error("score is not a finite number")]
    NonFiniteScore,

    #[error("empty competitor identifier")]
    EmptyEntity,

    #[error("competitor cannot play against itself")]
    SelfMatch,
}

impl RatingError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
        }
    }
}
