//! Rating system configuration

use crate::error::RatingError;
use serde::{Deserialize, Serialize};

/// Largest rating magnitude the fold accepts. Ratings are stored as hundredths
/// in an `f64`, which stays exact well past this bound.
pub const MAX_RATING_MAGNITUDE: f64 = 1e9;

/// Parameters of the Elo fold. One fixed pair is used for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Rating a competitor starts from on their first match
    pub initial_rating: f64,
    /// Maximum rating a single match can move
    pub k_factor: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            initial_rating: 1000.0,
            k_factor: 32.0,
        }
    }
}

impl RatingConfig {
    pub fn new(initial_rating: f64, k_factor: f64) -> Self {
        Self {
            initial_rating,
            k_factor,
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.k_factor.is_finite() || self.k_factor <= 0.0 {
            return Err(RatingError::configuration(format!(
                "K-factor must be a positive number, got {}",
                self.k_factor
            ))
            .into());
        }

        if self.k_factor > MAX_RATING_MAGNITUDE {
            return Err(RatingError::configuration(format!(
                "K-factor must not exceed {}, got {}",
                MAX_RATING_MAGNITUDE, self.k_factor
            ))
            .into());
        }

        if !self.initial_rating.is_finite() {
            return Err(RatingError::configuration(format!(
                "Initial rating must be finite, got {}",
                self.initial_rating
            ))
            .into());
        }

        if self.initial_rating.abs() > MAX_RATING_MAGNITUDE {
            return Err(RatingError::configuration(format!(
                "Initial rating must be within ±{}, got {}",
                MAX_RATING_MAGNITUDE, self.initial_rating
            ))
            .into());
        }

        Ok(())
    }
}
