//! Rating calculator trait and the Elo implementation
//!
//! The engine only talks to [`RatingCalculator`]; the Elo math itself comes
//! from the skillratings crate.

use crate::config::RatingConfig;
use crate::types::MatchOutcome;
use crate::utils::round_rating;
use serde::{Deserialize, Serialize};
use skillratings::elo::{elo, expected_score, EloConfig, EloRating};
use skillratings::Outcomes;

/// Ratings of both sides after one match
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingUpdate {
    /// Win probability of side A before the match
    pub expected_a: f64,
    /// Rating moved from B to A (negative when A lost rating)
    pub delta_a: f64,
    pub rating_a: f64,
    pub rating_b: f64,
}

/// Trait for calculating rating changes after a head-to-head match
pub trait RatingCalculator: Send + Sync {
    /// Probability that a player rated `rating` beats one rated `opponent`
    fn expected_score(&self, rating: f64, opponent: f64) -> f64;

    /// Calculate both new ratings for a match with the given outcome
    ///
    /// # Arguments
    /// * `rating_a` - Current rating of side A
    /// * `rating_b` - Current rating of side B
    /// * `outcome` - Result from side A's point of view
    fn rate_match(&self, rating_a: f64, rating_b: f64, outcome: MatchOutcome) -> RatingUpdate;

    /// Rating assigned to a competitor on their first match
    fn initial_rating(&self) -> f64;

    /// Get current configuration as JSON
    fn config(&self) -> serde_json::Value;
}

impl From<MatchOutcome> for Outcomes {
    fn from(outcome: MatchOutcome) -> Self {
        match outcome {
            MatchOutcome::WinA => Outcomes::WIN,
            MatchOutcome::WinB => Outcomes::LOSS,
            MatchOutcome::Draw => Outcomes::DRAW,
        }
    }
}

/// Classic two-player Elo with a fixed K-factor
#[derive(Debug, Clone)]
pub struct EloRatingCalculator {
    config: RatingConfig,
    elo_config: EloConfig,
}

impl EloRatingCalculator {
    /// Create a new Elo calculator, rejecting unusable parameters
    pub fn new(config: RatingConfig) -> crate::error::Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            elo_config: EloConfig {
                k: config.k_factor,
            },
        })
    }

    pub fn k_factor(&self) -> f64 {
        self.config.k_factor
    }
}

impl Default for EloRatingCalculator {
    fn default() -> Self {
        let config = RatingConfig::default();
        Self {
            config,
            elo_config: EloConfig {
                k: config.k_factor,
            },
        }
    }
}

impl RatingCalculator for EloRatingCalculator {
    fn expected_score(&self, rating: f64, opponent: f64) -> f64 {
        let (expected, _) = expected_score(
            &EloRating { rating },
            &EloRating { rating: opponent },
        );
        expected
    }

    fn rate_match(&self, rating_a: f64, rating_b: f64, outcome: MatchOutcome) -> RatingUpdate {
        let player_a = EloRating { rating: rating_a };
        let player_b = EloRating { rating: rating_b };

        let (expected_a, _) = expected_score(&player_a, &player_b);
        let (new_a, _) = elo(&player_a, &player_b, &outcome.into(), &self.elo_config);

        // B gets exactly what A gives up, at stored precision
        let delta_a = round_rating(new_a.rating - rating_a);

        RatingUpdate {
            expected_a,
            delta_a,
            rating_a: round_rating(rating_a + delta_a),
            rating_b: round_rating(rating_b - delta_a),
        }
    }

    fn initial_rating(&self) -> f64 {
        self.config.initial_rating
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "elo",
            "initial_rating": self.config.initial_rating,
            "k_factor": self.config.k_factor
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_match_win() {
        let calculator = EloRatingCalculator::default();
        let update = calculator.rate_match(1000.0, 1000.0, MatchOutcome::WinA);

        assert_eq!(update.expected_a, 0.5);
        assert_eq!(update.delta_a, 16.0);
        assert_eq!(update.rating_a, 1016.0);
        assert_eq!(update.rating_b, 984.0);
    }

    #[test]
    fn test_even_match_draw() {
        let calculator = EloRatingCalculator::default();
        let update = calculator.rate_match(1000.0, 1000.0, MatchOutcome::Draw);

        assert_eq!(update.delta_a, 0.0);
        assert_eq!(update.rating_a, 1000.0);
        assert_eq!(update.rating_b, 1000.0);
    }

    #[test]
    fn test_underdog_win_moves_more() {
        let calculator = EloRatingCalculator::default();
        let upset = calculator.rate_match(1000.0, 1200.0, MatchOutcome::WinA);
        let expected = calculator.rate_match(1200.0, 1000.0, MatchOutcome::WinA);

        assert!(upset.delta_a > 16.0);
        assert!(expected.delta_a < 16.0);
        // 1 / (1 + 10^(200/400)) ~= 0.2403
        assert!((upset.expected_a - 0.2403).abs() < 1e-4);
        assert_eq!(upset.delta_a, 24.31);
    }

    #[test]
    fn test_expected_score_symmetry() {
        let calculator = EloRatingCalculator::default();
        for (a, b) in [(1000.0, 1000.0), (1234.5, 987.25), (400.0, 2400.0)] {
            let sum = calculator.expected_score(a, b) + calculator.expected_score(b, a);
            assert!((sum - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_loss_is_zero_sum() {
        let calculator = EloRatingCalculator::default();
        let update = calculator.rate_match(1043.17, 968.02, MatchOutcome::WinB);

        assert!(update.delta_a < 0.0);
        let change_a = update.rating_a - 1043.17;
        let change_b = update.rating_b - 968.02;
        assert!((change_a + change_b).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(EloRatingCalculator::new(RatingConfig::new(1000.0, 0.0)).is_err());
    }

    #[test]
    fn test_config_json() {
        let calculator = EloRatingCalculator::new(RatingConfig::new(1200.0, 20.0)).unwrap();
        let json = calculator.config();
        assert_eq!(json["type"], "elo");
        assert_eq!(json["k_factor"], 20.0);
        assert_eq!(calculator.initial_rating(), 1200.0);
    }
}
