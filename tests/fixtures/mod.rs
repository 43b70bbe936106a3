//! Test fixtures and mock implementations for integration testing

#![allow(dead_code)]

use league_elo::rating::{RatingCalculator, RatingUpdate};
use league_elo::types::{MatchLog, MatchOutcome, MatchRecord, Period};
use std::sync::{Arc, Mutex};

/// Completed match with both scores
pub fn game(season: i32, week: u32, a: &str, b: &str, score_a: f64, score_b: f64) -> MatchRecord {
    MatchRecord::new(
        Period::new(season, week),
        a,
        b,
        Some(score_a),
        Some(score_b),
    )
}

/// Match row with a missing score
pub fn unscored(season: i32, week: u32, a: &str, b: &str) -> MatchRecord {
    MatchRecord::new(Period::new(season, week), a, b, None, Some(100.0))
}

/// A small two-season league with a handful of owners
pub fn sample_league() -> MatchLog {
    vec![
        game(2022, 1, "Alice", "Bob", 112.4, 98.1),
        game(2022, 1, "Carol", "Dave", 87.0, 101.3),
        game(2022, 2, "Alice", "Carol", 120.0, 95.5),
        game(2022, 2, "Bob", "Dave", 99.9, 99.9),
        game(2022, 3, "Alice", "Dave", 80.2, 110.0),
        game(2022, 3, "Bob", "Carol", 105.0, 92.3),
        unscored(2022, 4, "Alice", "Bob"),
        game(2023, 1, "Dave", "Alice", 91.0, 130.4),
        game(2023, 1, "Erin", "Bob", 115.0, 70.0),
        game(2023, 2, "Erin", "Alice", 88.0, 89.0),
        game(2023, 2, "Carol", "Dave", 120.0, 100.0),
    ]
}

/// A deterministic pseudo-random league for larger tests and benchmarks
pub fn generated_league(owners: usize, seasons: i32, weeks: u32) -> MatchLog {
    let names: Vec<String> = (0..owners).map(|i| format!("owner_{:02}", i)).collect();
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };

    let mut log = MatchLog::new();
    for season in 0..seasons {
        for week in 1..=weeks {
            for pair in 0..owners / 2 {
                let a = &names[(pair * 2 + week as usize) % owners];
                let b = &names[(pair * 2 + 1 + 3 * week as usize) % owners];
                let score_a = 60.0 + (next() % 900) as f64 / 10.0;
                let score_b = 60.0 + (next() % 900) as f64 / 10.0;
                log.push(game(2000 + season, week, a, b, score_a, score_b));
            }
        }
    }
    log
}

/// Calculator that moves a fixed amount per decisive match and records its calls
#[derive(Debug)]
pub struct FixedDeltaCalculator {
    delta: f64,
    calls: Arc<Mutex<Vec<(f64, f64, MatchOutcome)>>>,
}

/// Calls recorded by a [`FixedDeltaCalculator`]
pub type CallLog = Arc<Mutex<Vec<(f64, f64, MatchOutcome)>>>;

impl FixedDeltaCalculator {
    pub fn new(delta: f64) -> Self {
        Self {
            delta,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle to the recorded calls, still readable after the
    /// calculator has been moved into an engine
    pub fn call_log(&self) -> CallLog {
        Arc::clone(&self.calls)
    }
}

impl RatingCalculator for FixedDeltaCalculator {
    fn expected_score(&self, _rating: f64, _opponent: f64) -> f64 {
        0.5
    }

    fn rate_match(&self, rating_a: f64, rating_b: f64, outcome: MatchOutcome) -> RatingUpdate {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((rating_a, rating_b, outcome));
        }

        let delta_a = match outcome {
            MatchOutcome::WinA => self.delta,
            MatchOutcome::WinB => -self.delta,
            MatchOutcome::Draw => 0.0,
        };

        RatingUpdate {
            expected_a: 0.5,
            delta_a,
            rating_a: rating_a + delta_a,
            rating_b: rating_b - delta_a,
        }
    }

    fn initial_rating(&self) -> f64 {
        100.0
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({ "type": "fixed", "delta": self.delta })
    }
}
