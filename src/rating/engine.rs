//! Sequential Elo fold over a match log
//!
//! The engine keeps no state between runs: every call to [`RatingEngine::run`]
//! replays the whole log from scratch and returns the ledger, the final
//! ratings and one snapshot per period.

use crate::config::RatingConfig;
use crate::error::RatingError;
use crate::rating::calculator::{EloRatingCalculator, RatingCalculator};
use crate::types::{
    EntityId, LedgerEntry, Match, MatchOutcome, MatchRecord, Period, PeriodSnapshot,
    RatingState, RejectedMatch,
};
use crate::utils::round_rating;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Whether a run had anything to rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Rated,
    /// Zero valid matches; downstream views should render an empty state
    NoData,
}

/// A point on a competitor's rating timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub sequence: usize,
    pub period: Period,
    pub rating: f64,
}

/// Everything produced by one pass over the match log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingRun {
    pub ledger: Vec<LedgerEntry>,
    pub ratings: RatingState,
    pub snapshots: Vec<PeriodSnapshot>,
    pub rejected: Vec<RejectedMatch>,
}

impl RatingRun {
    pub fn status(&self) -> RunStatus {
        if self.ledger.is_empty() {
            RunStatus::NoData
        } else {
            RunStatus::Rated
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status() == RunStatus::NoData
    }

    /// Current #1 competitor and their rating
    pub fn leader(&self) -> Option<(&str, f64)> {
        crate::rating::streak::leader_of(&self.ratings)
    }

    /// Rating after each match the competitor played, in fold order
    pub fn history(&self, entity: &str) -> Vec<HistoryPoint> {
        self.ledger
            .iter()
            .filter_map(|entry| {
                entry
                    .ratings_after()
                    .into_iter()
                    .find(|(name, _)| *name == entity)
                    .map(|(_, rating)| HistoryPoint {
                        sequence: entry.sequence,
                        period: entry.period,
                        rating,
                    })
            })
            .collect()
    }

    /// The snapshot before the latest one, used as the movement baseline
    pub fn previous_snapshot(&self) -> Option<&PeriodSnapshot> {
        self.snapshots.len().checked_sub(2).map(|i| &self.snapshots[i])
    }
}

/// Elo rating engine
pub struct RatingEngine {
    calculator: Box<dyn RatingCalculator>,
}

impl RatingEngine {
    /// Create an engine with the Elo calculator, validating the config
    pub fn new(config: RatingConfig) -> crate::error::Result<Self> {
        let calculator = EloRatingCalculator::new(config)?;
        Ok(Self::with_calculator(Box::new(calculator)))
    }

    /// Create an engine around any rating calculator
    pub fn with_calculator(calculator: Box<dyn RatingCalculator>) -> Self {
        Self { calculator }
    }

    pub fn calculator(&self) -> &dyn RatingCalculator {
        self.calculator.as_ref()
    }

    /// Drop malformed rows and order the rest by period.
    ///
    /// Matches sharing a period keep their relative order.
    pub fn prepare(&self, log: &[MatchRecord]) -> (Vec<Match>, Vec<RejectedMatch>) {
        let mut matches = Vec::with_capacity(log.len());
        let mut rejected = Vec::new();

        for (row, record) in log.iter().enumerate() {
            match record.validate(row) {
                Ok(m) => matches.push(m),
                Err(reason) => {
                    debug!("Skipping {}", RatingError::InvalidMatch { row, reason });
                    rejected.push(RejectedMatch { row, reason });
                }
            }
        }

        matches.sort_by_key(|m| m.period);
        (matches, rejected)
    }

    /// Replay the whole match log and return the resulting run
    pub fn run(&self, log: &[MatchRecord]) -> RatingRun {
        let (matches, rejected) = self.prepare(log);
        if !rejected.is_empty() {
            warn!(
                "Excluded {} of {} match rows from rating",
                rejected.len(),
                log.len()
            );
        }

        let mut run = self.fold(&matches);
        run.rejected = rejected;

        match run.status() {
            RunStatus::Rated => info!(
                "Rated {} matches across {} periods for {} competitors",
                run.ledger.len(),
                run.snapshots.len(),
                run.ratings.len()
            ),
            RunStatus::NoData => info!("No valid matches to rate"),
        }

        run
    }

    /// Fold already-validated matches in the given order
    pub fn fold(&self, matches: &[Match]) -> RatingRun {
        let mut ratings = RatingState::new();
        let mut ledger = Vec::with_capacity(matches.len());
        let mut snapshots = Vec::new();
        let mut current_period: Option<Period> = None;

        for m in matches {
            if let Some(period) = current_period {
                if period != m.period {
                    snapshots.push(PeriodSnapshot {
                        period,
                        ratings: ratings.clone(),
                    });
                }
            }
            current_period = Some(m.period);

            let entry = self.apply(&mut ratings, m, ledger.len());
            ledger.push(entry);
        }

        if let Some(period) = current_period {
            snapshots.push(PeriodSnapshot {
                period,
                ratings: ratings.clone(),
            });
        }

        RatingRun {
            ledger,
            ratings,
            snapshots,
            rejected: Vec::new(),
        }
    }

    fn apply(&self, ratings: &mut RatingState, m: &Match, sequence: usize) -> LedgerEntry {
        // Debut ratings are stored at the same precision as every later rating
        let initial = round_rating(self.calculator.initial_rating());
        let before_a = *ratings.entry(m.entity_a.clone()).or_insert(initial);
        let before_b = *ratings.entry(m.entity_b.clone()).or_insert(initial);

        let outcome = m.outcome();
        let update = self.calculator.rate_match(before_a, before_b, outcome);

        ratings.insert(m.entity_a.clone(), update.rating_a);
        ratings.insert(m.entity_b.clone(), update.rating_b);

        let winner: Option<EntityId> = match outcome {
            MatchOutcome::WinA => Some(m.entity_a.clone()),
            MatchOutcome::WinB => Some(m.entity_b.clone()),
            MatchOutcome::Draw => None,
        };

        LedgerEntry {
            sequence,
            row: m.row,
            period: m.period,
            entity_a: m.entity_a.clone(),
            entity_b: m.entity_b.clone(),
            score_a: m.score_a,
            score_b: m.score_b,
            expected_a: update.expected_a,
            rating_a_before: before_a,
            rating_b_before: before_b,
            rating_a_after: update.rating_a,
            rating_b_after: update.rating_b,
            delta_a: update.delta_a,
            delta_b: -update.delta_a,
            winner,
        }
    }
}

impl Default for RatingEngine {
    fn default() -> Self {
        Self::with_calculator(Box::new(EloRatingCalculator::default()))
    }
}
