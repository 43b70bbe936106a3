//! Common types used throughout the rating engine

use crate::error::MatchRejection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier of a competitor (an owner or a team name)
pub type EntityId = String;

/// Current rating of every competitor that has played at least once
pub type RatingState = BTreeMap<EntityId, f64>;

/// Ordering unit used to batch matches, e.g. season 2023 week 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub season: i32,
    pub week: u32,
}

impl Period {
    pub fn new(season: i32, week: u32) -> Self {
        Self { season, week }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} W{:02}", self.season, self.week)
    }
}

/// One row of the match log as delivered by ingestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub period: Period,
    pub entity_a: EntityId,
    pub entity_b: EntityId,
    pub score_a: Option<f64>,
    pub score_b: Option<f64>,
}

impl MatchRecord {
    pub fn new(
        period: Period,
        entity_a: impl Into<EntityId>,
        entity_b: impl Into<EntityId>,
        score_a: Option<f64>,
        score_b: Option<f64>,
    ) -> Self {
        Self {
            period,
            entity_a: entity_a.into(),
            entity_b: entity_b.into(),
            score_a,
            score_b,
        }
    }

    /// Check the row and turn it into a [`Match`] that can be folded.
    ///
    /// `row` is the position of the record in the original log.
    pub fn validate(&self, row: usize) -> std::result::Result<Match, MatchRejection> {
        let entity_a = self.entity_a.trim();
        let entity_b = self.entity_b.trim();
        if entity_a.is_empty() || entity_b.is_empty() {
            return Err(MatchRejection::EmptyEntity);
        }
        if entity_a == entity_b {
            return Err(MatchRejection::SelfMatch);
        }

        let (score_a, score_b) = match (self.score_a, self.score_b) {
            (Some(a), Some(b)) => (a, b),
            _ => return Err(MatchRejection::MissingScore),
        };
        if !score_a.is_finite() || !score_b.is_finite() {
            return Err(MatchRejection::NonFiniteScore);
        }

        Ok(Match {
            row,
            period: self.period,
            entity_a: entity_a.to_string(),
            entity_b: entity_b.to_string(),
            score_a,
            score_b,
        })
    }
}

/// Ordered collection of match rows
pub type MatchLog = Vec<MatchRecord>;

/// A validated, completed match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Position of the source row in the match log
    pub row: usize,
    pub period: Period,
    pub entity_a: EntityId,
    pub entity_b: EntityId,
    pub score_a: f64,
    pub score_b: f64,
}

impl Match {
    /// Result from side A's point of view
    pub fn outcome(&self) -> MatchOutcome {
        if self.score_a > self.score_b {
            MatchOutcome::WinA
        } else if self.score_a < self.score_b {
            MatchOutcome::WinB
        } else {
            MatchOutcome::Draw
        }
    }
}

/// Result of a head-to-head match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOutcome {
    WinA,
    WinB,
    Draw,
}

/// One rating transition recorded by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Position of this entry in the fold
    pub sequence: usize,
    /// Position of the source row in the match log
    pub row: usize,
    pub period: Period,
    pub entity_a: EntityId,
    pub entity_b: EntityId,
    pub score_a: f64,
    pub score_b: f64,
    /// Win probability of side A before the match
    pub expected_a: f64,
    pub rating_a_before: f64,
    pub rating_b_before: f64,
    pub rating_a_after: f64,
    pub rating_b_after: f64,
    pub delta_a: f64,
    pub delta_b: f64,
    /// `None` for a draw
    pub winner: Option<EntityId>,
}

impl LedgerEntry {
    /// Both sides of the entry as (entity, delta, opponent)
    pub fn sides(&self) -> [(&str, f64, &str); 2] {
        [
            (self.entity_a.as_str(), self.delta_a, self.entity_b.as_str()),
            (self.entity_b.as_str(), self.delta_b, self.entity_a.as_str()),
        ]
    }

    /// Post-match ratings as (entity, rating)
    pub fn ratings_after(&self) -> [(&str, f64); 2] {
        [
            (self.entity_a.as_str(), self.rating_a_after),
            (self.entity_b.as_str(), self.rating_b_after),
        ]
    }

    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }
}

/// Full rating state at the end of a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSnapshot {
    pub period: Period,
    pub ratings: RatingState,
}

/// Consecutive periods with the same competitor in first place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Streak {
    pub owner: EntityId,
    pub length: usize,
    pub start: Period,
    pub end: Period,
}

/// A rating value reached by a competitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingMark {
    pub entity: EntityId,
    pub rating: f64,
    pub period: Period,
}

/// A single-match rating swing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwingMark {
    pub entity: EntityId,
    pub opponent: EntityId,
    pub delta: f64,
    pub period: Period,
}

/// Number of periods a competitor spent in first place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCount {
    pub entity: EntityId,
    pub periods: usize,
}

/// Headline records of a rating run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub peak: Option<RatingMark>,
    pub trough: Option<RatingMark>,
    pub biggest_gain: Option<SwingMark>,
    pub biggest_loss: Option<SwingMark>,
    pub most_periods_at_top: Option<TopCount>,
    pub longest_top_streak: Option<Streak>,
}

impl RatingRecord {
    /// True when there was no data to derive any record from
    pub fn is_empty(&self) -> bool {
        self.peak.is_none()
            && self.trough.is_none()
            && self.biggest_gain.is_none()
            && self.biggest_loss.is_none()
            && self.most_periods_at_top.is_none()
            && self.longest_top_streak.is_none()
    }
}

/// A match row that was excluded from the fold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedMatch {
    pub row: usize,
    pub reason: MatchRejection,
}
