//! Ranked leaderboard with movement against the previous period

use crate::rating::engine::RatingRun;
use crate::types::{EntityId, LedgerEntry, RatingState};
use crate::utils::{round_ratio, round_rating};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Games played and results of one competitor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultTally {
    pub games: u32,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl ResultTally {
    /// Share of points earned, a tie counting as half a win
    pub fn win_pct(&self) -> Option<f64> {
        if self.games == 0 {
            return None;
        }
        let points = self.wins as f64 + 0.5 * self.ties as f64;
        Some(round_ratio(points / self.games as f64))
    }
}

/// One row of the leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub entity: EntityId,
    pub rating: f64,
    pub games: u32,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub win_pct: Option<f64>,
    /// Change since the previous period; `None` for competitors new this period
    pub rating_delta: Option<f64>,
    pub previous_rank: Option<usize>,
    /// Previous rank minus current rank; positive means the competitor climbed
    pub rank_delta: Option<i64>,
}

/// Current standings built from a rating run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardView {
    pub rows: Vec<LeaderboardRow>,
}

impl LeaderboardView {
    /// Build the full leaderboard for a run
    pub fn build(run: &RatingRun) -> Self {
        let tallies = tally_results(&run.ledger);
        let baseline = run.previous_snapshot().map(|s| &s.ratings);
        Self::from_parts(&run.ratings, &tallies, baseline)
    }

    /// Build from final ratings, result tallies and an optional baseline
    pub fn from_parts(
        ratings: &RatingState,
        tallies: &BTreeMap<EntityId, ResultTally>,
        baseline: Option<&RatingState>,
    ) -> Self {
        let previous_ranks = baseline.map(rank_by_rating).unwrap_or_default();

        let mut standings: Vec<(&EntityId, f64, ResultTally)> = ratings
            .iter()
            .map(|(entity, &rating)| {
                (
                    entity,
                    rating,
                    tallies.get(entity).copied().unwrap_or_default(),
                )
            })
            .collect();

        // Ratings descending, then wins, then games; identifiers already ascending
        standings.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.2.wins.cmp(&a.2.wins))
                .then_with(|| b.2.games.cmp(&a.2.games))
        });

        let rows = standings
            .into_iter()
            .enumerate()
            .map(|(i, (entity, rating, tally))| {
                let rank = i + 1;
                let rating_delta = baseline
                    .and_then(|prev| prev.get(entity))
                    .map(|prev| round_rating(rating - prev));
                let previous_rank = previous_ranks.get(entity.as_str()).copied();

                LeaderboardRow {
                    rank,
                    entity: entity.clone(),
                    rating,
                    games: tally.games,
                    wins: tally.wins,
                    losses: tally.losses,
                    ties: tally.ties,
                    win_pct: tally.win_pct(),
                    rating_delta,
                    previous_rank,
                    rank_delta: previous_rank.map(|prev| prev as i64 - rank as i64),
                }
            })
            .collect();

        Self { rows }
    }

    /// Keep only the first `n` rows
    pub fn top(mut self, n: usize) -> Self {
        self.rows.truncate(n);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, entity: &str) -> Option<&LeaderboardRow> {
        self.rows.iter().find(|row| row.entity == entity)
    }
}

/// Wins, losses and ties of every competitor in the ledger
pub fn tally_results(ledger: &[LedgerEntry]) -> BTreeMap<EntityId, ResultTally> {
    let mut tallies: BTreeMap<EntityId, ResultTally> = BTreeMap::new();

    for entry in ledger {
        for (entity, _, _) in entry.sides() {
            let tally = tallies.entry(entity.to_string()).or_default();
            tally.games += 1;
            match &entry.winner {
                None => tally.ties += 1,
                Some(winner) if winner == entity => tally.wins += 1,
                Some(_) => tally.losses += 1,
            }
        }
    }

    tallies
}

/// 1-based rank of each competitor by rating; equal ratings ordered by identifier
fn rank_by_rating(ratings: &RatingState) -> HashMap<&str, usize> {
    let mut ordered: Vec<(&str, f64)> = ratings.iter().map(|(e, &r)| (e.as_str(), r)).collect();
    ordered.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    ordered
        .into_iter()
        .enumerate()
        .map(|(i, (entity, _))| (entity, i + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::engine::RatingEngine;
    use crate::types::{MatchRecord, Period};

    fn game(week: u32, a: &str, b: &str, sa: f64, sb: f64) -> MatchRecord {
        MatchRecord::new(Period::new(2023, week), a, b, Some(sa), Some(sb))
    }

    #[test]
    fn test_movement_against_previous_period() {
        let log = vec![
            game(1, "A", "B", 1.0, 0.0),
            game(2, "B", "A", 1.0, 0.0),
            game(2, "B", "C", 1.0, 0.0),
        ];
        let run = RatingEngine::default().run(&log);
        let board = LeaderboardView::build(&run);

        assert_eq!(board.rows.len(), 3);
        let b = board.get("B").unwrap();
        assert_eq!(b.rank, 1);
        assert_eq!(b.previous_rank, Some(2));
        assert_eq!(b.rank_delta, Some(1));
        assert!(b.rating_delta.unwrap() > 0.0);
        assert_eq!(b.wins, 2);
        assert_eq!(b.losses, 1);

        // C was not rated last period, so movement is undefined rather than zero
        let c = board.get("C").unwrap();
        assert_eq!(c.rating_delta, None);
        assert_eq!(c.previous_rank, None);
        assert_eq!(c.rank_delta, None);
    }

    #[test]
    fn test_single_period_has_no_baseline() {
        let run = RatingEngine::default().run(&[game(1, "A", "B", 3.0, 1.0)]);
        let board = LeaderboardView::build(&run);

        assert_eq!(board.rows[0].entity, "A");
        assert!(board.rows.iter().all(|r| r.rank_delta.is_none()));
        assert_eq!(board.rows[0].win_pct, Some(1.0));
    }

    #[test]
    fn test_equal_ratings_sorted_by_wins_then_games() {
        let ratings: RatingState = [("X", 1000.0), ("Y", 1000.0), ("Z", 1000.0)]
            .into_iter()
            .map(|(e, r)| (e.to_string(), r))
            .collect();
        let mut tallies = BTreeMap::new();
        tallies.insert(
            "X".to_string(),
            ResultTally {
                games: 4,
                wins: 1,
                losses: 1,
                ties: 2,
            },
        );
        tallies.insert(
            "Y".to_string(),
            ResultTally {
                games: 2,
                wins: 1,
                losses: 1,
                ties: 0,
            },
        );
        tallies.insert(
            "Z".to_string(),
            ResultTally {
                games: 3,
                wins: 2,
                losses: 1,
                ties: 0,
            },
        );

        let board = LeaderboardView::from_parts(&ratings, &tallies, None);
        let order: Vec<&str> = board.rows.iter().map(|r| r.entity.as_str()).collect();
        assert_eq!(order, vec!["Z", "X", "Y"]);
        assert_eq!(board.get("X").unwrap().win_pct, Some(0.5));
    }

    #[test]
    fn test_top_truncates() {
        let log = vec![game(1, "A", "B", 1.0, 0.0), game(1, "C", "D", 1.0, 0.0)];
        let run = RatingEngine::default().run(&log);
        let board = LeaderboardView::build(&run).top(2);
        assert_eq!(board.rows.len(), 2);
        assert!(LeaderboardView::default().is_empty());
    }
}
