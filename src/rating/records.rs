//! Records derived from a finished rating run
//!
//! Everything here is a reduction over the ledger and the period snapshots.
//! Nothing is re-simulated.

use crate::rating::engine::RatingRun;
use crate::rating::streak::{leader_of, StreakTracker};
use crate::types::{
    EntityId, LedgerEntry, Period, PeriodSnapshot, RatingMark, RatingRecord, SwingMark,
    TopCount,
};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Highest and lowest rating one competitor reached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingExtremes {
    pub peak: f64,
    pub peak_period: Period,
    pub trough: f64,
    pub trough_period: Period,
}

/// Kind of consecutive-result run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultKind {
    Win,
    Loss,
}

/// Consecutive wins or losses of a single competitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultStreak {
    pub entity: EntityId,
    pub kind: ResultKind,
    pub length: usize,
    pub start: Period,
    pub end: Period,
}

pub struct RecordsExtractor;

impl RecordsExtractor {
    /// All headline records of a run
    pub fn extract(run: &RatingRun) -> RatingRecord {
        Self::extract_from(&run.ledger, &run.snapshots)
    }

    pub fn extract_from(ledger: &[LedgerEntry], snapshots: &[PeriodSnapshot]) -> RatingRecord {
        let (peak, trough) = Self::peak_and_trough(ledger);
        let (biggest_gain, biggest_loss) = Self::biggest_swings(ledger);

        RatingRecord {
            peak,
            trough,
            biggest_gain,
            biggest_loss,
            most_periods_at_top: Self::most_periods_at_top(snapshots),
            longest_top_streak: StreakTracker::longest(snapshots),
        }
    }

    /// Global highest and lowest post-match rating, first attainment wins ties
    pub fn peak_and_trough(ledger: &[LedgerEntry]) -> (Option<RatingMark>, Option<RatingMark>) {
        let mut peak: Option<RatingMark> = None;
        let mut trough: Option<RatingMark> = None;

        for entry in ledger {
            for (entity, rating) in entry.ratings_after() {
                if peak.as_ref().map_or(true, |p| rating > p.rating) {
                    peak = Some(RatingMark {
                        entity: entity.to_string(),
                        rating,
                        period: entry.period,
                    });
                }
                if trough.as_ref().map_or(true, |t| rating < t.rating) {
                    trough = Some(RatingMark {
                        entity: entity.to_string(),
                        rating,
                        period: entry.period,
                    });
                }
            }
        }

        (peak, trough)
    }

    /// Largest positive and most negative single-match deltas
    pub fn biggest_swings(ledger: &[LedgerEntry]) -> (Option<SwingMark>, Option<SwingMark>) {
        let mut gain: Option<SwingMark> = None;
        let mut loss: Option<SwingMark> = None;

        for entry in ledger {
            for (entity, delta, opponent) in entry.sides() {
                let mark = || SwingMark {
                    entity: entity.to_string(),
                    opponent: opponent.to_string(),
                    delta,
                    period: entry.period,
                };
                if delta > 0.0 && gain.as_ref().map_or(true, |g| delta > g.delta) {
                    gain = Some(mark());
                }
                if delta < 0.0 && loss.as_ref().map_or(true, |l| delta < l.delta) {
                    loss = Some(mark());
                }
            }
        }

        (gain, loss)
    }

    /// Number of periods each competitor finished in first place
    pub fn top_counts(snapshots: &[PeriodSnapshot]) -> BTreeMap<EntityId, usize> {
        let mut counts = BTreeMap::new();
        for snapshot in snapshots {
            if let Some((leader, _)) = leader_of(&snapshot.ratings) {
                *counts.entry(leader.to_string()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Competitor with the most periods at #1; equal counts go to the smallest identifier
    pub fn most_periods_at_top(snapshots: &[PeriodSnapshot]) -> Option<TopCount> {
        Self::top_counts(snapshots)
            .into_iter()
            .fold(None, |best: Option<TopCount>, (entity, periods)| match best {
                Some(b) if b.periods >= periods => Some(b),
                _ => Some(TopCount { entity, periods }),
            })
    }

    /// Peak and trough of every competitor, from post-match ratings only
    pub fn entity_extremes(ledger: &[LedgerEntry]) -> BTreeMap<EntityId, RatingExtremes> {
        let mut extremes: BTreeMap<EntityId, RatingExtremes> = BTreeMap::new();

        for entry in ledger {
            for (entity, rating) in entry.ratings_after() {
                match extremes.get_mut(entity) {
                    Some(e) => {
                        if rating > e.peak {
                            e.peak = rating;
                            e.peak_period = entry.period;
                        }
                        if rating < e.trough {
                            e.trough = rating;
                            e.trough_period = entry.period;
                        }
                    }
                    None => {
                        extremes.insert(
                            entity.to_string(),
                            RatingExtremes {
                                peak: rating,
                                peak_period: entry.period,
                                trough: rating,
                                trough_period: entry.period,
                            },
                        );
                    }
                }
            }
        }

        extremes
    }

    /// Longest runs of consecutive wins or losses, longest first.
    ///
    /// A draw ends both kinds of run. Equal lengths list the run that started
    /// earliest in fold order first.
    pub fn result_streaks(
        ledger: &[LedgerEntry],
        kind: ResultKind,
        limit: usize,
    ) -> Vec<ResultStreak> {
        // Keyed by (sequence, side) of the match that opened the run
        let mut open: BTreeMap<&str, ((usize, usize), ResultStreak)> = BTreeMap::new();
        let mut closed = Vec::new();

        for entry in ledger {
            for (side, (entity, _, _)) in entry.sides().into_iter().enumerate() {
                let hit = match (&entry.winner, kind) {
                    (Some(winner), ResultKind::Win) => winner == entity,
                    (Some(winner), ResultKind::Loss) => winner != entity,
                    (None, _) => false,
                };

                if hit {
                    open.entry(entity)
                        .and_modify(|(_, s)| {
                            s.length += 1;
                            s.end = entry.period;
                        })
                        .or_insert_with(|| {
                            (
                                (entry.sequence, side),
                                ResultStreak {
                                    entity: entity.to_string(),
                                    kind,
                                    length: 1,
                                    start: entry.period,
                                    end: entry.period,
                                },
                            )
                        });
                } else if let Some(done) = open.remove(entity) {
                    closed.push(done);
                }
            }
        }

        closed.extend(open.into_values());
        closed.sort_by_key(|(opened, s)| (Reverse(s.length), *opened));
        closed
            .into_iter()
            .take(limit)
            .map(|(_, streak)| streak)
            .collect()
    }
}
