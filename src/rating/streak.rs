//! Tracking who held first place across period snapshots

use crate::types::{PeriodSnapshot, RatingState, Streak};

/// Highest-rated competitor in a rating state.
///
/// Equal top ratings go to the lexicographically smallest identifier.
pub fn leader_of(ratings: &RatingState) -> Option<(&str, f64)> {
    // BTreeMap iterates in identifier order, so a strict comparison keeps the smallest
    let mut best: Option<(&str, f64)> = None;
    for (entity, &rating) in ratings {
        match best {
            Some((_, top)) if rating <= top => {}
            _ => best = Some((entity.as_str(), rating)),
        }
    }
    best
}

/// Detects runs of consecutive periods led by the same competitor
#[derive(Debug, Default)]
pub struct StreakTracker {
    current: Option<Streak>,
    closed: Vec<Streak>,
}

impl StreakTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next snapshot in period order
    pub fn observe(&mut self, snapshot: &PeriodSnapshot) {
        let Some((leader, _)) = leader_of(&snapshot.ratings) else {
            return;
        };

        if let Some(streak) = self.current.as_mut() {
            if streak.owner == leader {
                streak.length += 1;
                streak.end = snapshot.period;
                return;
            }
        }

        if let Some(done) = self.current.take() {
            self.closed.push(done);
        }
        self.current = Some(Streak {
            owner: leader.to_string(),
            length: 1,
            start: snapshot.period,
            end: snapshot.period,
        });
    }

    /// Close the open streak and return every maximal streak in order
    pub fn finish(mut self) -> Vec<Streak> {
        if let Some(done) = self.current.take() {
            self.closed.push(done);
        }
        self.closed
    }

    /// Every maximal streak across the snapshots, in period order
    pub fn streaks(snapshots: &[PeriodSnapshot]) -> Vec<Streak> {
        let mut tracker = Self::new();
        for snapshot in snapshots {
            tracker.observe(snapshot);
        }
        tracker.finish()
    }

    /// The longest streak; the earliest one wins a tie
    pub fn longest(snapshots: &[PeriodSnapshot]) -> Option<Streak> {
        Self::streaks(snapshots)
            .into_iter()
            .fold(None, |best: Option<Streak>, streak| match best {
                Some(b) if b.length >= streak.length => Some(b),
                _ => Some(streak),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Period;

    fn snapshot(week: u32, ratings: &[(&str, f64)]) -> PeriodSnapshot {
        PeriodSnapshot {
            period: Period::new(2023, week),
            ratings: ratings
                .iter()
                .map(|(name, rating)| (name.to_string(), *rating))
                .collect(),
        }
    }

    #[test]
    fn test_leader_tie_break() {
        let s = snapshot(1, &[("Zed", 1016.0), ("Amy", 1016.0), ("Bob", 968.0)]);
        assert_eq!(leader_of(&s.ratings), Some(("Amy", 1016.0)));
        assert_eq!(leader_of(&RatingState::new()), None);
    }

    #[test]
    fn test_three_period_streak_then_rival() {
        let snapshots = vec![
            snapshot(1, &[("A", 1016.0), ("B", 984.0)]),
            snapshot(2, &[("A", 1030.0), ("B", 970.0)]),
            snapshot(3, &[("A", 1010.0), ("B", 990.0)]),
            snapshot(4, &[("A", 990.0), ("B", 1010.0)]),
        ];

        let longest = StreakTracker::longest(&snapshots).unwrap();
        assert_eq!(longest.owner, "A");
        assert_eq!(longest.length, 3);
        assert_eq!(longest.start, Period::new(2023, 1));
        assert_eq!(longest.end, Period::new(2023, 3));

        let all = StreakTracker::streaks(&snapshots);
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].owner, "B");
        assert_eq!(all[1].length, 1);
    }

    #[test]
    fn test_equal_length_keeps_earliest() {
        let snapshots = vec![
            snapshot(1, &[("A", 1016.0), ("B", 984.0)]),
            snapshot(2, &[("A", 984.0), ("B", 1016.0)]),
        ];
        let longest = StreakTracker::longest(&snapshots).unwrap();
        assert_eq!(longest.owner, "A");
    }

    #[test]
    fn test_no_snapshots() {
        assert_eq!(StreakTracker::longest(&[]), None);
        assert!(StreakTracker::streaks(&[]).is_empty());
    }
}
