//! Tabular and JSON output of a rating run

use crate::config::{AppConfig, RatingConfig};
use crate::rating::{
    LeaderboardRow, LeaderboardView, RatingExtremes, RatingRun, RecordsExtractor, ResultKind,
    ResultStreak, RunStatus,
};
use crate::types::{EntityId, LedgerEntry, Period, PeriodSnapshot, RatingRecord};
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Flat ledger row for CSV output
#[derive(Debug, Serialize)]
struct LedgerCsvRow<'a> {
    sequence: usize,
    row: usize,
    season: i32,
    week: u32,
    entity_a: &'a str,
    entity_b: &'a str,
    score_a: f64,
    score_b: f64,
    expected_a: f64,
    rating_a_before: f64,
    rating_b_before: f64,
    rating_a_after: f64,
    rating_b_after: f64,
    delta_a: f64,
    delta_b: f64,
    winner: Option<&'a str>,
}

/// One competitor's rating in one period snapshot
#[derive(Debug, Serialize)]
struct SnapshotCsvRow<'a> {
    season: i32,
    week: u32,
    entity: &'a str,
    rating: f64,
}

/// Counts describing a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub status: RunStatus,
    pub matches_rated: usize,
    pub matches_rejected: usize,
    pub competitors: usize,
    pub periods: usize,
    pub first_period: Option<Period>,
    pub last_period: Option<Period>,
    pub leader: Option<EntityId>,
    pub leader_rating: Option<f64>,
}

impl RunSummary {
    pub fn of(run: &RatingRun) -> Self {
        let leader = run.leader();
        Self {
            status: run.status(),
            matches_rated: run.ledger.len(),
            matches_rejected: run.rejected.len(),
            competitors: run.ratings.len(),
            periods: run.snapshots.len(),
            first_period: run.snapshots.first().map(|s| s.period),
            last_period: run.snapshots.last().map(|s| s.period),
            leader: leader.map(|(name, _)| name.to_string()),
            leader_rating: leader.map(|(_, rating)| rating),
        }
    }
}

/// Everything the dashboard shows about a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingReport {
    pub generated_at: DateTime<Utc>,
    pub config: RatingConfig,
    pub summary: RunSummary,
    pub leaderboard: Vec<LeaderboardRow>,
    pub records: RatingRecord,
    pub extremes: BTreeMap<EntityId, RatingExtremes>,
    pub win_streaks: Vec<ResultStreak>,
    pub loss_streaks: Vec<ResultStreak>,
}

impl RatingReport {
    pub fn build(run: &RatingRun, config: &AppConfig) -> Self {
        let limit = config.report.result_streak_limit;
        Self {
            generated_at: Utc::now(),
            config: config.rating,
            summary: RunSummary::of(run),
            leaderboard: LeaderboardView::build(run)
                .top(config.report.leaderboard_size)
                .rows,
            records: RecordsExtractor::extract(run),
            extremes: RecordsExtractor::entity_extremes(&run.ledger),
            win_streaks: RecordsExtractor::result_streaks(&run.ledger, ResultKind::Win, limit),
            loss_streaks: RecordsExtractor::result_streaks(&run.ledger, ResultKind::Loss, limit),
        }
    }

    pub fn has_data(&self) -> bool {
        self.summary.status == RunStatus::Rated
    }

    /// Plain-text rendering for the terminal
    pub fn render_text(&self) -> String {
        if !self.has_data() {
            return format!(
                "Insufficient data: no valid matches to rate ({} rows rejected)\n",
                self.summary.matches_rejected
            );
        }

        let mut out = String::new();
        out.push_str(&format!(
            "Rated {} matches, {} competitors, {} periods ({} rows rejected)\n\n",
            self.summary.matches_rated,
            self.summary.competitors,
            self.summary.periods,
            self.summary.matches_rejected
        ));

        out.push_str(&format!(
            "{:>4}  {:<20} {:>8} {:>6} {:>5} {:>4} {:>4} {:>4} {:>6}\n",
            "Rank", "Competitor", "Elo", "Move", "Games", "W", "L", "T", "Win%"
        ));
        for row in &self.leaderboard {
            let movement = match row.rank_delta {
                Some(d) if d > 0 => format!("+{}", d),
                Some(d) => d.to_string(),
                None => "-".to_string(),
            };
            let win_pct = row
                .win_pct
                .map(|p| format!("{:.3}", p))
                .unwrap_or_default();
            out.push_str(&format!(
                "{:>4}  {:<20} {:>8.2} {:>6} {:>5} {:>4} {:>4} {:>4} {:>6}\n",
                row.rank,
                row.entity,
                row.rating,
                movement,
                row.games,
                row.wins,
                row.losses,
                row.ties,
                win_pct
            ));
        }

        out.push_str("\nRecords\n");
        if let Some(peak) = &self.records.peak {
            out.push_str(&format!(
                "  Peak rating:        {:.2} {} ({})\n",
                peak.rating, peak.entity, peak.period
            ));
        }
        if let Some(trough) = &self.records.trough {
            out.push_str(&format!(
                "  Lowest rating:      {:.2} {} ({})\n",
                trough.rating, trough.entity, trough.period
            ));
        }
        if let Some(gain) = &self.records.biggest_gain {
            out.push_str(&format!(
                "  Biggest gain:       {:+.2} {} vs {} ({})\n",
                gain.delta, gain.entity, gain.opponent, gain.period
            ));
        }
        if let Some(loss) = &self.records.biggest_loss {
            out.push_str(&format!(
                "  Biggest loss:       {:+.2} {} vs {} ({})\n",
                loss.delta, loss.entity, loss.opponent, loss.period
            ));
        }
        if let Some(top) = &self.records.most_periods_at_top {
            out.push_str(&format!(
                "  Most weeks at #1:   {} {}\n",
                top.periods, top.entity
            ));
        }
        if let Some(streak) = &self.records.longest_top_streak {
            out.push_str(&format!(
                "  Longest #1 streak:  {} {} ({} to {})\n",
                streak.length, streak.owner, streak.start, streak.end
            ));
        }

        out
    }
}

/// Write the ledger as CSV, one row per rated match
pub fn write_ledger_csv<W: Write>(ledger: &[LedgerEntry], sink: W) -> crate::error::Result<()> {
    let mut writer = csv::Writer::from_writer(sink);
    for entry in ledger {
        writer.serialize(LedgerCsvRow {
            sequence: entry.sequence,
            row: entry.row,
            season: entry.period.season,
            week: entry.period.week,
            entity_a: &entry.entity_a,
            entity_b: &entry.entity_b,
            score_a: entry.score_a,
            score_b: entry.score_b,
            expected_a: entry.expected_a,
            rating_a_before: entry.rating_a_before,
            rating_b_before: entry.rating_b_before,
            rating_a_after: entry.rating_a_after,
            rating_b_after: entry.rating_b_after,
            delta_a: entry.delta_a,
            delta_b: entry.delta_b,
            winner: entry.winner.as_deref(),
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Write snapshots in long form: one row per period and competitor
pub fn write_snapshots_csv<W: Write>(
    snapshots: &[PeriodSnapshot],
    sink: W,
) -> crate::error::Result<()> {
    let mut writer = csv::Writer::from_writer(sink);
    for snapshot in snapshots {
        for (entity, &rating) in &snapshot.ratings {
            writer.serialize(SnapshotCsvRow {
                season: snapshot.period.season,
                week: snapshot.period.week,
                entity,
                rating,
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Write leaderboard rows as CSV
pub fn write_leaderboard_csv<W: Write>(
    rows: &[LeaderboardRow],
    sink: W,
) -> crate::error::Result<()> {
    let mut writer = csv::Writer::from_writer(sink);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write ledger, snapshots, leaderboard and report into a directory
pub fn write_outputs(dir: &Path, run: &RatingRun, report: &RatingReport) -> crate::error::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let create = |name: &str| {
        let path = dir.join(name);
        std::fs::File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))
    };

    write_ledger_csv(&run.ledger, create("ledger.csv")?)?;
    write_snapshots_csv(&run.snapshots, create("snapshots.csv")?)?;
    write_leaderboard_csv(&report.leaderboard, create("leaderboard.csv")?)?;
    serde_json::to_writer_pretty(create("report.json")?, report)?;

    info!("Wrote ledger, snapshots, leaderboard and report to {}", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::RatingEngine;
    use crate::types::MatchRecord;

    fn sample_run() -> RatingRun {
        let log = vec![
            MatchRecord::new(Period::new(2023, 1), "A", "B", Some(120.0), Some(100.0)),
            MatchRecord::new(Period::new(2023, 2), "B", "C", Some(90.0), Some(90.0)),
        ];
        RatingEngine::default().run(&log)
    }

    #[test]
    fn test_ledger_csv() {
        let run = sample_run();
        let mut buffer = Vec::new();
        write_ledger_csv(&run.ledger, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("sequence,row,season,week,entity_a"));
        assert!(lines[1].contains("1016.0"));
        assert!(lines[1].ends_with(",A"));
        // Draw has an empty winner cell
        assert!(lines[2].ends_with(','));
    }

    #[test]
    fn test_snapshots_csv_long_form() {
        let run = sample_run();
        let mut buffer = Vec::new();
        write_snapshots_csv(&run.snapshots, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        // header + 2 competitors in week 1 + 3 in week 2
        assert_eq!(text.lines().count(), 6);
        assert_eq!(text.lines().next(), Some("season,week,entity,rating"));
    }

    #[test]
    fn test_report_json_round_trip() {
        let run = sample_run();
        let report = RatingReport::build(&run, &AppConfig::default());

        let json = serde_json::to_string(&report).unwrap();
        let parsed: RatingReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.summary.matches_rated, 2);
        assert_eq!(parsed.leaderboard.len(), 3);
        assert_eq!(parsed.summary.leader.as_deref(), Some("A"));
    }

    #[test]
    fn test_empty_report_renders_insufficient_data() {
        let report = RatingReport::build(&RatingRun::default(), &AppConfig::default());
        assert!(!report.has_data());
        assert!(report.records.is_empty());
        assert!(report.render_text().starts_with("Insufficient data"));
    }

    #[test]
    fn test_text_rendering() {
        let report = RatingReport::build(&sample_run(), &AppConfig::default());
        let text = report.render_text();
        assert!(text.contains("Peak rating"));
        assert!(text.contains("Longest #1 streak"));
    }
}
