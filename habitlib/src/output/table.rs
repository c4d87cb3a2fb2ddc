//! Table-ready data structures for habit output.
//!
//! This module provides `HabitTable`, a presentation-ready data structure
//! that can be directly consumed by templates or serialized to JSON.
//!
//! The data flow is:
//! 1. Raw Data (habit ledgers)
//! 2. Report / HabitStatus (restricted, aggregated, sorted)
//! 3. HabitTable (formatted strings for display)
//!
//! HabitTable is a pure presentation layer - it only formats data, no filtering
//! or sorting logic.

use serde::{Deserialize, Serialize};

use crate::progress::{HabitStatus, RankProgress};
use crate::query::Report;

/// A single row in the table (data row or footer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// Row label (habit name, rank name, "Total (N habits)", etc.)
    pub label: String,
    /// Values for each column after the label (as strings, ready for display)
    pub values: Vec<String>,
}

/// Table-ready habit data.
///
/// Templates iterate over headers/rows/footer and apply formatting - no computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitTable {
    /// Optional title (e.g., "Report: 2024-01-01 → 2024-01-31")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Column headers: [label_header, value1, value2, ...]
    pub headers: Vec<String>,
    /// Data rows
    pub rows: Vec<TableRow>,
    /// Summary/footer row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<TableRow>,
    /// Optional text below the table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<String>,
}

impl HabitTable {
    /// Create a table from a report.
    pub fn from_report(report: &Report) -> Self {
        let rows = report
            .habits_breakdown
            .iter()
            .map(|item| TableRow {
                label: item.name.clone(),
                values: vec![
                    item.completed.to_string(),
                    item.total.to_string(),
                    format_percent(item.rate()),
                ],
            })
            .collect::<Vec<_>>();

        let footer = TableRow {
            label: format!("Total ({} habits)", rows.len()),
            values: vec![
                report.completed_entries.to_string(),
                report.total_entries.to_string(),
                format_percent(report.completion_rate),
            ],
        };

        HabitTable {
            title: Some(format!(
                "Report: {} \u{2192} {}",
                report.range.from, report.range.to
            )),
            headers: vec![
                "Habit".to_string(),
                "Completed".to_string(),
                "Total".to_string(),
                "Rate".to_string(),
            ],
            rows,
            footer: Some(footer),
            legend: None,
        }
    }

    /// Create a table from per-habit status rows.
    pub fn from_status(statuses: &[HabitStatus]) -> Self {
        let rows = statuses
            .iter()
            .map(|s| TableRow {
                label: s.name.clone(),
                values: vec![
                    s.category.clone(),
                    format!("{}/{}", s.day, s.duration),
                    format!("{}/{}", s.completed, s.duration),
                    format_streak(s.streak.count, s.streak.just_increased),
                    s.best_streak.to_string(),
                ],
            })
            .collect::<Vec<_>>();

        HabitTable {
            title: None,
            headers: vec![
                "Habit".to_string(),
                "Category".to_string(),
                "Day".to_string(),
                "Done".to_string(),
                "Streak".to_string(),
                "Best".to_string(),
            ],
            footer: Some(TableRow {
                label: format!("Total ({} habits)", rows.len()),
                values: vec![
                    String::new(),
                    String::new(),
                    statuses
                        .iter()
                        .map(|s| u64::from(s.completed))
                        .sum::<u64>()
                        .to_string(),
                    String::new(),
                    String::new(),
                ],
            }),
            rows,
            legend: None,
        }
    }

    /// Create a table from the full rank ladder view.
    pub fn from_rank_progress(ranks: &[RankProgress]) -> Self {
        let rows = ranks
            .iter()
            .map(|r| TableRow {
                label: r.name.clone(),
                values: vec![
                    format_rank_state(r),
                    r.requirements
                        .iter()
                        .map(|p| format!("{} {}/{}", p.label, p.current, p.required))
                        .collect::<Vec<_>>()
                        .join(", "),
                ],
            })
            .collect();

        HabitTable {
            title: None,
            headers: vec![
                "Rank".to_string(),
                "State".to_string(),
                "Requirements".to_string(),
            ],
            rows,
            footer: None,
            legend: None,
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the legend.
    pub fn with_legend(mut self, legend: impl Into<String>) -> Self {
        self.legend = Some(legend.into());
        self
    }
}

/// Format a percentage with one decimal.
fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Format a streak count, tagging a streak that grew today.
fn format_streak(count: u32, just_increased: bool) -> String {
    if just_increased {
        format!("{}+", count)
    } else {
        count.to_string()
    }
}

fn format_rank_state(rank: &RankProgress) -> String {
    match (rank.current, rank.achieved) {
        (true, _) => "current".to_string(),
        (false, true) => "achieved".to_string(),
        (false, false) => "locked".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{ProgressTotals, RankLadder, Streak};
    use crate::query::{DateRange, HabitBreakdown};
    use chrono::NaiveDate;

    fn sample_report() -> Report {
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        Report {
            range: DateRange::new(day(1), day(31)).unwrap(),
            total_entries: 8,
            completed_entries: 6,
            completion_rate: 75.0,
            habits_breakdown: vec![
                HabitBreakdown {
                    name: "Run".to_string(),
                    completed: 4,
                    total: 5,
                },
                HabitBreakdown {
                    name: "Read".to_string(),
                    completed: 2,
                    total: 3,
                },
            ],
        }
    }

    #[test]
    fn test_table_from_report() {
        let table = HabitTable::from_report(&sample_report());
        assert_eq!(table.headers, vec!["Habit", "Completed", "Total", "Rate"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].label, "Run");
        assert_eq!(table.rows[0].values, vec!["4", "5", "80.0%"]);
        assert_eq!(table.rows[1].values[2], "66.7%");

        let footer = table.footer.unwrap();
        assert_eq!(footer.label, "Total (2 habits)");
        assert_eq!(footer.values, vec!["6", "8", "75.0%"]);
        assert_eq!(table.title.as_deref(), Some("Report: 2024-01-01 → 2024-01-31"));
    }

    #[test]
    fn test_table_from_status() {
        let status = HabitStatus {
            id: "h".to_string(),
            name: "Walk".to_string(),
            category: "Health".to_string(),
            day: 3,
            duration: 10,
            completed: 2,
            progress_percent: 20.0,
            streak: Streak {
                count: 2,
                just_increased: true,
            },
            best_streak: 2,
        };
        let table = HabitTable::from_status(&[status]);
        assert_eq!(table.headers[0], "Habit");
        assert_eq!(
            table.rows[0].values,
            vec!["Health", "3/10", "2/10", "2+", "2"]
        );
        assert_eq!(table.footer.unwrap().values[2], "2");
    }

    #[test]
    fn test_table_from_rank_progress() {
        let ladder = RankLadder::xp_default();
        let rows = ladder.progress(&ProgressTotals::new(12, Default::default()));
        let table = HabitTable::from_rank_progress(&rows);
        assert_eq!(table.rows.len(), 6);
        assert_eq!(table.rows[0].values[0], "achieved");
        assert_eq!(table.rows[1].values[0], "current");
        assert_eq!(table.rows[2].values[0], "locked");
        assert_eq!(table.rows[2].values[1], "XP 12/30");
        assert!(table.footer.is_none());
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_percent(0.0), "0.0%");
        assert_eq!(format_percent(66.666), "66.7%");
        assert_eq!(format_streak(1, false), "1");
        assert_eq!(format_streak(4, true), "4+");
    }

    #[test]
    fn test_builders() {
        let table = HabitTable::from_report(&sample_report())
            .with_title("Custom")
            .with_legend("note");
        assert_eq!(table.title.as_deref(), Some("Custom"));
        assert_eq!(table.legend.as_deref(), Some("note"));
    }
}
