//! Completion reports over a date range.
//!
//! A report sits between raw habit ledgers and table output. It represents
//! entries that have been:
//! - Restricted to a calendar-day interval
//! - Summed overall and per habit
//! - Ordered according to the ordering preference

use serde::{Deserialize, Serialize};

use crate::data::Habit;

use super::options::{DateRange, OrderBy, OrderDirection, ReportOptions};

/// Completion counts for one habit within the report range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitBreakdown {
    pub name: String,
    pub completed: u64,
    pub total: u64,
}

impl HabitBreakdown {
    /// Completed share of entries, in percent
    pub fn rate(&self) -> f64 {
        completion_rate(self.completed, self.total)
    }
}

/// Summary of every habit's entries within a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub range: DateRange,
    pub total_entries: u64,
    pub completed_entries: u64,
    /// Completed share of entries in percent; 0 when there are no entries
    pub completion_rate: f64,
    /// Only habits with at least one entry in range
    pub habits_breakdown: Vec<HabitBreakdown>,
}

fn completion_rate(completed: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64 * 100.0
    }
}

/// Summarize `habits` over `range`.
///
/// Entry dates and range bounds are both calendar days, so an entry is in range
/// exactly when its day lies within the inclusive bounds.
pub fn build_report(habits: &[Habit], range: DateRange, options: ReportOptions) -> Report {
    let mut total_entries = 0u64;
    let mut completed_entries = 0u64;
    let mut breakdown = Vec::new();

    for habit in habits {
        let (completed, total) = habit
            .entries
            .iter()
            .filter(|e| range.contains(e.date))
            .filter(|e| options.include_extra || !e.is_extra)
            .fold((0u64, 0u64), |(done, all), e| {
                (done + u64::from(e.completed), all + 1)
            });

        if total == 0 {
            continue;
        }
        total_entries += total;
        completed_entries += completed;
        breakdown.push(HabitBreakdown {
            name: habit.name.clone(),
            completed,
            total,
        });
    }

    sort_breakdown(&mut breakdown, &options);

    tracing::debug!(
        from = %range.from,
        to = %range.to,
        total_entries,
        completed_entries,
        habits = breakdown.len(),
        "built report"
    );

    Report {
        range,
        total_entries,
        completed_entries,
        completion_rate: completion_rate(completed_entries, total_entries),
        habits_breakdown: breakdown,
    }
}

fn sort_breakdown(items: &mut [HabitBreakdown], options: &ReportOptions) {
    match options.ordering.by {
        OrderBy::Position => {}
        OrderBy::Name => items.sort_by(|a, b| a.name.cmp(&b.name)),
        OrderBy::Completed => items.sort_by_key(|item| item.completed),
        OrderBy::Total => items.sort_by_key(|item| item.total),
        OrderBy::Rate => items.sort_by(|a, b| a.rate().total_cmp(&b.rate())),
    }

    // Reverse if descending
    if options.ordering.direction == OrderDirection::Descending {
        items.reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{EntryKey, EntryPatch};
    use crate::query::options::Ordering;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, d).unwrap()
    }

    fn habit(name: &str, days: &[(u32, bool)]) -> Habit {
        let mut h = Habit::new(name.to_lowercase(), name, "Health", "", 30).unwrap();
        for (d, done) in days {
            h.append_entry(day(*d), false).unwrap();
            h.update_entry(EntryKey::main(day(*d)), &EntryPatch::new().completed(*done))
                .unwrap();
        }
        h
    }

    fn sample_habits() -> Vec<Habit> {
        vec![
            habit("Run", &[(1, true), (2, false), (3, true), (10, true)]),
            habit("Read", &[(2, true), (3, true)]),
            habit("Journal", &[(20, true)]),
        ]
    }

    #[test]
    fn test_report_counts_within_range() {
        let range = DateRange::new(day(1), day(3)).unwrap();
        let report = build_report(&sample_habits(), range, ReportOptions::default());

        assert_eq!(report.total_entries, 5);
        assert_eq!(report.completed_entries, 4);
        assert!((report.completion_rate - 80.0).abs() < 1e-9);
        // Journal has nothing in range and is omitted
        assert_eq!(report.habits_breakdown.len(), 2);
        assert_eq!(report.habits_breakdown[0].name, "Run");
        assert_eq!(report.habits_breakdown[0].completed, 2);
        assert_eq!(report.habits_breakdown[0].total, 3);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let range = DateRange::new(day(10), day(20)).unwrap();
        let report = build_report(&sample_habits(), range, ReportOptions::default());
        assert_eq!(report.total_entries, 2);
        assert_eq!(report.habits_breakdown.len(), 2);
    }

    #[test]
    fn test_empty_range_is_zero_not_error() {
        let range = DateRange::new(day(25), day(28)).unwrap();
        let report = build_report(&sample_habits(), range, ReportOptions::default());
        assert_eq!(report.total_entries, 0);
        assert_eq!(report.completion_rate, 0.0);
        assert!(report.habits_breakdown.is_empty());
    }

    #[test]
    fn test_extra_entries_optional() {
        let mut habits = vec![habit("Run", &[(1, true)])];
        let extra = habits[0].append_entry(day(1), true).unwrap();
        habits[0]
            .update_entry(extra, &EntryPatch::new().completed(false))
            .unwrap();
        let range = DateRange::new(day(1), day(1)).unwrap();

        let with_extra = build_report(&habits, range, ReportOptions::default());
        assert_eq!(with_extra.total_entries, 2);
        assert!((with_extra.completion_rate - 50.0).abs() < 1e-9);

        let mains_only = build_report(&habits, range, ReportOptions::new().include_extra(false));
        assert_eq!(mains_only.total_entries, 1);
        assert!((mains_only.completion_rate - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_breakdown_ordering() {
        let range = DateRange::new(day(1), day(30)).unwrap();

        let by_name = build_report(
            &sample_habits(),
            range,
            ReportOptions::new().ordering(Ordering::by_name()),
        );
        let names: Vec<&str> = by_name
            .habits_breakdown
            .iter()
            .map(|h| h.name.as_str())
            .collect();
        assert_eq!(names, vec!["Journal", "Read", "Run"]);

        let by_completed = build_report(
            &sample_habits(),
            range,
            ReportOptions::new().ordering(Ordering::by_completed()),
        );
        assert_eq!(by_completed.habits_breakdown[0].name, "Run");
        assert_eq!(by_completed.habits_breakdown[0].completed, 3);

        let by_rate = build_report(
            &sample_habits(),
            range,
            ReportOptions::new().ordering(Ordering::by_rate().ascending()),
        );
        assert_eq!(by_rate.habits_breakdown[0].name, "Run");
    }
}
