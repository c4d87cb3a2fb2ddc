//! Consecutive-completion streaks.
//!
//! A streak is always recomputed from the full ledger; it is never stored or
//! incremented in place, so un-completing an entry is reflected by the next
//! call.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::data::Entry;

/// Current streak of a habit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    /// Consecutive completed days ending today or yesterday
    pub count: u32,
    /// True when today's completion extended a streak that already covered yesterday
    pub just_increased: bool,
}

/// Distinct days up to and including `today` that hold at least one completed entry.
fn completed_days(entries: &[Entry], today: NaiveDate) -> BTreeSet<NaiveDate> {
    entries
        .iter()
        .filter(|e| e.completed && e.date <= today)
        .map(|e| e.date)
        .collect()
}

/// Compute the live streak of a ledger relative to `today`.
///
/// Entries dated after `today` are ignored. The streak is live only when the
/// latest completed day is today or yesterday; from there it counts backwards
/// while each previous day has a completed entry. A day with no entry at all
/// breaks the chain just like a day whose entries are not completed.
pub fn calculate_streak(entries: &[Entry], today: NaiveDate) -> Streak {
    let days = completed_days(entries, today);

    let Some(&last) = days.last() else {
        return Streak::default();
    };

    let yesterday = today.pred_opt();
    if last != today && Some(last) != yesterday {
        tracing::trace!(%last, %today, "streak broken");
        return Streak::default();
    }

    let mut count = 0u32;
    let mut cursor = Some(last);
    while let Some(day) = cursor {
        if !days.contains(&day) {
            break;
        }
        count += 1;
        cursor = day.pred_opt();
    }

    Streak {
        count,
        just_increased: last == today && count > 1,
    }
}

/// Longest run of consecutive completed days ever recorded, ignoring future entries.
pub fn longest_streak(entries: &[Entry], today: NaiveDate) -> u32 {
    let days: Vec<NaiveDate> = completed_days(entries, today).into_iter().collect();
    if days.is_empty() {
        return 0;
    }

    let mut best = 1u32;
    let mut run = 1u32;
    for window in days.windows(2) {
        if window[0].succ_opt() == Some(window[1]) {
            run += 1;
            best = best.max(run);
        } else {
            run = 1;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use proptest::prelude::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 7).unwrap()
    }

    fn days_ago(n: u64) -> NaiveDate {
        today().checked_sub_days(Days::new(n)).unwrap()
    }

    fn entry(date: NaiveDate, completed: bool) -> Entry {
        let mut e = Entry::main(date);
        e.completed = completed;
        e
    }

    #[test]
    fn test_empty_ledger() {
        assert_eq!(calculate_streak(&[], today()), Streak::default());
        assert_eq!(longest_streak(&[], today()), 0);
    }

    #[test]
    fn test_no_completed_entries() {
        let entries = vec![entry(today(), false), entry(days_ago(1), false)];
        assert_eq!(calculate_streak(&entries, today()).count, 0);
    }

    #[test]
    fn test_single_completion_today_starts_streak() {
        let entries = vec![entry(today(), true)];
        assert_eq!(
            calculate_streak(&entries, today()),
            Streak {
                count: 1,
                just_increased: false
            }
        );
    }

    #[test]
    fn test_gap_breaks_prior_chain() {
        // Days 1-5 completed, day 6 missed, day 7 (today) completed
        let mut entries: Vec<Entry> = (2..=6).map(|n| entry(days_ago(n), true)).collect();
        entries.push(entry(days_ago(1), false));
        entries.push(entry(today(), true));

        assert_eq!(
            calculate_streak(&entries, today()),
            Streak {
                count: 1,
                just_increased: false
            }
        );
        assert_eq!(longest_streak(&entries, today()), 5);
    }

    #[test]
    fn test_three_consecutive_days_just_increased() {
        let entries = vec![
            entry(days_ago(2), true),
            entry(days_ago(1), true),
            entry(today(), true),
        ];
        assert_eq!(
            calculate_streak(&entries, today()),
            Streak {
                count: 3,
                just_increased: true
            }
        );
    }

    #[test]
    fn test_streak_ending_yesterday_is_live_but_not_increased() {
        let entries = vec![
            entry(days_ago(2), true),
            entry(days_ago(1), true),
            entry(today(), false),
        ];
        assert_eq!(
            calculate_streak(&entries, today()),
            Streak {
                count: 2,
                just_increased: false
            }
        );
    }

    #[test]
    fn test_old_streak_is_broken() {
        let entries = vec![entry(days_ago(3), true), entry(days_ago(2), true)];
        assert_eq!(calculate_streak(&entries, today()), Streak::default());
    }

    #[test]
    fn test_missing_day_breaks_chain() {
        let entries = vec![entry(days_ago(3), true), entry(today(), true)];
        assert_eq!(calculate_streak(&entries, today()).count, 1);
    }

    #[test]
    fn test_future_entries_ignored() {
        let tomorrow = today().succ_opt().unwrap();
        let entries = vec![entry(tomorrow, true), entry(days_ago(5), true)];
        assert_eq!(calculate_streak(&entries, today()), Streak::default());
    }

    #[test]
    fn test_extra_entry_counts_for_its_day() {
        let mut extra = Entry::extra(today(), 1);
        extra.completed = true;
        let entries = vec![entry(days_ago(1), true), entry(today(), false), extra];
        assert_eq!(
            calculate_streak(&entries, today()),
            Streak {
                count: 2,
                just_increased: true
            }
        );
    }

    #[test]
    fn test_uncompleting_today_is_reflected() {
        let mut entries = vec![entry(days_ago(1), true), entry(today(), true)];
        assert_eq!(calculate_streak(&entries, today()).count, 2);
        entries[1].completed = false;
        assert_eq!(
            calculate_streak(&entries, today()),
            Streak {
                count: 1,
                just_increased: false
            }
        );
    }

    proptest! {
        /// N consecutive completed days ending today, preceded by a gap, give {N, N > 1}.
        #[test]
        fn consecutive_days_ending_today(n in 1u64..60, older in 0u64..10) {
            let mut entries: Vec<Entry> = (0..n).map(|i| entry(days_ago(i), true)).collect();
            entries.push(entry(days_ago(n), false));
            entries.extend((0..older).map(|i| entry(days_ago(n + 2 + i), true)));

            let streak = calculate_streak(&entries, today());
            prop_assert_eq!(streak.count as u64, n);
            prop_assert_eq!(streak.just_increased, n > 1);
        }

        /// Ledgers without completed entries never have a streak.
        #[test]
        fn no_completions_no_streak(offsets in proptest::collection::vec(0u64..90, 0..30)) {
            let entries: Vec<Entry> = offsets.iter().map(|o| entry(days_ago(*o), false)).collect();
            prop_assert_eq!(calculate_streak(&entries, today()), Streak::default());
        }
    }
}
