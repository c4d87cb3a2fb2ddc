//! # habitlib
//!
//! A habit-tracking progress engine: dated entry ledgers, streaks, XP,
//! ranks, and completion reports.
//!
//! ## Overview
//!
//! Users commit to fixed-duration habit challenges and record daily entries.
//! Everything the user sees as progress is derived from those entries:
//!
//! - **Ledger**: one main entry per habit per day, plus any number of extras
//! - **Streaks**: consecutive completed days ending today or yesterday
//! - **XP**: one point per entry the first time it becomes completed
//! - **Ranks**: highest tier of a ladder whose requirements are all met
//! - **Reports**: completion totals over a date range
//!
//! ## Features
//!
//! - **Stable entry addressing**: entries are keyed by date plus variant, so
//!   updates never depend on display position
//! - **Explicit XP deltas**: awards come from comparing two snapshots, never
//!   from mutating a counter in place
//! - **Injected clock**: every "today" is an argument, so results are reproducible
//! - **Pure Rust data types**: no I/O side effects outside [`config`]
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use habitlib::{
//!     calculate_streak, EngineConfig, EntryKey, EntryPatch, Habit, ProgressSnapshot,
//!     ProgressTotals, XpDelta,
//! };
//!
//! let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
//! let config = EngineConfig::default();
//!
//! let mut habits = vec![Habit::new("h1", "Walk", "Health", "", 30).unwrap()];
//! let before = ProgressSnapshot::capture(&habits, &config.xp);
//!
//! for d in 1..=3 {
//!     habits[0].append_entry(day(d), false).unwrap();
//!     habits[0]
//!         .update_entry(EntryKey::main(day(d)), &EntryPatch::new().completed(true))
//!         .unwrap();
//! }
//!
//! let after = ProgressSnapshot::capture(&habits, &config.xp);
//! let xp = XpDelta::between(&before, &after).apply(0);
//! assert_eq!(xp, 3);
//!
//! let streak = calculate_streak(&habits[0].entries, day(3));
//! assert_eq!(streak.count, 3);
//! assert!(streak.just_increased);
//!
//! let ladder = config.rank_ladder().unwrap();
//! let rank = ladder.evaluate(&ProgressTotals::from_snapshot(xp, &after));
//! assert_eq!(rank.name, "Novice");
//! ```

pub mod clock;
pub mod config;
pub mod data;
pub mod error;
pub mod output;
pub mod progress;
pub mod query;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{EngineConfig, RankConfig, ReportConfig, XpConfig};
pub use data::{
    Entry, EntryAddress, EntryKey, EntryPatch, EntryVariant, Habit, PublicProfile, UserDocument,
};
pub use error::HabitError;
pub use output::{HabitTable, TableRow};
pub use progress::{
    calculate_streak, leaderboard, longest_streak, AwardKey, CategoryCounts, HabitStatus,
    ProgressSnapshot, ProgressTotals, Rank, RankChange, RankLadder, RankModel, RankProgress,
    RankStanding, Requirement, RequirementProgress, Streak, XpDelta,
};
pub use query::{
    build_report, DateRange, HabitBreakdown, OrderBy, OrderDirection, Ordering, Report,
    ReportOptions,
};

/// Result type for habitlib operations
pub type Result<T> = std::result::Result<T, HabitError>;
