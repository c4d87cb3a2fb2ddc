//! Live metrics derived from the entry ledgers.
//!
//! This module is the second stage of the pipeline. Every function here is a
//! pure computation over an immutable snapshot of habits:
//!
//! - **Streaks**: consecutive completed days ending today or yesterday
//! - **XP**: award-once progression with an explicit delta step
//! - **Ranks**: highest tier whose requirements are all met
//! - **Status**: per-habit summary combining the above
//! - **Leaderboard**: ordering of public profiles

pub mod leaderboard;
pub mod rank;
pub mod status;
pub mod streak;
pub mod xp;

pub use leaderboard::{leaderboard, DEFAULT_LEADERBOARD_LIMIT};
pub use rank::{
    Rank, RankChange, RankLadder, RankModel, RankProgress, RankStanding, Requirement,
    RequirementProgress,
};
pub use status::HabitStatus;
pub use streak::{calculate_streak, longest_streak, Streak};
pub use xp::{AwardKey, CategoryCounts, ProgressSnapshot, ProgressTotals, XpDelta};
