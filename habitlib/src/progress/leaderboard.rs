//! Community leaderboard ordering.

use crate::data::{Habit, PublicProfile};

use super::rank::RankLadder;
use super::xp::ProgressTotals;

/// Number of profiles shown when no limit is given
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 50;

impl PublicProfile {
    /// Summarize a user for public display.
    pub fn from_progress(
        display_name: impl Into<String>,
        habits: &[Habit],
        totals: &ProgressTotals,
        ladder: &RankLadder,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            rank_name: ladder.evaluate(totals).name.clone(),
            completed_habits: habits.iter().map(|h| u64::from(h.completed_count())).sum(),
        }
    }
}

/// Profiles ordered by completed count (descending), then display name.
pub fn leaderboard(profiles: &[PublicProfile], limit: usize) -> Vec<PublicProfile> {
    let mut sorted = profiles.to_vec();
    sorted.sort_by(|a, b| {
        b.completed_habits
            .cmp(&a.completed_habits)
            .then_with(|| a.display_name.cmp(&b.display_name))
    });
    sorted.truncate(limit);
    sorted
}
