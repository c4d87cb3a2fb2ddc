//! Progression ledger: XP and per-category completion counts.
//!
//! Two steps are kept apart:
//!
//! 1. [`ProgressSnapshot::capture`] is a pure recompute from the entry ledgers.
//! 2. [`XpDelta::between`] compares two snapshots (before and after one edit)
//!    and [`XpDelta::apply`] moves the stored XP counter by the result.
//!
//! XP is never recomputed from scratch and written over the stored value.
//!
//! ## Policy
//!
//! One XP is awarded for every entry that goes from not-completed to completed
//! (a new entry created completed counts as such a transition). Going back from
//! completed to not-completed leaves XP unchanged: awards are never clawed back.
//! Whether extra entries grant XP is set by [`XpConfig::extra_entries_award_xp`].

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::config::XpConfig;
use crate::data::{EntryKey, Habit};

/// Completed main-entry counts keyed by habit category.
///
/// Categories absent from the map read as zero. The reserved key
/// [`CategoryCounts::TOTAL`] reads as the sum over every category, which is why
/// habits may not use it as a category name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryCounts(BTreeMap<String, u64>);

impl CategoryCounts {
    /// Pseudo-category matching completions in any category
    pub const TOTAL: &'static str = "total";

    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the count of a category
    pub fn with(mut self, category: impl Into<String>, count: u64) -> Self {
        self.0.insert(category.into(), count);
        self
    }

    pub fn increment(&mut self, category: &str) {
        *self.0.entry(category.to_string()).or_insert(0) += 1;
    }

    /// Count for a category; zero when the category never appears.
    pub fn get(&self, category: &str) -> u64 {
        if category == Self::TOTAL {
            return self.total();
        }
        self.0.get(category).copied().unwrap_or(0)
    }

    pub fn contains(&self, category: &str) -> bool {
        category == Self::TOTAL || self.0.contains_key(category)
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, u64)> for CategoryCounts {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Identity of an XP-eligible completion across all of a user's habits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AwardKey {
    pub habit_id: String,
    pub entry: EntryKey,
}

/// Metrics derived from one consistent state of every habit ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    awardable: BTreeSet<AwardKey>,
    /// Completed main entries per category
    pub by_category: CategoryCounts,
}

impl ProgressSnapshot {
    /// Recompute everything from the ledgers.
    pub fn capture(habits: &[Habit], config: &XpConfig) -> Self {
        let mut snapshot = ProgressSnapshot::default();

        for habit in habits {
            for entry in habit.entries.iter().filter(|e| e.completed) {
                if !entry.is_extra {
                    snapshot.by_category.increment(&habit.category);
                }
                if !entry.is_extra || config.extra_entries_award_xp {
                    snapshot.awardable.insert(AwardKey {
                        habit_id: habit.id.clone(),
                        entry: entry.key(),
                    });
                }
            }
        }

        tracing::debug!(
            awardable = snapshot.awardable.len(),
            completed = snapshot.by_category.total(),
            "captured progress snapshot"
        );
        snapshot
    }

    /// Completed entries that are eligible for XP
    pub fn awardable_count(&self) -> u64 {
        self.awardable.len() as u64
    }

    pub fn is_awarded(&self, key: &AwardKey) -> bool {
        self.awardable.contains(key)
    }
}

/// XP movement caused by a single edit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpDelta {
    /// Entries that went from not-completed to completed
    pub awarded: u64,
    /// Entries that went from completed to not-completed (informational only)
    pub revoked: u64,
}

impl XpDelta {
    /// Transitions between two snapshots of the same user's ledgers.
    ///
    /// Callers must pass the states immediately before and after one serialized
    /// edit; feeding overlapping pairs would award the same transition twice.
    pub fn between(before: &ProgressSnapshot, after: &ProgressSnapshot) -> Self {
        Self {
            awarded: after.awardable.difference(&before.awardable).count() as u64,
            revoked: before.awardable.difference(&after.awardable).count() as u64,
        }
    }

    /// Convenience: capture both states and compare them.
    pub fn for_edit(before: &[Habit], after: &[Habit], config: &XpConfig) -> Self {
        Self::between(
            &ProgressSnapshot::capture(before, config),
            &ProgressSnapshot::capture(after, config),
        )
    }

    /// New value of the stored XP counter.
    pub fn apply(&self, stored_xp: u64) -> u64 {
        stored_xp.saturating_add(self.awarded)
    }

    pub fn is_empty(&self) -> bool {
        self.awarded == 0
    }
}

/// Inputs to rank evaluation: stored XP plus category counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressTotals {
    pub xp: u64,
    pub by_category: CategoryCounts,
}

impl ProgressTotals {
    pub fn new(xp: u64, by_category: CategoryCounts) -> Self {
        Self { xp, by_category }
    }

    pub fn from_snapshot(xp: u64, snapshot: &ProgressSnapshot) -> Self {
        Self::new(xp, snapshot.by_category.clone())
    }
}
