//! Habits and their entry ledgers.
//!
//! A [`Habit`] owns the ordered list of entries recorded against it. The stored
//! order is whatever the collaborator persisted; every ordering the engine
//! needs (display order, day numbering) is derived on demand.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::HabitError;
use crate::progress::CategoryCounts;
use crate::Result;

use super::entry::{Entry, EntryAddress, EntryKey, EntryPatch, EntryVariant};

/// A user-defined, time-boxed challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub name: String,
    /// Free-text label used for rank requirements
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Target duration in days (at least 1)
    pub duration: u32,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl Habit {
    /// Create a habit with an empty ledger.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
        duration: u32,
    ) -> Result<Self> {
        if duration == 0 {
            return Err(HabitError::InvalidDuration(duration));
        }
        let category = category.into();
        if category == CategoryCounts::TOTAL {
            return Err(HabitError::ReservedCategory(category));
        }
        Ok(Self {
            id: id.into(),
            name: name.into(),
            category,
            description: description.into(),
            duration,
            entries: Vec::new(),
        })
    }

    /// Pre-populate one main entry per challenge day starting at `start`.
    ///
    /// Dates that already hold a main entry are left alone.
    pub fn schedule_from(mut self, start: NaiveDate) -> Self {
        for offset in 0..self.duration {
            let Some(date) = start.checked_add_days(Days::new(u64::from(offset))) else {
                break;
            };
            if !self.has_main_entry(date) {
                self.entries.push(Entry::main(date));
            }
        }
        self
    }

    pub fn has_main_entry(&self, date: NaiveDate) -> bool {
        self.entries.iter().any(|e| e.date == date && !e.is_extra)
    }

    /// Append a new, not-completed entry for `date`.
    ///
    /// Fails with [`HabitError::DuplicateMainEntry`] when a main entry already
    /// exists for the date and `is_extra` is false.
    pub fn append_entry(&mut self, date: NaiveDate, is_extra: bool) -> Result<EntryKey> {
        let entry = if is_extra {
            Entry::extra(date, self.next_extra_ordinal(date))
        } else {
            if self.has_main_entry(date) {
                return Err(HabitError::DuplicateMainEntry {
                    habit: self.id.clone(),
                    date,
                });
            }
            Entry::main(date)
        };

        let key = entry.key();
        tracing::trace!(habit = %self.id, entry = %key, "appended entry");
        self.entries.push(entry);
        Ok(key)
    }

    /// Apply `patch` to the single entry named by `address`.
    ///
    /// Nothing is modified unless the address resolves to exactly one entry.
    pub fn update_entry(
        &mut self,
        address: impl Into<EntryAddress>,
        patch: &EntryPatch,
    ) -> Result<EntryKey> {
        let address = address.into();
        let index = self.resolve(address)?;
        let entry = &mut self.entries[index];
        patch.apply_to(entry);
        tracing::trace!(habit = %self.id, entry = %entry.key(), completed = entry.completed, "updated entry");
        Ok(entry.key())
    }

    /// Resolve an address to the index of the one entry it names.
    fn resolve(&self, address: EntryAddress) -> Result<usize> {
        let matches: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| address.matches(e))
            .map(|(i, _)| i)
            .collect();

        match matches.as_slice() {
            [] => Err(HabitError::EntryNotFound {
                date: address.date(),
            }),
            [index] => Ok(*index),
            _ => Err(HabitError::AmbiguousEntryAddress {
                date: address.date(),
                matches: matches.len(),
            }),
        }
    }

    pub fn entry(&self, key: EntryKey) -> Option<&Entry> {
        self.entries.iter().find(|e| e.key() == key)
    }

    fn next_extra_ordinal(&self, date: NaiveDate) -> u32 {
        self.entries
            .iter()
            .filter(|e| e.date == date && e.is_extra)
            .map(|e| e.extra_ordinal)
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Entries newest first; on the same day the main entry precedes extras.
    pub fn sorted_entries(&self) -> Vec<&Entry> {
        let mut entries: Vec<&Entry> = self.entries.iter().collect();
        entries.sort_by(|a, b| a.display_cmp(b));
        entries
    }

    /// The "day N" label of an entry, counted over main entries from the oldest.
    ///
    /// Extra entries share the number of the main entry on their date, or of the
    /// closest earlier main entry when their date has none (day 1 at minimum).
    pub fn day_number(&self, key: EntryKey) -> Option<u32> {
        self.entry(key)?;

        let mut main_dates: Vec<NaiveDate> = self
            .entries
            .iter()
            .filter(|e| !e.is_extra)
            .map(|e| e.date)
            .collect();
        main_dates.sort();

        let on_or_before = main_dates.iter().filter(|d| **d <= key.date).count() as u32;
        match key.variant {
            EntryVariant::Main => Some(on_or_before),
            EntryVariant::Extra(_) => Some(on_or_before.max(1)),
        }
    }

    /// Number of main entries (challenge days registered so far)
    pub fn day_count(&self) -> u32 {
        self.entries.iter().filter(|e| !e.is_extra).count() as u32
    }

    /// Number of completed main entries
    pub fn completed_count(&self) -> u32 {
        self.entries
            .iter()
            .filter(|e| e.completed && !e.is_extra)
            .count() as u32
    }

    /// Completed main entries relative to the target duration, capped at 100.
    pub fn progress_percent(&self) -> f64 {
        let duration = self.duration.max(1) as f64;
        (self.completed_count() as f64 / duration * 100.0).min(100.0)
    }

    /// Assign extra ordinals to entries loaded without one (or with a clash),
    /// in stored order.
    pub fn normalize(&mut self) {
        let mut max_ordinal: HashMap<NaiveDate, u32> = HashMap::new();
        for entry in self.entries.iter().filter(|e| e.is_extra) {
            let max = max_ordinal.entry(entry.date).or_insert(0);
            *max = (*max).max(entry.extra_ordinal);
        }

        let mut used: HashSet<(NaiveDate, u32)> = HashSet::new();
        for entry in self.entries.iter_mut() {
            if !entry.is_extra {
                entry.extra_ordinal = 0;
                continue;
            }
            if entry.extra_ordinal == 0 || used.contains(&(entry.date, entry.extra_ordinal)) {
                let max = max_ordinal.entry(entry.date).or_insert(0);
                *max += 1;
                entry.extra_ordinal = *max;
            }
            used.insert((entry.date, entry.extra_ordinal));
        }
    }

    /// Check the ledger invariants: positive duration, a non-reserved category,
    /// one main entry per date.
    pub fn validate(&self) -> Result<()> {
        if self.duration == 0 {
            return Err(HabitError::InvalidDuration(self.duration));
        }
        if self.category == CategoryCounts::TOTAL {
            return Err(HabitError::ReservedCategory(self.category.clone()));
        }

        let mut mains: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for entry in self.entries.iter().filter(|e| !e.is_extra) {
            *mains.entry(entry.date).or_insert(0) += 1;
        }
        if let Some((date, _)) = mains.into_iter().find(|(_, n)| *n > 1) {
            return Err(HabitError::DuplicateMainEntry {
                habit: self.id.clone(),
                date,
            });
        }
        Ok(())
    }
}
