//! Dated ledger records and the keys used to address them.
//!
//! A habit's ledger holds at most one *main* entry per calendar date and any
//! number of *extra* entries. Entries are addressed by an [`EntryKey`]
//! (date + variant) instead of their position in the ledger, so keys stay
//! stable however the entries are later sorted or displayed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Which slot of a date an entry occupies. Main sorts before every extra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntryVariant {
    /// The canonical "day N" record for a date
    Main,
    /// A supplemental record; ordinals start at 1 per date
    Extra(u32),
}

impl EntryVariant {
    /// Position within the date: 0 for main entries.
    pub fn ordinal(&self) -> u32 {
        match self {
            EntryVariant::Main => 0,
            EntryVariant::Extra(n) => *n,
        }
    }

    pub fn is_extra(&self) -> bool {
        matches!(self, EntryVariant::Extra(_))
    }
}

/// Stable identity of an entry within one habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryKey {
    pub date: NaiveDate,
    pub variant: EntryVariant,
}

impl EntryKey {
    /// Key of the main entry for a date
    pub fn main(date: NaiveDate) -> Self {
        Self {
            date,
            variant: EntryVariant::Main,
        }
    }

    /// Key of the n-th extra entry for a date
    pub fn extra(date: NaiveDate, ordinal: u32) -> Self {
        Self {
            date,
            variant: EntryVariant::Extra(ordinal),
        }
    }
}

impl std::fmt::Display for EntryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.variant {
            EntryVariant::Main => write!(f, "{}", self.date),
            EntryVariant::Extra(n) => write!(f, "{}+{}", self.date, n),
        }
    }
}

/// One dated record of progress for a habit.
///
/// Only `completed` and `journal` change after creation. `journal` keeps the
/// difference between an empty note (`Some("")`) and no note at all (`None`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub date: NaiveDate,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    #[serde(default)]
    pub is_extra: bool,
    /// Position among the extra entries of the same date (0 for main entries)
    #[serde(default, skip_serializing_if = "is_zero")]
    pub extra_ordinal: u32,
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

impl Entry {
    /// A fresh, not-yet-completed main entry with an empty journal
    pub fn main(date: NaiveDate) -> Self {
        Self {
            date,
            completed: false,
            journal: Some(String::new()),
            is_extra: false,
            extra_ordinal: 0,
        }
    }

    /// A fresh, not-yet-completed extra entry with an empty journal
    pub fn extra(date: NaiveDate, ordinal: u32) -> Self {
        Self {
            date,
            completed: false,
            journal: Some(String::new()),
            is_extra: true,
            extra_ordinal: ordinal,
        }
    }

    pub fn key(&self) -> EntryKey {
        if self.is_extra {
            EntryKey::extra(self.date, self.extra_ordinal)
        } else {
            EntryKey::main(self.date)
        }
    }

    /// Whether the entry carries a non-blank journal note
    pub fn has_journal(&self) -> bool {
        self.journal
            .as_deref()
            .map(|text| !text.trim().is_empty())
            .unwrap_or(false)
    }

    /// Display ordering: newest date first, main before extras on the same day.
    pub fn display_cmp(&self, other: &Self) -> Ordering {
        other
            .date
            .cmp(&self.date)
            .then_with(|| self.key().variant.cmp(&other.key().variant))
    }
}

/// How an update names the entry it targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryAddress {
    /// Exact key; never ambiguous
    Key(EntryKey),
    /// Any entry on the date; only valid when the date holds a single entry
    Date(NaiveDate),
    /// The main entry of the date
    Main(NaiveDate),
    /// The extra entry of the date; only valid when there is exactly one
    Extra(NaiveDate),
}

impl EntryAddress {
    pub fn date(&self) -> NaiveDate {
        match self {
            EntryAddress::Key(key) => key.date,
            EntryAddress::Date(date) | EntryAddress::Main(date) | EntryAddress::Extra(date) => {
                *date
            }
        }
    }

    pub fn matches(&self, entry: &Entry) -> bool {
        match self {
            EntryAddress::Key(key) => entry.key() == *key,
            EntryAddress::Date(date) => entry.date == *date,
            EntryAddress::Main(date) => entry.date == *date && !entry.is_extra,
            EntryAddress::Extra(date) => entry.date == *date && entry.is_extra,
        }
    }
}

impl From<EntryKey> for EntryAddress {
    fn from(key: EntryKey) -> Self {
        EntryAddress::Key(key)
    }
}

/// Changes to apply to an entry. Fields left unset are untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPatch {
    pub completed: Option<bool>,
    /// `Some(None)` clears the note, `Some(Some(text))` replaces it
    pub journal: Option<Option<String>>,
}

impl EntryPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the completed flag
    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Builder: replace the journal text
    pub fn journal(mut self, text: impl Into<String>) -> Self {
        self.journal = Some(Some(text.into()));
        self
    }

    /// Builder: remove the journal text entirely
    pub fn clear_journal(mut self) -> Self {
        self.journal = Some(None);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_none() && self.journal.is_none()
    }

    pub(crate) fn apply_to(&self, entry: &mut Entry) {
        if let Some(completed) = self.completed {
            entry.completed = completed;
        }
        if let Some(journal) = &self.journal {
            entry.journal = journal.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_entry_key_variants() {
        assert_eq!(Entry::main(day(1)).key(), EntryKey::main(day(1)));
        assert_eq!(Entry::extra(day(1), 2).key(), EntryKey::extra(day(1), 2));
        assert!(EntryVariant::Main < EntryVariant::Extra(1));
        assert!(EntryVariant::Extra(1) < EntryVariant::Extra(2));
    }

    #[test]
    fn test_main_never_equals_an_extra_in_ordering() {
        assert_eq!(
            EntryVariant::Main.cmp(&EntryVariant::Extra(0)),
            Ordering::Less
        );
        assert!(EntryKey::main(day(1)) < EntryKey::extra(day(1), 0));
    }

    #[test]
    fn test_new_entries_start_with_empty_journal() {
        assert_eq!(Entry::main(day(1)).journal.as_deref(), Some(""));
        assert_eq!(Entry::extra(day(1), 1).journal.as_deref(), Some(""));
        assert!(!Entry::main(day(1)).has_journal());
    }

    #[test]
    fn test_display_order_newest_first_main_first() {
        let mut entries = vec![
            Entry::extra(day(2), 1),
            Entry::main(day(1)),
            Entry::main(day(2)),
            Entry::extra(day(2), 2),
        ];
        entries.sort_by(|a, b| a.display_cmp(b));
        let keys: Vec<String> = entries.iter().map(|e| e.key().to_string()).collect();
        assert_eq!(
            keys,
            vec!["2024-03-02", "2024-03-02+1", "2024-03-02+2", "2024-03-01"]
        );
    }

    #[test]
    fn test_address_matching() {
        let main = Entry::main(day(4));
        let extra = Entry::extra(day(4), 1);
        assert!(EntryAddress::Date(day(4)).matches(&main));
        assert!(EntryAddress::Date(day(4)).matches(&extra));
        assert!(EntryAddress::Main(day(4)).matches(&main));
        assert!(!EntryAddress::Main(day(4)).matches(&extra));
        assert!(EntryAddress::Extra(day(4)).matches(&extra));
        assert!(!EntryAddress::Key(EntryKey::extra(day(4), 2)).matches(&extra));
    }

    #[test]
    fn test_patch_journal_distinguishes_empty_and_absent() {
        let mut entry = Entry::main(day(1));
        EntryPatch::new().journal("").apply_to(&mut entry);
        assert_eq!(entry.journal.as_deref(), Some(""));
        assert!(!entry.has_journal());

        EntryPatch::new().clear_journal().apply_to(&mut entry);
        assert_eq!(entry.journal, None);

        EntryPatch::new()
            .completed(true)
            .journal("read chapter 3")
            .apply_to(&mut entry);
        assert!(entry.completed);
        assert!(entry.has_journal());
    }

    #[test]
    fn test_entry_json_shape() {
        let entry = Entry::extra(day(5), 1);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["date"], "2024-03-05");
        assert_eq!(json["isExtra"], true);
        assert_eq!(json["extraOrdinal"], 1);
        assert_eq!(json["journal"], "");

        let main: Entry =
            serde_json::from_str(r#"{"date":"2024-03-05","completed":true}"#).unwrap();
        assert!(!main.is_extra);
        assert_eq!(main.journal, None);
    }
}
