//! Error types for habitlib

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while editing ledgers or computing progress.
///
/// Every variant is a local validation failure: the operation that returned it
/// has not mutated anything.
#[derive(Error, Debug)]
pub enum HabitError {
    /// A second main entry was requested for a date that already has one
    #[error("habit '{habit}' already has a main entry for {date}; update it or add an extra entry")]
    DuplicateMainEntry { habit: String, date: NaiveDate },

    /// An update addressed a date holding several entries without saying which
    #[error("entry address for {date} matches {matches} entries")]
    AmbiguousEntryAddress { date: NaiveDate, matches: usize },

    /// No entry matches the given address
    #[error("no entry found for {date}")]
    EntryNotFound { date: NaiveDate },

    /// Report interval ends before it starts
    #[error("invalid date range: {to} is before {from}")]
    InvalidDateRange { from: NaiveDate, to: NaiveDate },

    /// Habit duration must cover at least one day
    #[error("invalid habit duration: {0} (must be at least 1 day)")]
    InvalidDuration(u32),

    /// The category name is reserved for the all-categories sum
    #[error("category name '{0}' is reserved")]
    ReservedCategory(String),

    /// No habit with the given identifier
    #[error("habit not found: {0}")]
    HabitNotFound(String),

    /// A rank ladder was defined without any tiers
    #[error("rank ladder has no ranks")]
    EmptyRankLadder,

    /// A rank ladder mixes XP thresholds with category requirements
    #[error("rank ladder mixes XP and category requirements")]
    MixedRankModels,

    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// User document could not be parsed or serialized
    #[error("invalid user document: {0}")]
    Document(#[from] serde_json::Error),

    /// Configuration file could not be parsed
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}
