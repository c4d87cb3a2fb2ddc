//! Entry ledger: habits, their dated entries, and the stored user document.
//!
//! This module is the first stage of the pipeline. It holds the source of
//! truth every other stage derives from:
//!
//! - **Entries**: dated records addressed by a stable [`EntryKey`]
//! - **Habits**: ledgers with append/update operations and derived views
//! - **Documents**: the shape a storage collaborator loads and saves
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use habitlib::data::{EntryAddress, EntryPatch, Habit};
//!
//! let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
//! let mut habit = Habit::new("habit-1", "Read 10 pages", "Personal Growth", "", 30).unwrap();
//! habit.append_entry(today, false).unwrap();
//! habit
//!     .update_entry(EntryAddress::Main(today), &EntryPatch::new().completed(true))
//!     .unwrap();
//! assert_eq!(habit.completed_count(), 1);
//! ```

pub mod document;
pub mod entry;
pub mod habit;

pub use document::{PublicProfile, UserDocument};
pub use entry::{Entry, EntryAddress, EntryKey, EntryPatch, EntryVariant};
pub use habit::Habit;
