//! Collaborator-facing document shapes.
//!
//! The engine never persists anything itself. These types describe what a
//! storage collaborator loads and saves for one user: the habit list plus the
//! stored XP counter. JSON round-trips every entry field, including the extra
//! flag and the empty-versus-absent journal distinction.

use serde::{Deserialize, Serialize};

use crate::error::HabitError;
use crate::Result;

use super::habit::Habit;

/// Everything stored for a single user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    /// Cached XP counter; only ever moved by applying an XP delta
    #[serde(default)]
    pub xp: u64,
    #[serde(default)]
    pub habits: Vec<Habit>,
}

impl UserDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document, normalizing and validating every ledger.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut document: UserDocument = serde_json::from_str(json)?;
        for habit in &mut document.habits {
            habit.normalize();
            habit.validate()?;
        }
        Ok(document)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn habit(&self, id: &str) -> Result<&Habit> {
        self.habits
            .iter()
            .find(|h| h.id == id)
            .ok_or_else(|| HabitError::HabitNotFound(id.to_string()))
    }

    pub fn habit_mut(&mut self, id: &str) -> Result<&mut Habit> {
        self.habits
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or_else(|| HabitError::HabitNotFound(id.to_string()))
    }

    /// Remove a habit together with its entries.
    pub fn remove_habit(&mut self, id: &str) -> Result<Habit> {
        let index = self
            .habits
            .iter()
            .position(|h| h.id == id)
            .ok_or_else(|| HabitError::HabitNotFound(id.to_string()))?;
        Ok(self.habits.remove(index))
    }
}

/// Publicly visible summary of a user, as shown on the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub display_name: String,
    pub rank_name: String,
    /// Completed main entries across all habits
    pub completed_habits: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::entry::{EntryKey, EntryPatch};
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    #[test]
    fn test_round_trip_preserves_entries() {
        let mut habit = Habit::new("habit-1", "Meditate", "Wellness", "10 minutes", 21).unwrap();
        habit.append_entry(day(1), false).unwrap();
        let extra = habit.append_entry(day(1), true).unwrap();
        habit
            .update_entry(extra, &EntryPatch::new().completed(true).journal(""))
            .unwrap();
        let plain = habit.append_entry(day(2), false).unwrap();
        habit
            .update_entry(plain, &EntryPatch::new().clear_journal())
            .unwrap();

        let document = UserDocument {
            xp: 7,
            habits: vec![habit],
        };
        let json = document.to_json().unwrap();
        let parsed = UserDocument::from_json(&json).unwrap();
        assert_eq!(parsed, document);

        let entry = parsed.habits[0].entry(EntryKey::extra(day(1), 1)).unwrap();
        assert_eq!(entry.journal.as_deref(), Some(""));
        assert_eq!(parsed.habits[0].entry(EntryKey::main(day(2))).unwrap().journal, None);
    }

    #[test]
    fn test_from_json_accepts_minimal_documents() {
        let json = r#"{
            "habits": [{
                "id": "habit-1",
                "name": "Run",
                "category": "Health",
                "duration": 7,
                "entries": [
                    {"date": "2024-07-01", "completed": true, "journal": ""},
                    {"date": "2024-07-01", "completed": false, "isExtra": true},
                    {"date": "2024-07-01", "completed": true, "isExtra": true}
                ]
            }]
        }"#;
        let document = UserDocument::from_json(json).unwrap();
        assert_eq!(document.xp, 0);
        let habit = document.habit("habit-1").unwrap();
        assert!(habit.entry(EntryKey::extra(day(1), 1)).is_some());
        assert!(habit.entry(EntryKey::extra(day(1), 2)).unwrap().completed);
    }

    #[test]
    fn test_from_json_rejects_duplicate_main_entries() {
        let json = r#"{"habits": [{"id": "h", "name": "n", "category": "c", "duration": 3,
            "entries": [{"date": "2024-07-01", "completed": true},
                        {"date": "2024-07-01", "completed": false}]}]}"#;
        assert!(matches!(
            UserDocument::from_json(json),
            Err(HabitError::DuplicateMainEntry { .. })
        ));
    }

    #[test]
    fn test_remove_habit() {
        let mut document = UserDocument::new();
        document
            .habits
            .push(Habit::new("a", "A", "Health", "", 5).unwrap());
        document
            .habits
            .push(Habit::new("b", "B", "Health", "", 5).unwrap());

        let removed = document.remove_habit("a").unwrap();
        assert_eq!(removed.id, "a");
        assert_eq!(document.habits.len(), 1);
        assert!(matches!(
            document.remove_habit("a"),
            Err(HabitError::HabitNotFound(_))
        ));
    }
}
