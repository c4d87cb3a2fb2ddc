//! Per-habit live summary.

use chrono::NaiveDate;
use serde::Serialize;

use crate::data::Habit;

use super::streak::{calculate_streak, longest_streak, Streak};

/// Everything shown for a habit on the status view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitStatus {
    pub id: String,
    pub name: String,
    pub category: String,
    /// Main entries registered so far
    pub day: u32,
    pub duration: u32,
    /// Completed main entries
    pub completed: u32,
    pub progress_percent: f64,
    pub streak: Streak,
    pub best_streak: u32,
}

impl HabitStatus {
    pub fn compute(habit: &Habit, today: NaiveDate) -> Self {
        Self {
            id: habit.id.clone(),
            name: habit.name.clone(),
            category: habit.category.clone(),
            day: habit.day_count(),
            duration: habit.duration,
            completed: habit.completed_count(),
            progress_percent: habit.progress_percent(),
            streak: calculate_streak(&habit.entries, today),
            best_streak: longest_streak(&habit.entries, today),
        }
    }
}
