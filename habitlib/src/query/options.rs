//! Input options for report queries.
//!
//! This module contains the configuration types that control which entries a
//! report covers and how its per-habit rows are ordered.

use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::HabitError;
use crate::Result;

/// Inclusive calendar-day interval.
///
/// Deserialization goes through [`DateRange::new`], so an inverted range is
/// rejected on load as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = HabitError;

    fn try_from(raw: RawDateRange) -> Result<Self> {
        Self::new(raw.from, raw.to)
    }
}

impl DateRange {
    /// Create a range; `to` must not be before `from`.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self> {
        if to < from {
            return Err(HabitError::InvalidDateRange { from, to });
        }
        Ok(Self { from, to })
    }

    /// Create a range from timestamps, dropping their time of day.
    pub fn from_datetimes(from: NaiveDateTime, to: NaiveDateTime) -> Result<Self> {
        Self::new(from.date(), to.date())
    }

    /// The `days` days before `today` through `today` itself.
    pub fn last_days(today: NaiveDate, days: u32) -> Self {
        let from = today
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        Self { from, to: today }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Number of calendar days covered (0 for a range built inverted by hand)
    pub fn len_days(&self) -> u64 {
        u64::try_from((self.to - self.from).num_days() + 1).unwrap_or(0)
    }
}

/// Field to order breakdown rows by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrderBy {
    /// Keep the order habits were supplied in
    #[default]
    Position,
    /// Order by habit name (lexicographical)
    Name,
    /// Order by completed entries in range
    Completed,
    /// Order by entries in range
    Total,
    /// Order by completion rate in range
    Rate,
}

impl FromStr for OrderBy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "position" | "none" => Ok(OrderBy::Position),
            "name" | "habit" | "label" => Ok(OrderBy::Name),
            "completed" | "done" => Ok(OrderBy::Completed),
            "total" | "entries" => Ok(OrderBy::Total),
            "rate" => Ok(OrderBy::Rate),
            _ => Err(format!("Unknown order field: {}", s)),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrderDirection {
    /// Ascending (A-Z, smallest first)
    #[default]
    Ascending,
    /// Descending (Z-A, largest first)
    Descending,
}

/// Ordering configuration for breakdown rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ordering {
    /// Field to order by
    pub by: OrderBy,
    /// Sort direction
    pub direction: OrderDirection,
}

impl Ordering {
    /// Keep input order (default)
    pub fn by_position() -> Self {
        Self::default()
    }

    /// Create ordering by name ascending
    pub fn by_name() -> Self {
        Self {
            by: OrderBy::Name,
            direction: OrderDirection::Ascending,
        }
    }

    /// Create ordering by completed count
    pub fn by_completed() -> Self {
        Self {
            by: OrderBy::Completed,
            direction: OrderDirection::Descending,
        }
    }

    /// Create ordering by completion rate
    pub fn by_rate() -> Self {
        Self {
            by: OrderBy::Rate,
            direction: OrderDirection::Descending,
        }
    }

    /// Set sort direction to ascending
    pub fn ascending(mut self) -> Self {
        self.direction = OrderDirection::Ascending;
        self
    }

    /// Set sort direction to descending
    pub fn descending(mut self) -> Self {
        self.direction = OrderDirection::Descending;
        self
    }
}

/// Options for building a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Count extra entries alongside main entries
    pub include_extra: bool,
    /// Ordering of the per-habit breakdown
    pub ordering: Ordering,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            include_extra: true,
            ordering: Ordering::default(),
        }
    }
}

impl ReportOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether extra entries are counted.
    pub fn include_extra(mut self, include: bool) -> Self {
        self.include_extra = include;
        self
    }

    /// Set breakdown ordering.
    pub fn ordering(mut self, ordering: Ordering) -> Self {
        self.ordering = ordering;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn test_date_range_rejects_inverted_bounds() {
        let err = DateRange::new(day(3, 10), day(3, 9)).unwrap_err();
        assert!(matches!(err, HabitError::InvalidDateRange { .. }));
        assert!(DateRange::new(day(3, 10), day(3, 10)).is_ok());
    }

    #[test]
    fn test_inverted_range_cannot_be_loaded() {
        let parsed: std::result::Result<DateRange, _> =
            serde_json::from_str(r#"{"from":"2024-05-10","to":"2024-05-01"}"#);
        assert!(parsed.is_err());

        let ok: DateRange =
            serde_json::from_str(r#"{"from":"2024-05-01","to":"2024-05-10"}"#).unwrap();
        assert_eq!(ok.len_days(), 10);

        let by_hand = DateRange {
            from: day(5, 10),
            to: day(5, 1),
        };
        assert_eq!(by_hand.len_days(), 0);
        assert!(!by_hand.contains(day(5, 5)));
    }

    #[test]
    fn test_date_range_from_datetimes_drops_time() {
        let from = day(3, 1).and_hms_opt(23, 59, 0).unwrap();
        let to = day(3, 2).and_hms_opt(0, 1, 0).unwrap();
        let range = DateRange::from_datetimes(from, to).unwrap();
        assert!(range.contains(day(3, 1)));
        assert!(range.contains(day(3, 2)));
        assert!(!range.contains(day(3, 3)));
        assert_eq!(range.len_days(), 2);
    }

    #[test]
    fn test_last_days() {
        let range = DateRange::last_days(day(3, 31), 30);
        assert_eq!(range.from, day(3, 1));
        assert_eq!(range.to, day(3, 31));
    }

    #[test]
    fn test_order_by_from_str() {
        assert_eq!(OrderBy::from_str("name").unwrap(), OrderBy::Name);
        assert_eq!(OrderBy::from_str("Completed").unwrap(), OrderBy::Completed);
        assert_eq!(OrderBy::from_str("rate").unwrap(), OrderBy::Rate);
        assert_eq!(OrderBy::from_str("total").unwrap(), OrderBy::Total);
        assert_eq!(OrderBy::from_str("position").unwrap(), OrderBy::Position);
        assert!(OrderBy::from_str("invalid").is_err());
    }

    #[test]
    fn test_ordering_builders() {
        assert_eq!(Ordering::default().by, OrderBy::Position);
        let ordering = Ordering::by_completed();
        assert_eq!(ordering.direction, OrderDirection::Descending);
        let ordering = Ordering::by_rate().ascending();
        assert_eq!(ordering.by, OrderBy::Rate);
        assert_eq!(ordering.direction, OrderDirection::Ascending);
    }

    #[test]
    fn test_report_options_builder() {
        let options = ReportOptions::new()
            .include_extra(false)
            .ordering(Ordering::by_name());
        assert!(!options.include_extra);
        assert_eq!(options.ordering.by, OrderBy::Name);
        assert!(ReportOptions::default().include_extra);
    }
}
