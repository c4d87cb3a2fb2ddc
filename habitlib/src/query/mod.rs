//! Query processing: restrict, aggregate, and sort ledger data for reports.
//!
//! This module handles the third stage of the pipeline - turning habit ledgers
//! into date-ranged completion reports. It provides:
//!
//! - **Options**: `DateRange`, `ReportOptions` and breakdown `Ordering`
//! - **Report**: overall totals plus a per-habit breakdown
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use habitlib::query::{build_report, DateRange, Ordering, ReportOptions};
//!
//! let today = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
//! let report = build_report(
//!     &[],
//!     DateRange::last_days(today, 30),
//!     ReportOptions::new().ordering(Ordering::by_completed()),
//! );
//! assert_eq!(report.completion_rate, 0.0);
//! ```

pub mod options;
pub mod report;

pub use options::{DateRange, OrderBy, OrderDirection, Ordering, ReportOptions};
pub use report::{build_report, HabitBreakdown, Report};
