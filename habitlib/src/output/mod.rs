//! Output formatting: present data as tables.
//!
//! This module handles the final stage of the pipeline - formatting
//! reports, statuses and rank ladders for display. It provides:
//!
//! - **HabitTable**: Table-ready data structure with headers, rows, and footer
//! - **TableRow**: Individual row with label and formatted values
//!
//! HabitTable only formats data into strings. All filtering, aggregation, and
//! sorting happens in the query and progress stages.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use habitlib::output::HabitTable;
//! use habitlib::query::{build_report, DateRange, ReportOptions};
//!
//! let today = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
//! let report = build_report(&[], DateRange::last_days(today, 7), ReportOptions::default());
//! let table = HabitTable::from_report(&report);
//! assert_eq!(table.footer.unwrap().label, "Total (0 habits)");
//! ```

pub mod table;

pub use table::{HabitTable, TableRow};
