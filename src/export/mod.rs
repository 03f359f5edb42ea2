//! Export module for Rulebook
//!
//! Writes rule previews and run results as CSV for spreadsheets.

pub mod csv;

pub use self::csv::{export_journals_csv, export_match_report_csv, export_run_csv};
