//! Display formatting for terminal output
//!
//! Provides utilities for formatting journals, rules and run results for
//! terminal display.

pub mod journal;
pub mod report;
pub mod rule;

pub use journal::{format_journal_details, format_journal_register, format_journal_row};
pub use report::{format_audit_entries, format_match_report, format_run_report};
pub use rule::{
    format_action_kinds, format_rule_details, format_rule_list, format_trigger_kinds,
    format_warnings,
};
