//! Audit logging for rule runs
//!
//! Every journal mutation made by a rule action is appended to a
//! line-delimited JSON log (JSONL) with the rule and action that caused it,
//! the state before and after, and a human-readable diff.
//!
//! - `AuditEntry`: one attributed mutation.
//! - `AuditLogger`: appends entries to and reads them back from the log file.
//! - `generate_diff`: summarizes the difference between two JSON states.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, Operation};
pub use logger::AuditLogger;
