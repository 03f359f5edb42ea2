//! Service layer for Rulebook
//!
//! The service layer wires the rule engine to the storage layer: loading
//! rules, collecting journals, persisting results and writing the audit log.

pub mod catalog;
pub mod journal;
pub mod rules;

pub use catalog::CatalogService;
pub use journal::{ImportResult, JournalRecord, JournalService};
pub use rules::{ApplyOptions, RuleService};
