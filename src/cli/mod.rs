//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod apply;
pub mod audit;
pub mod catalog;
pub mod config;
pub mod journal;
pub mod rules;

pub use apply::{handle_apply_command, ApplyArgs};
pub use audit::{handle_audit_command, AuditArgs};
pub use catalog::{handle_catalog_command, CatalogCommands};
pub use config::{handle_config_command, handle_init_command, ConfigCommands};
pub use journal::{handle_journal_command, JournalCommands};
pub use rules::{handle_rule_command, handle_validate_command, RuleCommands};
pub use test::{handle_test_command, TestArgs};

use chrono::NaiveDate;

use crate::error::{RulesError, RulesResult};
use crate::models::TriggerMode;

/// Parse an optional YYYY-MM-DD argument
pub(crate) fn parse_date(date_str: Option<&str>) -> RulesResult<Option<NaiveDate>> {
    date_str
        .map(|s| {
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
                RulesError::Validation(format!("Invalid date format: '{}'. Use YYYY-MM-DD", s))
            })
        })
        .transpose()
}

pub(crate) fn parse_mode(mode: &str) -> RulesResult<TriggerMode> {
    TriggerMode::parse(mode).ok_or_else(|| {
        RulesError::Validation(format!("Unknown mode: '{}'. Use store or update", mode))
    })
}
