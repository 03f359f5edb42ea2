//! Storage layer for Rulebook
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation. `Storage` is the reference collaborator for the rule engine:
//! it collects journals, serves rules and applies action side effects.

pub mod catalog;
pub mod file_io;
pub mod init;
pub mod journals;
mod ledger;
pub mod rules;

pub use catalog::{CatalogData, CatalogRepository};
pub use file_io::{read_document, read_json, write_json_atomic};
pub use init::initialize_storage;
pub use journals::JournalRepository;
pub use rules::RuleRepository;

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::paths::RulebookPaths;
use crate::error::RulesError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: RulebookPaths,
    pub journals: JournalRepository,
    pub rules: RuleRepository,
    pub catalog: CatalogRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: RulebookPaths) -> Result<Self, RulesError> {
        paths.ensure_directories()?;

        Ok(Self {
            journals: JournalRepository::new(paths.journals_file()),
            rules: RuleRepository::new(paths.rules_file()),
            catalog: CatalogRepository::new(paths.catalog_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &RulebookPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), RulesError> {
        self.journals.load()?;
        self.rules.load()?;
        self.catalog.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), RulesError> {
        self.journals.save()?;
        self.rules.save()?;
        self.catalog.save()?;
        Ok(())
    }

    /// The append-only audit log
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Append entries to the audit log
    pub fn log_audit(&self, entries: &[AuditEntry]) -> Result<(), RulesError> {
        self.audit.log_batch(entries)
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}
