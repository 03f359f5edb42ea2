//! Rule repository for JSON storage
//!
//! Manages loading and saving rule groups and rules to rules.json.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::RulesError;
use crate::models::{Rule, RuleBook, RuleGroup};
use crate::rules::ledger::RuleSource;

use super::file_io::{read_document, read_json, write_json_atomic};

/// Repository for rule persistence
pub struct RuleRepository {
    path: PathBuf,
    data: RwLock<RuleBook>,
}

impl RuleRepository {
    /// Create a new rule repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(RuleBook::default()),
        }
    }

    /// Load rules from disk
    pub fn load(&self) -> Result<(), RulesError> {
        let file_data: RuleBook = read_json(&self.path)?;
        self.replace(file_data)
    }

    /// Save rules to disk
    pub fn save(&self) -> Result<(), RulesError> {
        let book = self.book()?;
        write_json_atomic(&self.path, &book)
    }

    /// A copy of the stored groups and rules
    pub fn book(&self) -> Result<RuleBook, RulesError> {
        let data = self
            .data
            .read()
            .map_err(|e| RulesError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.clone())
    }

    /// Replace the stored configuration wholesale
    pub fn replace(&self, book: RuleBook) -> Result<(), RulesError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| RulesError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        *data = book;
        Ok(())
    }

    /// Replace the stored configuration with a JSON or YAML file
    pub fn import_file(&self, path: &Path) -> Result<RuleBook, RulesError> {
        let book: RuleBook = read_document(path)?;
        self.replace(book.clone())?;
        Ok(book)
    }

    /// Insert or update a group
    pub fn upsert_group(&self, group: RuleGroup) -> Result<(), RulesError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| RulesError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        match data.groups.iter_mut().find(|g| g.id == group.id) {
            Some(existing) => *existing = group,
            None => data.groups.push(group),
        }
        Ok(())
    }

    /// Insert or update a rule
    pub fn upsert_rule(&self, rule: Rule) -> Result<(), RulesError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| RulesError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        match data.rules.iter_mut().find(|r| r.id == rule.id) {
            Some(existing) => *existing = rule,
            None => data.rules.push(rule),
        }
        Ok(())
    }
}

impl RuleSource for RuleRepository {
    fn rule_book(&self) -> Result<RuleBook, RulesError> {
        self.book()
    }
}
