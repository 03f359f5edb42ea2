//! Catalog repository for JSON storage
//!
//! Holds the names journals refer to: accounts, categories, budgets and
//! bills. Stored together in catalog.json.

use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::RulesError;
use crate::models::{AccountRef, AccountType, TransactionJournal};

use super::file_io::{read_json, write_json_atomic};

/// Serializable catalog data structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub accounts: Vec<AccountRef>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub budgets: Vec<String>,
    #[serde(default)]
    pub bills: Vec<String>,
}

fn find_name<'a>(names: &'a [String], name: &str) -> Option<&'a String> {
    let needle = AccountRef::normalize_name(name);
    names
        .iter()
        .find(|n| AccountRef::normalize_name(n) == needle)
}

/// Repository for catalog persistence
pub struct CatalogRepository {
    path: PathBuf,
    data: RwLock<CatalogData>,
}

impl CatalogRepository {
    /// Create a new catalog repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(CatalogData::default()),
        }
    }

    /// Load the catalog from disk
    pub fn load(&self) -> Result<(), RulesError> {
        let file_data: CatalogData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| RulesError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = file_data;

        Ok(())
    }

    /// Save the catalog to disk
    pub fn save(&self) -> Result<(), RulesError> {
        let data = self.snapshot()?;
        write_json_atomic(&self.path, &data)
    }

    /// A copy of the whole catalog
    pub fn snapshot(&self) -> Result<CatalogData, RulesError> {
        let data = self
            .data
            .read()
            .map_err(|e| RulesError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.clone())
    }

    /// Find an account by name and type (case-insensitive)
    pub fn find_account(
        &self,
        name: &str,
        account_type: AccountType,
    ) -> Result<Option<AccountRef>, RulesError> {
        let data = self
            .data
            .read()
            .map_err(|e| RulesError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .accounts
            .iter()
            .find(|a| a.account_type == account_type && a.is_named(name))
            .cloned())
    }

    /// Register an account unless one with the same name and type exists.
    /// Returns the stored account.
    pub fn add_account(&self, account: AccountRef) -> Result<AccountRef, RulesError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| RulesError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if let Some(existing) = data
            .accounts
            .iter()
            .find(|a| a.account_type == account.account_type && a.is_named(&account.name))
        {
            return Ok(existing.clone());
        }
        data.accounts.push(account.clone());
        Ok(account)
    }

    /// Register both accounts of an imported journal
    pub fn register_journal(&self, journal: &TransactionJournal) -> Result<(), RulesError> {
        self.add_account(journal.source.clone())?;
        self.add_account(journal.destination.clone())?;
        Ok(())
    }

    /// Find a category by name, creating it when missing.
    /// Returns the stored spelling.
    pub fn ensure_category(&self, name: &str) -> Result<String, RulesError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| RulesError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if let Some(existing) = find_name(&data.categories, name) {
            return Ok(existing.clone());
        }
        let name = name.trim().to_string();
        data.categories.push(name.clone());
        Ok(name)
    }

    /// Find an existing budget by name
    pub fn find_budget(&self, name: &str) -> Result<Option<String>, RulesError> {
        let data = self
            .data
            .read()
            .map_err(|e| RulesError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(find_name(&data.budgets, name).cloned())
    }

    /// Find an existing bill by name
    pub fn find_bill(&self, name: &str) -> Result<Option<String>, RulesError> {
        let data = self
            .data
            .read()
            .map_err(|e| RulesError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(find_name(&data.bills, name).cloned())
    }

    /// Add a budget name; duplicates are ignored
    pub fn add_budget(&self, name: &str) -> Result<(), RulesError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| RulesError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if find_name(&data.budgets, name).is_none() {
            data.budgets.push(name.trim().to_string());
        }
        Ok(())
    }

    /// Add a bill name; duplicates are ignored
    pub fn add_bill(&self, name: &str) -> Result<(), RulesError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| RulesError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if find_name(&data.bills, name).is_none() {
            data.bills.push(name.trim().to_string());
        }
        Ok(())
    }
}
