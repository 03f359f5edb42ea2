//! Catalog service
//!
//! Maintains the budgets, bills and accounts that rule actions link
//! journals to. Categories are created on demand by actions.

use crate::error::{RulesError, RulesResult};
use crate::models::{AccountRef, AccountType};
use crate::storage::{CatalogData, Storage};

/// Service for catalog management
pub struct CatalogService<'a> {
    storage: &'a Storage,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Everything in the catalog
    pub fn list(&self) -> RulesResult<CatalogData> {
        self.storage.catalog.snapshot()
    }

    pub fn add_budget(&self, name: &str) -> RulesResult<()> {
        let name = validate_name(name)?;
        self.storage.catalog.add_budget(name)?;
        self.storage.catalog.save()
    }

    pub fn add_bill(&self, name: &str) -> RulesResult<()> {
        let name = validate_name(name)?;
        self.storage.catalog.add_bill(name)?;
        self.storage.catalog.save()
    }

    /// Register an account; an existing account of the same name and type
    /// is returned unchanged
    pub fn add_account(&self, name: &str, account_type: AccountType) -> RulesResult<AccountRef> {
        let name = validate_name(name)?;
        let account = self
            .storage
            .catalog
            .add_account(AccountRef::new(name, account_type))?;
        self.storage.catalog.save()?;
        Ok(account)
    }
}

fn validate_name(name: &str) -> RulesResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RulesError::Validation("Name cannot be empty".into()));
    }
    if name.len() > 255 {
        return Err(RulesError::Validation(
            "Name cannot be longer than 255 characters".into(),
        ));
    }
    Ok(name)
}
