//! Rule engine write-through for file storage
//!
//! Implements `JournalMutator` on top of the repositories: names are
//! resolved against the catalog, then the stored journal is updated.
//! Nothing reaches disk until the caller saves.

use crate::error::RulesError;
use crate::models::{AccountRef, AccountType, Amount, JournalId, TransactionType};
use crate::rules::ledger::JournalMutator;

use super::Storage;

impl JournalMutator for Storage {
    fn set_category(&self, journal: JournalId, category: &str) -> Result<String, RulesError> {
        let category = self.catalog.ensure_category(category)?;
        let stored = category.clone();
        self.journals
            .update(journal, |j| j.category = Some(category))?;
        Ok(stored)
    }

    fn clear_category(&self, journal: JournalId) -> Result<(), RulesError> {
        self.journals.update(journal, |j| j.category = None)
    }

    fn set_budget(&self, journal: JournalId, budget: &str) -> Result<String, RulesError> {
        let budget = self
            .catalog
            .find_budget(budget)?
            .ok_or_else(|| RulesError::budget_not_found(budget))?;
        let stored = budget.clone();
        self.journals.update(journal, |j| j.budget = Some(budget))?;
        Ok(stored)
    }

    fn clear_budget(&self, journal: JournalId) -> Result<(), RulesError> {
        self.journals.update(journal, |j| j.budget = None)
    }

    fn add_tag(&self, journal: JournalId, tag: &str) -> Result<(), RulesError> {
        self.journals.update(journal, |j| {
            j.add_tag(tag);
        })
    }

    fn remove_tag(&self, journal: JournalId, tag: &str) -> Result<(), RulesError> {
        self.journals.update(journal, |j| {
            j.remove_tag(tag);
        })
    }

    fn remove_all_tags(&self, journal: JournalId) -> Result<(), RulesError> {
        self.journals.update(journal, |j| j.tags.clear())
    }

    fn set_description(&self, journal: JournalId, description: &str) -> Result<(), RulesError> {
        self.journals
            .update(journal, |j| j.description = description.to_string())
    }

    fn set_notes(&self, journal: JournalId, notes: Option<&str>) -> Result<(), RulesError> {
        self.journals
            .update(journal, |j| j.notes = notes.map(str::to_string))
    }

    fn set_accounts(
        &self,
        journal: JournalId,
        source: &AccountRef,
        destination: &AccountRef,
    ) -> Result<(), RulesError> {
        self.journals.update(journal, |j| {
            j.source = source.clone();
            j.destination = destination.clone();
        })
    }

    fn convert(
        &self,
        journal: JournalId,
        transaction_type: TransactionType,
        source: &AccountRef,
        destination: &AccountRef,
        amount: Amount,
    ) -> Result<(), RulesError> {
        self.journals.update(journal, |j| {
            j.transaction_type = transaction_type;
            j.source = source.clone();
            j.destination = destination.clone();
            j.amount = amount;
            if transaction_type != TransactionType::Withdrawal {
                j.budget = None;
                j.bill = None;
            }
        })
    }

    fn link_bill(&self, journal: JournalId, bill: &str) -> Result<String, RulesError> {
        let bill = self
            .catalog
            .find_bill(bill)?
            .ok_or_else(|| RulesError::bill_not_found(bill))?;
        let stored = bill.clone();
        self.journals.update(journal, |j| j.bill = Some(bill))?;
        Ok(stored)
    }

    fn delete(&self, journal: JournalId) -> Result<(), RulesError> {
        if !self.journals.delete(journal)? {
            return Err(RulesError::journal_not_found(journal.to_string()));
        }
        Ok(())
    }

    fn resolve_account(
        &self,
        name: &str,
        account_type: AccountType,
        create: bool,
    ) -> Result<AccountRef, RulesError> {
        if let Some(account) = self.catalog.find_account(name, account_type)? {
            return Ok(account);
        }
        if !create {
            return Err(RulesError::account_not_found(format!(
                "{} ({})",
                name.trim(),
                account_type
            )));
        }
        self.catalog
            .add_account(AccountRef::new(name.trim(), account_type))
    }
}
