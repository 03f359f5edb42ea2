//! Collaborator interfaces used by the rule engine
//!
//! The engine knows nothing about storage. It reads candidate journals
//! through `JournalCollector`, writes action side effects through
//! `JournalMutator` and loads configuration through `RuleSource`.

use chrono::NaiveDate;

use crate::error::RulesResult;
use crate::models::{
    AccountRef, AccountType, Amount, JournalId, RuleBook, TransactionJournal, TransactionType,
};

/// Narrow write interface for action side effects.
///
/// Every method must converge: repeating a call with the same arguments
/// leaves the journal in the same state.
pub trait JournalMutator {
    /// Link a category by name, creating it when missing.
    ///
    /// Returns the name as stored, which keeps an existing spelling.
    fn set_category(&self, journal: JournalId, category: &str) -> RulesResult<String>;

    fn clear_category(&self, journal: JournalId) -> RulesResult<()>;

    /// Link an existing budget by name, returning its stored name
    fn set_budget(&self, journal: JournalId, budget: &str) -> RulesResult<String>;

    fn clear_budget(&self, journal: JournalId) -> RulesResult<()>;

    fn add_tag(&self, journal: JournalId, tag: &str) -> RulesResult<()>;

    fn remove_tag(&self, journal: JournalId, tag: &str) -> RulesResult<()>;

    fn remove_all_tags(&self, journal: JournalId) -> RulesResult<()>;

    fn set_description(&self, journal: JournalId, description: &str) -> RulesResult<()>;

    fn set_notes(&self, journal: JournalId, notes: Option<&str>) -> RulesResult<()>;

    fn set_accounts(
        &self,
        journal: JournalId,
        source: &AccountRef,
        destination: &AccountRef,
    ) -> RulesResult<()>;

    /// Change the journal type together with its accounts and signed amount.
    ///
    /// Budget and bill links are dropped unless the new type is a withdrawal.
    fn convert(
        &self,
        journal: JournalId,
        transaction_type: TransactionType,
        source: &AccountRef,
        destination: &AccountRef,
        amount: Amount,
    ) -> RulesResult<()>;

    /// Link an existing bill by name, returning its stored name
    fn link_bill(&self, journal: JournalId, bill: &str) -> RulesResult<String>;

    fn delete(&self, journal: JournalId) -> RulesResult<()>;

    /// Look up an account by name and type, optionally creating it
    fn resolve_account(
        &self,
        name: &str,
        account_type: AccountType,
        create: bool,
    ) -> RulesResult<AccountRef>;
}

/// Search window for candidate journals
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JournalQuery {
    /// Account names or ids; empty means every account
    pub accounts: Vec<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl JournalQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accounts(mut self, accounts: Vec<String>) -> Self {
        self.accounts = accounts;
        self
    }

    pub fn date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Check whether a journal falls inside the window
    pub fn includes(&self, journal: &TransactionJournal) -> bool {
        if let Some(start) = self.start {
            if journal.date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if journal.date > end {
                return false;
            }
        }
        self.accounts.is_empty() || self.accounts.iter().any(|a| journal.touches_account(a))
    }
}

/// Read interface for candidate journals
pub trait JournalCollector {
    /// One page of journals inside the query window, newest first
    fn page(
        &self,
        query: &JournalQuery,
        offset: usize,
        limit: usize,
    ) -> RulesResult<Vec<TransactionJournal>>;
}

/// Source of rule configuration, loaded fresh for every run
pub trait RuleSource {
    fn rule_book(&self) -> RulesResult<RuleBook>;
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory collaborators for engine tests

    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    use super::*;
    use crate::error::RulesError;
    use crate::models::{AccountRef, AccountType};

    /// Records every write and keeps a copy of each journal
    #[derive(Default)]
    pub struct MemoryLedger {
        pub journals: RefCell<HashMap<JournalId, TransactionJournal>>,
        pub accounts: RefCell<Vec<AccountRef>>,
        pub budgets: Vec<String>,
        pub bills: Vec<String>,
        pub writes: RefCell<Vec<String>>,
        pub pages_served: Cell<usize>,
        pub fail_all: bool,
    }

    impl MemoryLedger {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_journals(journals: Vec<TransactionJournal>) -> Self {
            let ledger = Self::new();
            for journal in journals {
                ledger.journals.borrow_mut().insert(journal.id, journal);
            }
            ledger
        }

        pub fn get(&self, id: JournalId) -> Option<TransactionJournal> {
            self.journals.borrow().get(&id).cloned()
        }

        fn write<F: FnOnce(&mut TransactionJournal)>(
            &self,
            id: JournalId,
            label: String,
            f: F,
        ) -> RulesResult<()> {
            if self.fail_all {
                return Err(RulesError::Storage("ledger unavailable".into()));
            }
            let mut journals = self.journals.borrow_mut();
            let journal = journals
                .get_mut(&id)
                .ok_or_else(|| RulesError::journal_not_found(id.to_string()))?;
            f(journal);
            self.writes.borrow_mut().push(label);
            Ok(())
        }
    }

    impl JournalMutator for MemoryLedger {
        fn set_category(&self, journal: JournalId, category: &str) -> RulesResult<String> {
            let category = category.to_string();
            let stored = category.clone();
            self.write(journal, format!("set_category:{}", category), |j| {
                j.category = Some(category)
            })?;
            Ok(stored)
        }

        fn clear_category(&self, journal: JournalId) -> RulesResult<()> {
            self.write(journal, "clear_category".into(), |j| j.category = None)
        }

        fn set_budget(&self, journal: JournalId, budget: &str) -> RulesResult<String> {
            let budget = self
                .budgets
                .iter()
                .find(|b| b.eq_ignore_ascii_case(budget))
                .cloned()
                .ok_or_else(|| RulesError::budget_not_found(budget))?;
            let stored = budget.clone();
            self.write(journal, format!("set_budget:{}", budget), |j| j.budget = Some(budget))?;
            Ok(stored)
        }

        fn clear_budget(&self, journal: JournalId) -> RulesResult<()> {
            self.write(journal, "clear_budget".into(), |j| j.budget = None)
        }

        fn add_tag(&self, journal: JournalId, tag: &str) -> RulesResult<()> {
            self.write(journal, format!("add_tag:{}", tag), |j| {
                j.add_tag(tag);
            })
        }

        fn remove_tag(&self, journal: JournalId, tag: &str) -> RulesResult<()> {
            self.write(journal, format!("remove_tag:{}", tag), |j| {
                j.remove_tag(tag);
            })
        }

        fn remove_all_tags(&self, journal: JournalId) -> RulesResult<()> {
            self.write(journal, "remove_all_tags".into(), |j| j.tags.clear())
        }

        fn set_description(&self, journal: JournalId, description: &str) -> RulesResult<()> {
            let description = description.to_string();
            self.write(journal, format!("set_description:{}", description), |j| {
                j.description = description
            })
        }

        fn set_notes(&self, journal: JournalId, notes: Option<&str>) -> RulesResult<()> {
            let notes = notes.map(str::to_string);
            self.write(journal, "set_notes".into(), |j| j.notes = notes)
        }

        fn set_accounts(
            &self,
            journal: JournalId,
            source: &AccountRef,
            destination: &AccountRef,
        ) -> RulesResult<()> {
            self.write(journal, "set_accounts".into(), |j| {
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
        ) -> RulesResult<()> {
            self.write(journal, format!("convert:{}", transaction_type.key()), |j| {
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

        fn link_bill(&self, journal: JournalId, bill: &str) -> RulesResult<String> {
            let bill = self
                .bills
                .iter()
                .find(|b| b.eq_ignore_ascii_case(bill))
                .cloned()
                .ok_or_else(|| RulesError::bill_not_found(bill))?;
            let stored = bill.clone();
            self.write(journal, format!("link_bill:{}", bill), |j| j.bill = Some(bill))?;
            Ok(stored)
        }

        fn delete(&self, journal: JournalId) -> RulesResult<()> {
            if self.fail_all {
                return Err(RulesError::Storage("ledger unavailable".into()));
            }
            self.journals
                .borrow_mut()
                .remove(&journal)
                .ok_or_else(|| RulesError::journal_not_found(journal.to_string()))?;
            self.writes.borrow_mut().push("delete".into());
            Ok(())
        }

        fn resolve_account(
            &self,
            name: &str,
            account_type: AccountType,
            create: bool,
        ) -> RulesResult<AccountRef> {
            let existing = self
                .accounts
                .borrow()
                .iter()
                .find(|a| a.account_type == account_type && a.is_named(name))
                .cloned();
            match existing {
                Some(account) => Ok(account),
                None if create => {
                    let account = AccountRef::new(name.trim(), account_type);
                    self.accounts.borrow_mut().push(account.clone());
                    Ok(account)
                }
                None => Err(RulesError::account_not_found(name)),
            }
        }
    }

    impl JournalCollector for MemoryLedger {
        fn page(
            &self,
            query: &JournalQuery,
            offset: usize,
            limit: usize,
        ) -> RulesResult<Vec<TransactionJournal>> {
            self.pages_served.set(self.pages_served.get() + 1);
            let mut journals: Vec<_> = self
                .journals
                .borrow()
                .values()
                .filter(|j| query.includes(j))
                .cloned()
                .collect();
            journals.sort_by(|a, b| b.date.cmp(&a.date).then(a.description.cmp(&b.description)));
            Ok(journals.into_iter().skip(offset).take(limit).collect())
        }
    }
}
