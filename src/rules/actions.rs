//! Action execution
//!
//! Each action writes through the `JournalMutator` and then mirrors the
//! change on the in-memory journal, so later triggers and actions in the
//! same run see it. Actions converge: applying one twice leaves the journal
//! as applying it once did, and the second application reports no change.

use tracing::{debug, warn};

use super::ledger::JournalMutator;
use super::report::FieldChange;
use crate::error::{RulesError, RulesResult};
use crate::models::{
    AccountRef, AccountType, ActionKind, RuleAction, TransactionJournal, TransactionType,
};

/// Result of applying one action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub success: bool,
    /// Processing of this journal should end after this action
    pub stop: bool,
    pub error: Option<String>,
    pub change: Option<FieldChange>,
}

/// Apply an action to a journal.
///
/// Failures are reported in the outcome, never propagated.
pub fn apply_action(
    action: &RuleAction,
    journal: &mut TransactionJournal,
    ledger: &dyn JournalMutator,
) -> ActionOutcome {
    debug!(action = %action, journal = %journal.id, "Applying action");

    match execute(action.kind, &action.value, journal, ledger) {
        Ok(change) => ActionOutcome {
            success: true,
            stop: action.stop_processing || action.kind == ActionKind::DeleteTransaction,
            error: None,
            change,
        },
        Err(e) => {
            warn!(action = %action, journal = %journal.id, error = %e, "Action failed");
            ActionOutcome {
                success: false,
                stop: false,
                error: Some(e.to_string()),
                change: None,
            }
        }
    }
}

fn execute(
    kind: ActionKind,
    value: &str,
    journal: &mut TransactionJournal,
    ledger: &dyn JournalMutator,
) -> RulesResult<Option<FieldChange>> {
    let id = journal.id;

    match kind {
        ActionKind::SetCategory => {
            let category = required(kind, value)?;
            if same_name(journal.category.as_deref(), category) {
                return Ok(None);
            }
            let stored = ledger.set_category(id, category)?;
            let before = journal.category.replace(stored.clone());
            Ok(Some(changed(journal, "category", before, Some(&stored))))
        }

        ActionKind::ClearCategory => {
            if journal.category.is_none() {
                return Ok(None);
            }
            ledger.clear_category(id)?;
            let before = journal.category.take();
            Ok(Some(changed(journal, "category", before, None)))
        }

        ActionKind::SetBudget => {
            let budget = required(kind, value)?;
            withdrawal_only(journal, "budget")?;
            if same_name(journal.budget.as_deref(), budget) {
                return Ok(None);
            }
            let stored = ledger.set_budget(id, budget)?;
            let before = journal.budget.replace(stored.clone());
            Ok(Some(changed(journal, "budget", before, Some(&stored))))
        }

        ActionKind::ClearBudget => {
            if journal.budget.is_none() {
                return Ok(None);
            }
            ledger.clear_budget(id)?;
            let before = journal.budget.take();
            Ok(Some(changed(journal, "budget", before, None)))
        }

        ActionKind::AddTag => {
            let tag = required(kind, value)?;
            if journal.has_tag(tag) {
                return Ok(None);
            }
            ledger.add_tag(id, tag)?;
            let before = tag_list(journal);
            journal.add_tag(tag);
            let after = tag_list(journal);
            Ok(Some(FieldChange::new("tags", before, after)))
        }

        ActionKind::RemoveTag => {
            let tag = required(kind, value)?;
            if !journal.has_tag(tag) {
                return Ok(None);
            }
            ledger.remove_tag(id, tag)?;
            let before = tag_list(journal);
            journal.remove_tag(tag);
            let after = tag_list(journal);
            Ok(Some(FieldChange::new("tags", before, after)))
        }

        ActionKind::RemoveAllTags => {
            if journal.tags.is_empty() {
                return Ok(None);
            }
            ledger.remove_all_tags(id)?;
            let before = tag_list(journal);
            journal.tags.clear();
            Ok(Some(changed(journal, "tags", before, None)))
        }

        ActionKind::SetDescription => {
            let description = required_text(kind, value)?;
            if journal.description == description {
                return Ok(None);
            }
            write_description(journal, ledger, description.to_string())
        }

        ActionKind::AppendDescription => {
            let suffix = required_text(kind, value)?;
            if journal.description.ends_with(suffix) {
                return Ok(None);
            }
            let description = format!("{}{}", journal.description, suffix);
            write_description(journal, ledger, description)
        }

        ActionKind::PrependDescription => {
            let prefix = required_text(kind, value)?;
            if journal.description.starts_with(prefix) {
                return Ok(None);
            }
            let description = format!("{}{}", prefix, journal.description);
            write_description(journal, ledger, description)
        }

        ActionKind::SetNotes => {
            let notes = required_text(kind, value)?;
            if journal.notes_text() == notes {
                return Ok(None);
            }
            write_notes(journal, ledger, Some(notes.to_string()))
        }

        ActionKind::AppendNotes => {
            let suffix = required_text(kind, value)?;
            if journal.notes_text().ends_with(suffix) {
                return Ok(None);
            }
            let notes = format!("{}{}", journal.notes_text(), suffix);
            write_notes(journal, ledger, Some(notes))
        }

        ActionKind::PrependNotes => {
            let prefix = required_text(kind, value)?;
            if journal.notes_text().starts_with(prefix) {
                return Ok(None);
            }
            let notes = format!("{}{}", prefix, journal.notes_text());
            write_notes(journal, ledger, Some(notes))
        }

        ActionKind::ClearNotes => {
            if journal.notes.is_none() {
                return Ok(None);
            }
            write_notes(journal, ledger, None)
        }

        ActionKind::SetSourceAccount => {
            let name = required(kind, value)?;
            if journal.source.is_named(name) {
                return Ok(None);
            }
            let account_type = match journal.transaction_type {
                TransactionType::Withdrawal | TransactionType::Transfer => AccountType::Asset,
                TransactionType::Deposit => AccountType::Revenue,
                other => return Err(unsupported(kind, other)),
            };
            let source = resolve(ledger, name, account_type)?;
            let destination = journal.destination.clone();
            write_accounts(journal, ledger, "source", source, destination)
        }

        ActionKind::SetDestinationAccount => {
            let name = required(kind, value)?;
            if journal.destination.is_named(name) {
                return Ok(None);
            }
            let account_type = match journal.transaction_type {
                TransactionType::Withdrawal => AccountType::Expense,
                TransactionType::Deposit | TransactionType::Transfer => AccountType::Asset,
                other => return Err(unsupported(kind, other)),
            };
            let destination = resolve(ledger, name, account_type)?;
            let source = journal.source.clone();
            write_accounts(journal, ledger, "destination", source, destination)
        }

        ActionKind::ConvertToWithdrawal => {
            let name = required(kind, value)?;
            let asset = match journal.transaction_type {
                TransactionType::Withdrawal => return Ok(None),
                TransactionType::Deposit => journal.destination.clone(),
                TransactionType::Transfer => journal.source.clone(),
                other => return Err(unsupported(kind, other)),
            };
            let expense = resolve(ledger, name, AccountType::Expense)?;
            convert(journal, ledger, TransactionType::Withdrawal, asset, expense)
        }

        ActionKind::ConvertToDeposit => {
            let name = required(kind, value)?;
            let asset = match journal.transaction_type {
                TransactionType::Deposit => return Ok(None),
                TransactionType::Withdrawal => journal.source.clone(),
                TransactionType::Transfer => journal.destination.clone(),
                other => return Err(unsupported(kind, other)),
            };
            let revenue = resolve(ledger, name, AccountType::Revenue)?;
            convert(journal, ledger, TransactionType::Deposit, revenue, asset)
        }

        ActionKind::ConvertToTransfer => {
            let name = required(kind, value)?;
            match journal.transaction_type {
                TransactionType::Transfer => return Ok(None),
                TransactionType::Withdrawal | TransactionType::Deposit => {}
                other => return Err(unsupported(kind, other)),
            }
            let other = resolve(ledger, name, AccountType::Asset)?;
            let (source, destination) = if journal.transaction_type == TransactionType::Withdrawal {
                (journal.source.clone(), other)
            } else {
                (other, journal.destination.clone())
            };
            convert(journal, ledger, TransactionType::Transfer, source, destination)
        }

        ActionKind::LinkToBill => {
            let bill = required(kind, value)?;
            withdrawal_only(journal, "bill")?;
            if same_name(journal.bill.as_deref(), bill) {
                return Ok(None);
            }
            let stored = ledger.link_bill(id, bill)?;
            let before = journal.bill.replace(stored.clone());
            Ok(Some(changed(journal, "bill", before, Some(&stored))))
        }

        ActionKind::DeleteTransaction => {
            ledger.delete(id)?;
            Ok(Some(FieldChange::new(
                "journal",
                Some(journal.to_string()),
                None,
            )))
        }
    }
}

fn required(kind: ActionKind, value: &str) -> RulesResult<&str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(RulesError::Validation(format!("{} requires a value", kind)));
    }
    Ok(value)
}

/// Like `required`, but keeps surrounding whitespace
fn required_text(kind: ActionKind, value: &str) -> RulesResult<&str> {
    if value.trim().is_empty() {
        return Err(RulesError::Validation(format!("{} requires a value", kind)));
    }
    Ok(value)
}

fn same_name(current: Option<&str>, value: &str) -> bool {
    current.map_or(false, |c| c.trim().eq_ignore_ascii_case(value))
}

fn withdrawal_only(journal: &TransactionJournal, what: &str) -> RulesResult<()> {
    if journal.transaction_type != TransactionType::Withdrawal {
        return Err(RulesError::Unsupported(format!(
            "a {} can only be linked to withdrawals, journal is a {}",
            what, journal.transaction_type
        )));
    }
    Ok(())
}

fn unsupported(kind: ActionKind, transaction_type: TransactionType) -> RulesError {
    RulesError::Unsupported(format!("{} on a {} journal", kind, transaction_type))
}

/// Own accounts must exist; counterparties are created on demand
fn resolve(
    ledger: &dyn JournalMutator,
    name: &str,
    account_type: AccountType,
) -> RulesResult<AccountRef> {
    ledger.resolve_account(name, account_type, !account_type.is_own())
}

fn tag_list(journal: &TransactionJournal) -> Option<String> {
    if journal.tags.is_empty() {
        None
    } else {
        Some(journal.tags.join(", "))
    }
}

fn changed(
    journal: &mut TransactionJournal,
    field: &str,
    before: Option<String>,
    after: Option<&str>,
) -> FieldChange {
    journal.touch();
    FieldChange::new(field, before, after.map(str::to_string))
}

fn write_description(
    journal: &mut TransactionJournal,
    ledger: &dyn JournalMutator,
    description: String,
) -> RulesResult<Option<FieldChange>> {
    ledger.set_description(journal.id, &description)?;
    let before = std::mem::replace(&mut journal.description, description);
    let after = journal.description.clone();
    Ok(Some(changed(journal, "description", Some(before), Some(&after))))
}

fn write_notes(
    journal: &mut TransactionJournal,
    ledger: &dyn JournalMutator,
    notes: Option<String>,
) -> RulesResult<Option<FieldChange>> {
    ledger.set_notes(journal.id, notes.as_deref())?;
    let before = std::mem::replace(&mut journal.notes, notes);
    let after = journal.notes.clone();
    Ok(Some(changed(journal, "notes", before, after.as_deref())))
}

fn write_accounts(
    journal: &mut TransactionJournal,
    ledger: &dyn JournalMutator,
    field: &str,
    source: AccountRef,
    destination: AccountRef,
) -> RulesResult<Option<FieldChange>> {
    if source.id == destination.id {
        return Err(RulesError::Validation(format!(
            "source and destination would both be {}",
            source.name
        )));
    }
    ledger.set_accounts(journal.id, &source, &destination)?;
    let before = if field == "source" {
        journal.source.name.clone()
    } else {
        journal.destination.name.clone()
    };
    journal.source = source;
    journal.destination = destination;
    let after = if field == "source" {
        journal.source.name.clone()
    } else {
        journal.destination.name.clone()
    };
    Ok(Some(changed(journal, field, Some(before), Some(&after))))
}

fn convert(
    journal: &mut TransactionJournal,
    ledger: &dyn JournalMutator,
    target: TransactionType,
    source: AccountRef,
    destination: AccountRef,
) -> RulesResult<Option<FieldChange>> {
    if source.id == destination.id {
        return Err(RulesError::Validation(format!(
            "source and destination would both be {}",
            source.name
        )));
    }
    let amount = match target {
        TransactionType::Deposit => journal.amount.abs(),
        _ => -journal.amount.abs(),
    };
    ledger.convert(journal.id, target, &source, &destination, amount)?;

    let before = journal.transaction_type.key().to_string();
    journal.transaction_type = target;
    journal.source = source;
    journal.destination = destination;
    journal.amount = amount;
    if target != TransactionType::Withdrawal {
        journal.budget = None;
        journal.bill = None;
    }
    Ok(Some(changed(journal, "type", Some(before), Some(target.key()))))
}
