//! Trigger evaluation
//!
//! Every trigger kind is a pure predicate over a journal. String comparisons
//! ignore case, amount comparisons use the magnitude of the journal amount.
//! A value that cannot be interpreted never matches, even when the trigger
//! is prohibited.

use chrono::NaiveDate;
use regex::{Regex, RegexBuilder};
use tracing::warn;

use crate::error::{RulesError, RulesResult};
use crate::models::{
    Amount, RuleTrigger, TransactionJournal, TransactionType, TriggerKind, TriggerMode,
};

/// Evaluate a trigger against a journal, honoring `prohibited`.
pub fn trigger_matches(trigger: &RuleTrigger, journal: &TransactionJournal) -> bool {
    match evaluate(trigger.kind, &trigger.value, journal) {
        Ok(matched) => matched != trigger.prohibited,
        Err(e) => {
            warn!(
                trigger = %trigger,
                journal = %journal.id,
                error = %e,
                "Malformed trigger value, treating as no match"
            );
            false
        }
    }
}

/// Raw comparison for a kind and value, before `prohibited` is applied
pub fn evaluate(kind: TriggerKind, value: &str, journal: &TransactionJournal) -> RulesResult<bool> {
    let matched = match kind {
        TriggerKind::UserAction => {
            parse_mode(value)?;
            true
        }

        TriggerKind::FromAccountStarts => starts(&journal.source.name, value),
        TriggerKind::FromAccountEnds => ends(&journal.source.name, value),
        TriggerKind::FromAccountIs => equals(&journal.source.name, value),
        TriggerKind::FromAccountContains => contains(&journal.source.name, value),
        TriggerKind::ToAccountStarts => starts(&journal.destination.name, value),
        TriggerKind::ToAccountEnds => ends(&journal.destination.name, value),
        TriggerKind::ToAccountIs => equals(&journal.destination.name, value),
        TriggerKind::ToAccountContains => contains(&journal.destination.name, value),

        TriggerKind::AmountLess => journal.amount.abs() < parse_amount(value)?,
        TriggerKind::AmountExactly => journal.amount.abs() == parse_amount(value)?,
        TriggerKind::AmountMore => journal.amount.abs() > parse_amount(value)?,

        TriggerKind::DescriptionStarts => starts(&journal.description, value),
        TriggerKind::DescriptionEnds => ends(&journal.description, value),
        TriggerKind::DescriptionContains => contains(&journal.description, value),
        TriggerKind::DescriptionIs => equals(&journal.description, value),
        TriggerKind::DescriptionMatches => parse_regex(value)?.is_match(&journal.description),

        TriggerKind::TransactionType => journal.transaction_type == parse_transaction_type(value)?,
        TriggerKind::CategoryIs => optional_equals(journal.category.as_deref(), value),
        TriggerKind::BudgetIs => optional_equals(journal.budget.as_deref(), value),
        TriggerKind::BillIs => optional_equals(journal.bill.as_deref(), value),
        TriggerKind::TagIs => journal.has_tag(value),
        TriggerKind::CurrencyIs => journal.currency_code.trim().eq_ignore_ascii_case(value.trim()),
        TriggerKind::HasAttachments => i64::from(journal.attachment_count) >= parse_count(value)?,

        TriggerKind::HasNoCategory => journal.category.is_none(),
        TriggerKind::HasAnyCategory => journal.category.is_some(),
        TriggerKind::HasNoBudget => journal.budget.is_none(),
        TriggerKind::HasAnyBudget => journal.budget.is_some(),
        TriggerKind::HasNoTag => journal.tags.is_empty(),
        TriggerKind::HasAnyTag => !journal.tags.is_empty(),
        TriggerKind::HasAnyBill => journal.bill.is_some(),

        TriggerKind::NotesContain => contains(journal.notes_text(), value),
        TriggerKind::NotesStart => starts(journal.notes_text(), value),
        TriggerKind::NotesEnd => ends(journal.notes_text(), value),
        TriggerKind::NotesAre => equals(journal.notes_text(), value),
        TriggerKind::NoNotes => journal.notes_text().trim().is_empty(),
        TriggerKind::AnyNotes => !journal.notes_text().trim().is_empty(),

        TriggerKind::DateIs => journal.date == parse_date(value)?,
        TriggerKind::DateBefore => journal.date < parse_date(value)?,
        TriggerKind::DateAfter => journal.date > parse_date(value)?,
    };
    Ok(matched)
}

/// Whether a trigger is degenerate: it matches (or is meant to match)
/// every journal and usually signals a configuration mistake.
pub fn will_match_everything(kind: TriggerKind, value: &str) -> bool {
    let value = value.trim();
    match kind {
        TriggerKind::UserAction => true,
        TriggerKind::AmountLess => {
            value.is_empty() || parse_amount(value).map_or(false, |v| !v.is_positive())
        }
        TriggerKind::AmountMore => {
            value.is_empty() || parse_amount(value).map_or(false, |v| v.is_negative())
        }
        TriggerKind::AmountExactly => value.is_empty(),
        TriggerKind::FromAccountStarts
        | TriggerKind::FromAccountEnds
        | TriggerKind::FromAccountContains
        | TriggerKind::ToAccountStarts
        | TriggerKind::ToAccountEnds
        | TriggerKind::ToAccountContains
        | TriggerKind::DescriptionStarts
        | TriggerKind::DescriptionEnds
        | TriggerKind::DescriptionContains
        | TriggerKind::NotesContain
        | TriggerKind::NotesStart
        | TriggerKind::NotesEnd => value.is_empty(),
        TriggerKind::HasAttachments => value.parse::<i64>().map_or(false, |count| count <= 0),
        TriggerKind::DescriptionMatches => parse_regex(value).map_or(false, |re| re.is_match("")),
        _ => false,
    }
}

/// Check that a value can be interpreted for its kind
pub fn check_value(kind: TriggerKind, value: &str) -> RulesResult<()> {
    match kind {
        TriggerKind::UserAction => parse_mode(value).map(|_| ()),
        TriggerKind::AmountLess | TriggerKind::AmountExactly | TriggerKind::AmountMore => {
            parse_amount(value).map(|_| ())
        }
        TriggerKind::DescriptionMatches => parse_regex(value).map(|_| ()),
        TriggerKind::TransactionType => parse_transaction_type(value).map(|_| ()),
        TriggerKind::HasAttachments => parse_count(value).map(|_| ()),
        TriggerKind::DateIs | TriggerKind::DateBefore | TriggerKind::DateAfter => {
            parse_date(value).map(|_| ())
        }
        _ => Ok(()),
    }
}

fn starts(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().starts_with(&needle.to_lowercase())
}

fn ends(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().ends_with(&needle.to_lowercase())
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn equals(haystack: &str, needle: &str) -> bool {
    haystack.trim().to_lowercase() == needle.trim().to_lowercase()
}

fn optional_equals(field: Option<&str>, value: &str) -> bool {
    field.map_or(false, |f| equals(f, value))
}

fn parse_amount(value: &str) -> RulesResult<Amount> {
    Amount::parse(value).map_err(|e| RulesError::Validation(e.to_string()))
}

fn parse_count(value: &str) -> RulesResult<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| RulesError::Validation(format!("Invalid attachment count: {}", value)))
}

fn parse_date(value: &str) -> RulesResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        RulesError::Validation(format!("Invalid date (expected YYYY-MM-DD): {}", value))
    })
}

fn parse_transaction_type(value: &str) -> RulesResult<TransactionType> {
    TransactionType::parse(value)
        .ok_or_else(|| RulesError::Validation(format!("Unknown transaction type: {}", value)))
}

fn parse_mode(value: &str) -> RulesResult<TriggerMode> {
    TriggerMode::parse(value)
        .ok_or_else(|| RulesError::Validation(format!("Unknown user action: {}", value)))
}

fn parse_regex(value: &str) -> RulesResult<Regex> {
    RegexBuilder::new(value)
        .case_insensitive(true)
        .build()
        .map_err(|e| RulesError::Validation(format!("Invalid pattern {}: {}", value, e)))
}
