//! CSV Export functionality
//!
//! Exports matched journals and per-action run results to CSV format.

use std::io::Write;

use crate::error::{RulesError, RulesResult};
use crate::models::TransactionJournal;
use crate::rules::{MatchReport, RunReport};

fn export_err(e: impl std::fmt::Display) -> RulesError {
    RulesError::Export(e.to_string())
}

/// Export journals, one row each
pub fn export_journals_csv<W: Write>(
    journals: &[TransactionJournal],
    writer: W,
) -> RulesResult<()> {
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record([
        "ID",
        "Date",
        "Type",
        "Description",
        "Amount",
        "Currency",
        "Source",
        "Destination",
        "Category",
        "Budget",
        "Bill",
        "Tags",
        "Notes",
    ])
    .map_err(export_err)?;

    for journal in journals {
        csv.write_record([
            journal.id.as_uuid().to_string(),
            journal.date.format("%Y-%m-%d").to_string(),
            journal.transaction_type.key().to_string(),
            journal.description.clone(),
            journal.amount.to_string(),
            journal.currency_code.clone(),
            journal.source.name.clone(),
            journal.destination.name.clone(),
            journal.category.clone().unwrap_or_default(),
            journal.budget.clone().unwrap_or_default(),
            journal.bill.clone().unwrap_or_default(),
            journal.tags.join(";"),
            journal.notes.clone().unwrap_or_default(),
        ])
        .map_err(export_err)?;
    }

    csv.flush().map_err(export_err)?;
    Ok(())
}

/// Export the journals a rule preview matched
pub fn export_match_report_csv<W: Write>(report: &MatchReport, writer: W) -> RulesResult<()> {
    export_journals_csv(&report.matched, writer)
}

/// Export every executed action of a run, one row each
pub fn export_run_csv<W: Write>(report: &RunReport, writer: W) -> RulesResult<()> {
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record([
        "Journal", "Rule", "Action", "Value", "Success", "Field", "Before", "After", "Error",
    ])
    .map_err(export_err)?;

    for record in report.outcomes.iter().flat_map(|o| o.actions.iter()) {
        let (field, before, after) = match &record.change {
            Some(change) => (
                change.field.clone(),
                change.before.clone().unwrap_or_default(),
                change.after.clone().unwrap_or_default(),
            ),
            None => Default::default(),
        };
        csv.write_record([
            record.journal_id.as_uuid().to_string(),
            record.rule_id.as_uuid().to_string(),
            record.kind.key().to_string(),
            record.value.clone(),
            record.success.to_string(),
            field,
            before,
            after,
            record.error.clone().unwrap_or_default(),
        ])
        .map_err(export_err)?;
    }

    csv.flush().map_err(export_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountRef, AccountType, ActionKind, Amount, RuleId};
    use crate::rules::{ActionRecord, FieldChange, JournalOutcome, ScanEnd};
    use chrono::NaiveDate;

    fn journal() -> TransactionJournal {
        let mut journal = TransactionJournal::withdrawal(
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            "Market, weekly",
            Amount::parse("15").unwrap(),
            AccountRef::new("Checking", AccountType::Asset),
            AccountRef::new("Market", AccountType::Expense),
        );
        journal.add_tag("food");
        journal.add_tag("weekly");
        journal
    }

    #[test]
    fn test_export_match_report() {
        let report = MatchReport {
            rule_id: RuleId::new(),
            matched: vec![journal()],
            examined: 1,
            end: ScanEnd::Exhausted,
        };
        let mut buffer = Vec::new();
        export_match_report_csv(&report, &mut buffer).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let mut lines = output.lines();
        assert!(lines.next().unwrap().starts_with("ID,Date,Type"));
        let row = lines.next().unwrap();
        assert!(row.contains("\"Market, weekly\""));
        assert!(row.contains("withdrawal"));
        assert!(row.contains("-15.00"));
        assert!(row.contains("food;weekly"));
    }

    #[test]
    fn test_export_run() {
        let journal = journal();
        let mut outcome = JournalOutcome::new(journal.id);
        outcome.actions.push(ActionRecord {
            rule_id: RuleId::new(),
            journal_id: journal.id,
            kind: ActionKind::SetCategory,
            value: "Groceries".into(),
            success: true,
            error: None,
            change: Some(FieldChange::new("category", None, Some("Groceries".into()))),
        });
        let report = RunReport {
            outcomes: vec![outcome],
            ..RunReport::default()
        };

        let mut buffer = Vec::new();
        export_run_csv(&report, &mut buffer).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(output.lines().count(), 2);
        assert!(output.contains("set_category,Groceries,true,category,,Groceries,"));
    }
}
