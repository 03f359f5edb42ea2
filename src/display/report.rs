//! Report formatting for rule runs and rule previews

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::audit::AuditEntry;
use crate::rules::{MatchReport, RuleSet, RunReport};

use super::journal::truncate;

#[derive(Tabled)]
struct MatchRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "From")]
    source: String,
    #[tabled(rename = "To")]
    destination: String,
}

/// Format the counters of a run, followed by per-journal detail when
/// `verbose` is set
pub fn format_run_report(report: &RunReport, rules: &RuleSet, verbose: bool) -> String {
    let summary = &report.summary;
    let mut output = String::new();

    output.push_str(&format!("Journals processed: {}\n", summary.journals_processed));
    output.push_str(&format!("Journals changed:   {}\n", summary.journals_changed));
    if summary.journals_deleted > 0 {
        output.push_str(&format!("Journals deleted:   {}\n", summary.journals_deleted));
    }
    if summary.journals_skipped > 0 {
        output.push_str(&format!(
            "Journals skipped:   {} (time budget exhausted)\n",
            summary.journals_skipped
        ));
    }
    output.push_str(&format!(
        "Rules matched:      {} of {} evaluated\n",
        summary.rules_matched, summary.rules_evaluated
    ));
    output.push_str(&format!("Actions executed:   {}\n", summary.actions_executed));
    if summary.actions_failed > 0 {
        output.push_str(&format!("Actions failed:     {}\n", summary.actions_failed));
    }
    if summary.missing_rules > 0 {
        output.push_str(&format!(
            "Unknown rules:      {} (ignored)\n",
            summary.missing_rules
        ));
    }

    if !verbose {
        return output;
    }

    for outcome in report.outcomes.iter().filter(|o| !o.fired.is_empty()) {
        output.push_str(&format!("\n{}", outcome.journal_id));
        if outcome.deleted {
            output.push_str(" (deleted)");
        } else if let Some(reason) = outcome.stopped {
            output.push_str(&format!(" (stopped: {:?})", reason));
        }
        output.push('\n');

        for record in &outcome.actions {
            let rule = rules
                .find_rule(record.rule_id)
                .map(|r| r.title.clone())
                .unwrap_or_else(|| record.rule_id.to_string());
            let status = if !record.success {
                "✗"
            } else if record.change.is_some() {
                "✓"
            } else {
                "="
            };
            output.push_str(&format!("  {} [{}] {}", status, rule, record.kind));
            match (&record.change, &record.error) {
                (_, Some(error)) => output.push_str(&format!(": {}", error)),
                (Some(change), None) => output.push_str(&format!(": {}", change)),
                (None, None) => {}
            }
            output.push('\n');
        }
    }

    output
}

/// Format the journals a rule preview matched
pub fn format_match_report(report: &MatchReport) -> String {
    let mut output = String::new();

    if report.matched.is_empty() {
        output.push_str("No matching journals.\n");
    } else {
        let rows = report.matched.iter().map(|journal| MatchRow {
            id: journal.id.to_string(),
            date: journal.date.format("%Y-%m-%d").to_string(),
            description: truncate(&journal.description, 32),
            amount: journal.amount.to_string(),
            source: truncate(&journal.source.name, 20),
            destination: truncate(&journal.destination.name, 20),
        });
        output.push_str(&Table::new(rows).with(Style::rounded()).to_string());
        output.push('\n');
    }

    output.push_str(&format!(
        "{} matched, {} examined ({})\n",
        report.matched.len(),
        report.examined,
        report.end
    ));
    output
}

/// Format audit entries, oldest first
pub fn format_audit_entries(entries: &[AuditEntry]) -> String {
    if entries.is_empty() {
        return "Audit log is empty.\n".to_string();
    }

    let mut output = String::new();
    for entry in entries {
        output.push_str(&entry.format_human_readable());
        output.push('\n');
    }
    output
}
