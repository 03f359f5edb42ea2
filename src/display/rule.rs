//! Rule display formatting
//!
//! Tables for rule groups, rules and the registered trigger and action
//! kinds, plus a detail view of a single rule.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{ActionKind, Rule, TriggerKind};
use crate::rules::{RuleSet, RuleWarning};

use super::journal::truncate;

#[derive(Tabled)]
struct RuleRow {
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Rule")]
    title: String,
    #[tabled(rename = "Match")]
    strictness: String,
    #[tabled(rename = "Triggers")]
    triggers: usize,
    #[tabled(rename = "Actions")]
    actions: usize,
    #[tabled(rename = "Flags")]
    flags: String,
}

#[derive(Tabled)]
struct KindRow {
    #[tabled(rename = "Key")]
    key: &'static str,
    #[tabled(rename = "Value")]
    value: &'static str,
    #[tabled(rename = "Description")]
    description: &'static str,
}

fn flags(active: bool, stop_processing: bool) -> String {
    let mut flags = Vec::new();
    if !active {
        flags.push("inactive");
    }
    if stop_processing {
        flags.push("stop");
    }
    flags.join(", ")
}

/// Format every rule, grouped and in evaluation order
pub fn format_rule_list(rules: &RuleSet) -> String {
    if rules.is_empty() && rules.orphans().is_empty() {
        return "No rules defined.\n".to_string();
    }

    let mut rows = Vec::new();
    for entry in rules.groups() {
        let group_label = match flags(entry.group.active, entry.group.stop_processing) {
            f if f.is_empty() => entry.group.title.clone(),
            f => format!("{} [{}]", entry.group.title, f),
        };
        for rule in &entry.rules {
            rows.push(rule_row(group_label.clone(), rule));
        }
    }
    for rule in rules.orphans() {
        rows.push(rule_row("(missing group)".to_string(), rule));
    }

    let mut output = Table::new(rows).with(Style::rounded()).to_string();
    output.push('\n');
    output
}

fn rule_row(group: String, rule: &Rule) -> RuleRow {
    RuleRow {
        group,
        id: rule.id.to_string(),
        title: truncate(&rule.title, 32),
        strictness: rule.strictness.to_string(),
        triggers: rule.triggers.len(),
        actions: rule.actions.len(),
        flags: flags(rule.active, rule.stop_processing),
    }
}

/// Format one rule with its triggers and actions in order
pub fn format_rule_details(rule: &Rule) -> String {
    let mut output = String::new();

    output.push_str(&format!("Rule:        {} ({})\n", rule.title, rule.id));
    if !rule.description.is_empty() {
        output.push_str(&format!("Description: {}\n", rule.description));
    }
    output.push_str(&format!("Match:       {}\n", rule.strictness));
    let rule_flags = flags(rule.active, rule.stop_processing);
    if !rule_flags.is_empty() {
        output.push_str(&format!("Flags:       {}\n", rule_flags));
    }

    output.push_str("\nTriggers:\n");
    for (i, trigger) in rule.ordered_triggers().into_iter().enumerate() {
        let trigger_flags = flags(trigger.active, trigger.stop_processing);
        output.push_str(&format!("  {}. {}", i + 1, trigger));
        if !trigger_flags.is_empty() {
            output.push_str(&format!(" [{}]", trigger_flags));
        }
        output.push('\n');
    }

    output.push_str("\nActions:\n");
    for (i, action) in rule.ordered_actions().into_iter().enumerate() {
        let action_flags = flags(action.active, action.stop_processing);
        output.push_str(&format!("  {}. {}", i + 1, action));
        if !action_flags.is_empty() {
            output.push_str(&format!(" [{}]", action_flags));
        }
        output.push('\n');
    }

    output
}

/// Format the registered trigger kinds
pub fn format_trigger_kinds() -> String {
    let rows = TriggerKind::ALL.iter().map(|kind| KindRow {
        key: kind.key(),
        value: if kind.needs_value() { "yes" } else { "" },
        description: kind.description(),
    });
    let mut output = Table::new(rows).with(Style::psql()).to_string();
    output.push('\n');
    output
}

/// Format the registered action kinds
pub fn format_action_kinds() -> String {
    let rows = ActionKind::ALL.iter().map(|kind| KindRow {
        key: kind.key(),
        value: if kind.needs_value() { "yes" } else { "" },
        description: kind.description(),
    });
    let mut output = Table::new(rows).with(Style::psql()).to_string();
    output.push('\n');
    output
}

/// Format validation warnings, one per line
pub fn format_warnings(warnings: &[RuleWarning]) -> String {
    if warnings.is_empty() {
        return "No problems found.\n".to_string();
    }

    let mut output = format!("{} warning(s):\n", warnings.len());
    for warning in warnings {
        output.push_str(&format!("  ⚠ {}\n", warning));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RuleAction, RuleBook, RuleGroup, RuleTrigger};

    fn rule_set() -> (RuleSet, Rule) {
        let group = RuleGroup::new("Daily").stopping();
        let rule = Rule::new(group.id, "Groceries")
            .with_trigger(RuleTrigger::new(TriggerKind::DescriptionContains, "market"))
            .with_trigger(RuleTrigger::new(TriggerKind::HasNoCategory, "").prohibited())
            .with_action(RuleAction::new(ActionKind::SetCategory, "Groceries").stopping());
        let book = RuleBook {
            groups: vec![group],
            rules: vec![rule.clone()],
        };
        (RuleSet::from_book(book), rule)
    }

    #[test]
    fn test_rule_list() {
        let (rules, rule) = rule_set();
        let output = format_rule_list(&rules);
        assert!(output.contains("Daily [stop]"));
        assert!(output.contains("Groceries"));
        assert!(output.contains(&rule.id.to_string()));
    }

    #[test]
    fn test_empty_rule_list() {
        let rules = RuleSet::from_book(RuleBook::default());
        assert_eq!(format_rule_list(&rules), "No rules defined.\n");
    }

    #[test]
    fn test_rule_details() {
        let (_, rule) = rule_set();
        let output = format_rule_details(&rule);
        assert!(output.contains("1. description_contains:\"market\""));
        assert!(output.contains("2. !has_no_category"));
        assert!(output.contains("1. set_category:\"Groceries\" [stop]"));
    }

    #[test]
    fn test_kind_tables_list_every_kind() {
        let triggers = format_trigger_kinds();
        assert!(TriggerKind::ALL.iter().all(|k| triggers.contains(k.key())));
        let actions = format_action_kinds();
        assert!(actions.contains("delete_transaction"));
    }
}
