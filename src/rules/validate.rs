//! Static checks over rule configuration
//!
//! Nothing here blocks a run. Warnings point at rules that will behave
//! surprisingly: triggers that match everything, values that can never be
//! interpreted, rules that can never fire or never do anything.

use serde::Serialize;
use std::fmt;

use super::ruleset::RuleSet;
use super::triggers::{check_value, will_match_everything};
use crate::models::{Rule, RuleId};

/// Kind of configuration problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    MatchesEverything,
    InvalidValue,
    NoActiveTriggers,
    NoActiveActions,
    MissingGroup,
}

/// A problem found in one rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleWarning {
    pub rule_id: RuleId,
    pub rule_title: String,
    pub kind: WarningKind,
    pub message: String,
}

impl fmt::Display for RuleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \"{}\": {}", self.rule_id, self.rule_title, self.message)
    }
}

/// Check every rule in the set, orphans included
pub fn validate_rules(rules: &RuleSet) -> Vec<RuleWarning> {
    let mut warnings = Vec::new();
    for rule in rules.rules() {
        warnings.extend(validate_rule(rule));
    }
    for rule in rules.orphans() {
        warnings.push(warning(
            rule,
            WarningKind::MissingGroup,
            format!("group {} does not exist, rule never runs", rule.group_id),
        ));
        warnings.extend(validate_rule(rule));
    }
    warnings
}

/// Check a single rule
pub fn validate_rule(rule: &Rule) -> Vec<RuleWarning> {
    let mut warnings = Vec::new();

    let predicates: Vec<_> = rule
        .ordered_triggers()
        .into_iter()
        .filter(|t| t.active)
        .collect();

    for trigger in &predicates {
        if let Err(e) = check_value(trigger.kind, &trigger.value) {
            warnings.push(warning(
                rule,
                WarningKind::InvalidValue,
                format!("trigger {} never matches: {}", trigger, e),
            ));
        } else if !trigger.is_gate() && will_match_everything(trigger.kind, &trigger.value) {
            warnings.push(warning(
                rule,
                WarningKind::MatchesEverything,
                format!("trigger {} matches every transaction", trigger),
            ));
        }
    }

    if !predicates.iter().any(|t| !t.is_gate()) {
        warnings.push(warning(
            rule,
            WarningKind::NoActiveTriggers,
            "no active triggers, rule never matches".to_string(),
        ));
    }

    if !rule.actions.iter().any(|a| a.active) {
        warnings.push(warning(
            rule,
            WarningKind::NoActiveActions,
            "no active actions, rule changes nothing".to_string(),
        ));
    }

    warnings
}

fn warning(rule: &Rule, kind: WarningKind, message: String) -> RuleWarning {
    RuleWarning {
        rule_id: rule.id,
        rule_title: rule.title.clone(),
        kind,
        message,
    }
}
