//! Single-rule processing: strictness evaluation and action execution

use tracing::debug;

use super::actions::apply_action;
use super::ledger::JournalMutator;
use super::report::ActionRecord;
use super::triggers::trigger_matches;
use crate::models::{Rule, RuleTrigger, Strictness, TransactionJournal};

/// Check whether a rule's triggers match a journal.
///
/// Inactive triggers and `user_action` gates are skipped. A rule with no
/// remaining triggers never matches.
pub fn rule_matches(rule: &Rule, journal: &TransactionJournal) -> bool {
    evaluate_rule(rule, |trigger| trigger_matches(trigger, journal))
}

/// Strictness evaluation over an arbitrary per-trigger predicate.
///
/// ALL stops at the first miss, ANY at the first hit. Under ALL a trigger's
/// `stop_processing` never skips the triggers after it.
pub fn evaluate_rule<F>(rule: &Rule, mut check: F) -> bool
where
    F: FnMut(&RuleTrigger) -> bool,
{
    let mut evaluated = 0usize;

    for trigger in rule.ordered_triggers() {
        if !trigger.active || trigger.is_gate() {
            continue;
        }
        evaluated += 1;

        let hit = check(trigger);
        match (rule.strictness, hit) {
            (Strictness::All, false) => return false,
            (Strictness::Any, true) => return true,
            _ => {}
        }
    }

    match rule.strictness {
        Strictness::All => evaluated > 0,
        Strictness::Any => false,
    }
}

/// What executing a matched rule's actions produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleOutcome {
    pub actions: Vec<ActionRecord>,
    /// An action asked to end processing of the journal
    pub stop: bool,
    pub deleted: bool,
}

/// Run a matched rule's active actions in order.
pub fn execute_actions(
    rule: &Rule,
    journal: &mut TransactionJournal,
    ledger: &dyn JournalMutator,
) -> RuleOutcome {
    let mut outcome = RuleOutcome::default();

    for action in rule.ordered_actions() {
        if !action.active {
            continue;
        }

        let result = apply_action(action, journal, ledger);
        outcome.actions.push(ActionRecord {
            rule_id: rule.id,
            journal_id: journal.id,
            kind: action.kind,
            value: action.value.clone(),
            success: result.success,
            error: result.error,
            change: result.change,
        });

        if result.success && action.kind.is_terminal() {
            outcome.deleted = true;
        }
        if result.stop {
            debug!(rule = %rule, action = %action, "Action stopped processing");
            outcome.stop = true;
            break;
        }
        if action.kind.is_terminal() {
            break;
        }
    }

    outcome
}
