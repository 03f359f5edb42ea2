//! Results produced by rule runs
//!
//! Everything here is plain data so callers can print it, export it or
//! feed it to the audit log.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{ActionKind, JournalId, RuleGroupId, RuleId, TransactionJournal};

/// A single field changed by an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    pub before: Option<String>,
    pub after: Option<String>,
}

impl FieldChange {
    pub fn new(field: &str, before: Option<String>, after: Option<String>) -> Self {
        Self {
            field: field.to_string(),
            before,
            after,
        }
    }
}

impl fmt::Display for FieldChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {}",
            self.field,
            self.before.as_deref().unwrap_or("(none)"),
            self.after.as_deref().unwrap_or("(none)")
        )
    }
}

/// One executed action, attributable to its rule and journal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub rule_id: RuleId,
    pub journal_id: JournalId,
    pub kind: ActionKind,
    pub value: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// None when the action succeeded without changing anything
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<FieldChange>,
}

impl ActionRecord {
    /// Whether the action succeeded and actually changed the journal
    pub fn mutated(&self) -> bool {
        self.success && self.change.is_some()
    }
}

/// Why processing of a journal ended early
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// An action with stop processing succeeded
    Action,
    /// A rule with stop processing fired
    Rule,
    /// A group with stop processing had a rule fire
    Group,
    /// The journal was deleted
    Deleted,
}

/// What happened to one journal during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalOutcome {
    pub journal_id: JournalId,
    /// Rules that fired, in firing order
    pub fired: Vec<RuleId>,
    pub actions: Vec<ActionRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stopped: Option<StopReason>,
    /// Group that was being processed when a stop took effect
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stopped_in: Option<RuleGroupId>,
    pub deleted: bool,
}

impl JournalOutcome {
    pub fn new(journal_id: JournalId) -> Self {
        Self {
            journal_id,
            fired: Vec::new(),
            actions: Vec::new(),
            stopped: None,
            stopped_in: None,
            deleted: false,
        }
    }

    pub fn changed(&self) -> bool {
        self.actions.iter().any(ActionRecord::mutated)
    }
}

/// Counters for a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub journals_processed: usize,
    /// Journals not reached before the deadline
    pub journals_skipped: usize,
    pub journals_changed: usize,
    pub journals_deleted: usize,
    pub rules_evaluated: usize,
    pub rules_matched: usize,
    pub actions_executed: usize,
    pub actions_failed: usize,
    /// Selected rule ids that did not exist
    pub missing_rules: usize,
}

impl RunSummary {
    pub(crate) fn record(&mut self, outcome: &JournalOutcome) {
        self.journals_processed += 1;
        self.rules_matched += outcome.fired.len();
        self.actions_executed += outcome.actions.len();
        self.actions_failed += outcome.actions.iter().filter(|a| !a.success).count();
        if outcome.changed() {
            self.journals_changed += 1;
        }
        if outcome.deleted {
            self.journals_deleted += 1;
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} journals processed ({} changed, {} deleted, {} skipped); {} of {} rule evaluations matched; {} actions executed, {} failed",
            self.journals_processed,
            self.journals_changed,
            self.journals_deleted,
            self.journals_skipped,
            self.rules_matched,
            self.rules_evaluated,
            self.actions_executed,
            self.actions_failed
        )
    }
}

/// How a matcher scan ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanEnd {
    /// Every candidate in the window was examined
    Exhausted,
    SearchLimit,
    TriggerLimit,
    Deadline,
}

impl fmt::Display for ScanEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted => write!(f, "all candidates examined"),
            Self::SearchLimit => write!(f, "search limit reached"),
            Self::TriggerLimit => write!(f, "match limit reached"),
            Self::Deadline => write!(f, "time budget exhausted"),
        }
    }
}

/// Result of a read-only rule preview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub rule_id: RuleId,
    /// Matching journals, newest first
    pub matched: Vec<TransactionJournal>,
    pub examined: usize,
    pub end: ScanEnd,
}

impl MatchReport {
    pub fn matched_ids(&self) -> Vec<JournalId> {
        self.matched.iter().map(|j| j.id).collect()
    }
}
