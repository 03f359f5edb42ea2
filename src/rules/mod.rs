//! The transaction rule engine
//!
//! Triggers decide whether a rule applies to a journal, actions change the
//! journal, and the engine walks groups and rules in order. The engine only
//! talks to storage through the traits in `ledger`.

pub mod actions;
pub mod engine;
pub mod ledger;
pub mod matcher;
pub mod processor;
pub mod report;
pub mod ruleset;
pub mod triggers;
pub mod validate;

pub use actions::{apply_action, ActionOutcome};
pub use engine::{RuleEngine, RuleSelection, RunReport};
pub use ledger::{JournalCollector, JournalMutator, JournalQuery, RuleSource};
pub use matcher::{MatchParams, TransactionMatcher};
pub use processor::{execute_actions, rule_matches, RuleOutcome};
pub use report::{
    ActionRecord, FieldChange, JournalOutcome, MatchReport, RunSummary, ScanEnd, StopReason,
};
pub use ruleset::{GroupRules, RuleSet};
pub use triggers::{trigger_matches, will_match_everything};
pub use validate::{validate_rule, validate_rules, RuleWarning, WarningKind};
