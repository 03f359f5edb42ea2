//! Rule engine orchestration
//!
//! For every journal: walk active groups in order, then their active rules
//! in order, evaluate triggers and execute actions of rules that match.
//! Stop flags on actions, rules and groups cut the walk short. A rule fires
//! at most once per journal within a run.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::ledger::JournalMutator;
use super::processor::{execute_actions, rule_matches};
use super::report::{JournalOutcome, RunSummary, StopReason};
use super::ruleset::RuleSet;
use crate::models::{JournalId, Rule, RuleId, TransactionJournal, TriggerMode};

/// Which rules take part in a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RuleSelection {
    /// Every active rule in every active group
    #[default]
    All,
    /// Only these rules (still subject to the active flags)
    Only(BTreeSet<RuleId>),
}

impl RuleSelection {
    pub fn only(ids: impl IntoIterator<Item = RuleId>) -> Self {
        Self::Only(ids.into_iter().collect())
    }

    pub fn includes(&self, id: RuleId) -> bool {
        match self {
            Self::All => true,
            Self::Only(ids) => ids.contains(&id),
        }
    }
}

/// Everything a run produced
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub summary: RunSummary,
    /// One entry per processed journal, in input order
    pub outcomes: Vec<JournalOutcome>,
    /// Processed journals in their final state; deleted ones are left out
    pub journals: Vec<TransactionJournal>,
}

/// Per-invocation state, discarded when the run returns
#[derive(Debug, Default)]
struct RunContext {
    fired: HashMap<JournalId, HashSet<RuleId>>,
    summary: RunSummary,
}

impl RunContext {
    fn has_fired(&self, journal: JournalId, rule: RuleId) -> bool {
        self.fired
            .get(&journal)
            .map_or(false, |rules| rules.contains(&rule))
    }

    fn mark_fired(&mut self, journal: JournalId, rule: RuleId) {
        self.fired.entry(journal).or_default().insert(rule);
    }
}

/// Applies a rule set to journals
pub struct RuleEngine<'a> {
    rules: &'a RuleSet,
    ledger: &'a dyn JournalMutator,
    selection: RuleSelection,
    mode: TriggerMode,
    deadline: Option<Instant>,
}

impl<'a> RuleEngine<'a> {
    pub fn new(rules: &'a RuleSet, ledger: &'a dyn JournalMutator) -> Self {
        Self {
            rules,
            ledger,
            selection: RuleSelection::All,
            mode: TriggerMode::Store,
            deadline: None,
        }
    }

    pub fn with_selection(mut self, selection: RuleSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_mode(mut self, mode: TriggerMode) -> Self {
        self.mode = mode;
        self
    }

    /// Stop starting new journals once this instant has passed
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_time_budget(self, budget: Duration) -> Self {
        self.with_deadline(Instant::now() + budget)
    }

    /// Run the selected rules over every journal.
    ///
    /// Never fails as a whole: action failures are recorded per action.
    pub fn run(&self, journals: Vec<TransactionJournal>) -> RunReport {
        let mut ctx = RunContext::default();
        ctx.summary.missing_rules = self.report_missing_rules();

        let total = journals.len();
        let mut report = RunReport::default();

        for mut journal in journals {
            if self.deadline.map_or(false, |d| Instant::now() >= d) {
                ctx.summary.journals_skipped = total - report.outcomes.len();
                warn!(
                    skipped = ctx.summary.journals_skipped,
                    "Time budget exhausted, remaining journals skipped"
                );
                break;
            }

            let outcome = self.process_journal(&mut ctx, &mut journal);
            ctx.summary.record(&outcome);
            if !outcome.deleted {
                report.journals.push(journal);
            }
            report.outcomes.push(outcome);
        }

        info!(mode = %self.mode, "{}", ctx.summary);
        report.summary = ctx.summary;
        report
    }

    /// Run the selected rules over a single journal
    pub fn run_one(&self, journal: &mut TransactionJournal) -> JournalOutcome {
        let mut ctx = RunContext::default();
        self.report_missing_rules();
        self.process_journal(&mut ctx, journal)
    }

    fn report_missing_rules(&self) -> usize {
        let RuleSelection::Only(ids) = &self.selection else {
            return 0;
        };
        let missing: Vec<_> = ids.iter().filter(|id| !self.rules.contains(**id)).collect();
        for id in &missing {
            warn!(rule = %id, "Selected rule does not exist, ignoring");
        }
        missing.len()
    }

    fn eligible(&self, rule: &Rule) -> bool {
        rule.active && self.selection.includes(rule.id) && rule.applies_in(self.mode)
    }

    fn process_journal(
        &self,
        ctx: &mut RunContext,
        journal: &mut TransactionJournal,
    ) -> JournalOutcome {
        let mut outcome = JournalOutcome::new(journal.id);

        'groups: for entry in self.rules.groups() {
            if !entry.group.active {
                continue;
            }
            let mut group_fired = false;

            for rule in &entry.rules {
                if !self.eligible(rule) {
                    continue;
                }
                if ctx.has_fired(journal.id, rule.id) {
                    warn!(
                        rule = %rule,
                        journal = %journal.id,
                        "Rule already fired on this journal, skipping"
                    );
                    continue;
                }

                ctx.summary.rules_evaluated += 1;
                if !rule_matches(rule, journal) {
                    continue;
                }

                debug!(rule = %rule, journal = %journal.id, "Rule matched");
                ctx.mark_fired(journal.id, rule.id);
                outcome.fired.push(rule.id);
                group_fired = true;

                let result = execute_actions(rule, journal, self.ledger);
                outcome.actions.extend(result.actions);

                let stop = if result.deleted {
                    outcome.deleted = true;
                    Some(StopReason::Deleted)
                } else if result.stop {
                    Some(StopReason::Action)
                } else if rule.stop_processing {
                    Some(StopReason::Rule)
                } else {
                    None
                };
                if let Some(reason) = stop {
                    debug!(rule = %rule, journal = %journal.id, ?reason, "Processing stopped");
                    outcome.stopped = Some(reason);
                    outcome.stopped_in = Some(entry.group.id);
                    break 'groups;
                }
            }

            if group_fired && entry.group.stop_processing {
                outcome.stopped = Some(StopReason::Group);
                outcome.stopped_in = Some(entry.group.id);
                break;
            }
        }

        outcome
    }
}
