//! Rule service
//!
//! Drives the rule engine and the transaction matcher against storage:
//! rule configuration is loaded fresh for every call, results are saved and
//! every journal mutation is written to the audit log.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::audit::{generate_diff, AuditEntry};
use crate::config::settings::MatcherSettings;
use crate::error::{RulesError, RulesResult};
use crate::models::{JournalId, Rule, RuleBook, RuleId, TransactionJournal, TriggerMode};
use crate::rules::{
    validate_rules, ActionRecord, JournalQuery, MatchParams, MatchReport, RuleEngine,
    RuleSelection, RuleSet, RuleSource, RuleWarning, RunReport, TransactionMatcher,
};
use crate::storage::{read_document, Storage};

/// Options for a rule run
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Rule ids or titles; empty runs every active rule
    pub rules: Vec<String>,
    pub mode: TriggerMode,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    /// Account names or ids; empty means every account
    pub accounts: Vec<String>,
    pub time_budget: Option<Duration>,
    /// Run against a rule file instead of the stored rules
    pub book: Option<RuleBook>,
    /// Evaluate without saving or auditing
    pub dry_run: bool,
}

impl ApplyOptions {
    pub fn new(mode: TriggerMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn rules(mut self, rules: Vec<String>) -> Self {
        self.rules = rules;
        self
    }

    pub fn date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn accounts(mut self, accounts: Vec<String>) -> Self {
        self.accounts = accounts;
        self
    }

    pub fn time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    pub fn book(mut self, book: RuleBook) -> Self {
        self.book = Some(book);
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Service for running and inspecting rules
pub struct RuleService<'a> {
    storage: &'a Storage,
    audit_enabled: bool,
}

impl<'a> RuleService<'a> {
    /// Create a new rule service
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            audit_enabled: true,
        }
    }

    /// Turn audit logging on or off
    pub fn with_audit(mut self, enabled: bool) -> Self {
        self.audit_enabled = enabled;
        self
    }

    /// Stored groups and rules, assembled in run order
    pub fn rule_set(&self) -> RulesResult<RuleSet> {
        Ok(RuleSet::from_book(self.storage.rules.rule_book()?))
    }

    /// Find a stored rule by id, short id or title
    pub fn find_rule(&self, needle: &str) -> RulesResult<Rule> {
        self.rule_set()?
            .lookup(needle)
            .cloned()
            .ok_or_else(|| RulesError::rule_not_found(needle))
    }

    /// Static warnings for the stored rules
    pub fn validate(&self) -> RulesResult<Vec<RuleWarning>> {
        Ok(validate_rules(&self.rule_set()?))
    }

    /// Replace the stored rules with a JSON or YAML file.
    /// Returns the warnings for the imported rules.
    pub fn import(&self, path: &Path) -> RulesResult<Vec<RuleWarning>> {
        let book = self.storage.rules.import_file(path)?;
        self.storage.rules.save()?;
        Ok(validate_rules(&RuleSet::from_book(book)))
    }

    /// Read a rule file without storing it
    pub fn load_file(&self, path: &Path) -> RulesResult<RuleBook> {
        read_document(path)
    }

    /// Run rules over the stored journals
    pub fn apply(&self, options: ApplyOptions) -> RulesResult<RunReport> {
        let rules = match options.book {
            Some(book) => RuleSet::from_book(book),
            None => self.rule_set()?,
        };
        let (selection, unresolved) = resolve_selection(&rules, &options.rules);

        let query = JournalQuery::new()
            .accounts(options.accounts)
            .date_range(options.start, options.end);
        let journals = self.storage.journals.find(&query)?;
        debug!(journals = journals.len(), "Collected journals for rule run");

        let before: HashMap<JournalId, TransactionJournal> =
            journals.iter().map(|j| (j.id, j.clone())).collect();

        let mut engine = RuleEngine::new(&rules, self.storage)
            .with_selection(selection)
            .with_mode(options.mode);
        if let Some(budget) = options.time_budget {
            engine = engine.with_time_budget(budget);
        }

        let mut report = engine.run(journals);
        report.summary.missing_rules += unresolved;

        if options.dry_run {
            // Collaborator writes only touched memory; drop them
            self.storage.journals.load()?;
            self.storage.catalog.load()?;
            return Ok(report);
        }

        self.storage.journals.save()?;
        self.storage.catalog.save()?;

        if self.audit_enabled {
            let entries = audit_entries(&report, &before, &rules);
            self.storage.log_audit(&entries)?;
        }

        Ok(report)
    }

    /// Preview which stored journals a rule would match.
    ///
    /// Read-only: actions are never executed.
    pub fn test_rule(
        &self,
        rule: &Rule,
        params: MatchParams,
        settings: &MatcherSettings,
    ) -> RulesResult<MatchReport> {
        TransactionMatcher::new(&self.storage.journals)
            .with_max_limit(settings.max_limit)
            .with_page_size(settings.page_size)
            .find_matches(rule, params)
    }
}

/// Turn rule ids or titles into a selection.
///
/// Returns the number of needles that matched nothing.
fn resolve_selection(rules: &RuleSet, needles: &[String]) -> (RuleSelection, usize) {
    if needles.is_empty() {
        return (RuleSelection::All, 0);
    }

    let mut ids = Vec::new();
    let mut unresolved = 0;
    for needle in needles {
        if let Some(rule) = rules.lookup(needle) {
            ids.push(rule.id);
        } else if let Ok(id) = needle.parse::<RuleId>() {
            // Unknown ids are reported by the engine
            ids.push(id);
        } else {
            warn!(rule = %needle, "Selected rule does not exist, ignoring");
            unresolved += 1;
        }
    }
    (RuleSelection::only(ids), unresolved)
}

fn audit_entries(
    report: &RunReport,
    before: &HashMap<JournalId, TransactionJournal>,
    rules: &RuleSet,
) -> Vec<AuditEntry> {
    let mut entries = Vec::new();

    for outcome in &report.outcomes {
        let original = before.get(&outcome.journal_id);
        let description = original.map(|j| j.description.clone());

        for record in outcome.actions.iter().filter(|a| a.mutated()) {
            let mut entry = match (record.kind.is_terminal(), original) {
                (true, Some(journal)) => AuditEntry::delete(
                    record.journal_id.to_string(),
                    description.clone(),
                    record.rule_id.to_string(),
                    journal,
                ),
                _ => update_entry(record, description.clone()),
            };
            if let Some(rule) = rules.find_rule(record.rule_id) {
                entry = entry.with_rule_title(rule.title.clone());
            }
            entries.push(entry);
        }
    }

    entries
}

fn update_entry(record: &ActionRecord, description: Option<String>) -> AuditEntry {
    let (before, after) = match &record.change {
        Some(change) => (
            field_state(&change.field, &change.before),
            field_state(&change.field, &change.after),
        ),
        None => (Value::Null, Value::Null),
    };
    let diff = generate_diff(&before, &after);

    AuditEntry::update(
        record.journal_id.to_string(),
        description,
        record.rule_id.to_string(),
        record.kind,
        record.value.clone(),
        &before,
        &after,
        diff,
    )
}

fn field_state(field: &str, value: &Option<String>) -> Value {
    let mut state = Map::new();
    state.insert(field.to_string(), serde_json::json!(value));
    Value::Object(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::paths::RulebookPaths;
    use crate::models::{
        AccountRef, AccountType, ActionKind, Amount, RuleAction, RuleGroup, RuleTrigger,
        TriggerKind,
    };
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = RulebookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn journal(day: u32, description: &str) -> TransactionJournal {
        TransactionJournal::withdrawal(
            NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            description,
            Amount::parse("12.50").unwrap(),
            AccountRef::new("Checking", AccountType::Asset),
            AccountRef::new("Shop", AccountType::Expense),
        )
    }

    fn setup(storage: &Storage) -> (Rule, JournalId) {
        let group = RuleGroup::new("Default");
        let rule = Rule::new(group.id, "Groceries")
            .with_trigger(RuleTrigger::new(TriggerKind::DescriptionContains, "market"))
            .with_action(RuleAction::new(ActionKind::SetCategory, "Groceries"))
            .with_action(RuleAction::new(ActionKind::AddTag, "food"));
        storage.rules.upsert_group(group).unwrap();
        storage.rules.upsert_rule(rule.clone()).unwrap();

        let market = journal(10, "Farmers market");
        let id = market.id;
        for j in [market, journal(11, "Cinema")] {
            storage.catalog.register_journal(&j).unwrap();
            storage.journals.upsert(j).unwrap();
        }
        (rule, id)
    }

    #[test]
    fn test_apply_saves_and_audits() {
        let (_temp_dir, storage) = create_test_storage();
        let (rule, id) = setup(&storage);

        let report = RuleService::new(&storage)
            .apply(ApplyOptions::new(TriggerMode::Store))
            .unwrap();
        assert_eq!(report.summary.journals_processed, 2);
        assert_eq!(report.summary.journals_changed, 1);

        storage.journals.load().unwrap();
        let reloaded = storage.journals.get(id).unwrap().unwrap();
        assert_eq!(reloaded.category.as_deref(), Some("Groceries"));
        assert!(reloaded.has_tag("food"));

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].operation, Operation::Update);
        assert_eq!(entries[0].rule_id, rule.id.to_string());
        assert_eq!(entries[0].rule_title.as_deref(), Some("Groceries"));
        assert_eq!(
            entries[0].diff_summary.as_deref(),
            Some("category: null -> \"Groceries\"")
        );
    }

    #[test]
    fn test_dry_run_discards_changes() {
        let (_temp_dir, storage) = create_test_storage();
        let (_, id) = setup(&storage);
        storage.save_all().unwrap();

        let report = RuleService::new(&storage)
            .apply(ApplyOptions::new(TriggerMode::Store).dry_run(true))
            .unwrap();
        assert_eq!(report.summary.journals_changed, 1);

        let journal = storage.journals.get(id).unwrap().unwrap();
        assert!(journal.category.is_none());
        assert!(!storage.audit().exists());
    }

    #[test]
    fn test_audit_can_be_disabled() {
        let (_temp_dir, storage) = create_test_storage();
        setup(&storage);

        RuleService::new(&storage)
            .with_audit(false)
            .apply(ApplyOptions::new(TriggerMode::Store))
            .unwrap();
        assert!(!storage.audit().exists());
    }

    #[test]
    fn test_delete_is_audited_with_snapshot() {
        let (_temp_dir, storage) = create_test_storage();
        let group = RuleGroup::new("Cleanup");
        let rule = Rule::new(group.id, "Drop cinema")
            .with_trigger(RuleTrigger::new(TriggerKind::DescriptionIs, "cinema"))
            .with_action(RuleAction::new(ActionKind::DeleteTransaction, ""));
        storage.rules.upsert_group(group).unwrap();
        storage.rules.upsert_rule(rule).unwrap();
        storage.journals.upsert(journal(11, "Cinema")).unwrap();

        let report = RuleService::new(&storage)
            .apply(ApplyOptions::new(TriggerMode::Store))
            .unwrap();
        assert_eq!(report.summary.journals_deleted, 1);
        assert_eq!(storage.journals.count().unwrap(), 0);

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Delete);
        assert_eq!(entries[0].journal_description.as_deref(), Some("Cinema"));
        assert!(entries[0].before.is_some());
    }

    #[test]
    fn test_selection_by_title_and_unknown_names() {
        let (_temp_dir, storage) = create_test_storage();
        setup(&storage);

        let report = RuleService::new(&storage)
            .apply(
                ApplyOptions::new(TriggerMode::Store)
                    .rules(vec!["groceries".into(), "No such rule".into()]),
            )
            .unwrap();
        assert_eq!(report.summary.rules_matched, 1);
        assert_eq!(report.summary.missing_rules, 1);
    }

    #[test]
    fn test_date_range_limits_journals() {
        let (_temp_dir, storage) = create_test_storage();
        setup(&storage);

        let day = NaiveDate::from_ymd_opt(2025, 3, 11);
        let report = RuleService::new(&storage)
            .apply(ApplyOptions::new(TriggerMode::Store).date_range(day, day))
            .unwrap();
        assert_eq!(report.summary.journals_processed, 1);
        assert_eq!(report.summary.rules_matched, 0);
    }

    #[test]
    fn test_test_rule_is_read_only() {
        let (_temp_dir, storage) = create_test_storage();
        let (rule, id) = setup(&storage);
        let service = RuleService::new(&storage);

        let found = service.find_rule("Groceries").unwrap();
        assert_eq!(found.id, rule.id);
        assert!(service.find_rule("missing").unwrap_err().is_not_found());

        let settings = MatcherSettings::default();
        let report = service
            .test_rule(&found, settings.params(None, None), &settings)
            .unwrap();
        assert_eq!(report.matched_ids(), vec![id]);
        assert!(storage.journals.get(id).unwrap().unwrap().category.is_none());
    }
}
