//! Rule engine scenarios against file-backed storage

use chrono::NaiveDate;
use tempfile::TempDir;

use rulebook::config::paths::RulebookPaths;
use rulebook::models::{
    AccountRef, AccountType, ActionKind, Amount, Rule, RuleAction, RuleBook, RuleGroup,
    RuleTrigger, Strictness, TransactionJournal, TriggerKind, TriggerMode,
};
use rulebook::rules::{
    will_match_everything, MatchParams, RuleEngine, RuleSet, ScanEnd, StopReason,
    TransactionMatcher,
};
use rulebook::services::{ApplyOptions, RuleService};
use rulebook::storage::Storage;

fn create_storage() -> (TempDir, Storage) {
    let temp_dir = TempDir::new().unwrap();
    let paths = RulebookPaths::with_base_dir(temp_dir.path().to_path_buf());
    let mut storage = Storage::new(paths).unwrap();
    storage.load_all().unwrap();
    (temp_dir, storage)
}

fn withdrawal(day: u32, description: &str, amount: &str) -> TransactionJournal {
    TransactionJournal::withdrawal(
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
        description,
        Amount::parse(amount).unwrap(),
        AccountRef::new("Checking", AccountType::Asset),
        AccountRef::new("Corner Shop", AccountType::Expense),
    )
}

fn store(storage: &Storage, journals: &[TransactionJournal]) {
    for journal in journals {
        storage.catalog.register_journal(journal).unwrap();
        storage.journals.upsert(journal.clone()).unwrap();
    }
}

#[test]
fn r1_fires_and_r2_is_never_evaluated() {
    let (_temp_dir, storage) = create_storage();
    let group = RuleGroup::new("Default");
    let r1 = Rule::new(group.id, "R1")
        .with_order(1)
        .with_trigger(RuleTrigger::new(TriggerKind::AmountMore, "10"))
        .with_action(RuleAction::new(ActionKind::SetCategory, "Groceries").stopping());
    let r2 = Rule::new(group.id, "R2")
        .with_order(2)
        .with_strictness(Strictness::Any)
        .with_trigger(RuleTrigger::new(TriggerKind::DescriptionContains, "Market"))
        .with_action(RuleAction::new(ActionKind::AddTag, "r2"));
    let journal = withdrawal(15, "Market run", "-15.00");
    let id = journal.id;
    store(&storage, &[journal.clone()]);

    let set = RuleSet::from_book(RuleBook {
        groups: vec![group],
        rules: vec![r2, r1.clone()],
    });
    let report = RuleEngine::new(&set, &storage).run(vec![journal]);

    assert_eq!(report.summary.rules_evaluated, 1);
    assert_eq!(report.outcomes[0].fired, vec![r1.id]);
    assert_eq!(report.outcomes[0].stopped, Some(StopReason::Action));

    let stored = storage.journals.get(id).unwrap().unwrap();
    assert_eq!(stored.category.as_deref(), Some("Groceries"));
    assert!(stored.tags.is_empty());
}

#[test]
fn amount_less_than_negative_one_matches_everything() {
    assert!(will_match_everything(TriggerKind::AmountLess, "-1"));
    assert!(!will_match_everything(TriggerKind::AmountLess, "10"));
}

#[test]
fn stopping_group_skips_later_groups() {
    let (_temp_dir, storage) = create_storage();
    let first = RuleGroup::new("First").with_order(1).stopping();
    let second = RuleGroup::new("Second").with_order(2);
    let tag_first = Rule::new(first.id, "Tag first")
        .with_trigger(RuleTrigger::new(TriggerKind::DescriptionContains, "coffee"))
        .with_action(RuleAction::new(ActionKind::AddTag, "first"));
    let tag_second = Rule::new(second.id, "Tag second")
        .with_trigger(RuleTrigger::new(TriggerKind::DescriptionContains, "coffee"))
        .with_action(RuleAction::new(ActionKind::AddTag, "second"));

    storage.rules.upsert_group(first.clone()).unwrap();
    storage.rules.upsert_group(second).unwrap();
    storage.rules.upsert_rule(tag_first).unwrap();
    storage.rules.upsert_rule(tag_second).unwrap();

    let coffee = withdrawal(3, "Coffee beans", "-8.00");
    let id = coffee.id;
    store(&storage, &[coffee]);

    let report = RuleService::new(&storage)
        .apply(ApplyOptions::new(TriggerMode::Store))
        .unwrap();
    assert_eq!(report.outcomes[0].stopped, Some(StopReason::Group));
    assert_eq!(report.outcomes[0].stopped_in, Some(first.id));

    storage.journals.load().unwrap();
    let stored = storage.journals.get(id).unwrap().unwrap();
    assert_eq!(stored.tags, vec!["first".to_string()]);
}

#[test]
fn update_gated_rule_is_skipped_in_store_mode() {
    let (_temp_dir, storage) = create_storage();
    let group = RuleGroup::new("Default");
    let gated = Rule::new(group.id, "On edit")
        .with_trigger(RuleTrigger::new(TriggerKind::UserAction, "update-journal"))
        .with_trigger(RuleTrigger::new(TriggerKind::HasNoCategory, ""))
        .with_action(RuleAction::new(ActionKind::SetCategory, "Unsorted"));
    storage.rules.upsert_group(group).unwrap();
    storage.rules.upsert_rule(gated).unwrap();

    let journal = withdrawal(4, "Hardware store", "-30.00");
    let id = journal.id;
    store(&storage, &[journal]);

    let stored_run = RuleService::new(&storage)
        .apply(ApplyOptions::new(TriggerMode::Store))
        .unwrap();
    assert_eq!(stored_run.summary.rules_matched, 0);

    let update_run = RuleService::new(&storage)
        .apply(ApplyOptions::new(TriggerMode::Update))
        .unwrap();
    assert_eq!(update_run.summary.rules_matched, 1);

    storage.journals.load().unwrap();
    let stored = storage.journals.get(id).unwrap().unwrap();
    assert_eq!(stored.category.as_deref(), Some("Unsorted"));
}

#[test]
fn failed_action_does_not_abort_the_run() {
    let (_temp_dir, storage) = create_storage();
    let group = RuleGroup::new("Default");
    let rule = Rule::new(group.id, "Budget rent")
        .with_trigger(RuleTrigger::new(TriggerKind::DescriptionStarts, "Rent"))
        .with_action(RuleAction::new(ActionKind::SetBudget, "Housing"))
        .with_action(RuleAction::new(ActionKind::AddTag, "rent"));
    storage.rules.upsert_group(group).unwrap();
    storage.rules.upsert_rule(rule).unwrap();

    let rent = withdrawal(1, "Rent January", "-900.00");
    let id = rent.id;
    store(&storage, &[rent]);

    let report = RuleService::new(&storage)
        .apply(ApplyOptions::new(TriggerMode::Store))
        .unwrap();
    assert_eq!(report.summary.actions_executed, 2);
    assert_eq!(report.summary.actions_failed, 1);

    storage.journals.load().unwrap();
    let stored = storage.journals.get(id).unwrap().unwrap();
    assert_eq!(stored.budget, None);
    assert!(stored.has_tag("rent"));
}

#[test]
fn matcher_stops_at_trigger_limit_without_writing() {
    let (_temp_dir, storage) = create_storage();
    let group = RuleGroup::new("Default");
    let rule = Rule::new(group.id, "Shop")
        .with_trigger(RuleTrigger::new(TriggerKind::ToAccountIs, "Corner Shop"))
        .with_action(RuleAction::new(ActionKind::DeleteTransaction, ""));

    let journals: Vec<_> = (1..=6)
        .map(|day| withdrawal(day, &format!("Purchase {}", day), "-5.00"))
        .collect();
    store(&storage, &journals);

    let report = TransactionMatcher::new(&storage.journals)
        .with_page_size(2)
        .find_matches(&rule, MatchParams::default().with_limits(10, 3))
        .unwrap();

    assert_eq!(report.end, ScanEnd::TriggerLimit);
    assert_eq!(report.matched.len(), 3);
    // Newest first
    assert_eq!(report.matched[0].description, "Purchase 6");
    assert_eq!(storage.journals.count().unwrap(), 6);
}

#[test]
fn matcher_stops_at_search_limit() {
    let (_temp_dir, storage) = create_storage();
    let group = RuleGroup::new("Default");
    let rule = Rule::new(group.id, "Never")
        .with_trigger(RuleTrigger::new(TriggerKind::DescriptionIs, "nothing like this"));

    let journals: Vec<_> = (1..=8)
        .map(|day| withdrawal(day, &format!("Purchase {}", day), "-5.00"))
        .collect();
    store(&storage, &journals);

    let report = TransactionMatcher::new(&storage.journals)
        .with_page_size(3)
        .find_matches(&rule, MatchParams::default().with_limits(5, 10))
        .unwrap();

    assert_eq!(report.end, ScanEnd::SearchLimit);
    assert_eq!(report.examined, 5);
    assert!(report.matched.is_empty());
}
