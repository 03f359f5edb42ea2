//! End-to-end tests for the `rulebook` binary

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const JOURNALS_CSV: &str = "\
date,description,amount,source,destination
2025-01-10,Farmers market,-23.40,Checking,Farmers Market
2025-01-11,Cinema tickets,-18.00,Checking,Cinema
2025-01-12,Salary,2500.00,Employer,Checking
";

const RULES_YAML: &str = r#"
groups:
  - id: 4f0c6f3e-8d2a-4a55-9a43-1f1c2f6a0b01
    title: Daily
    order: 1
rules:
  - id: 9b7d5a10-3c1e-4d2b-8f6a-7e0d4c3b2a11
    group_id: 4f0c6f3e-8d2a-4a55-9a43-1f1c2f6a0b01
    title: Groceries
    order: 1
    triggers:
      - type: description_contains
        value: market
    actions:
      - type: set_category
        value: Groceries
      - type: add_tag
        value: food
"#;

const DEGENERATE_YAML: &str = r#"
groups:
  - id: 4f0c6f3e-8d2a-4a55-9a43-1f1c2f6a0b02
    title: Broken
rules:
  - id: 9b7d5a10-3c1e-4d2b-8f6a-7e0d4c3b2a12
    group_id: 4f0c6f3e-8d2a-4a55-9a43-1f1c2f6a0b02
    title: Everything
    triggers:
      - type: amount_less
        value: "-1"
    actions:
      - type: add_tag
        value: all
"#;

fn rulebook(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rulebook").unwrap();
    cmd.env("RULEBOOK_DATA_DIR", data_dir).env_remove("RUST_LOG");
    cmd
}

/// Initialized data directory with journals and rules imported
fn prepared() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();

    fs::write(dir.join("journals.csv"), JOURNALS_CSV).unwrap();
    fs::write(dir.join("rules.yaml"), RULES_YAML).unwrap();

    rulebook(dir).arg("init").assert().success();
    rulebook(dir)
        .args(["journal", "import"])
        .arg(dir.join("journals.csv"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 3 journal(s)"));
    rulebook(dir)
        .args(["rules", "import"])
        .arg(dir.join("rules.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 rule(s) in 1 group(s)"));

    temp_dir
}

#[test]
fn init_creates_data_files() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();

    rulebook(dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));
    assert!(dir.join("config.json").exists());
    assert!(dir.join("data").join("rules.json").exists());

    rulebook(dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already initialized"));
}

#[test]
fn rules_list_shows_imported_rule() {
    let temp_dir = prepared();

    rulebook(temp_dir.path())
        .arg("rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("Groceries"))
        .stdout(predicate::str::contains("Daily"));
}

#[test]
fn test_previews_without_changing_journals() {
    let temp_dir = prepared();
    let dir = temp_dir.path();

    rulebook(dir)
        .args(["test", "Groceries"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Farmers market"))
        .stdout(predicate::str::contains("1 matched, 3 examined"));

    let journals = fs::read_to_string(dir.join("data").join("journals.json")).unwrap();
    assert!(!journals.contains("\"Groceries\""));
}

#[test]
fn apply_updates_journals_and_writes_audit() {
    let temp_dir = prepared();
    let dir = temp_dir.path();

    rulebook(dir)
        .arg("apply")
        .assert()
        .success()
        .stdout(predicate::str::contains("Journals processed: 3"))
        .stdout(predicate::str::contains("Journals changed:   1"));

    let journals = fs::read_to_string(dir.join("data").join("journals.json")).unwrap();
    assert!(journals.contains("\"Groceries\""));

    rulebook(dir)
        .arg("audit")
        .assert()
        .success()
        .stdout(predicate::str::contains("UPDATE journal"))
        .stdout(predicate::str::contains("Action: set_category \"Groceries\""));
}

#[test]
fn apply_dry_run_saves_nothing() {
    let temp_dir = prepared();
    let dir = temp_dir.path();

    rulebook(dir)
        .args(["apply", "--dry-run", "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing was saved"))
        .stdout(predicate::str::contains("Journals changed:   1"));

    let journals = fs::read_to_string(dir.join("data").join("journals.json")).unwrap();
    assert!(!journals.contains("\"Groceries\""));
    assert!(!dir.join("audit.log").exists());
}

#[test]
fn apply_reports_unknown_rule_names() {
    let temp_dir = prepared();

    rulebook(temp_dir.path())
        .args(["apply", "--rule", "Groceries", "--rule", "No such rule"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown rules:      1"));
}

#[test]
fn validate_flags_degenerate_trigger() {
    let temp_dir = prepared();
    let dir = temp_dir.path();
    fs::write(dir.join("broken.yaml"), DEGENERATE_YAML).unwrap();

    rulebook(dir)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("No problems found."));

    rulebook(dir)
        .arg("validate")
        .arg("--rules")
        .arg(dir.join("broken.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("matches every transaction"));
}

#[test]
fn triggers_and_actions_are_listed() {
    let temp_dir = TempDir::new().unwrap();

    rulebook(temp_dir.path())
        .arg("triggers")
        .assert()
        .success()
        .stdout(predicate::str::contains("description_contains"))
        .stdout(predicate::str::contains("amount_less"));

    rulebook(temp_dir.path())
        .arg("actions")
        .assert()
        .success()
        .stdout(predicate::str::contains("set_category"))
        .stdout(predicate::str::contains("delete_transaction"));
}

#[test]
fn invalid_date_is_rejected() {
    let temp_dir = prepared();

    rulebook(temp_dir.path())
        .args(["apply", "--from", "10/01/2025"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date format"));
}

#[test]
fn config_set_rejects_unknown_key() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();

    rulebook(dir)
        .args(["config", "set", "matcher.search_limit", "250"])
        .assert()
        .success();
    rulebook(dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("matcher.search_limit:  250"));

    rulebook(dir)
        .args(["config", "set", "colour", "blue"])
        .assert()
        .failure();
}
