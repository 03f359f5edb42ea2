//! Rule CLI commands
//!
//! Listing, inspecting, importing and validating rule configuration.

use std::path::PathBuf;

use clap::Subcommand;

use crate::display::{format_rule_details, format_rule_list, format_warnings};
use crate::error::RulesResult;
use crate::rules::{validate_rules, RuleSet};
use crate::services::RuleService;
use crate::storage::Storage;

/// Rule subcommands
#[derive(Subcommand, Debug)]
pub enum RuleCommands {
    /// List groups and rules in evaluation order
    List,
    /// Show a rule's triggers and actions
    Show {
        /// Rule ID or title
        rule: String,
    },
    /// Replace the stored rules with a JSON or YAML file
    Import {
        /// Path to the rule file
        file: PathBuf,
    },
}

/// Handle `rulebook rules`
pub fn handle_rule_command(storage: &Storage, cmd: Option<RuleCommands>) -> RulesResult<()> {
    let service = RuleService::new(storage);

    match cmd.unwrap_or(RuleCommands::List) {
        RuleCommands::List => {
            print!("{}", format_rule_list(&service.rule_set()?));
        }
        RuleCommands::Show { rule } => {
            let rule = service.find_rule(&rule)?;
            print!("{}", format_rule_details(&rule));
        }
        RuleCommands::Import { file } => {
            let warnings = service.import(&file)?;
            let rules = service.rule_set()?;
            println!(
                "Imported {} rule(s) in {} group(s) from {}",
                rules.rules().count() + rules.orphans().len(),
                rules.groups().len(),
                file.display()
            );
            if !warnings.is_empty() {
                print!("{}", format_warnings(&warnings));
            }
        }
    }

    Ok(())
}

/// Handle `rulebook validate`
pub fn handle_validate_command(storage: &Storage, rules_file: Option<PathBuf>) -> RulesResult<()> {
    let service = RuleService::new(storage);

    let warnings = match rules_file {
        Some(path) => validate_rules(&RuleSet::from_book(service.load_file(&path)?)),
        None => service.validate()?,
    };

    print!("{}", format_warnings(&warnings));
    Ok(())
}
