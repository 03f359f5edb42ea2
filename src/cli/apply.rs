//! Apply CLI command
//!
//! Runs rules over stored journals and prints what changed.

use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

use super::{parse_date, parse_mode};
use crate::config::settings::Settings;
use crate::display::format_run_report;
use crate::error::{RulesError, RulesResult};
use crate::export::export_run_csv;
use crate::rules::RuleSet;
use crate::services::{ApplyOptions, RuleService};
use crate::storage::Storage;

/// Arguments for `rulebook apply`
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Rule ID or title to run (repeatable; default: every active rule)
    #[arg(short, long = "rule")]
    pub rules: Vec<String>,

    /// Trigger mode: store or update (default from settings)
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Only journals on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Only journals on or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Only journals touching this account (repeatable)
    #[arg(short, long = "account")]
    pub accounts: Vec<String>,

    /// Run the rules in this JSON or YAML file instead of the stored rules
    #[arg(long = "rules")]
    pub rules_file: Option<PathBuf>,

    /// Stop starting new journals after this many seconds
    #[arg(long)]
    pub time_budget: Option<u64>,

    /// Evaluate without saving anything
    #[arg(long)]
    pub dry_run: bool,

    /// Show every action per journal
    #[arg(short, long)]
    pub verbose: bool,

    /// Write every executed action to a CSV file
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Handle `rulebook apply`
pub fn handle_apply_command(
    storage: &Storage,
    settings: &Settings,
    args: ApplyArgs,
) -> RulesResult<()> {
    let service = RuleService::new(storage).with_audit(settings.audit_enabled);

    let mode = match args.mode.as_deref() {
        Some(mode) => parse_mode(mode)?,
        None => settings.default_mode,
    };

    let mut options = ApplyOptions::new(mode)
        .rules(args.rules)
        .date_range(parse_date(args.from.as_deref())?, parse_date(args.to.as_deref())?)
        .accounts(args.accounts)
        .dry_run(args.dry_run);
    if let Some(seconds) = args.time_budget {
        options = options.time_budget(Duration::from_secs(seconds));
    }

    let rules = match &args.rules_file {
        Some(path) => {
            let book = service.load_file(path)?;
            options = options.book(book.clone());
            RuleSet::from_book(book)
        }
        None => service.rule_set()?,
    };

    let report = service.apply(options)?;

    if args.dry_run {
        println!("Dry run ({} mode), nothing was saved.", mode);
    }
    print!("{}", format_run_report(&report, &rules, args.verbose));

    if let Some(path) = args.export {
        let file = File::create(&path).map_err(|e| {
            RulesError::Export(format!("Failed to create {}: {}", path.display(), e))
        })?;
        export_run_csv(&report, file)?;
        println!("Actions written to {}", path.display());
    }

    Ok(())
}
