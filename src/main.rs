use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rulebook::cli::{
    handle_apply_command, handle_audit_command, handle_catalog_command, handle_config_command,
    handle_init_command, handle_journal_command, handle_rule_command, handle_test_command,
    handle_validate_command, ApplyArgs, AuditArgs, CatalogCommands, ConfigCommands,
    JournalCommands, RuleCommands, TestArgs,
};
use rulebook::config::{paths::RulebookPaths, settings::Settings};
use rulebook::display::{format_action_kinds, format_trigger_kinds};
use rulebook::storage::Storage;

#[derive(Parser)]
#[command(
    name = "rulebook",
    author = "Kaylee Beyene",
    version,
    about = "Rule engine for personal finance journals",
    long_about = "Rulebook runs user-defined rules against stored transaction journals. \
                  Each rule is a set of triggers that decide whether it fires and an \
                  ordered list of actions that edit the journal when it does."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run rules against stored journals
    Apply(ApplyArgs),

    /// Show which journals a rule would match, without changing anything
    Test(TestArgs),

    /// Check rules for problems
    Validate {
        /// Validate this rule file instead of the stored rules
        #[arg(long = "rules")]
        rules_file: Option<PathBuf>,
    },

    /// Rule management commands
    Rules {
        #[command(subcommand)]
        command: Option<RuleCommands>,
    },

    /// List the available trigger kinds
    Triggers,

    /// List the available action kinds
    Actions,

    /// Journal management commands
    #[command(subcommand, alias = "j")]
    Journal(JournalCommands),

    /// Accounts, budgets and bills
    #[command(subcommand)]
    Catalog(CatalogCommands),

    /// Show the audit log of rule changes
    Audit(AuditArgs),

    /// Initialize the data directory
    Init,

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Settings loading reports problems through its Result and never logs,
    // so the subscriber can wait for the configured level.
    let paths = RulebookPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Apply(args)) => {
            handle_apply_command(&storage, &settings, args)?;
        }
        Some(Commands::Test(args)) => {
            handle_test_command(&storage, &settings, args)?;
        }
        Some(Commands::Validate { rules_file }) => {
            handle_validate_command(&storage, rules_file)?;
        }
        Some(Commands::Rules { command }) => {
            handle_rule_command(&storage, command)?;
        }
        Some(Commands::Triggers) => print!("{}", format_trigger_kinds()),
        Some(Commands::Actions) => print!("{}", format_action_kinds()),
        Some(Commands::Journal(cmd)) => {
            handle_journal_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Catalog(cmd)) => {
            handle_catalog_command(&storage, cmd)?;
        }
        Some(Commands::Audit(args)) => {
            handle_audit_command(&storage, args)?;
        }
        Some(Commands::Init) => {
            handle_init_command(&paths, &settings)?;
        }
        Some(Commands::Config { command }) => {
            handle_config_command(&paths, &mut settings, command)?;
        }
        None => {
            println!("Rulebook - rule engine for finance journals");
            println!();
            println!("Run 'rulebook --help' for usage information.");
            println!("Run 'rulebook init' to set up the data directory.");
        }
    }

    Ok(())
}
