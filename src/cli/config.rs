//! Init and config CLI commands

use clap::Subcommand;

use crate::config::{paths::RulebookPaths, settings::Settings};
use crate::error::RulesResult;
use crate::storage::init::{initialize_storage, needs_initialization};

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show paths and settings
    Show,
    /// Change a setting (default_mode, log_level, audit_enabled,
    /// currency_code, matcher.search_limit, matcher.trigger_limit,
    /// matcher.max_limit, matcher.page_size)
    Set { key: String, value: String },
}

/// Handle `rulebook init`
pub fn handle_init_command(paths: &RulebookPaths, settings: &Settings) -> RulesResult<()> {
    if !needs_initialization(paths) {
        println!("Rulebook is already initialized at: {}", paths.base_dir().display());
        return Ok(());
    }

    println!("Initializing Rulebook at: {}", paths.base_dir().display());
    initialize_storage(paths)?;
    settings.save(paths)?;
    println!("Initialization complete!");
    println!();
    println!("An empty \"Default rules\" group has been created.");
    println!("Run 'rulebook journal import <file>' to load journals and");
    println!("'rulebook rules import <file>' to load rules.");
    Ok(())
}

/// Handle `rulebook config`
pub fn handle_config_command(
    paths: &RulebookPaths,
    settings: &mut Settings,
    cmd: Option<ConfigCommands>,
) -> RulesResult<()> {
    match cmd.unwrap_or(ConfigCommands::Show) {
        ConfigCommands::Show => {
            println!("Rulebook Configuration");
            println!("======================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  default_mode:          {}", settings.default_mode);
            println!("  log_level:             {}", settings.log_level);
            println!("  audit_enabled:         {}", settings.audit_enabled);
            println!("  currency_code:         {}", settings.currency_code);
            println!("  matcher.search_limit:  {}", settings.matcher.search_limit);
            println!("  matcher.trigger_limit: {}", settings.matcher.trigger_limit);
            println!("  matcher.max_limit:     {}", settings.matcher.max_limit);
            println!("  matcher.page_size:     {}", settings.matcher.page_size);
        }
        ConfigCommands::Set { key, value } => {
            settings.set(&key, &value)?;
            settings.save(paths)?;
            println!("Set {} = {}", key, value);
        }
    }
    Ok(())
}
