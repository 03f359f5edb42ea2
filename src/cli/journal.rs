//! Journal CLI commands
//!
//! Importing, listing and exporting the journals rules run against.

use std::fs::File;
use std::path::PathBuf;

use clap::Subcommand;

use super::parse_date;
use crate::config::settings::Settings;
use crate::display::{format_journal_details, format_journal_register};
use crate::error::{RulesError, RulesResult};
use crate::export::export_journals_csv;
use crate::rules::JournalQuery;
use crate::services::JournalService;
use crate::storage::Storage;

/// Journal subcommands
#[derive(Subcommand, Debug)]
pub enum JournalCommands {
    /// Import journals from a CSV, JSON or YAML file
    Import {
        /// Path to the file
        file: PathBuf,
    },
    /// List journals, newest first
    List {
        /// Filter by account name or ID (repeatable)
        #[arg(short, long = "account")]
        accounts: Vec<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Number of journals to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Show journal details
    Show {
        /// Journal ID
        id: String,
    },
    /// Export all journals to CSV
    Export {
        /// Output file
        file: PathBuf,
    },
}

/// Handle `rulebook journal`
pub fn handle_journal_command(
    storage: &Storage,
    settings: &Settings,
    cmd: JournalCommands,
) -> RulesResult<()> {
    let service = JournalService::new(storage).with_currency(settings.currency_code.clone());

    match cmd {
        JournalCommands::Import { file } => {
            let result = service.import(&file)?;
            println!("Imported {} journal(s) from {}", result.imported, file.display());
            if result.errors > 0 {
                println!("Skipped {} record(s) with errors:", result.errors);
                let mut rows: Vec<_> = result.error_messages.iter().collect();
                rows.sort_by_key(|(row, _)| **row);
                for (row, message) in rows {
                    println!("  Record {}: {}", row, message);
                }
            }
        }
        JournalCommands::List {
            accounts,
            from,
            to,
            limit,
        } => {
            let query = JournalQuery::new()
                .accounts(accounts)
                .date_range(parse_date(from.as_deref())?, parse_date(to.as_deref())?);
            let journals = service.list(&query, Some(limit))?;
            print!("{}", format_journal_register(&journals));
        }
        JournalCommands::Show { id } => {
            let journal = service
                .find(&id)?
                .ok_or_else(|| RulesError::journal_not_found(&id))?;
            print!("{}", format_journal_details(&journal));
        }
        JournalCommands::Export { file } => {
            let journals = service.list(&JournalQuery::new(), None)?;
            let writer = File::create(&file).map_err(|e| {
                RulesError::Export(format!("Failed to create {}: {}", file.display(), e))
            })?;
            export_journals_csv(&journals, writer)?;
            println!("Exported {} journal(s) to {}", journals.len(), file.display());
        }
    }

    Ok(())
}
