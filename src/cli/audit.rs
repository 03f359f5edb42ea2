//! Audit CLI command

use clap::Args;

use crate::display::format_audit_entries;
use crate::error::RulesResult;
use crate::models::JournalId;
use crate::storage::Storage;

/// Arguments for `rulebook audit`
#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Number of entries to show
    #[arg(short, long, default_value = "20")]
    pub limit: usize,

    /// Only entries for this journal ID
    #[arg(short, long)]
    pub journal: Option<String>,
}

/// Handle `rulebook audit`
pub fn handle_audit_command(storage: &Storage, args: AuditArgs) -> RulesResult<()> {
    let audit = storage.audit();

    let entries = match args.journal {
        Some(journal) => {
            // Entries carry the short form
            let journal = journal
                .parse::<JournalId>()
                .map(|id| id.to_string())
                .unwrap_or_else(|_| journal.trim().to_lowercase());
            let mut entries = audit.read_for_journal(&journal)?;
            let start = entries.len().saturating_sub(args.limit);
            entries.drain(..start);
            entries
        }
        None => audit.read_recent(args.limit)?,
    };

    print!("{}", format_audit_entries(&entries));
    Ok(())
}
