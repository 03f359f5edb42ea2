//! Audit logger for append-only audit log
//!
//! Entries are stored one JSON object per line. Writers only ever append;
//! readers stream the file line by line.

use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::PathBuf;

use crate::error::{RulesError, RulesResult};

use super::entry::AuditEntry;

/// Handles writing audit entries to the audit log file
///
/// The log file uses a line-delimited JSON format (JSONL) where each line
/// is a complete JSON object representing one audit entry.
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    /// Create a new AuditLogger that writes to the specified path
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append one entry and flush
    pub fn log(&self, entry: &AuditEntry) -> RulesResult<()> {
        self.log_batch(std::slice::from_ref(entry))
    }

    /// Append several entries with a single flush at the end
    pub fn log_batch(&self, entries: &[AuditEntry]) -> RulesResult<()> {
        let Some((first, rest)) = entries.split_first() else {
            return Ok(());
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        let mut out = BufWriter::new(file);
        for entry in std::iter::once(first).chain(rest) {
            serde_json::to_writer(&mut out, entry)?;
            out.write_all(b"\n")?;
        }
        out.flush()?;
        Ok(())
    }

    /// Every entry in the log, oldest first
    pub fn read_all(&self) -> RulesResult<Vec<AuditEntry>> {
        let mut entries = Vec::new();
        self.scan(|entry| entries.push(entry))?;
        Ok(entries)
    }

    /// The last `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> RulesResult<Vec<AuditEntry>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let mut window = VecDeque::with_capacity(count);
        self.scan(|entry| {
            if window.len() == count {
                window.pop_front();
            }
            window.push_back(entry);
        })?;
        Ok(window.into())
    }

    /// Feed each parsed entry to `visit`; a missing log holds no entries
    fn scan(&self, mut visit: impl FnMut(AuditEntry)) -> RulesResult<()> {
        let file = match File::open(&self.log_path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(RulesError::Io(format!("Failed to open audit log: {}", e))),
        };

        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let entry = serde_json::from_str(&line).map_err(|e| {
                RulesError::Json(format!("Bad audit entry on line {}: {}", index + 1, e))
            })?;
            visit(entry);
        }
        Ok(())
    }

    /// Entries that touched one journal, oldest first
    pub fn read_for_journal(&self, journal_id: &str) -> RulesResult<Vec<AuditEntry>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|e| e.journal_id == journal_id)
            .collect())
    }

    /// Check if the audit log file exists
    pub fn exists(&self) -> bool {
        self.log_path.exists()
    }

    /// Get the path to the audit log file
    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }
}
