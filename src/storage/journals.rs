//! Journal repository for JSON storage
//!
//! Manages loading and saving journals to journals.json and serves pages of
//! journals to the rule matcher.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::RulesError;
use crate::models::{JournalId, TransactionJournal};
use crate::rules::ledger::{JournalCollector, JournalQuery};

use super::file_io::{read_json, write_json_atomic};

/// Serializable journal data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct JournalData {
    journals: Vec<TransactionJournal>,
}

/// Repository for journal persistence
pub struct JournalRepository {
    path: PathBuf,
    data: RwLock<HashMap<JournalId, TransactionJournal>>,
}

/// Newest first by date, then creation time, then id so pages never shift
fn newest_first(journals: &mut [TransactionJournal]) {
    journals.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then(b.created_at.cmp(&a.created_at))
            .then(b.id.cmp(&a.id))
    });
}

impl JournalRepository {
    /// Create a new journal repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load journals from disk
    pub fn load(&self) -> Result<(), RulesError> {
        let file_data: JournalData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| RulesError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for journal in file_data.journals {
            data.insert(journal.id, journal);
        }

        Ok(())
    }

    /// Save journals to disk
    pub fn save(&self) -> Result<(), RulesError> {
        let journals = self.get_all()?;
        write_json_atomic(&self.path, &JournalData { journals })
    }

    /// Get a journal by ID
    pub fn get(&self, id: JournalId) -> Result<Option<TransactionJournal>, RulesError> {
        let data = self
            .data
            .read()
            .map_err(|e| RulesError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all journals, newest first
    pub fn get_all(&self) -> Result<Vec<TransactionJournal>, RulesError> {
        let data = self
            .data
            .read()
            .map_err(|e| RulesError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut journals: Vec<_> = data.values().cloned().collect();
        newest_first(&mut journals);
        Ok(journals)
    }

    /// Get every journal inside a query window, newest first
    pub fn find(&self, query: &JournalQuery) -> Result<Vec<TransactionJournal>, RulesError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|j| query.includes(j))
            .collect())
    }

    /// Insert or update a journal
    pub fn upsert(&self, journal: TransactionJournal) -> Result<(), RulesError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| RulesError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(journal.id, journal);
        Ok(())
    }

    /// Modify a stored journal in place and mark it updated
    pub fn update<F>(&self, id: JournalId, f: F) -> Result<(), RulesError>
    where
        F: FnOnce(&mut TransactionJournal),
    {
        let mut data = self
            .data
            .write()
            .map_err(|e| RulesError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let journal = data
            .get_mut(&id)
            .ok_or_else(|| RulesError::journal_not_found(id.to_string()))?;
        f(journal);
        journal.touch();
        Ok(())
    }

    /// Delete a journal
    pub fn delete(&self, id: JournalId) -> Result<bool, RulesError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| RulesError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.remove(&id).is_some())
    }

    /// Count journals
    pub fn count(&self) -> Result<usize, RulesError> {
        let data = self
            .data
            .read()
            .map_err(|e| RulesError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}

impl JournalCollector for JournalRepository {
    fn page(
        &self,
        query: &JournalQuery,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<TransactionJournal>, RulesError> {
        Ok(self
            .find(query)?
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountRef, AccountType, Amount};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn journal(day: u32, description: &str) -> TransactionJournal {
        TransactionJournal::withdrawal(
            NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            description,
            Amount::parse("10").unwrap(),
            AccountRef::new("Checking", AccountType::Asset),
            AccountRef::new("Shop", AccountType::Expense),
        )
    }

    fn create_test_repo() -> (TempDir, JournalRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("journals.json");
        let repo = JournalRepository::new(path);
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_save_and_reload() {
        let (_temp_dir, repo) = create_test_repo();
        let first = journal(1, "Coffee");
        let id = first.id;
        repo.upsert(first).unwrap();
        repo.save().unwrap();

        let reloaded = JournalRepository::new(repo.path.clone());
        reloaded.load().unwrap();
        assert_eq!(reloaded.get(id).unwrap().unwrap().description, "Coffee");
    }

    #[test]
    fn test_update_and_delete() {
        let (_temp_dir, repo) = create_test_repo();
        let entry = journal(1, "Coffee");
        let id = entry.id;
        repo.upsert(entry).unwrap();

        repo.update(id, |j| j.category = Some("Dining".into())).unwrap();
        assert_eq!(repo.get(id).unwrap().unwrap().category.as_deref(), Some("Dining"));

        assert!(repo.delete(id).unwrap());
        assert!(!repo.delete(id).unwrap());
        assert!(repo.update(id, |_| {}).unwrap_err().is_not_found());
    }

    #[test]
    fn test_pages_newest_first() {
        let (_temp_dir, repo) = create_test_repo();
        for day in 1..=5 {
            repo.upsert(journal(day, &format!("Day {}", day))).unwrap();
        }

        let query = JournalQuery::new();
        let first: Vec<_> = repo
            .page(&query, 0, 2)
            .unwrap()
            .into_iter()
            .map(|j| j.description)
            .collect();
        assert_eq!(first, vec!["Day 5", "Day 4"]);

        let last = repo.page(&query, 4, 2).unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].description, "Day 1");

        let windowed = JournalQuery::new().date_range(NaiveDate::from_ymd_opt(2025, 1, 4), None);
        assert_eq!(repo.page(&windowed, 0, 10).unwrap().len(), 2);
    }

    #[test]
    fn test_identical_timestamps_page_by_id() {
        let (_temp_dir, repo) = create_test_repo();
        let template = journal(3, "Same instant");
        let mut ids = Vec::new();
        for _ in 0..6 {
            let mut twin = journal(3, "Same instant");
            twin.created_at = template.created_at;
            ids.push(twin.id);
            repo.upsert(twin).unwrap();
        }
        ids.sort_by(|a, b| b.cmp(a));

        let query = JournalQuery::new();
        let paged: Vec<_> = (0..3)
            .flat_map(|page| repo.page(&query, page * 2, 2).unwrap())
            .map(|j| j.id)
            .collect();
        assert_eq!(paged, ids);
    }
}
