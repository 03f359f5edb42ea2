//! Journal service
//!
//! Imports journals from CSV, JSON or YAML files and lists stored
//! journals. Imported accounts are registered in the catalog so rule
//! actions can resolve them by name.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::Deserialize;

use crate::error::{RulesError, RulesResult};
use crate::models::{
    AccountRef, AccountType, Amount, JournalId, TransactionJournal, TransactionType,
};
use crate::rules::JournalQuery;
use crate::storage::{read_document, Storage};

/// One journal as written in an import file
#[derive(Debug, Clone, Deserialize)]
pub struct JournalRecord {
    pub date: String,
    #[serde(default, rename = "type")]
    pub transaction_type: Option<String>,
    #[serde(default)]
    pub description: String,
    pub amount: String,
    pub source: String,
    pub destination: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub bill: Option<String>,
    /// Separated by `;`
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub attachments: Option<u32>,
}

/// Result of a completed import
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub errors: usize,
    /// Error messages by record number (1-based)
    pub error_messages: HashMap<usize, String>,
}

/// Service for journal import and listing
pub struct JournalService<'a> {
    storage: &'a Storage,
    currency_code: String,
}

impl<'a> JournalService<'a> {
    /// Create a new journal service
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            currency_code: "EUR".to_string(),
        }
    }

    /// Currency for records that do not name one
    pub fn with_currency(mut self, currency_code: impl Into<String>) -> Self {
        self.currency_code = currency_code.into();
        self
    }

    /// Import journals from a file; the format follows the extension
    /// (`.csv`, `.yaml`/`.yml`, otherwise JSON).
    ///
    /// Bad records are counted and skipped; the rest are saved.
    pub fn import(&self, path: &Path) -> RulesResult<ImportResult> {
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| e.eq_ignore_ascii_case("csv"));

        let records: Vec<Result<JournalRecord, String>> = if is_csv {
            self.read_csv(path)?
        } else {
            read_document::<Vec<JournalRecord>, _>(path)?
                .into_iter()
                .map(Ok)
                .collect()
        };

        let mut result = ImportResult::default();
        for (idx, record) in records.into_iter().enumerate() {
            match record.and_then(|r| self.to_journal(r)) {
                Ok(journal) => {
                    self.storage.catalog.register_journal(&journal)?;
                    self.storage.journals.upsert(journal)?;
                    result.imported += 1;
                }
                Err(message) => {
                    result.errors += 1;
                    result.error_messages.insert(idx + 1, message);
                }
            }
        }

        self.storage.journals.save()?;
        self.storage.catalog.save()?;
        Ok(result)
    }

    fn read_csv(&self, path: &Path) -> RulesResult<Vec<Result<JournalRecord, String>>> {
        let mut reader = ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(path)
            .map_err(|e| RulesError::Io(format!("Failed to open {}: {}", path.display(), e)))?;

        Ok(reader
            .deserialize::<JournalRecord>()
            .map(|row| row.map_err(|e| format!("Error reading CSV record: {}", e)))
            .collect())
    }

    /// Build a journal from an import record
    pub fn to_journal(&self, record: JournalRecord) -> Result<TransactionJournal, String> {
        let date = NaiveDate::parse_from_str(record.date.trim(), "%Y-%m-%d")
            .map_err(|_| format!("Invalid date: {}", record.date))?;
        let amount = Amount::parse(&record.amount).map_err(|e| e.to_string())?;

        let transaction_type = match record.transaction_type.as_deref().map(str::trim) {
            None | Some("") if amount.is_positive() => TransactionType::Deposit,
            None | Some("") => TransactionType::Withdrawal,
            Some(s) => {
                TransactionType::parse(s).ok_or_else(|| format!("Unknown transaction type: {}", s))?
            }
        };

        let (source_type, destination_type) = account_types(transaction_type);
        let source = self.account(&record.source, source_type);
        let destination = self.account(&record.destination, destination_type);
        if source.name.is_empty() || destination.name.is_empty() {
            return Err("Source and destination accounts are required".into());
        }

        let amount = match transaction_type {
            TransactionType::Deposit | TransactionType::OpeningBalance => amount.abs(),
            _ => -amount.abs(),
        };

        let mut journal = TransactionJournal::new(
            transaction_type,
            date,
            record.description.trim(),
            amount,
            source,
            destination,
        );
        journal.currency_code = record
            .currency
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| self.currency_code.clone());
        journal.category = non_empty(record.category);
        if transaction_type == TransactionType::Withdrawal {
            journal.budget = non_empty(record.budget);
            journal.bill = non_empty(record.bill);
        }
        for tag in record.tags.iter().flat_map(|t| t.split(';')) {
            journal.add_tag(tag.trim());
        }
        journal.notes = non_empty(record.notes);
        journal.attachment_count = record.attachments.unwrap_or(0);

        Ok(journal)
    }

    /// Reuse the catalog account of that name and type when there is one
    fn account(&self, name: &str, account_type: AccountType) -> AccountRef {
        match self.storage.catalog.find_account(name, account_type) {
            Ok(Some(existing)) => existing,
            _ => AccountRef::new(name.trim(), account_type),
        }
    }

    /// Stored journals inside the query window, newest first
    pub fn list(
        &self,
        query: &JournalQuery,
        limit: Option<usize>,
    ) -> RulesResult<Vec<TransactionJournal>> {
        let mut journals = self.storage.journals.find(query)?;
        if let Some(limit) = limit {
            journals.truncate(limit);
        }
        Ok(journals)
    }

    /// Find a journal by full or short id (`jrn-1a2b3c4d`)
    pub fn find(&self, identifier: &str) -> RulesResult<Option<TransactionJournal>> {
        if let Ok(id) = identifier.parse::<JournalId>() {
            return self.storage.journals.get(id);
        }
        let needle = identifier.trim().to_lowercase();
        Ok(self
            .storage
            .journals
            .get_all()?
            .into_iter()
            .find(|j| j.id.to_string() == needle))
    }
}

/// Account types a journal of this type runs between
fn account_types(transaction_type: TransactionType) -> (AccountType, AccountType) {
    match transaction_type {
        TransactionType::Withdrawal => (AccountType::Asset, AccountType::Expense),
        TransactionType::Deposit => (AccountType::Revenue, AccountType::Asset),
        TransactionType::Transfer => (AccountType::Asset, AccountType::Asset),
        TransactionType::OpeningBalance => (AccountType::InitialBalance, AccountType::Asset),
        TransactionType::Reconciliation => (AccountType::Asset, AccountType::Reconciliation),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::RulebookPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = RulebookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_import_csv() {
        let (temp_dir, storage) = create_test_storage();
        let path = temp_dir.path().join("journals.csv");
        std::fs::write(
            &path,
            "date,type,description,amount,source,destination,tags,notes\n\
             2025-01-15,withdrawal,Farmers market,15.00,Checking,Market,food;weekly,\n\
             2025-01-31,,Salary,2500,Employer,Checking,,January\n\
             not-a-date,,Broken,1,Checking,Shop,,\n",
        )
        .unwrap();

        let result = JournalService::new(&storage).import(&path).unwrap();
        assert_eq!(result.imported, 2);
        assert_eq!(result.errors, 1);
        assert!(result.error_messages[&3].contains("Invalid date"));

        let journals = storage.journals.get_all().unwrap();
        let salary = &journals[0];
        assert_eq!(salary.transaction_type, TransactionType::Deposit);
        assert_eq!(salary.source.account_type, AccountType::Revenue);
        assert_eq!(salary.notes.as_deref(), Some("January"));

        let market = &journals[1];
        assert!(market.amount.is_negative());
        assert_eq!(market.tags, vec!["food", "weekly"]);
        assert!(storage
            .catalog
            .find_account("market", AccountType::Expense)
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_import_yaml_reuses_accounts() {
        let (temp_dir, storage) = create_test_storage();
        let path = temp_dir.path().join("journals.yaml");
        std::fs::write(
            &path,
            "- date: 2025-02-01\n  description: Coffee\n  amount: \"-3.20\"\n  source: Checking\n  destination: Cafe\n\
             - date: 2025-02-02\n  description: Coffee\n  amount: \"-3.40\"\n  source: checking\n  destination: Cafe\n",
        )
        .unwrap();

        let result = JournalService::new(&storage).import(&path).unwrap();
        assert_eq!(result.imported, 2);

        let journals = storage.journals.get_all().unwrap();
        assert_eq!(journals[0].source.id, journals[1].source.id);
        assert_eq!(journals[0].currency_code, "EUR");
    }

    #[test]
    fn test_list_and_find() {
        let (temp_dir, storage) = create_test_storage();
        let path = temp_dir.path().join("journals.json");
        std::fs::write(
            &path,
            r#"[{"date":"2025-03-01","description":"Rent","amount":"-900","source":"Checking","destination":"Landlord"},
                {"date":"2025-03-05","description":"Books","amount":"-20","source":"Checking","destination":"Shop"}]"#,
        )
        .unwrap();

        let service = JournalService::new(&storage).with_currency("USD");
        service.import(&path).unwrap();

        let latest = service.list(&JournalQuery::new(), Some(1)).unwrap();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].description, "Books");
        assert_eq!(latest[0].currency_code, "USD");

        let short = latest[0].id.to_string();
        let found = service.find(&short).unwrap().unwrap();
        assert_eq!(found.id, latest[0].id);
        assert!(service.find("jrn-00000000").unwrap().is_none());
    }
}
