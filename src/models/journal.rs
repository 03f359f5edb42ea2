//! Transaction journal model
//!
//! A journal is one recorded economic event. This is the "journal array"
//! shape the rule engine evaluates triggers against and mutates through
//! actions: flat fields, names instead of foreign keys.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::account::AccountRef;
use super::ids::JournalId;
use super::money::Amount;

/// Type of a journal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Money leaves an asset account to an expense account
    #[default]
    Withdrawal,
    /// Money arrives in an asset account from a revenue account
    Deposit,
    /// Money moves between two of the user's own accounts
    Transfer,
    /// Initial balance of an account
    OpeningBalance,
    /// Correction made while reconciling an account
    Reconciliation,
}

impl TransactionType {
    /// Parse a transaction type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(' ', "_").as_str() {
            "withdrawal" => Some(Self::Withdrawal),
            "deposit" => Some(Self::Deposit),
            "transfer" => Some(Self::Transfer),
            "opening_balance" => Some(Self::OpeningBalance),
            "reconciliation" => Some(Self::Reconciliation),
            _ => None,
        }
    }

    /// Machine name as used in rule values
    pub fn key(&self) -> &'static str {
        match self {
            Self::Withdrawal => "withdrawal",
            Self::Deposit => "deposit",
            Self::Transfer => "transfer",
            Self::OpeningBalance => "opening_balance",
            Self::Reconciliation => "reconciliation",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Withdrawal => write!(f, "Withdrawal"),
            Self::Deposit => write!(f, "Deposit"),
            Self::Transfer => write!(f, "Transfer"),
            Self::OpeningBalance => write!(f, "Opening balance"),
            Self::Reconciliation => write!(f, "Reconciliation"),
        }
    }
}

/// A single financial transaction journal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionJournal {
    /// Unique identifier
    pub id: JournalId,

    #[serde(rename = "type", default)]
    pub transaction_type: TransactionType,

    pub date: NaiveDate,

    #[serde(default)]
    pub description: String,

    /// Signed amount (negative for withdrawals, positive for deposits)
    pub amount: Amount,

    #[serde(default = "default_currency_code")]
    pub currency_code: String,

    pub source: AccountRef,

    pub destination: AccountRef,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub budget: Option<String>,

    #[serde(default)]
    pub bill: Option<String>,

    /// Tags, unique and in insertion order
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub attachment_count: u32,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

fn default_currency_code() -> String {
    "EUR".to_string()
}

impl TransactionJournal {
    /// Create a withdrawal from an asset account to an expense account
    pub fn withdrawal(
        date: NaiveDate,
        description: impl Into<String>,
        amount: Amount,
        source: AccountRef,
        destination: AccountRef,
    ) -> Self {
        Self::new(
            TransactionType::Withdrawal,
            date,
            description,
            -amount.abs(),
            source,
            destination,
        )
    }

    /// Create a deposit from a revenue account into an asset account
    pub fn deposit(
        date: NaiveDate,
        description: impl Into<String>,
        amount: Amount,
        source: AccountRef,
        destination: AccountRef,
    ) -> Self {
        Self::new(TransactionType::Deposit, date, description, amount.abs(), source, destination)
    }

    /// Create a journal with all required fields
    pub fn new(
        transaction_type: TransactionType,
        date: NaiveDate,
        description: impl Into<String>,
        amount: Amount,
        source: AccountRef,
        destination: AccountRef,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: JournalId::new(),
            transaction_type,
            date,
            description: description.into(),
            amount,
            currency_code: default_currency_code(),
            source,
            destination,
            category: None,
            budget: None,
            bill: None,
            tags: Vec::new(),
            notes: None,
            attachment_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether the journal carries a tag (case-insensitive)
    pub fn has_tag(&self, tag: &str) -> bool {
        let needle = tag.trim().to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == needle)
    }

    /// Add a tag unless it is already present. Returns true if added.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.has_tag(tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        self.touch();
        true
    }

    /// Remove a tag if present. Returns true if removed.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let needle = tag.trim().to_lowercase();
        let before = self.tags.len();
        self.tags.retain(|t| t.to_lowercase() != needle);
        let removed = self.tags.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    /// Notes text, empty when absent
    pub fn notes_text(&self) -> &str {
        self.notes.as_deref().unwrap_or("")
    }

    /// Check if the journal touches any of the given accounts
    pub fn touches_account(&self, name_or_id: &str) -> bool {
        let matches = |account: &AccountRef| {
            account.is_named(name_or_id)
                || name_or_id
                    .parse::<super::ids::AccountId>()
                    .map(|id| id == account.id)
                    .unwrap_or(false)
        };
        matches(&self.source) || matches(&self.destination)
    }

    /// Mark the journal as modified now
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl fmt::Display for TransactionJournal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.description,
            self.amount
        )
    }
}
