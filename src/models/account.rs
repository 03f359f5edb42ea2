//! Account references
//!
//! Journals point at a source and a destination account. The engine treats
//! accounts as opaque references: only the name and the type matter to
//! triggers and actions.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::AccountId;

/// Type of account on either side of a journal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Checking, savings, cash and other accounts the user owns
    #[default]
    Asset,
    /// Where money goes (shops, landlords)
    Expense,
    /// Where money comes from (employers)
    Revenue,
    /// Loans, mortgages, credit lines
    Liability,
    /// Counterpart of opening balances
    InitialBalance,
    /// Counterpart of reconciliation corrections
    Reconciliation,
}

impl AccountType {
    /// Parse account type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "asset" | "default" => Some(Self::Asset),
            "expense" | "beneficiary" => Some(Self::Expense),
            "revenue" => Some(Self::Revenue),
            "liability" | "loan" | "debt" | "mortgage" => Some(Self::Liability),
            "initial_balance" => Some(Self::InitialBalance),
            "reconciliation" => Some(Self::Reconciliation),
            _ => None,
        }
    }

    /// Accounts the user holds money in
    pub fn is_own(&self) -> bool {
        matches!(self, Self::Asset | Self::Liability)
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asset => write!(f, "Asset"),
            Self::Expense => write!(f, "Expense"),
            Self::Revenue => write!(f, "Revenue"),
            Self::Liability => write!(f, "Liability"),
            Self::InitialBalance => write!(f, "Initial balance"),
            Self::Reconciliation => write!(f, "Reconciliation"),
        }
    }
}

/// Reference to an account as seen from a journal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRef {
    pub id: AccountId,

    pub name: String,

    #[serde(rename = "type", default)]
    pub account_type: AccountType,
}

impl AccountRef {
    pub fn new(name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            id: AccountId::new(),
            name: name.into(),
            account_type,
        }
    }

    /// Normalize an account name for lookups (trimmed, lowercase)
    pub fn normalize_name(name: &str) -> String {
        name.trim().to_lowercase()
    }

    /// Check whether this reference names the given account
    pub fn is_named(&self, name: &str) -> bool {
        Self::normalize_name(&self.name) == Self::normalize_name(name)
    }
}

impl fmt::Display for AccountRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.account_type)
    }
}
