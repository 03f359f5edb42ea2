//! Audit entry data structures
//!
//! One entry per journal mutation made by a rule action.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ActionKind;

/// What an action did to its journal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// A field of the journal was changed
    Update,
    /// The journal was deleted
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// A single audit log entry
///
/// Attributes one journal mutation to the rule and action that caused it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the action ran (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub journal_id: String,

    /// Journal description at the time of the action
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal_description: Option<String>,

    pub rule_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_title: Option<String>,

    pub action: ActionKind,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,

    /// State before the action (changed field, or the whole journal on delete)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Human-readable diff summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    /// Create an entry for an action that changed a journal
    #[allow(clippy::too_many_arguments)]
    pub fn update<T: Serialize>(
        journal_id: impl Into<String>,
        journal_description: Option<String>,
        rule_id: impl Into<String>,
        action: ActionKind,
        value: impl Into<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Update,
            journal_id: journal_id.into(),
            journal_description,
            rule_id: rule_id.into(),
            rule_title: None,
            action,
            value: value.into(),
            before: serde_json::to_value(before).ok(),
            after: serde_json::to_value(after).ok(),
            diff_summary,
        }
    }

    /// Create an entry for an action that deleted a journal
    pub fn delete<T: Serialize>(
        journal_id: impl Into<String>,
        journal_description: Option<String>,
        rule_id: impl Into<String>,
        journal: &T,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Delete,
            journal_id: journal_id.into(),
            journal_description,
            rule_id: rule_id.into(),
            rule_title: None,
            action: ActionKind::DeleteTransaction,
            value: String::new(),
            before: serde_json::to_value(journal).ok(),
            after: None,
            diff_summary: None,
        }
    }

    pub fn with_rule_title(mut self, title: impl Into<String>) -> Self {
        self.rule_title = Some(title.into());
        self
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} journal {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.journal_id
        );

        if let Some(description) = &self.journal_description {
            output.push_str(&format!(" ({})", description));
        }

        output.push_str(&format!(" by rule {}", self.rule_id));
        if let Some(title) = &self.rule_title {
            output.push_str(&format!(" ({})", title));
        }

        output.push_str(&format!("\n  Action: {}", self.action));
        if !self.value.is_empty() {
            output.push_str(&format!(" \"{}\"", self.value));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}
