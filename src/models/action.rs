//! Rule action model
//!
//! An action is a mutation applied to a journal when its rule matches.
//! Execution lives in `rules::actions`.

use serde::{Deserialize, Serialize};
use std::fmt;

define_kinds!(ActionKind {
    SetCategory => "set_category", true, "Set category";
    ClearCategory => "clear_category", false, "Clear category";
    SetBudget => "set_budget", true, "Set budget";
    ClearBudget => "clear_budget", false, "Clear budget";
    AddTag => "add_tag", true, "Add tag";
    RemoveTag => "remove_tag", true, "Remove tag";
    RemoveAllTags => "remove_all_tags", false, "Remove all tags";
    SetDescription => "set_description", true, "Set description";
    AppendDescription => "append_description", true, "Append to description";
    PrependDescription => "prepend_description", true, "Prepend to description";
    SetNotes => "set_notes", true, "Set notes";
    AppendNotes => "append_notes", true, "Append to notes";
    PrependNotes => "prepend_notes", true, "Prepend to notes";
    ClearNotes => "clear_notes", false, "Remove notes";
    SetSourceAccount => "set_source_account", true, "Set source account";
    SetDestinationAccount => "set_destination_account", true, "Set destination account";
    ConvertToWithdrawal => "convert_to_withdrawal", true, "Convert to withdrawal (value: expense account)";
    ConvertToDeposit => "convert_to_deposit", true, "Convert to deposit (value: revenue account)";
    ConvertToTransfer => "convert_to_transfer", true, "Convert to transfer (value: asset account)";
    LinkToBill => "link_to_bill", true, "Link to bill";
    DeleteTransaction => "delete_transaction", false, "Delete transaction";
});

impl ActionKind {
    /// Terminal kinds skip the rest of the rule's actions whatever the outcome
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::DeleteTransaction)
    }
}

/// An action attached to a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleAction {
    #[serde(rename = "type")]
    pub kind: ActionKind,

    #[serde(default)]
    pub value: String,

    /// Execution order within the rule (ascending)
    #[serde(default)]
    pub order: u32,

    #[serde(default = "default_true")]
    pub active: bool,

    /// On success, skip the remaining actions and rules for this journal
    #[serde(default)]
    pub stop_processing: bool,
}

fn default_true() -> bool {
    true
}

impl RuleAction {
    pub fn new(kind: ActionKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            order: 0,
            active: true,
            stop_processing: false,
        }
    }

    pub fn stopping(mut self) -> Self {
        self.stop_processing = true;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

impl fmt::Display for RuleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind.needs_value() {
            write!(f, "{}:\"{}\"", self.kind, self.value)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}
