//! Rule trigger model
//!
//! A trigger is a predicate tested against a journal. The evaluation itself
//! lives in `rules::triggers`; this module only describes configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

define_kinds!(TriggerKind {
    UserAction => "user_action", true, "Gate: store-journal or update-journal";
    FromAccountStarts => "from_account_starts", true, "Source account name starts with";
    FromAccountEnds => "from_account_ends", true, "Source account name ends with";
    FromAccountIs => "from_account_is", true, "Source account name is";
    FromAccountContains => "from_account_contains", true, "Source account name contains";
    ToAccountStarts => "to_account_starts", true, "Destination account name starts with";
    ToAccountEnds => "to_account_ends", true, "Destination account name ends with";
    ToAccountIs => "to_account_is", true, "Destination account name is";
    ToAccountContains => "to_account_contains", true, "Destination account name contains";
    AmountLess => "amount_less", true, "Amount is less than";
    AmountExactly => "amount_exactly", true, "Amount is exactly";
    AmountMore => "amount_more", true, "Amount is more than";
    DescriptionStarts => "description_starts", true, "Description starts with";
    DescriptionEnds => "description_ends", true, "Description ends with";
    DescriptionContains => "description_contains", true, "Description contains";
    DescriptionIs => "description_is", true, "Description is";
    DescriptionMatches => "description_matches", true, "Description matches regular expression";
    TransactionType => "transaction_type", true, "Transaction is of type";
    CategoryIs => "category_is", true, "Category is";
    BudgetIs => "budget_is", true, "Budget is";
    TagIs => "tag_is", true, "Has tag";
    CurrencyIs => "currency_is", true, "Currency code is";
    BillIs => "bill_is", true, "Linked to bill";
    HasAttachments => "has_attachments", true, "Has at least this many attachments";
    HasNoCategory => "has_no_category", false, "Has no category";
    HasAnyCategory => "has_any_category", false, "Has a category";
    HasNoBudget => "has_no_budget", false, "Has no budget";
    HasAnyBudget => "has_any_budget", false, "Has a budget";
    HasNoTag => "has_no_tag", false, "Has no tags";
    HasAnyTag => "has_any_tag", false, "Has at least one tag";
    HasAnyBill => "has_any_bill", false, "Linked to any bill";
    NotesContain => "notes_contain", true, "Notes contain";
    NotesStart => "notes_start", true, "Notes start with";
    NotesEnd => "notes_end", true, "Notes end with";
    NotesAre => "notes_are", true, "Notes are exactly";
    NoNotes => "no_notes", false, "Has no notes";
    AnyNotes => "any_notes", false, "Has notes";
    DateIs => "date_is", true, "Date is (YYYY-MM-DD)";
    DateBefore => "date_before", true, "Date is before (YYYY-MM-DD)";
    DateAfter => "date_after", true, "Date is after (YYYY-MM-DD)";
});

/// Which kind of journal event a run handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    /// A journal was just created
    #[default]
    Store,
    /// An existing journal was edited
    Update,
}

impl TriggerMode {
    /// The `user_action` value that selects this mode
    pub fn user_action(&self) -> &'static str {
        match self {
            Self::Store => "store-journal",
            Self::Update => "update-journal",
        }
    }

    /// Parse a mode from a CLI value or a `user_action` value
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "store" | "store-journal" => Some(Self::Store),
            "update" | "update-journal" => Some(Self::Update),
            _ => None,
        }
    }
}

impl fmt::Display for TriggerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store => write!(f, "store"),
            Self::Update => write!(f, "update"),
        }
    }
}

/// A trigger attached to a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTrigger {
    #[serde(rename = "type")]
    pub kind: TriggerKind,

    /// Comparison value, interpreted per kind
    #[serde(default)]
    pub value: String,

    /// Evaluation order within the rule (ascending)
    #[serde(default)]
    pub order: u32,

    #[serde(default = "default_true")]
    pub active: bool,

    /// Kept for rule files; ALL still checks every later trigger
    #[serde(default)]
    pub stop_processing: bool,

    /// Invert the comparison result
    #[serde(default)]
    pub prohibited: bool,
}

fn default_true() -> bool {
    true
}

impl RuleTrigger {
    pub fn new(kind: TriggerKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            order: 0,
            active: true,
            stop_processing: false,
            prohibited: false,
        }
    }

    pub fn prohibited(mut self) -> Self {
        self.prohibited = true;
        self
    }

    pub fn stopping(mut self) -> Self {
        self.stop_processing = true;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Whether this is the store/update gate rather than a predicate
    pub fn is_gate(&self) -> bool {
        self.kind == TriggerKind::UserAction
    }
}

impl fmt::Display for RuleTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.prohibited { "!" } else { "" };
        if self.kind.needs_value() {
            write!(f, "{}{}:\"{}\"", prefix, self.kind, self.value)
        } else {
            write!(f, "{}{}", prefix, self.kind)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_kind_table_round_trip() {
        for kind in TriggerKind::ALL {
            assert_eq!(TriggerKind::from_str(kind.key()).unwrap(), *kind);
        }
        assert_eq!(TriggerKind::ALL.len(), 40);
    }

    #[test]
    fn test_kind_from_str_is_lenient() {
        assert_eq!(
            TriggerKind::from_str("Amount-More").unwrap(),
            TriggerKind::AmountMore
        );
        assert!(TriggerKind::from_str("amount_huge").unwrap_err().is_not_found());
    }

    #[test]
    fn test_deserialize_defaults() {
        let trigger: RuleTrigger =
            serde_json::from_str(r#"{"type": "description_contains", "value": "Market"}"#).unwrap();
        assert_eq!(trigger.kind, TriggerKind::DescriptionContains);
        assert!(trigger.active);
        assert!(!trigger.prohibited);
        assert!(!trigger.stop_processing);
    }

    #[test]
    fn test_display() {
        let trigger = RuleTrigger::new(TriggerKind::AmountMore, "10").prohibited();
        assert_eq!(trigger.to_string(), "!amount_more:\"10\"");
        assert_eq!(
            RuleTrigger::new(TriggerKind::HasNoCategory, "").to_string(),
            "has_no_category"
        );
    }

    #[test]
    fn test_trigger_mode_parse() {
        assert_eq!(TriggerMode::parse("store-journal"), Some(TriggerMode::Store));
        assert_eq!(TriggerMode::parse("UPDATE"), Some(TriggerMode::Update));
        assert_eq!(TriggerMode::parse("delete"), None);
        assert_eq!(TriggerMode::Update.user_action(), "update-journal");
    }
}
