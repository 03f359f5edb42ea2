//! Rule and rule group models
//!
//! Rules and groups are stored flat (each rule names its group). `RuleBook`
//! is the on-disk shape; `rules::RuleSet` arranges it for evaluation.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::action::RuleAction;
use super::ids::{RuleGroupId, RuleId};
use super::trigger::{RuleTrigger, TriggerMode};

/// How a rule combines its triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Every active trigger must match
    #[default]
    All,
    /// One matching active trigger is enough
    Any,
}

impl fmt::Display for Strictness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "ALL"),
            Self::Any => write!(f, "ANY"),
        }
    }
}

/// A named bundle of triggers and actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,

    pub group_id: RuleGroupId,

    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Position within the group (ascending)
    #[serde(default)]
    pub order: u32,

    #[serde(default)]
    pub strictness: Strictness,

    #[serde(default = "default_true")]
    pub active: bool,

    /// Stop evaluating further rules for a journal once this rule fires
    #[serde(default)]
    pub stop_processing: bool,

    #[serde(default)]
    pub triggers: Vec<RuleTrigger>,

    #[serde(default)]
    pub actions: Vec<RuleAction>,
}

fn default_true() -> bool {
    true
}

impl Rule {
    pub fn new(group_id: RuleGroupId, title: impl Into<String>) -> Self {
        Self {
            id: RuleId::new(),
            group_id,
            title: title.into(),
            description: String::new(),
            order: 0,
            strictness: Strictness::All,
            active: true,
            stop_processing: false,
            triggers: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    pub fn stopping(mut self) -> Self {
        self.stop_processing = true;
        self
    }

    /// Append a trigger, ordered after the existing ones
    pub fn with_trigger(mut self, mut trigger: RuleTrigger) -> Self {
        trigger.order = next_order(self.triggers.iter().map(|t| t.order));
        self.triggers.push(trigger);
        self
    }

    /// Append an action, ordered after the existing ones
    pub fn with_action(mut self, mut action: RuleAction) -> Self {
        action.order = next_order(self.actions.iter().map(|a| a.order));
        self.actions.push(action);
        self
    }

    /// Triggers in evaluation order (stable for equal `order`)
    pub fn ordered_triggers(&self) -> Vec<&RuleTrigger> {
        let mut triggers: Vec<_> = self.triggers.iter().collect();
        triggers.sort_by_key(|t| t.order);
        triggers
    }

    /// Actions in execution order (stable for equal `order`)
    pub fn ordered_actions(&self) -> Vec<&RuleAction> {
        let mut actions: Vec<_> = self.actions.iter().collect();
        actions.sort_by_key(|a| a.order);
        actions
    }

    /// Whether the rule takes part in runs of the given mode.
    ///
    /// Rules without an active `user_action` trigger run in both modes.
    pub fn applies_in(&self, mode: TriggerMode) -> bool {
        let gates: Vec<_> = self
            .triggers
            .iter()
            .filter(|t| t.active && t.is_gate())
            .collect();
        if gates.is_empty() {
            return true;
        }
        gates
            .iter()
            .any(|t| TriggerMode::parse(&t.value) == Some(mode))
    }
}

fn next_order(existing: impl Iterator<Item = u32>) -> u32 {
    existing.max().map_or(1, |max| max + 1)
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} \"{}\"", self.id, self.title)
    }
}

/// An ordered, toggleable container of rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleGroup {
    pub id: RuleGroupId,

    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub order: u32,

    #[serde(default = "default_true")]
    pub active: bool,

    /// Skip later groups once any rule in this group fired
    #[serde(default)]
    pub stop_processing: bool,
}

impl RuleGroup {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: RuleGroupId::new(),
            title: title.into(),
            description: String::new(),
            order: 0,
            active: true,
            stop_processing: false,
        }
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    pub fn stopping(mut self) -> Self {
        self.stop_processing = true;
        self
    }
}

/// On-disk rule configuration: groups and rules, stored flat
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleBook {
    #[serde(default)]
    pub groups: Vec<RuleGroup>,

    #[serde(default)]
    pub rules: Vec<Rule>,
}
