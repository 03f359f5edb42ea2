//! Ordered rule configuration
//!
//! `RuleSet` turns the flat `RuleBook` into groups ordered by priority, each
//! holding its rules in order. Ties keep file order.

use std::collections::HashMap;

use tracing::warn;

use crate::models::{Rule, RuleBook, RuleGroup, RuleGroupId, RuleId};

/// A group together with its ordered rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRules {
    pub group: RuleGroup,
    pub rules: Vec<Rule>,
}

/// Rules arranged for evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    groups: Vec<GroupRules>,
    /// Rules whose group does not exist
    orphans: Vec<Rule>,
}

impl RuleSet {
    pub fn from_book(book: RuleBook) -> Self {
        let mut groups: Vec<GroupRules> = book
            .groups
            .into_iter()
            .map(|group| GroupRules {
                group,
                rules: Vec::new(),
            })
            .collect();
        groups.sort_by_key(|g| g.group.order);

        let index: HashMap<RuleGroupId, usize> = groups
            .iter()
            .enumerate()
            .map(|(i, g)| (g.group.id, i))
            .collect();

        let mut orphans = Vec::new();
        for rule in book.rules {
            match index.get(&rule.group_id) {
                Some(&i) => groups[i].rules.push(rule),
                None => {
                    warn!(rule = %rule, group = %rule.group_id, "Rule references a missing group");
                    orphans.push(rule);
                }
            }
        }
        for group in &mut groups {
            group.rules.sort_by_key(|r| r.order);
        }

        Self { groups, orphans }
    }

    /// Every group in evaluation order, active or not
    pub fn groups(&self) -> &[GroupRules] {
        &self.groups
    }

    pub fn orphans(&self) -> &[Rule] {
        &self.orphans
    }

    /// All rules that belong to a group, in evaluation order
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.groups.iter().flat_map(|g| g.rules.iter())
    }

    pub fn find_rule(&self, id: RuleId) -> Option<&Rule> {
        self.rules().find(|r| r.id == id)
    }

    /// Find a rule by id, short id (`rul-1a2b3c4d`) or case-insensitive title
    pub fn lookup(&self, needle: &str) -> Option<&Rule> {
        if let Ok(id) = needle.parse::<RuleId>() {
            return self.find_rule(id);
        }
        let needle = needle.trim().to_lowercase();
        self.rules()
            .find(|r| r.id.to_string() == needle)
            .or_else(|| self.rules().find(|r| r.title.to_lowercase() == needle))
    }

    pub fn contains(&self, id: RuleId) -> bool {
        self.find_rule(id).is_some()
    }

    pub fn group(&self, id: RuleGroupId) -> Option<&RuleGroup> {
        self.groups.iter().map(|g| &g.group).find(|g| g.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.rules.is_empty())
    }
}
