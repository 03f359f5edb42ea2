//! Core data models for Rulebook
//!
//! This module contains the data structures the rule engine works on:
//! journals and the accounts they reference, plus rule configuration
//! (groups, rules, triggers and actions).

/// Generates a kind enum together with its registered-kind table.
///
/// Each entry maps a variant to its stable key (used in rule files and on
/// the command line), whether it takes a value, and a short description.
macro_rules! define_kinds {
    ($name:ident { $( $variant:ident => $key:literal, $needs_value:literal, $doc:literal; )* }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[doc = $doc]
                #[serde(rename = $key)]
                $variant,
            )*
        }

        impl $name {
            /// Every registered kind, in table order
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];

            /// Stable key used in rule files
            pub fn key(&self) -> &'static str {
                match self {
                    $(Self::$variant => $key,)*
                }
            }

            /// Whether the kind reads its value
            pub fn needs_value(&self) -> bool {
                match self {
                    $(Self::$variant => $needs_value,)*
                }
            }

            pub fn description(&self) -> &'static str {
                match self {
                    $(Self::$variant => $doc,)*
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.key())
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::error::RulesError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim().to_lowercase().replace('-', "_");
                Self::ALL
                    .iter()
                    .copied()
                    .find(|kind| kind.key() == needle)
                    .ok_or_else(|| crate::error::RulesError::NotFound {
                        entity_type: stringify!($name),
                        identifier: s.to_string(),
                    })
            }
        }
    };
}

pub mod account;
pub mod action;
pub mod ids;
pub mod journal;
pub mod money;
pub mod rule;
pub mod trigger;

pub use account::{AccountRef, AccountType};
pub use action::{ActionKind, RuleAction};
pub use ids::{AccountId, JournalId, RuleGroupId, RuleId};
pub use journal::{TransactionJournal, TransactionType};
pub use money::Amount;
pub use rule::{Rule, RuleBook, RuleGroup, Strictness};
pub use trigger::{RuleTrigger, TriggerKind, TriggerMode};
