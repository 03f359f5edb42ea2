//! Rulebook - transaction rule engine
//!
//! This library evaluates user-defined rules against transaction journals.
//! A rule holds triggers (conditions on a journal's fields) and actions
//! (edits applied when the triggers match). Rules live in ordered groups,
//! and a run walks every journal through every applicable rule.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Journals, triggers, actions, rules and rule groups
//! - `rules`: Trigger evaluation, action execution, the engine and the matcher
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `audit`: Audit logging of rule changes
//! - `display` / `export`: Terminal and CSV output
//!
//! # Example
//!
//! ```rust,ignore
//! use rulebook::config::paths::RulebookPaths;
//! use rulebook::services::{ApplyOptions, RuleService};
//! use rulebook::storage::Storage;
//!
//! let mut storage = Storage::new(RulebookPaths::new()?)?;
//! storage.load_all()?;
//! let report = RuleService::new(&storage).apply(ApplyOptions::default())?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod rules;
pub mod services;
pub mod storage;

pub use error::{RulesError, RulesResult};
