//! Configuration module for Rulebook
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::RulebookPaths;
pub use settings::{MatcherSettings, Settings};
