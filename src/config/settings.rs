//! User settings for Rulebook
//!
//! Manages preferences for rule runs: the default trigger mode, matcher
//! limits, log level and whether the audit log is written.

use serde::{Deserialize, Serialize};

use super::paths::RulebookPaths;
use crate::error::RulesError;
use crate::models::TriggerMode;
use crate::rules::matcher::{
    MatchParams, DEFAULT_PAGE_SIZE, DEFAULT_SEARCH_LIMIT, DEFAULT_TRIGGER_LIMIT, MAX_LIMIT,
};

/// Limits applied to `rulebook test` scans
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatcherSettings {
    /// Candidates examined when no limit is given
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Matches returned when no limit is given
    #[serde(default = "default_trigger_limit")]
    pub trigger_limit: usize,

    /// Upper bound for both limits
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,

    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

fn default_trigger_limit() -> usize {
    DEFAULT_TRIGGER_LIMIT
}

fn default_max_limit() -> usize {
    MAX_LIMIT
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for MatcherSettings {
    fn default() -> Self {
        Self {
            search_limit: default_search_limit(),
            trigger_limit: default_trigger_limit(),
            max_limit: default_max_limit(),
            page_size: default_page_size(),
        }
    }
}

impl MatcherSettings {
    /// Matcher parameters with any explicit limits overriding the defaults
    pub fn params(&self, search_limit: Option<usize>, trigger_limit: Option<usize>) -> MatchParams {
        MatchParams::default().with_limits(
            search_limit.unwrap_or(self.search_limit),
            trigger_limit.unwrap_or(self.trigger_limit),
        )
    }
}

/// User settings for Rulebook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Mode used by `rulebook apply` when `--mode` is not given
    #[serde(default)]
    pub default_mode: TriggerMode,

    #[serde(default)]
    pub matcher: MatcherSettings,

    /// Default log filter, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether rule changes are written to the audit log
    #[serde(default = "default_true")]
    pub audit_enabled: bool,

    /// Default currency code for imported journals
    #[serde(default = "default_currency")]
    pub currency_code: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_currency() -> String {
    "EUR".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_mode: TriggerMode::default(),
            matcher: MatcherSettings::default(),
            log_level: default_log_level(),
            audit_enabled: true,
            currency_code: default_currency(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &RulebookPaths) -> Result<Self, RulesError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| RulesError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                RulesError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &RulebookPaths) -> Result<(), RulesError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| RulesError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| RulesError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Update one setting from its key and a string value
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), RulesError> {
        let parse_limit = |value: &str| {
            value
                .trim()
                .parse::<usize>()
                .map_err(|_| RulesError::Validation(format!("Invalid number: {}", value)))
        };

        match key {
            "default_mode" => {
                self.default_mode = TriggerMode::parse(value).ok_or_else(|| {
                    RulesError::Validation(format!("Unknown mode: {} (use store or update)", value))
                })?;
            }
            "log_level" => self.log_level = value.trim().to_string(),
            "audit_enabled" => {
                self.audit_enabled = value.trim().parse().map_err(|_| {
                    RulesError::Validation(format!("Expected true or false: {}", value))
                })?;
            }
            "currency_code" => self.currency_code = value.trim().to_uppercase(),
            "matcher.search_limit" => self.matcher.search_limit = parse_limit(value)?,
            "matcher.trigger_limit" => self.matcher.trigger_limit = parse_limit(value)?,
            "matcher.max_limit" => self.matcher.max_limit = parse_limit(value)?,
            "matcher.page_size" => self.matcher.page_size = parse_limit(value)?,
            _ => {
                return Err(RulesError::Config(format!("Unknown setting: {}", key)));
            }
        }
        Ok(())
    }
}
