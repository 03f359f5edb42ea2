//! Path management for Rulebook
//!
//! Provides XDG-compliant path resolution for configuration, data and the
//! audit log.
//!
//! ## Path Resolution Order
//!
//! 1. `RULEBOOK_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/rulebook` or `~/.config/rulebook`
//! 3. Windows: `%APPDATA%\rulebook`

use std::path::PathBuf;

use crate::error::RulesError;

/// Manages all paths used by Rulebook
#[derive(Debug, Clone)]
pub struct RulebookPaths {
    /// Base directory for all Rulebook data
    base_dir: PathBuf,
}

impl RulebookPaths {
    /// Create a new RulebookPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, RulesError> {
        let base_dir = if let Ok(custom) = std::env::var("RULEBOOK_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create RulebookPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/rulebook/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/rulebook/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to journals.json
    pub fn journals_file(&self) -> PathBuf {
        self.data_dir().join("journals.json")
    }

    /// Get the path to rules.json (groups and rules)
    pub fn rules_file(&self) -> PathBuf {
        self.data_dir().join("rules.json")
    }

    /// Get the path to catalog.json (accounts, categories, budgets, bills)
    pub fn catalog_file(&self) -> PathBuf {
        self.data_dir().join("catalog.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), RulesError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| RulesError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| RulesError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if Rulebook has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, RulesError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = std::env::var("HOME")
                .map_err(|_| RulesError::Config("HOME environment variable not set".into()))?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("rulebook"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, RulesError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| RulesError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("rulebook"))
}
