//! Storage initialization
//!
//! Handles first-run setup and default data creation

use crate::config::paths::RulebookPaths;
use crate::error::RulesError;
use crate::models::{RuleBook, RuleGroup};

use super::catalog::CatalogData;
use super::file_io::write_json_atomic;

/// Initialize storage for a fresh installation
///
/// Creates an empty default rule group and an empty catalog
pub fn initialize_storage(paths: &RulebookPaths) -> Result<(), RulesError> {
    paths.ensure_directories()?;

    if !paths.rules_file().exists() {
        let book = RuleBook {
            groups: vec![RuleGroup::new("Default rules").with_order(1)],
            rules: Vec::new(),
        };
        write_json_atomic(paths.rules_file(), &book)?;
    }

    if !paths.catalog_file().exists() {
        write_json_atomic(paths.catalog_file(), &CatalogData::default())?;
    }

    Ok(())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &RulebookPaths) -> bool {
    !paths.rules_file().exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_storage() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RulebookPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(needs_initialization(&paths));

        initialize_storage(&paths).unwrap();

        assert!(!needs_initialization(&paths));
        assert!(paths.catalog_file().exists());

        let content = std::fs::read_to_string(paths.rules_file()).unwrap();
        let book: RuleBook = serde_json::from_str(&content).unwrap();
        assert_eq!(book.groups.len(), 1);
        assert!(book.rules.is_empty());
    }

    #[test]
    fn test_doesnt_overwrite_existing() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RulebookPaths::with_base_dir(temp_dir.path().to_path_buf());

        initialize_storage(&paths).unwrap();

        let custom = RuleBook {
            groups: vec![RuleGroup::new("Custom"), RuleGroup::new("Other")],
            rules: vec![],
        };
        write_json_atomic(paths.rules_file(), &custom).unwrap();

        initialize_storage(&paths).unwrap();

        let content = std::fs::read_to_string(paths.rules_file()).unwrap();
        let book: RuleBook = serde_json::from_str(&content).unwrap();
        assert_eq!(book.groups.len(), 2);
        assert_eq!(book.groups[0].title, "Custom");
    }
}
