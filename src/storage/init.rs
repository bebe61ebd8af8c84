//! Storage initialization
//!
//! Handles first-run setup and default data creation

use crate::config::paths::KnotbookPaths;
use crate::error::KnotbookError;
use crate::models::DefaultCategory;

use super::categories::CategoryData;
use super::file_io::write_json_atomic;

/// Initialize storage for a fresh installation
///
/// Creates directories and the default wedding categories
pub fn initialize_storage(paths: &KnotbookPaths) -> Result<(), KnotbookError> {
    // Ensure all directories exist
    paths.ensure_directories()?;

    // Create default categories if categories.json doesn't exist
    if !paths.categories_file().exists() {
        create_default_categories(paths)?;
    }

    Ok(())
}

/// Create the default wedding categories
fn create_default_categories(paths: &KnotbookPaths) -> Result<(), KnotbookError> {
    let categories = DefaultCategory::all()
        .iter()
        .enumerate()
        .map(|(i, default)| default.to_category(i as i32))
        .collect();

    let data = CategoryData { categories };
    write_json_atomic(paths.categories_file(), &data)?;

    Ok(())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &KnotbookPaths) -> bool {
    !paths.categories_file().exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_storage() {
        let temp_dir = TempDir::new().unwrap();
        let paths = KnotbookPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(needs_initialization(&paths));

        initialize_storage(&paths).unwrap();

        assert!(!needs_initialization(&paths));
        assert!(paths.categories_file().exists());
        assert!(paths.data_dir().exists());
    }

    #[test]
    fn test_default_categories_created() {
        let temp_dir = TempDir::new().unwrap();
        let paths = KnotbookPaths::with_base_dir(temp_dir.path().to_path_buf());

        initialize_storage(&paths).unwrap();

        // Load and verify
        let content = std::fs::read_to_string(paths.categories_file()).unwrap();
        let data: CategoryData = serde_json::from_str(&content).unwrap();

        assert_eq!(data.categories.len(), DefaultCategory::all().len());

        let names: Vec<_> = data.categories.iter().map(|c| c.name.as_str()).collect();
        assert!(names.contains(&"Venue"));
        assert!(names.contains(&"Catering"));
        assert!(names.contains(&"Photography"));
    }

    #[test]
    fn test_doesnt_overwrite_existing() {
        let temp_dir = TempDir::new().unwrap();
        let paths = KnotbookPaths::with_base_dir(temp_dir.path().to_path_buf());

        // First initialization
        initialize_storage(&paths).unwrap();

        // Modify the file
        let custom_data = CategoryData {
            categories: vec![Category::new("Custom Category")],
        };
        write_json_atomic(paths.categories_file(), &custom_data).unwrap();

        // Second initialization should not overwrite
        initialize_storage(&paths).unwrap();

        let content = std::fs::read_to_string(paths.categories_file()).unwrap();
        let data: CategoryData = serde_json::from_str(&content).unwrap();

        // Should still have our custom data
        assert_eq!(data.categories.len(), 1);
        assert_eq!(data.categories[0].name, "Custom Category");
    }
}
