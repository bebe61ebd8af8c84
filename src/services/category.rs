//! Category service
//!
//! Provides business logic for category management. Categories are only
//! weakly referenced by costs, so deletion is refused while any cost still
//! points at the category.

use crate::audit::EntityType;
use crate::error::{KnotbookError, KnotbookResult};
use crate::models::{Category, CategoryId};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new category
    pub fn create(&self, name: &str) -> KnotbookResult<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(KnotbookError::Validation(
                "Category name cannot be empty".into(),
            ));
        }

        // Check for duplicate name
        if self.storage.categories.get_by_name(name)?.is_some() {
            return Err(KnotbookError::Duplicate {
                entity_type: "Category",
                identifier: name.to_string(),
            });
        }

        // Get max sort order
        let categories = self.storage.categories.get_all()?;
        let max_order = categories.iter().map(|c| c.sort_order).max().unwrap_or(-1);

        let mut category = Category::new(name);
        category.sort_order = max_order + 1;

        category
            .validate()
            .map_err(|e| KnotbookError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_create(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;

        Ok(category)
    }

    /// Get a category by ID
    pub fn get(&self, id: CategoryId) -> KnotbookResult<Option<Category>> {
        self.storage.categories.get(id)
    }

    /// Find a category by name or ID string
    pub fn find(&self, identifier: &str) -> KnotbookResult<Option<Category>> {
        // Try by name first
        if let Some(category) = self.storage.categories.get_by_name(identifier)? {
            return Ok(Some(category));
        }

        // Try parsing as ID
        if let Ok(id) = identifier.parse::<CategoryId>() {
            return self.storage.categories.get(id);
        }

        Ok(None)
    }

    /// List all categories
    pub fn list(&self) -> KnotbookResult<Vec<Category>> {
        self.storage.categories.get_all()
    }

    /// Rename a category
    pub fn rename(&self, id: CategoryId, name: &str) -> KnotbookResult<Category> {
        let mut category = self
            .storage
            .categories
            .get(id)?
            .ok_or_else(|| KnotbookError::category_not_found(id.to_string()))?;

        let name = name.trim();
        if name.is_empty() {
            return Err(KnotbookError::Validation(
                "Category name cannot be empty".into(),
            ));
        }

        // Check for duplicate
        if let Some(existing) = self.storage.categories.get_by_name(name)? {
            if existing.id != id {
                return Err(KnotbookError::Duplicate {
                    entity_type: "Category",
                    identifier: name.to_string(),
                });
            }
        }

        let before = category.clone();
        category.name = name.to_string();
        category.updated_at = chrono::Utc::now();

        category
            .validate()
            .map_err(|e| KnotbookError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_update(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &before,
            &category,
            Some(format!("name: {} -> {}", before.name, category.name)),
        )?;

        Ok(category)
    }

    /// Delete a category
    ///
    /// Refused while any cost still references the category; the error
    /// carries the count of referencing cost records.
    pub fn delete(&self, id: CategoryId) -> KnotbookResult<()> {
        let category = self
            .storage
            .categories
            .get(id)?
            .ok_or_else(|| KnotbookError::category_not_found(id.to_string()))?;

        let count = self.storage.costs.count_by_category(id)?;
        if count > 0 {
            return Err(KnotbookError::CategoryInUse { count });
        }

        self.storage.categories.delete(id)?;
        self.storage.categories.save()?;

        self.storage.log_delete(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;

        Ok(())
    }
}
