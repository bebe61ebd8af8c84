//! Category model
//!
//! Costs are grouped into flat categories (venue, catering, attire, ...).
//! Categories never own costs: a cost's category link is a weak reference,
//! and deleting a category is refused while any cost still points at it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;

/// A budget category for grouping costs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Category name
    pub name: String,

    /// Sort order for display
    pub sort_order: i32,

    /// When the category was created
    pub created_at: DateTime<Utc>,

    /// When the category was last modified
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a new category
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            name: name.into(),
            sort_order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new category with a specific sort order
    pub fn with_sort_order(name: impl Into<String>, sort_order: i32) -> Self {
        let mut category = Self::new(name);
        category.sort_order = sort_order;
        category
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if self.name.len() > 50 {
            return Err(CategoryValidationError::NameTooLong(self.name.len()));
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Default categories for new wedding budgets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultCategory {
    Venue,
    Catering,
    Attire,
    Flowers,
    Music,
    Photography,
    Stationery,
    Favors,
}

impl DefaultCategory {
    /// Get all default categories in display order
    pub fn all() -> &'static [Self] {
        &[
            Self::Venue,
            Self::Catering,
            Self::Attire,
            Self::Flowers,
            Self::Music,
            Self::Photography,
            Self::Stationery,
            Self::Favors,
        ]
    }

    /// Get the name for this default category
    pub fn name(&self) -> &'static str {
        match self {
            Self::Venue => "Venue",
            Self::Catering => "Catering",
            Self::Attire => "Attire",
            Self::Flowers => "Flowers",
            Self::Music => "Music",
            Self::Photography => "Photography",
            Self::Stationery => "Stationery",
            Self::Favors => "Favors",
        }
    }

    /// Create a Category from this default
    pub fn to_category(&self, sort_order: i32) -> Category {
        Category::with_sort_order(self.name(), sort_order)
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 50)", len)
            }
        }
    }
}

impl std::error::Error for CategoryValidationError {}
