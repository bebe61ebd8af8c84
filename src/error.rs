//! Custom error types for knotbook
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for knotbook operations
#[derive(Error, Debug)]
pub enum KnotbookError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// A payment would push a cost past its target amount
    #[error("Payment exceeds remaining balance: requested {requested} cents, remaining {remaining} cents")]
    ExceedsRemaining { requested: i64, remaining: i64 },

    /// A category cannot be deleted while costs still reference it
    #[error("Category is still referenced by {count} cost record(s)")]
    CategoryInUse { count: usize },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl KnotbookError {
    /// Create a "not found" error for costs
    pub fn cost_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Cost",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for payments
    pub fn payment_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Payment",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::ExceedsRemaining { .. })
    }

    /// Check if this is a conflict error (duplicate or still-referenced entity)
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Duplicate { .. } | Self::CategoryInUse { .. })
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for KnotbookError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for KnotbookError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for knotbook operations
pub type KnotbookResult<T> = Result<T, KnotbookError>;
