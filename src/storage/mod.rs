//! Storage layer for knotbook
//!
//! Provides JSON file storage with atomic writes, in-memory indexes, and a
//! per-cost lock table that serializes ledger mutations against the same cost.

pub mod categories;
pub mod costs;
pub mod file_io;
pub mod init;
pub mod payments;

pub use categories::CategoryRepository;
pub use costs::CostRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use payments::PaymentRepository;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::KnotbookPaths;
use crate::error::KnotbookError;
use crate::models::CostId;

/// Per-cost mutual exclusion table
///
/// Ledger mutations (balance check, insert/delete, recompute) against a cost
/// must hold that cost's lock for their whole duration so concurrent writers
/// are strictly ordered. Different costs lock independently.
#[derive(Default)]
pub struct CostLocks {
    inner: Mutex<HashMap<CostId, Arc<Mutex<()>>>>,
}

impl CostLocks {
    /// Get (or create) the lock for a cost
    pub fn acquire(&self, cost_id: CostId) -> Result<Arc<Mutex<()>>, KnotbookError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|e| KnotbookError::Storage(format!("Failed to acquire lock table: {}", e)))?;
        Ok(inner.entry(cost_id).or_default().clone())
    }
}

/// Lock a cost's mutex, mapping poison to a storage error
pub fn lock_cost(lock: &Mutex<()>) -> Result<MutexGuard<'_, ()>, KnotbookError> {
    lock.lock()
        .map_err(|e| KnotbookError::Storage(format!("Failed to acquire cost lock: {}", e)))
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: KnotbookPaths,
    audit: AuditLogger,
    pub costs: CostRepository,
    pub payments: PaymentRepository,
    pub categories: CategoryRepository,
    pub locks: CostLocks,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: KnotbookPaths) -> Result<Self, KnotbookError> {
        // Ensure directories exist
        paths.ensure_directories()?;

        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            costs: CostRepository::new(paths.costs_file()),
            payments: PaymentRepository::new(paths.payments_file()),
            categories: CategoryRepository::new(paths.categories_file()),
            locks: CostLocks::default(),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &KnotbookPaths {
        &self.paths
    }

    /// Get the audit logger
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), KnotbookError> {
        self.costs.load()?;
        self.payments.load()?;
        self.categories.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), KnotbookError> {
        self.costs.save()?;
        self.payments.save()?;
        self.categories.save()?;
        Ok(())
    }

    /// Check if storage has been initialized (has any data)
    pub fn is_initialized(&self) -> bool {
        self.paths.settings_file().exists()
    }

    /// Log a create operation to the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), KnotbookError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Log an update operation to the audit log
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Result<(), KnotbookError> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff_summary,
        ))
    }

    /// Log a delete operation to the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), KnotbookError> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}
