//! Payment repository for JSON storage
//!
//! Manages the payment ledger in payments.json. The per-cost index makes the
//! full-ledger sum (the source of truth for reconciliation) a cheap lookup.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::KnotbookError;
use crate::models::{CostId, Money, Payment, PaymentId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable payment data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct PaymentData {
    payments: Vec<Payment>,
}

/// Repository for payment-ledger persistence with indexing
pub struct PaymentRepository {
    path: PathBuf,
    data: RwLock<HashMap<PaymentId, Payment>>,
    /// Index: cost_id -> payment_ids
    by_cost: RwLock<HashMap<CostId, Vec<PaymentId>>>,
}

impl PaymentRepository {
    /// Create a new payment repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_cost: RwLock::new(HashMap::new()),
        }
    }

    /// Load payments from disk and build the cost index
    pub fn load(&self) -> Result<(), KnotbookError> {
        let file_data: PaymentData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| KnotbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_cost = self
            .by_cost
            .write()
            .map_err(|e| KnotbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        by_cost.clear();

        for payment in file_data.payments {
            by_cost.entry(payment.cost_id).or_default().push(payment.id);
            data.insert(payment.id, payment);
        }

        Ok(())
    }

    /// Save payments to disk
    pub fn save(&self) -> Result<(), KnotbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| KnotbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut payments: Vec<_> = data.values().cloned().collect();
        payments.sort_by(|a, b| {
            b.payment_date
                .cmp(&a.payment_date)
                .then(b.created_at.cmp(&a.created_at))
        });

        let file_data = PaymentData { payments };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get a payment by ID
    pub fn get(&self, id: PaymentId) -> Result<Option<Payment>, KnotbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| KnotbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all payments for a cost, newest first
    pub fn get_by_cost(&self, cost_id: CostId) -> Result<Vec<Payment>, KnotbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| KnotbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_cost = self
            .by_cost
            .read()
            .map_err(|e| KnotbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let ids = by_cost.get(&cost_id).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut payments: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        payments.sort_by(|a, b| b.payment_date.cmp(&a.payment_date));
        Ok(payments)
    }

    /// Sum the live ledger for a cost
    ///
    /// This walks every entry for the cost rather than trusting any cached
    /// aggregate; it is the value reconciliation persists back onto the cost.
    pub fn sum_for_cost(&self, cost_id: CostId) -> Result<Money, KnotbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| KnotbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_cost = self
            .by_cost
            .read()
            .map_err(|e| KnotbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let ids = by_cost.get(&cost_id).map(|v| v.as_slice()).unwrap_or(&[]);
        Ok(ids
            .iter()
            .filter_map(|id| data.get(id))
            .map(|p| p.amount)
            .sum())
    }

    /// Insert or update a payment
    pub fn upsert(&self, payment: Payment) -> Result<(), KnotbookError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| KnotbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_cost = self
            .by_cost
            .write()
            .map_err(|e| KnotbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        // Remove from old index if updating
        if let Some(old) = data.get(&payment.id) {
            if let Some(ids) = by_cost.get_mut(&old.cost_id) {
                ids.retain(|&id| id != payment.id);
            }
        }

        by_cost.entry(payment.cost_id).or_default().push(payment.id);
        data.insert(payment.id, payment);
        Ok(())
    }

    /// Delete a payment
    pub fn delete(&self, id: PaymentId) -> Result<bool, KnotbookError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| KnotbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_cost = self
            .by_cost
            .write()
            .map_err(|e| KnotbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if let Some(payment) = data.remove(&id) {
            if let Some(ids) = by_cost.get_mut(&payment.cost_id) {
                ids.retain(|&pid| pid != id);
            }
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Delete every payment for a cost, returning how many were removed
    pub fn delete_by_cost(&self, cost_id: CostId) -> Result<usize, KnotbookError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| KnotbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_cost = self
            .by_cost
            .write()
            .map_err(|e| KnotbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let ids = by_cost.remove(&cost_id).unwrap_or_default();
        let mut removed = 0;
        for id in ids {
            if data.remove(&id).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Count payments
    pub fn count(&self) -> Result<usize, KnotbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| KnotbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, PaymentRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("payments.json");
        let repo = PaymentRepository::new(path);
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_and_get() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let payment = Payment::new(CostId::new(), Money::from_cents(5000));
        let id = payment.id;

        repo.upsert(payment).unwrap();

        let retrieved = repo.get(id).unwrap().unwrap();
        assert_eq!(retrieved.amount.cents(), 5000);
    }

    #[test]
    fn test_sum_for_cost() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let cost1 = CostId::new();
        let cost2 = CostId::new();

        repo.upsert(Payment::new(cost1, Money::from_cents(100))).unwrap();
        repo.upsert(Payment::new(cost1, Money::from_cents(200))).unwrap();
        repo.upsert(Payment::new(cost2, Money::from_cents(400))).unwrap();

        assert_eq!(repo.sum_for_cost(cost1).unwrap().cents(), 300);
        assert_eq!(repo.sum_for_cost(cost2).unwrap().cents(), 400);
        assert_eq!(repo.sum_for_cost(CostId::new()).unwrap().cents(), 0);
    }

    #[test]
    fn test_get_by_cost_newest_first() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let cost_id = CostId::new();
        let mut older = Payment::new(cost_id, Money::from_cents(100));
        older.payment_date = older.payment_date - chrono::Duration::days(2);
        let newer = Payment::new(cost_id, Money::from_cents(200));

        repo.upsert(older).unwrap();
        repo.upsert(newer).unwrap();

        let payments = repo.get_by_cost(cost_id).unwrap();
        assert_eq!(payments.len(), 2);
        assert_eq!(payments[0].amount.cents(), 200);
        assert_eq!(payments[1].amount.cents(), 100);
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let cost_id = CostId::new();
        let payment = Payment::new(cost_id, Money::from_cents(5000));
        let id = payment.id;

        repo.upsert(payment).unwrap();
        assert!(repo.delete(id).unwrap());
        assert_eq!(repo.count().unwrap(), 0);
        assert_eq!(repo.sum_for_cost(cost_id).unwrap().cents(), 0);

        assert!(!repo.delete(id).unwrap());
    }

    #[test]
    fn test_delete_by_cost() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let cost1 = CostId::new();
        let cost2 = CostId::new();

        repo.upsert(Payment::new(cost1, Money::from_cents(100))).unwrap();
        repo.upsert(Payment::new(cost1, Money::from_cents(200))).unwrap();
        repo.upsert(Payment::new(cost2, Money::from_cents(400))).unwrap();

        assert_eq!(repo.delete_by_cost(cost1).unwrap(), 2);
        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(repo.get_by_cost(cost1).unwrap().len(), 0);
        assert_eq!(repo.get_by_cost(cost2).unwrap().len(), 1);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let cost_id = CostId::new();
        repo.upsert(Payment::new(cost_id, Money::from_cents(100))).unwrap();
        repo.upsert(Payment::new(cost_id, Money::from_cents(200))).unwrap();
        repo.save().unwrap();

        let path = temp_dir.path().join("payments.json");
        let repo2 = PaymentRepository::new(path);
        repo2.load().unwrap();

        assert_eq!(repo2.count().unwrap(), 2);
        assert_eq!(repo2.sum_for_cost(cost_id).unwrap().cents(), 300);
    }
}
