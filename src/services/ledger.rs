//! Payment ledger service
//!
//! Owns the append/remove operations on a cost's payment ledger. Every
//! mutation runs under the cost's lock so that the triple {remaining-balance
//! check, ledger write, recompute} is strictly ordered against concurrent
//! writers to the same cost, and triggers reconciliation before returning.

use crate::audit::EntityType;
use crate::error::{KnotbookError, KnotbookResult};
use crate::models::{CostId, Money, Payment, PaymentId};
use crate::storage::{lock_cost, Storage};

use super::reconciliation::ReconciliationService;

/// Service for payment ledger management
pub struct LedgerService<'a> {
    storage: &'a Storage,
}

/// Input for recording a new payment
#[derive(Debug, Clone)]
pub struct AddPaymentInput {
    pub cost_id: CostId,
    pub amount: Money,
    pub note: Option<String>,
}

impl<'a> LedgerService<'a> {
    /// Create a new ledger service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a payment against a cost
    ///
    /// The remaining balance is checked against the live ledger sum, not the
    /// cost's cached aggregate, so a stale cache cannot let an overpayment
    /// through. Reconciliation runs before this returns.
    pub fn add_payment(&self, input: AddPaymentInput) -> KnotbookResult<Payment> {
        let lock = self.storage.locks.acquire(input.cost_id)?;
        let _guard = lock_cost(&lock)?;

        let cost = self
            .storage
            .costs
            .get(input.cost_id)?
            .ok_or_else(|| KnotbookError::cost_not_found(input.cost_id.to_string()))?;

        if !input.amount.is_positive() {
            return Err(KnotbookError::Validation(
                "Payment amount must be positive".into(),
            ));
        }

        let paid = self.storage.payments.sum_for_cost(cost.id)?;
        let remaining = cost.target() - paid;
        if input.amount > remaining {
            return Err(KnotbookError::ExceedsRemaining {
                requested: input.amount.cents(),
                remaining: remaining.cents().max(0),
            });
        }

        let mut payment = Payment::new(cost.id, input.amount);
        if let Some(note) = input.note {
            payment.note = note.trim().to_string();
        }

        payment
            .validate()
            .map_err(|e| KnotbookError::Validation(e.to_string()))?;

        self.storage.payments.upsert(payment.clone())?;
        self.storage.payments.save()?;

        ReconciliationService::new(self.storage).recompute(cost.id)?;

        self.storage.log_create(
            EntityType::Payment,
            payment.id.to_string(),
            Some(format!("{} against {}", payment.amount, cost.name)),
            &payment,
        )?;

        Ok(payment)
    }

    /// Delete a payment and recompute its cost's aggregates
    ///
    /// The cost id is captured before the deletion so the recompute targets
    /// the right cost even though the entry is gone.
    pub fn delete_payment(&self, id: PaymentId) -> KnotbookResult<()> {
        let payment = self
            .storage
            .payments
            .get(id)?
            .ok_or_else(|| KnotbookError::payment_not_found(id.to_string()))?;
        let cost_id = payment.cost_id;

        let lock = self.storage.locks.acquire(cost_id)?;
        let _guard = lock_cost(&lock)?;

        // Re-check under the lock: the entry may have been removed while we
        // were waiting (e.g., by a cascade delete of the cost).
        let payment = self
            .storage
            .payments
            .get(id)?
            .ok_or_else(|| KnotbookError::payment_not_found(id.to_string()))?;

        self.storage.payments.delete(id)?;
        self.storage.payments.save()?;

        ReconciliationService::new(self.storage).recompute(cost_id)?;

        self.storage.log_delete(
            EntityType::Payment,
            payment.id.to_string(),
            None,
            &payment,
        )?;

        Ok(())
    }

    /// List all payments for a cost, newest first
    pub fn list_payments(&self, cost_id: CostId) -> KnotbookResult<Vec<Payment>> {
        self.storage
            .costs
            .get(cost_id)?
            .ok_or_else(|| KnotbookError::cost_not_found(cost_id.to_string()))?;

        self.storage.payments.get_by_cost(cost_id)
    }

    /// Get a payment by ID
    pub fn get(&self, id: PaymentId) -> KnotbookResult<Option<Payment>> {
        self.storage.payments.get(id)
    }
}
