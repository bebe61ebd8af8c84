//! Reconciliation service
//!
//! The sole writer of a cost's derived aggregates. `recompute` always
//! re-derives `amount_paid` from the full payment ledger rather than
//! adjusting a counter, so a cached aggregate that has drifted from the
//! ledger (e.g., after a partial failure) is repaired by the next call.

use crate::audit::EntityType;
use crate::error::{KnotbookError, KnotbookResult};
use crate::models::{CostId, Money, PaymentStatus};
use crate::storage::Storage;

/// Service for recomputing cost aggregates from the payment ledger
pub struct ReconciliationService<'a> {
    storage: &'a Storage,
}

/// The aggregate produced by a recompute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconciliationOutcome {
    /// Sum of all ledger payments for the cost
    pub amount_paid: Money,
    /// Status derived from the sum and the cost's target
    pub payment_status: PaymentStatus,
}

/// Result of recomputing every cost
#[derive(Debug, Clone, Copy, Default)]
pub struct RecomputeAllResult {
    /// Number of costs checked
    pub checked: usize,
    /// Number of costs whose cached aggregate had drifted from the ledger
    pub repaired: usize,
}

/// Derive a payment status from a paid amount and a target
///
/// A zero (or negative) target can never be satisfied and always derives
/// `Unpaid`, regardless of the paid amount.
pub fn derive_status(amount_paid: Money, target: Money) -> PaymentStatus {
    if !target.is_positive() {
        return PaymentStatus::Unpaid;
    }

    if amount_paid >= target {
        PaymentStatus::Paid
    } else if amount_paid.is_positive() {
        PaymentStatus::Partial
    } else {
        PaymentStatus::Unpaid
    }
}

impl<'a> ReconciliationService<'a> {
    /// Create a new reconciliation service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Recompute a cost's aggregates from its full ledger and persist them
    ///
    /// Loads every payment for the cost (never a cached count), sums the
    /// amounts, derives the status against the cost's target, and writes
    /// both back onto the cost record.
    pub fn recompute(&self, cost_id: CostId) -> KnotbookResult<ReconciliationOutcome> {
        let mut cost = self
            .storage
            .costs
            .get(cost_id)?
            .ok_or_else(|| KnotbookError::cost_not_found(cost_id.to_string()))?;

        let amount_paid = self.storage.payments.sum_for_cost(cost_id)?;
        let payment_status = derive_status(amount_paid, cost.target());

        let changed =
            cost.amount_paid() != amount_paid || cost.payment_status() != payment_status;

        if changed {
            let before = cost.clone();
            cost.apply_reconciliation(amount_paid, payment_status);

            self.storage.costs.upsert(cost.clone())?;
            self.storage.costs.save()?;

            self.storage.log_update(
                EntityType::Cost,
                cost.id.to_string(),
                Some(cost.name.clone()),
                &before,
                &cost,
                Some(format!(
                    "amount_paid: {} -> {}, payment_status: {} -> {}",
                    before.amount_paid(),
                    amount_paid,
                    before.payment_status(),
                    payment_status
                )),
            )?;
        }

        Ok(ReconciliationOutcome {
            amount_paid,
            payment_status,
        })
    }

    /// Recompute every cost from its ledger
    ///
    /// Repair entry point for aggregates left stale by a crash between the
    /// ledger write and the cost write.
    pub fn recompute_all(&self) -> KnotbookResult<RecomputeAllResult> {
        let costs = self.storage.costs.get_all()?;
        let mut result = RecomputeAllResult::default();

        for cost in costs {
            let before_paid = cost.amount_paid();
            let before_status = cost.payment_status();

            let outcome = self.recompute(cost.id)?;

            result.checked += 1;
            if outcome.amount_paid != before_paid || outcome.payment_status != before_status {
                result.repaired += 1;
            }
        }

        Ok(result)
    }
}
