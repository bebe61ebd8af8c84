//! Cost service
//!
//! Provides business logic for cost record management: CRUD operations,
//! validation, and the reconciliation hooks that keep the cached aggregates
//! honest when a cost's target changes or the cost goes away.

use chrono::{NaiveDate, Utc};

use crate::audit::EntityType;
use crate::error::{KnotbookError, KnotbookResult};
use crate::models::{CategoryId, Cost, CostId, Money, PaymentStatus};
use crate::storage::{lock_cost, Storage};

use super::reconciliation::ReconciliationService;

/// Service for cost record management
pub struct CostService<'a> {
    storage: &'a Storage,
}

/// Input for creating a new cost
#[derive(Debug, Clone)]
pub struct CreateCostInput {
    pub name: String,
    pub value: Money,
    pub total_amount: Option<Money>,
    pub category_id: Option<CategoryId>,
    pub due_date: Option<NaiveDate>,
    pub paid_date: Option<NaiveDate>,
}

/// Input for updating a cost
///
/// `None` leaves a field untouched; the `clear_*` flags reset the optional
/// fields, mirroring how the CLI exposes them.
#[derive(Debug, Clone, Default)]
pub struct UpdateCostInput {
    pub name: Option<String>,
    pub value: Option<Money>,
    pub total_amount: Option<Money>,
    pub clear_total_amount: bool,
    pub category_id: Option<CategoryId>,
    pub clear_category: bool,
    pub due_date: Option<NaiveDate>,
    pub clear_due_date: bool,
    pub paid_date: Option<NaiveDate>,
    pub clear_paid_date: bool,
}

/// Aggregate view over every cost
#[derive(Debug, Clone, Copy, Default)]
pub struct CostSummary {
    pub total_target: Money,
    pub total_paid: Money,
    pub total_remaining: Money,
    pub unpaid_count: usize,
    pub partial_count: usize,
    pub paid_count: usize,
}

impl<'a> CostService<'a> {
    /// Create a new cost service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new cost with zeroed aggregates
    pub fn create(&self, input: CreateCostInput) -> KnotbookResult<Cost> {
        // Verify category exists if provided
        if let Some(cat_id) = input.category_id {
            self.storage
                .categories
                .get(cat_id)?
                .ok_or_else(|| KnotbookError::category_not_found(cat_id.to_string()))?;
        }

        let mut cost = Cost::new(input.name.trim(), input.value);
        cost.total_amount = input.total_amount;
        cost.category_id = input.category_id;
        cost.due_date = input.due_date;
        cost.paid_date = input.paid_date;

        cost.validate()
            .map_err(|e| KnotbookError::Validation(e.to_string()))?;

        self.storage.costs.upsert(cost.clone())?;
        self.storage.costs.save()?;

        self.storage.log_create(
            EntityType::Cost,
            cost.id.to_string(),
            Some(cost.name.clone()),
            &cost,
        )?;

        Ok(cost)
    }

    /// Get a cost by ID
    pub fn get(&self, id: CostId) -> KnotbookResult<Option<Cost>> {
        self.storage.costs.get(id)
    }

    /// Find a cost by name or ID string
    pub fn find(&self, identifier: &str) -> KnotbookResult<Option<Cost>> {
        // Try by name first
        if let Some(cost) = self
            .storage
            .costs
            .get_all()?
            .into_iter()
            .find(|c| c.name.eq_ignore_ascii_case(identifier))
        {
            return Ok(Some(cost));
        }

        // Try parsing as ID
        if let Ok(id) = identifier.parse::<CostId>() {
            return self.storage.costs.get(id);
        }

        Ok(None)
    }

    /// List all costs
    pub fn list(&self) -> KnotbookResult<Vec<Cost>> {
        self.storage.costs.get_all()
    }

    /// Update a cost
    ///
    /// Runs under the cost's lock: changing `value` or `total_amount` moves
    /// the target the ledger is checked against, so the update and the forced
    /// recompute that follows must not interleave with payment writes.
    pub fn update(&self, id: CostId, input: UpdateCostInput) -> KnotbookResult<Cost> {
        let lock = self.storage.locks.acquire(id)?;
        let _guard = lock_cost(&lock)?;

        let mut cost = self
            .storage
            .costs
            .get(id)?
            .ok_or_else(|| KnotbookError::cost_not_found(id.to_string()))?;

        let before = cost.clone();
        let old_target = cost.target();

        if let Some(name) = input.name {
            cost.name = name.trim().to_string();
        }
        if let Some(value) = input.value {
            cost.value = value;
        }
        if input.clear_total_amount {
            cost.total_amount = None;
        } else if let Some(total) = input.total_amount {
            cost.total_amount = Some(total);
        }
        if input.clear_category {
            cost.category_id = None;
        } else if let Some(cat_id) = input.category_id {
            self.storage
                .categories
                .get(cat_id)?
                .ok_or_else(|| KnotbookError::category_not_found(cat_id.to_string()))?;
            cost.category_id = Some(cat_id);
        }
        if input.clear_due_date {
            cost.due_date = None;
        } else if let Some(date) = input.due_date {
            cost.due_date = Some(date);
        }
        if input.clear_paid_date {
            cost.paid_date = None;
        } else if let Some(date) = input.paid_date {
            cost.paid_date = Some(date);
        }

        cost.updated_at = Utc::now();
        cost.validate()
            .map_err(|e| KnotbookError::Validation(e.to_string()))?;

        self.storage.costs.upsert(cost.clone())?;
        self.storage.costs.save()?;

        self.storage.log_update(
            EntityType::Cost,
            cost.id.to_string(),
            Some(cost.name.clone()),
            &before,
            &cost,
            None,
        )?;

        // A moved target invalidates the cached status; recompute immediately
        // instead of leaving the record inconsistent until the next ledger write.
        if cost.target() != old_target {
            ReconciliationService::new(self.storage).recompute(id)?;
            cost = self
                .storage
                .costs
                .get(id)?
                .ok_or_else(|| KnotbookError::cost_not_found(id.to_string()))?;
        }

        Ok(cost)
    }

    /// Delete a cost and cascade-delete its payment ledger
    ///
    /// Payments are owned by their cost; removing the cost without its ledger
    /// would leave orphaned entries.
    pub fn delete(&self, id: CostId) -> KnotbookResult<()> {
        let lock = self.storage.locks.acquire(id)?;
        let _guard = lock_cost(&lock)?;

        let cost = self
            .storage
            .costs
            .get(id)?
            .ok_or_else(|| KnotbookError::cost_not_found(id.to_string()))?;

        let removed_payments = self.storage.payments.delete_by_cost(id)?;
        if removed_payments > 0 {
            self.storage.payments.save()?;
        }

        self.storage.costs.delete(id)?;
        self.storage.costs.save()?;

        self.storage.log_delete(
            EntityType::Cost,
            cost.id.to_string(),
            Some(cost.name.clone()),
            &cost,
        )?;

        Ok(())
    }

    /// Aggregate totals and status counts across every cost
    pub fn summary(&self) -> KnotbookResult<CostSummary> {
        let costs = self.storage.costs.get_all()?;
        let mut summary = CostSummary::default();

        for cost in costs {
            summary.total_target += cost.target();
            summary.total_paid += cost.amount_paid();
            match cost.payment_status() {
                PaymentStatus::Unpaid => summary.unpaid_count += 1,
                PaymentStatus::Partial => summary.partial_count += 1,
                PaymentStatus::Paid => summary.paid_count += 1,
            }
        }

        summary.total_remaining = summary.total_target - summary.total_paid;
        Ok(summary)
    }
}
