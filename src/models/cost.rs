//! Cost model
//!
//! A cost is a planned or incurred wedding expense with a target amount.
//! The paid aggregate and payment status are derived from the payment ledger
//! and cached here; only the reconciliation service may write them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, CostId};
use super::money::Money;

/// Payment status of a cost, derived from its ledger
///
/// Transitions happen only as a side effect of reconciliation and are not
/// monotonic: deleting a payment can move a cost from `Paid` back to
/// `Partial` or `Unpaid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Nothing has been paid yet, or the target amount is zero
    #[default]
    Unpaid,
    /// Some, but not all, of the target amount has been paid
    Partial,
    /// The full target amount has been paid
    Paid,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unpaid => write!(f, "Unpaid"),
            Self::Partial => write!(f, "Partial"),
            Self::Paid => write!(f, "Paid"),
        }
    }
}

/// A wedding expense with a target amount and a cached paid aggregate
///
/// `value` is the amount this record nominally represents; when it is only a
/// deposit, `total_amount` carries the full price. The target a cost must
/// reach to count as paid is `total_amount` when present, else `value`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cost {
    /// Unique identifier
    pub id: CostId,

    /// Cost name (e.g., vendor or line item)
    pub name: String,

    /// Nominal amount (may be a deposit rather than the full price)
    pub value: Money,

    /// Full price when `value` is only a deposit
    pub total_amount: Option<Money>,

    /// Category this cost belongs to (weak reference)
    pub category_id: Option<CategoryId>,

    /// When the cost is due (informational)
    pub due_date: Option<NaiveDate>,

    /// When the cost was settled (informational)
    pub paid_date: Option<NaiveDate>,

    /// Sum of ledger payments at last reconciliation.
    /// Private: written only through `apply_reconciliation`.
    amount_paid: Money,

    /// Status derived from `amount_paid` at last reconciliation.
    /// Private: written only through `apply_reconciliation`.
    payment_status: PaymentStatus,

    /// When the cost was created
    pub created_at: DateTime<Utc>,

    /// When the cost was last modified
    pub updated_at: DateTime<Utc>,
}

impl Cost {
    /// Create a new cost with zeroed aggregates
    pub fn new(name: impl Into<String>, value: Money) -> Self {
        let now = Utc::now();
        Self {
            id: CostId::new(),
            name: name.into(),
            value,
            total_amount: None,
            category_id: None,
            due_date: None,
            paid_date: None,
            amount_paid: Money::zero(),
            payment_status: PaymentStatus::Unpaid,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new cost with a separate full price
    pub fn with_total_amount(
        name: impl Into<String>,
        value: Money,
        total_amount: Money,
    ) -> Self {
        let mut cost = Self::new(name, value);
        cost.total_amount = Some(total_amount);
        cost
    }

    /// The amount this cost must reach to be considered paid
    pub fn target(&self) -> Money {
        self.total_amount.unwrap_or(self.value)
    }

    /// Cached sum of ledger payments at last reconciliation
    pub fn amount_paid(&self) -> Money {
        self.amount_paid
    }

    /// Cached payment status at last reconciliation
    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    /// Remaining balance against the cached aggregate
    pub fn remaining(&self) -> Money {
        self.target() - self.amount_paid
    }

    /// Write the derived aggregates. Reconciliation only.
    pub(crate) fn apply_reconciliation(&mut self, amount_paid: Money, status: PaymentStatus) {
        self.amount_paid = amount_paid;
        self.payment_status = status;
        self.updated_at = Utc::now();
    }

    /// Validate the cost
    pub fn validate(&self) -> Result<(), CostValidationError> {
        if self.name.trim().is_empty() {
            return Err(CostValidationError::EmptyName);
        }

        if self.name.len() > 100 {
            return Err(CostValidationError::NameTooLong(self.name.len()));
        }

        if !self.value.is_positive() {
            return Err(CostValidationError::NonPositiveValue);
        }

        if let Some(total) = self.total_amount {
            if total < self.value {
                return Err(CostValidationError::TotalBelowValue);
            }
        }

        Ok(())
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for costs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CostValidationError {
    EmptyName,
    NameTooLong(usize),
    NonPositiveValue,
    TotalBelowValue,
}

impl fmt::Display for CostValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Cost name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Cost name too long ({} chars, max 100)", len)
            }
            Self::NonPositiveValue => write!(f, "Cost value must be positive"),
            Self::TotalBelowValue => {
                write!(f, "Total amount cannot be less than the cost value")
            }
        }
    }
}

impl std::error::Error for CostValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cost_starts_unpaid() {
        let cost = Cost::new("Venue deposit", Money::from_cents(100_000));
        assert_eq!(cost.amount_paid(), Money::zero());
        assert_eq!(cost.payment_status(), PaymentStatus::Unpaid);
        assert!(cost.total_amount.is_none());
    }

    #[test]
    fn test_target_prefers_total_amount() {
        let deposit_only = Cost::new("Florist", Money::from_cents(50_000));
        assert_eq!(deposit_only.target().cents(), 50_000);

        let with_total = Cost::with_total_amount(
            "Venue",
            Money::from_cents(100_000),
            Money::from_cents(1_000_000),
        );
        assert_eq!(with_total.target().cents(), 1_000_000);
    }

    #[test]
    fn test_remaining_uses_cached_aggregate() {
        let mut cost = Cost::new("Catering", Money::from_cents(80_000));
        assert_eq!(cost.remaining().cents(), 80_000);

        cost.apply_reconciliation(Money::from_cents(30_000), PaymentStatus::Partial);
        assert_eq!(cost.remaining().cents(), 50_000);
        assert_eq!(cost.amount_paid().cents(), 30_000);
    }

    #[test]
    fn test_validation() {
        let mut cost = Cost::new("Valid", Money::from_cents(1000));
        assert!(cost.validate().is_ok());

        cost.name = String::new();
        assert_eq!(cost.validate(), Err(CostValidationError::EmptyName));

        cost.name = "a".repeat(101);
        assert!(matches!(
            cost.validate(),
            Err(CostValidationError::NameTooLong(_))
        ));

        cost.name = "Valid".to_string();
        cost.value = Money::zero();
        assert_eq!(cost.validate(), Err(CostValidationError::NonPositiveValue));

        cost.value = Money::from_cents(1000);
        cost.total_amount = Some(Money::from_cents(500));
        assert_eq!(cost.validate(), Err(CostValidationError::TotalBelowValue));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(PaymentStatus::Unpaid.to_string(), "Unpaid");
        assert_eq!(PaymentStatus::Partial.to_string(), "Partial");
        assert_eq!(PaymentStatus::Paid.to_string(), "Paid");
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut cost = Cost::with_total_amount(
            "Photographer",
            Money::from_cents(40_000),
            Money::from_cents(200_000),
        );
        cost.apply_reconciliation(Money::from_cents(40_000), PaymentStatus::Partial);

        let json = serde_json::to_string(&cost).unwrap();
        let deserialized: Cost = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.id, cost.id);
        assert_eq!(deserialized.amount_paid(), cost.amount_paid());
        assert_eq!(deserialized.payment_status(), PaymentStatus::Partial);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&PaymentStatus::Partial).unwrap();
        assert_eq!(json, "\"partial\"");
    }
}
