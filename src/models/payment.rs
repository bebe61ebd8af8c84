//! Payment model
//!
//! A payment is one entry in a cost's ledger: a discrete amount paid against
//! the cost at a point in time. The ledger (not the cost's cached aggregate)
//! is the source of truth for how much has been paid.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CostId, PaymentId};
use super::money::Money;

/// A single payment against a cost
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier
    pub id: PaymentId,

    /// The cost this payment belongs to (strong ownership: deleting the cost
    /// deletes its payments)
    pub cost_id: CostId,

    /// Amount paid (always positive)
    pub amount: Money,

    /// When the payment was made; defaults to creation time
    pub payment_date: DateTime<Utc>,

    /// Free-text note
    #[serde(default)]
    pub note: String,

    /// When the entry was created
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Create a new payment dated now
    pub fn new(cost_id: CostId, amount: Money) -> Self {
        let now = Utc::now();
        Self {
            id: PaymentId::new(),
            cost_id,
            amount,
            payment_date: now,
            note: String::new(),
            created_at: now,
        }
    }

    /// Create a new payment with a note
    pub fn with_note(cost_id: CostId, amount: Money, note: impl Into<String>) -> Self {
        let mut payment = Self::new(cost_id, amount);
        payment.note = note.into();
        payment
    }

    /// Validate the payment
    pub fn validate(&self) -> Result<(), PaymentValidationError> {
        if !self.amount.is_positive() {
            return Err(PaymentValidationError::NonPositiveAmount);
        }

        if self.note.len() > 500 {
            return Err(PaymentValidationError::NoteTooLong(self.note.len()));
        }

        Ok(())
    }
}

/// Validation errors for payments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentValidationError {
    NonPositiveAmount,
    NoteTooLong(usize),
}

impl fmt::Display for PaymentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount => write!(f, "Payment amount must be positive"),
            Self::NoteTooLong(len) => {
                write!(f, "Payment note too long ({} chars, max 500)", len)
            }
        }
    }
}

impl std::error::Error for PaymentValidationError {}
