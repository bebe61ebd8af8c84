//! Core data models for knotbook
//!
//! This module contains all the data structures that represent the
//! wedding-budget domain: costs, payments, categories, and money.

pub mod category;
pub mod cost;
pub mod ids;
pub mod money;
pub mod payment;

pub use category::{Category, DefaultCategory};
pub use cost::{Cost, PaymentStatus};
pub use ids::{CategoryId, CostId, PaymentId};
pub use money::Money;
pub use payment::Payment;
