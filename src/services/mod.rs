//! Service layer for knotbook
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, derived aggregates, and cross-entity operations.

pub mod category;
pub mod cost;
pub mod ledger;
pub mod reconciliation;

pub use category::CategoryService;
pub use cost::{CostService, CostSummary, CreateCostInput, UpdateCostInput};
pub use ledger::{AddPaymentInput, LedgerService};
pub use reconciliation::{derive_status, ReconciliationService};
