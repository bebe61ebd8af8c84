//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod category;
pub mod cost;
pub mod payment;

pub use category::{handle_category_command, CategoryCommands};
pub use cost::{handle_cost_command, CostCommands};
pub use payment::{handle_payment_command, PaymentCommands};
