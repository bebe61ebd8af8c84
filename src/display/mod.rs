//! Display formatting for terminal output
//!
//! Renders costs, payments, and categories as aligned text tables and
//! detail views for the CLI.

pub mod category;
pub mod cost;
pub mod payment;
