//! Payment CLI commands
//!
//! Implements CLI commands for the payment ledger.

use clap::Subcommand;

use crate::display::payment::format_payment_list;
use crate::error::{KnotbookError, KnotbookResult};
use crate::models::{Money, PaymentId};
use crate::services::{AddPaymentInput, CostService, LedgerService};
use crate::storage::Storage;

/// Payment subcommands
#[derive(Subcommand)]
pub enum PaymentCommands {
    /// Record a payment against a cost
    Add {
        /// Cost name or ID
        cost: String,
        /// Amount (e.g., "250" or "250.00")
        amount: String,
        /// Free-text note
        #[arg(short, long)]
        note: Option<String>,
    },

    /// List payments for a cost (newest first)
    List {
        /// Cost name or ID
        cost: String,
    },

    /// Delete a payment
    Delete {
        /// Payment ID
        payment: String,
    },
}

/// Handle a payment command
pub fn handle_payment_command(storage: &Storage, cmd: PaymentCommands) -> KnotbookResult<()> {
    let ledger = LedgerService::new(storage);
    let costs = CostService::new(storage);

    match cmd {
        PaymentCommands::Add { cost, amount, note } => {
            let cost = costs
                .find(&cost)?
                .ok_or_else(|| KnotbookError::cost_not_found(&cost))?;

            let amount = Money::parse(&amount)
                .map_err(|e| KnotbookError::Validation(format!("Invalid amount: {}", e)))?;

            let payment = ledger.add_payment(AddPaymentInput {
                cost_id: cost.id,
                amount,
                note,
            })?;

            let updated = costs
                .get(cost.id)?
                .ok_or_else(|| KnotbookError::cost_not_found(cost.id.to_string()))?;

            println!("Recorded payment: {} against {}", payment.amount, cost.name);
            println!("  Paid: {} of {}", updated.amount_paid(), updated.target());
            println!("  Status: {}", updated.payment_status());
            println!("  ID: {}", payment.id.as_uuid());
        }

        PaymentCommands::List { cost } => {
            let cost = costs
                .find(&cost)?
                .ok_or_else(|| KnotbookError::cost_not_found(&cost))?;

            let payments = ledger.list_payments(cost.id)?;
            println!("Payments for {}:", cost.name);
            print!("{}", format_payment_list(&payments));
        }

        PaymentCommands::Delete { payment } => {
            let id = payment
                .parse::<PaymentId>()
                .map_err(|_| KnotbookError::payment_not_found(&payment))?;

            ledger.delete_payment(id)?;
            println!("Deleted payment: {}", payment);
        }
    }

    Ok(())
}
