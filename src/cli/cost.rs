//! Cost CLI commands
//!
//! Implements CLI commands for cost record management.

use chrono::NaiveDate;
use clap::Subcommand;

use crate::display::cost::{format_cost_details, format_cost_list, format_summary};
use crate::error::{KnotbookError, KnotbookResult};
use crate::models::Money;
use crate::services::{CategoryService, CostService, CreateCostInput, UpdateCostInput};
use crate::storage::Storage;

/// Cost subcommands
#[derive(Subcommand)]
pub enum CostCommands {
    /// Add a new cost
    Add {
        /// Cost name (e.g., vendor or line item)
        name: String,
        /// Amount (e.g., "1250" or "1250.00")
        value: String,
        /// Full price when the value is only a deposit
        #[arg(long)]
        total: Option<String>,
        /// Category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },

    /// List all costs
    List,

    /// Show cost details
    Show {
        /// Cost name or ID
        cost: String,
    },

    /// Edit a cost
    Edit {
        /// Cost name or ID
        cost: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New value
        #[arg(short, long)]
        value: Option<String>,
        /// New full price
        #[arg(long)]
        total: Option<String>,
        /// Clear the full price (target falls back to the value)
        #[arg(long)]
        clear_total: bool,
        /// New category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Clear the category
        #[arg(long)]
        clear_category: bool,
        /// New due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Clear the due date
        #[arg(long)]
        clear_due: bool,
    },

    /// Delete a cost and its payment ledger
    Delete {
        /// Cost name or ID
        cost: String,
    },

    /// Show aggregate totals across every cost
    Summary,
}

fn parse_money(s: &str) -> KnotbookResult<Money> {
    Money::parse(s).map_err(|e| KnotbookError::Validation(format!("Invalid amount: {}", e)))
}

fn parse_date(s: &str) -> KnotbookResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| KnotbookError::Validation(format!("Invalid date '{}': {}", s, e)))
}

/// Handle a cost command
pub fn handle_cost_command(storage: &Storage, cmd: CostCommands) -> KnotbookResult<()> {
    let service = CostService::new(storage);
    let categories = CategoryService::new(storage);

    match cmd {
        CostCommands::Add {
            name,
            value,
            total,
            category,
            due,
        } => {
            let category_id = match category {
                Some(identifier) => Some(
                    categories
                        .find(&identifier)?
                        .ok_or_else(|| KnotbookError::category_not_found(&identifier))?
                        .id,
                ),
                None => None,
            };

            let cost = service.create(CreateCostInput {
                name,
                value: parse_money(&value)?,
                total_amount: total.as_deref().map(parse_money).transpose()?,
                category_id,
                due_date: due.as_deref().map(parse_date).transpose()?,
                paid_date: None,
            })?;

            println!("Created cost: {}", cost.name);
            println!("  Target: {}", cost.target());
            println!("  ID: {}", cost.id.as_uuid());
        }

        CostCommands::List => {
            let costs = service.list()?;
            print!("{}", format_cost_list(&costs));
        }

        CostCommands::Show { cost } => {
            let cost = service
                .find(&cost)?
                .ok_or_else(|| KnotbookError::cost_not_found(&cost))?;

            let category_name = match cost.category_id {
                Some(id) => categories.get(id)?.map(|c| c.name),
                None => None,
            };

            print!("{}", format_cost_details(&cost, category_name.as_deref()));
        }

        CostCommands::Edit {
            cost,
            name,
            value,
            total,
            clear_total,
            category,
            clear_category,
            due,
            clear_due,
        } => {
            let existing = service
                .find(&cost)?
                .ok_or_else(|| KnotbookError::cost_not_found(&cost))?;

            let category_id = match category {
                Some(identifier) => Some(
                    categories
                        .find(&identifier)?
                        .ok_or_else(|| KnotbookError::category_not_found(&identifier))?
                        .id,
                ),
                None => None,
            };

            let updated = service.update(
                existing.id,
                UpdateCostInput {
                    name,
                    value: value.as_deref().map(parse_money).transpose()?,
                    total_amount: total.as_deref().map(parse_money).transpose()?,
                    clear_total_amount: clear_total,
                    category_id,
                    clear_category,
                    due_date: due.as_deref().map(parse_date).transpose()?,
                    clear_due_date: clear_due,
                    paid_date: None,
                    clear_paid_date: false,
                },
            )?;

            println!("Updated cost: {}", updated.name);
            println!("  Target: {}", updated.target());
            println!("  Status: {}", updated.payment_status());
        }

        CostCommands::Delete { cost } => {
            let existing = service
                .find(&cost)?
                .ok_or_else(|| KnotbookError::cost_not_found(&cost))?;

            service.delete(existing.id)?;
            println!("Deleted cost: {}", existing.name);
        }

        CostCommands::Summary => {
            let summary = service.summary()?;
            print!("{}", format_summary(&summary));
        }
    }

    Ok(())
}
