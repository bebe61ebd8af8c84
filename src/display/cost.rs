//! Cost display formatting
//!
//! Formats costs and budget summaries for terminal output.

use crate::models::Cost;
use crate::services::CostSummary;

/// Format costs as an aligned table
pub fn format_cost_list(costs: &[Cost]) -> String {
    if costs.is_empty() {
        return "No costs found.\n\nUse 'knotbook cost add' to record one.".to_string();
    }

    let name_width = costs.iter().map(|c| c.name.len()).max().unwrap_or(4).max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<width$}  {:>12}  {:>12}  {:>8}  {:<10}  {}\n",
        "Cost",
        "Target",
        "Paid",
        "Status",
        "Due",
        "ID",
        width = name_width
    ));
    output.push_str(&format!(
        "{:-<width$}  {:->12}  {:->12}  {:->8}  {:-<10}  {:-<36}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        width = name_width
    ));

    for cost in costs {
        let due = cost
            .due_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());

        output.push_str(&format!(
            "{:<width$}  {:>12}  {:>12}  {:>8}  {:<10}  {}\n",
            cost.name,
            cost.target().to_string(),
            cost.amount_paid().to_string(),
            cost.payment_status().to_string(),
            due,
            cost.id.as_uuid(),
            width = name_width
        ));
    }

    output
}

/// Format a single cost with full details
pub fn format_cost_details(cost: &Cost, category_name: Option<&str>) -> String {
    let mut output = String::new();

    output.push_str(&format!("Cost: {}\n", cost.name));
    output.push_str(&format!("  ID: {}\n", cost.id.as_uuid()));
    output.push_str(&format!("  Value: {}\n", cost.value));
    if let Some(total) = cost.total_amount {
        output.push_str(&format!("  Total amount: {}\n", total));
    }
    output.push_str(&format!("  Target: {}\n", cost.target()));
    output.push_str(&format!("  Paid: {}\n", cost.amount_paid()));
    output.push_str(&format!("  Remaining: {}\n", cost.remaining()));
    output.push_str(&format!("  Status: {}\n", cost.payment_status()));
    if let Some(name) = category_name {
        output.push_str(&format!("  Category: {}\n", name));
    }
    if let Some(due) = cost.due_date {
        output.push_str(&format!("  Due: {}\n", due));
    }
    if let Some(paid) = cost.paid_date {
        output.push_str(&format!("  Paid on: {}\n", paid));
    }

    output
}

/// Format the aggregate budget summary
pub fn format_summary(summary: &CostSummary) -> String {
    let mut output = String::new();

    output.push_str("Budget summary\n");
    output.push_str(&format!("  Total target:    {}\n", summary.total_target));
    output.push_str(&format!("  Total paid:      {}\n", summary.total_paid));
    output.push_str(&format!("  Total remaining: {}\n", summary.total_remaining));
    output.push_str(&format!(
        "  Costs: {} paid, {} partial, {} unpaid\n",
        summary.paid_count, summary.partial_count, summary.unpaid_count
    ));

    output
}
