//! Payment display formatting
//!
//! Formats the payment ledger for terminal output.

use crate::models::Payment;

/// Format payments as an aligned table, newest first
pub fn format_payment_list(payments: &[Payment]) -> String {
    if payments.is_empty() {
        return "No payments recorded for this cost.".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<19}  {:>12}  {:<24}  {}\n",
        "Date", "Amount", "Note", "ID"
    ));
    output.push_str(&format!(
        "{:-<19}  {:->12}  {:-<24}  {:-<36}\n",
        "", "", "", ""
    ));

    for payment in payments {
        let note = if payment.note.chars().count() > 24 {
            let truncated: String = payment.note.chars().take(23).collect();
            format!("{}…", truncated)
        } else {
            payment.note.clone()
        };

        output.push_str(&format!(
            "{:<19}  {:>12}  {:<24}  {}\n",
            payment.payment_date.format("%Y-%m-%d %H:%M:%S"),
            payment.amount.to_string(),
            note,
            payment.id.as_uuid(),
        ));
    }

    output
}
