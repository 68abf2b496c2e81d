use std::io;

use serde_json::Value;

use super::customer_text::{field_str, rupees};
use super::format;

pub fn render_customer_show(data: &Value) -> io::Result<String> {
    let customer = data
        .get("customer")
        .ok_or_else(|| io::Error::other("customer show output requires customer"))?;
    let loans = data
        .get("loans")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("customer show output requires loans"))?;

    let mut lines = vec![
        format!("Ledger for {}.", field_str(customer, "name")),
        String::new(),
    ];
    lines.extend(format::key_value_rows(
        &[
            ("Customer ID:", field_str(customer, "id")),
            (
                "Phone:",
                customer
                    .get("phone")
                    .and_then(Value::as_str)
                    .unwrap_or("none")
                    .to_string(),
            ),
            (
                "Address:",
                customer
                    .get("address")
                    .and_then(Value::as_str)
                    .unwrap_or("none")
                    .to_string(),
            ),
            ("Status:", field_str(customer, "status")),
            (
                "Outstanding:",
                rupees(
                    customer
                        .get("total_credit")
                        .and_then(Value::as_f64)
                        .unwrap_or(0.0),
                ),
            ),
            (
                "Next due:",
                customer
                    .get("next_due_date")
                    .and_then(Value::as_str)
                    .unwrap_or("none")
                    .to_string(),
            ),
        ],
        2,
    ));

    if loans.is_empty() {
        lines.push(String::new());
        lines.push("No credit history yet.".to_string());
        lines.push(String::new());
        lines.push("Record the first sale on credit:".to_string());
        lines.push(format!(
            "  khaata txn add --customer {} --amount <amt> --type credit --due-date <YYYY-MM-DD>",
            field_str(customer, "id")
        ));
        return Ok(lines.join("\n"));
    }

    lines.push(String::new());
    lines.push(format!(
        "Loans ({}, most urgent first):",
        loans.len()
    ));

    for (index, loan) in loans.iter().enumerate() {
        lines.push(String::new());
        lines.extend(render_loan(index + 1, loan));
    }

    Ok(lines.join("\n"))
}

fn render_loan(position: usize, loan: &Value) -> Vec<String> {
    let overdue = loan
        .get("is_overdue")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let marker = if overdue { " (OVERDUE)" } else { "" };

    let mut lines = vec![format!(
        "  Loan {position}: {}{marker}",
        field_str(loan, "item_sold")
    )];
    lines.extend(format::key_value_rows(
        &[
            (
                "Credit:",
                rupees(
                    loan.get("credit_amount")
                        .and_then(Value::as_f64)
                        .unwrap_or(0.0),
                ),
            ),
            (
                "Due date:",
                loan.get("due_date")
                    .and_then(Value::as_str)
                    .unwrap_or("none")
                    .to_string(),
            ),
            (
                "Paid:",
                rupees(loan.get("total_paid").and_then(Value::as_f64).unwrap_or(0.0)),
            ),
            (
                "Remaining:",
                rupees(
                    loan.get("remaining_balance")
                        .and_then(Value::as_f64)
                        .unwrap_or(0.0),
                ),
            ),
        ],
        4,
    ));

    let payments = loan
        .get("payments")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    if payments.is_empty() {
        lines.push("    No payments received yet.".to_string());
        return lines;
    }

    lines.push(format!("    Payments ({}):", payments.len()));
    for payment in &payments {
        let amount = rupees(payment.get("amount").and_then(Value::as_f64).unwrap_or(0.0));
        let date = payment
            .get("date")
            .and_then(Value::as_str)
            .map(|value| value.split('T').next().unwrap_or(value))
            .unwrap_or("unknown");
        let note = payment
            .get("description")
            .and_then(Value::as_str)
            .map(|text| format!(" ({text})"))
            .unwrap_or_default();
        lines.push(format!("      {date}  {amount}{note}"));
    }

    lines
}
