use std::io;

use serde_json::Value;

use super::customer_text::{field_str, rupees};
use super::format;

pub fn render_txn_add(data: &Value) -> io::Result<String> {
    let txn_type = field_str(data, "type");
    let headline = if txn_type == "payment" {
        "Payment recorded."
    } else {
        "Credit recorded."
    };

    let mut entries = vec![
        ("Transaction ID:", field_str(data, "txn_id")),
        ("Customer ID:", field_str(data, "customer_id")),
        ("Type:", txn_type),
        (
            "Amount:",
            rupees(data.get("amount").and_then(Value::as_f64).unwrap_or(0.0)),
        ),
    ];
    if let Some(due_date) = data.get("due_date").and_then(Value::as_str) {
        entries.push(("Due date:", due_date.to_string()));
    }

    let mut lines = vec![headline.to_string(), String::new()];
    lines.extend(format::key_value_rows(&entries, 2));
    lines.push(String::new());
    lines.push("Next step:".to_string());
    lines.push(format!(
        "  khaata customer show {}",
        field_str(data, "customer_id")
    ));
    Ok(lines.join("\n"))
}
