use std::io;

use serde_json::Value;

use super::format::{self, Align, Column};

pub fn render_customer_list(data: &Value) -> io::Result<String> {
    let rows = data
        .get("rows")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("customer list output requires rows"))?;

    if rows.is_empty() {
        let lines = vec![
            "No customers yet.".to_string(),
            String::new(),
            "Add your first customer:".to_string(),
            "  1. khaata customer add --name \"Asha Traders\" --phone \"+91 98765 43210\""
                .to_string(),
            "  2. khaata txn add --help".to_string(),
        ];
        return Ok(lines.join("\n"));
    }

    let overdue_count = rows
        .iter()
        .filter(|row| row.get("status").and_then(Value::as_str) == Some("overdue"))
        .count();

    let mut lines = vec![
        format!(
            "{} customer{}, {} overdue.",
            rows.len(),
            if rows.len() == 1 { "" } else { "s" },
            overdue_count
        ),
        String::new(),
        "Customers:".to_string(),
    ];

    let columns = [
        Column {
            name: "Name",
            align: Align::Left,
        },
        Column {
            name: "Status",
            align: Align::Left,
        },
        Column {
            name: "Outstanding",
            align: Align::Right,
        },
        Column {
            name: "Next Due",
            align: Align::Left,
        },
        Column {
            name: "Customer ID",
            align: Align::Left,
        },
    ];
    let table_rows = rows
        .iter()
        .map(|row| {
            vec![
                field_str(row, "name"),
                field_str(row, "status"),
                rupees(row.get("total_credit").and_then(Value::as_f64).unwrap_or(0.0)),
                row.get("next_due_date")
                    .and_then(Value::as_str)
                    .unwrap_or("none")
                    .to_string(),
                field_str(row, "id"),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    lines.extend(format::render_table_or_blocks(
        &columns,
        &table_rows,
        format::terminal_width(),
        "Customer",
    ));

    Ok(lines.join("\n"))
}

pub fn render_customer_add(data: &Value) -> io::Result<String> {
    let mut lines = vec!["Customer added.".to_string(), String::new()];
    lines.extend(format::key_value_rows(
        &[
            ("Customer ID:", field_str(data, "id")),
            ("Name:", field_str(data, "name")),
            (
                "Phone:",
                data.get("phone")
                    .and_then(Value::as_str)
                    .unwrap_or("none")
                    .to_string(),
            ),
            (
                "Address:",
                data.get("address")
                    .and_then(Value::as_str)
                    .unwrap_or("none")
                    .to_string(),
            ),
            ("Status:", field_str(data, "status")),
        ],
        2,
    ));
    lines.push(String::new());
    lines.push("Next step:".to_string());
    lines.push(format!(
        "  khaata txn add --customer {} --amount <amt> --type credit --due-date <YYYY-MM-DD>",
        field_str(data, "id")
    ));
    Ok(lines.join("\n"))
}

pub fn render_customer_delete(data: &Value) -> io::Result<String> {
    let customer_id = field_str(data, "customer_id");
    let lines = vec![
        "Customer deleted.".to_string(),
        String::new(),
        format!("  Customer ID:  {customer_id}"),
        String::new(),
        "Every transaction held by this customer was removed with them.".to_string(),
    ];
    Ok(lines.join("\n"))
}

pub(super) fn rupees(amount: f64) -> String {
    format!("\u{20b9}{amount:.2}")
}

pub(super) fn field_str(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{render_customer_add, render_customer_delete, render_customer_list};

    #[test]
    fn empty_list_guides_toward_first_customer() {
        let rendered = render_customer_list(&json!({ "rows": [] }));
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("No customers yet."));
            assert!(text.contains("khaata customer add --name"));
        }
    }

    #[test]
    fn list_summarizes_overdue_count() {
        let rendered = render_customer_list(&json!({
            "rows": [
                {"id": "cus_1", "name": "Asha Traders", "status": "overdue",
                 "total_credit": 500.0, "next_due_date": "2026-08-01"},
                {"id": "cus_2", "name": "Meena Stores", "status": "up-to-date",
                 "total_credit": 0.0, "next_due_date": null}
            ]
        }));
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("2 customers, 1 overdue."));
            assert!(text.contains("Asha Traders"));
            assert!(text.contains("\u{20b9}500.00"));
            assert!(text.contains("none"));
        }
    }

    #[test]
    fn add_confirmation_shows_id_and_next_step() {
        let rendered = render_customer_add(&json!({
            "id": "cus_1", "name": "Asha Traders", "phone": null,
            "address": "14 Market Road", "status": "up-to-date"
        }));
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Customer added."));
            assert!(text.contains("Customer ID:  cus_1"));
            assert!(text.contains("Phone:"));
            assert!(text.contains("Next step:"));
            assert!(text.contains("khaata txn add --customer cus_1"));
        }
    }

    #[test]
    fn delete_confirmation_mentions_cascade() {
        let rendered = render_customer_delete(&json!({"customer_id": "cus_1", "deleted": true}));
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Customer deleted."));
            assert!(text.contains("cus_1"));
            assert!(text.contains("removed with them"));
        }
    }
}
