use std::io;

use khaata_client::{ClientError, SuccessEnvelope};
use serde::Serialize;
use serde_json::{Value, json};

const JSON_VERSION: &str = "v1";

pub fn render_success_json(success: &SuccessEnvelope) -> io::Result<String> {
    let value = match success.command.as_str() {
        // Listing answers with the bare row array, matching the endpoint.
        "customer list" => render_customer_list_json(&success.data),
        // The api command echoes the endpoint response untouched.
        "api" => success.data.clone(),
        "customer add" | "customer show" | "customer delete" | "txn add" => {
            render_envelope_json(&success.data)
        }
        _ => {
            return Err(io::Error::other(format!(
                "JSON output is not supported for command `{}`",
                success.command
            )));
        }
    };

    serialize_json_pretty(&value)
}

pub fn render_error_json(error: &ClientError) -> io::Result<String> {
    let mut contract = json!({
        "code": error.code,
        "message": error.message,
        "recovery_steps": error.recovery_steps,
    });
    if let Some(data) = &error.data {
        if let Some(fields) = contract.as_object_mut() {
            fields.insert("data".to_string(), data.clone());
        }
    }
    serialize_json_pretty(&json!({ "error": contract }))
}

fn render_customer_list_json(data: &Value) -> Value {
    let rows = data
        .get("rows")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    Value::Array(rows)
}

fn render_envelope_json(data: &Value) -> Value {
    json!({
        "ok": true,
        "version": JSON_VERSION,
        "data": data.clone()
    })
}

fn serialize_json_pretty<T>(value: &T) -> io::Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}
