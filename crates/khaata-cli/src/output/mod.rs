mod customer_text;
mod detail_text;
mod error_text;
mod format;
mod json;
mod mode;
mod txn_text;

use std::io;

use khaata_client::{ClientError, SuccessEnvelope};

use crate::stdout_io::write_stdout_line;

pub use mode::{OutputMode, mode_for_command};

pub fn print_success(success: &SuccessEnvelope, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Text => render_text_success(success)?,
        OutputMode::Json => json::render_success_json(success)?,
    };
    write_stdout_line(&body)
}

pub fn print_failure(error: &ClientError, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Json => json::render_error_json(error)?,
        OutputMode::Text => error_text::render_error(error),
    };
    write_stdout_line(&body)
}

fn render_text_success(success: &SuccessEnvelope) -> io::Result<String> {
    match success.command.as_str() {
        "customer list" => customer_text::render_customer_list(&success.data),
        "customer add" => customer_text::render_customer_add(&success.data),
        "customer delete" => customer_text::render_customer_delete(&success.data),
        "customer show" => detail_text::render_customer_show(&success.data),
        "txn add" => txn_text::render_txn_add(&success.data),
        _ => Err(io::Error::other(format!(
            "unsupported text output command `{}`",
            success.command
        ))),
    }
}
