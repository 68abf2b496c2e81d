mod cli;
mod dispatch;
mod output;
mod stdout_io;

use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use khaata_client::ClientError;
use stdout_io::write_stdout_text;

const ROOT_HELP: &str = "Khaata - shopkeeper credit ledger

Usage:
  khaata <command>

Start here:
  khaata customer list
  khaata customer add --name <name>
  khaata txn add --help
";

const TOP_LEVEL_HELP: &str = "Khaata — shopkeeper credit ledger

USAGE: khaata <command>

Track your customers:
  khaata customer add --name <name>                       Add a customer (optional --phone, --address)
  khaata customer list                                    List customers, most urgent repayment first
  khaata customer show <customer-id>                      Show one customer's loans and payments
  khaata customer delete <customer-id>                    Delete a customer and their transactions

Record the day's entries:
  khaata txn add --customer <id> --amount <amt> --type credit --due-date <YYYY-MM-DD>
  khaata txn add --customer <id> --amount <amt> --type payment

Scripting against the ledger:
  khaata api '{\"action\": \"listCustomers\"}'              Send a raw JSON action request
  khaata api --help                                       Read the full action contract

Want machine-readable output?
  Add `--json` to any customer or txn command.
  The api command always answers in JSON.

Having issues/errors?
  Run `khaata txn add --help` for transaction field rules,
  or `khaata <command> --help` for command usage.
";

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(code) => code,
    }
}

fn run() -> Result<ExitCode, ExitCode> {
    let raw_args = std::env::args().collect::<Vec<String>>();
    if raw_args.len() == 1 {
        if write_stdout_text(ROOT_HELP).is_err() {
            return Err(ExitCode::from(2));
        }
        return Ok(ExitCode::SUCCESS);
    }
    let parsed = cli::Cli::try_parse();
    let cli = match parsed {
        Ok(value) => value,
        Err(err) => {
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                if matches!(
                    err.kind(),
                    ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) && is_top_level_help_request(&raw_args)
                {
                    if write_stdout_text(TOP_LEVEL_HELP).is_err() {
                        return Err(ExitCode::from(2));
                    }
                } else if write_stdout_text(&err.to_string()).is_err() {
                    return Err(ExitCode::from(2));
                }
                return Ok(ExitCode::SUCCESS);
            }
            let command_hint = if matches!(
                err.kind(),
                ErrorKind::MissingRequiredArgument
                    | ErrorKind::InvalidValue
                    | ErrorKind::ValueValidation
                    | ErrorKind::WrongNumberOfValues
                    | ErrorKind::UnknownArgument
                    | ErrorKind::InvalidSubcommand
            ) {
                command_path_from_args(&raw_args)
            } else {
                None
            };
            let clean_message = strip_clap_boilerplate(&err.to_string());
            let parse_error =
                parse_error_with_command_hint(&clean_message, command_hint.as_deref());
            let mode = infer_requested_output_mode(&raw_args);
            if output::print_failure(&parse_error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            return Err(ExitCode::from(1));
        }
    };
    let mode = output::mode_for_command(&cli.command);

    let dispatched = dispatch::dispatch(&cli);
    match dispatched {
        Ok(success) => {
            if output::print_success(&success, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            if output::print_failure(&error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(exit_code_for_error(&error))
        }
    }
}

fn is_top_level_help_request(raw_args: &[String]) -> bool {
    raw_args.len() == 2 && matches!(raw_args[1].as_str(), "--help" | "-h")
}

/// Strips clap's trailing boilerplate (Usage line, "For more information" hint)
/// so our "What to do next" section is the single source of guidance.
fn strip_clap_boilerplate(message: &str) -> String {
    let trimmed = if let Some(pos) = message.find("\n\nUsage:") {
        &message[..pos]
    } else if let Some(pos) = message.find("\nFor more information") {
        &message[..pos]
    } else {
        message
    };
    trimmed.trim_end().to_string()
}

/// Builds the subcommand path from raw CLI args for use in help hints.
fn command_path_from_args(raw_args: &[String]) -> Option<String> {
    let non_flags: Vec<&str> = raw_args
        .iter()
        .skip(1)
        .filter(|value| !value.starts_with('-'))
        .map(String::as_str)
        .collect();
    if non_flags.is_empty() {
        return None;
    }

    let hint = match non_flags.as_slice() {
        ["customer", "list", ..] => Some("customer list"),
        ["customer", "add", ..] => Some("customer add"),
        ["customer", "show", ..] => Some("customer show"),
        ["customer", "delete", ..] => Some("customer delete"),
        ["customer", ..] => Some("customer"),
        ["txn", "add", ..] => Some("txn add"),
        ["txn", ..] => Some("txn"),
        ["api", ..] => Some("api"),
        _ => None,
    };
    hint.map(std::string::ToString::to_string)
}

fn parse_error_with_command_hint(clean_message: &str, command_hint: Option<&str>) -> ClientError {
    if command_hint == Some("api") && clean_message.contains("unexpected argument") {
        return ClientError::invalid_argument_with_recovery(
            "The request body must be one quoted JSON argument, or come via --file/--file -.",
            vec![
                "Quote inline JSON: `khaata api '{\"action\": \"listCustomers\"}'`.".to_string(),
                "Use a file path: `khaata api --file request.json`.".to_string(),
                "Use stdin: `cat request.json | khaata api --file -`.".to_string(),
            ],
        );
    }

    ClientError::invalid_argument_for_command(clean_message, command_hint)
}

fn exit_code_for_error(error: &ClientError) -> ExitCode {
    if is_internal_error(error) {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

fn infer_requested_output_mode(raw_args: &[String]) -> output::OutputMode {
    if raw_args.get(1).is_some_and(|value| value == "api") {
        return output::OutputMode::Json;
    }
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        return output::OutputMode::Json;
    }
    output::OutputMode::Text
}

fn is_internal_error(error: &ClientError) -> bool {
    error.code.starts_with("internal_")
        || matches!(
            error.code.as_str(),
            "ledger_init_permission_denied"
                | "ledger_locked"
                | "ledger_corrupt"
                | "migration_failed"
                | "ledger_init_failed"
                | "ledger_failure"
        )
}
