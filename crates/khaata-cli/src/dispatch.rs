use std::io::Read;

use chrono::{NaiveDate, Utc};
use khaata_client::contracts::envelope;
use khaata_client::contracts::types::CustomerInput;
use khaata_client::contracts::types::TransactionInput;
use khaata_client::{ClientError, ClientResult, SuccessEnvelope, api, commands};
use serde_json::Value;

use crate::cli::{Cli, Commands, CustomerCommand, IsoDate, TxnCommand, TxnKind};

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Customer { command } => match command {
            CustomerCommand::List { .. } => commands::customers::list(),
            CustomerCommand::Add {
                name,
                phone,
                address,
                ..
            } => commands::customers::add(CustomerInput {
                name: name.clone(),
                phone: phone.clone(),
                address: address.clone(),
            }),
            CustomerCommand::Show { customer_id, .. } => commands::details::show(customer_id),
            CustomerCommand::Delete { customer_id, .. } => commands::customers::delete(customer_id),
        },
        Commands::Txn { command } => match command {
            TxnCommand::Add {
                customer,
                amount,
                kind,
                description,
                due_date,
                ..
            } => {
                validate_due_date(*kind, due_date.as_ref(), Utc::now().date_naive())?;
                commands::transactions::add(TransactionInput {
                    customer_id: customer.clone(),
                    amount: *amount,
                    txn_type: txn_kind_label(*kind).to_string(),
                    description: description.clone(),
                    due_date: due_date.as_ref().map(|date| date.as_str().to_string()),
                })
            }
        },
        Commands::Api { request, file } => {
            let body = read_api_body(request.as_deref(), file.as_deref())?;
            let response = api::handle(&body)?;
            envelope::success("api", response)
        }
    }
}

fn txn_kind_label(kind: TxnKind) -> &'static str {
    match kind {
        TxnKind::Credit => "credit",
        TxnKind::Payment => "payment",
    }
}

/// Cross-field form checks the individual value parsers cannot express:
/// credits need a due date that has not already passed, payments take none.
fn validate_due_date(
    kind: TxnKind,
    due_date: Option<&IsoDate>,
    today: NaiveDate,
) -> ClientResult<()> {
    match (kind, due_date) {
        (TxnKind::Credit, None) => Err(ClientError::invalid_argument_for_command(
            "Credits need a repayment date: pass `--due-date YYYY-MM-DD`.",
            Some("txn add"),
        )),
        (TxnKind::Credit, Some(date)) => {
            let parsed = NaiveDate::parse_from_str(date.as_str(), "%Y-%m-%d").map_err(|_| {
                ClientError::invalid_argument_for_command(
                    "Due date must use valid YYYY-MM-DD calendar values.",
                    Some("txn add"),
                )
            })?;
            if parsed < today {
                return Err(ClientError::invalid_argument_for_command(
                    "Due date cannot be in the past.",
                    Some("txn add"),
                ));
            }
            Ok(())
        }
        (TxnKind::Payment, Some(_)) => Err(ClientError::invalid_argument_for_command(
            "Payments do not take a due date: drop `--due-date`.",
            Some("txn add"),
        )),
        (TxnKind::Payment, None) => Ok(()),
    }
}

fn read_api_body(request: Option<&str>, file: Option<&str>) -> ClientResult<Value> {
    let raw = match (request, file) {
        (Some(_), Some(_)) => {
            return Err(ClientError::invalid_argument_with_recovery(
                "Both an inline request and --file were provided; pick one source.",
                vec![
                    "Quote inline JSON: `khaata api '{\"action\": \"listCustomers\"}'`.".to_string(),
                    "Or use a file path: `khaata api --file request.json`.".to_string(),
                ],
            ));
        }
        (Some(inline), None) => inline.to_string(),
        (None, Some("-")) => read_stdin_body()?,
        (None, Some(path)) => std::fs::read_to_string(path).map_err(|error| {
            ClientError::invalid_argument_for_command(
                &format!("Could not read request file `{path}`: {error}"),
                Some("api"),
            )
        })?,
        (None, None) => {
            return Err(ClientError::invalid_argument_with_recovery(
                "No request body was provided.",
                vec![
                    "Quote inline JSON: `khaata api '{\"action\": \"listCustomers\"}'`.".to_string(),
                    "Use a file path: `khaata api --file request.json`.".to_string(),
                    "Use stdin: `cat request.json | khaata api --file -`.".to_string(),
                ],
            ));
        }
    };

    if raw.trim().is_empty() {
        return Err(ClientError::invalid_argument_for_command(
            "Request body is empty (stdin or file held no JSON).",
            Some("api"),
        ));
    }

    serde_json::from_str(&raw).map_err(|error| {
        ClientError::invalid_argument_for_command(
            &format!("Request body is not valid JSON: {error}"),
            Some("api"),
        )
    })
}

fn read_stdin_body() -> ClientResult<String> {
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|error| {
            ClientError::invalid_argument_for_command(
                &format!("Could not read request body from stdin: {error}"),
                Some("api"),
            )
        })?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::cli::{IsoDate, TxnKind};

    use super::{read_api_body, validate_due_date};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 30).unwrap_or_default()
    }

    #[test]
    fn credit_without_due_date_is_rejected() {
        let checked = validate_due_date(TxnKind::Credit, None, today());
        assert!(checked.is_err());
        if let Err(error) = checked {
            assert_eq!(error.code, "invalid_argument");
        }
    }

    #[test]
    fn credit_due_today_or_later_is_accepted() {
        let due_today = IsoDate("2026-08-30".to_string());
        assert!(validate_due_date(TxnKind::Credit, Some(&due_today), today()).is_ok());

        let due_later = IsoDate("2026-09-15".to_string());
        assert!(validate_due_date(TxnKind::Credit, Some(&due_later), today()).is_ok());
    }

    #[test]
    fn credit_due_in_the_past_is_rejected() {
        let past = IsoDate("2026-08-29".to_string());
        let checked = validate_due_date(TxnKind::Credit, Some(&past), today());
        assert!(checked.is_err());
    }

    #[test]
    fn payment_with_due_date_is_rejected() {
        let date = IsoDate("2026-09-15".to_string());
        let checked = validate_due_date(TxnKind::Payment, Some(&date), today());
        assert!(checked.is_err());

        assert!(validate_due_date(TxnKind::Payment, None, today()).is_ok());
    }

    #[test]
    fn inline_api_body_must_be_json() {
        let parsed = read_api_body(Some("{\"action\": \"listCustomers\"}"), None);
        assert!(parsed.is_ok());

        let rejected = read_api_body(Some("not json"), None);
        assert!(rejected.is_err());
    }

    #[test]
    fn missing_and_conflicting_api_sources_are_rejected() {
        let missing = read_api_body(None, None);
        assert!(missing.is_err());

        let conflicting = read_api_body(Some("{}"), Some("request.json"));
        assert!(conflicting.is_err());
    }
}
