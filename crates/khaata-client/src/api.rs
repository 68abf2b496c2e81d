//! The single ledger endpoint: a JSON body with an `action` tag selects one
//! of the five operations. Success and the two in-band failures come back as
//! plain JSON values shaped like the wire contract; store-level failures
//! (locked, corrupt, migration) still surface as `ClientError`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Value, json};

use crate::commands::customers::{delete_customer, insert_customer, query_customer_list};
use crate::commands::details::query_customer_details;
use crate::commands::load_setup;
use crate::commands::transactions::record_transaction;
use crate::contracts::types::{CustomerInput, TransactionInput};
use crate::state::open_connection;
use crate::{ClientError, ClientResult};

pub const NOT_FOUND_MESSAGE: &str = "Customer not found";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete customer";

#[derive(Debug, Deserialize)]
#[serde(tag = "action")]
pub enum ApiRequest {
    #[serde(rename = "listCustomers")]
    ListCustomers,
    #[serde(rename = "addCustomer")]
    AddCustomer {
        #[serde(rename = "customerData")]
        customer_data: CustomerInput,
    },
    #[serde(rename = "addTransaction")]
    AddTransaction {
        #[serde(rename = "transactionData")]
        transaction_data: TransactionInput,
    },
    #[serde(rename = "getCustomerDetails")]
    GetCustomerDetails {
        #[serde(rename = "customerId")]
        customer_id: String,
    },
    #[serde(rename = "deleteCustomer")]
    DeleteCustomer {
        #[serde(rename = "customerId")]
        customer_id: String,
    },
    /// Unrecognized actions deserialize here and answer with JSON `null`
    /// rather than an error.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Default)]
pub struct HandleOptions<'a> {
    pub home_override: Option<&'a Path>,
}

pub fn handle(body: &Value) -> ClientResult<Value> {
    handle_with_options(body, HandleOptions::default())
}

#[doc(hidden)]
pub fn handle_with_options(body: &Value, options: HandleOptions<'_>) -> ClientResult<Value> {
    let request: ApiRequest = serde_json::from_value(body.clone()).map_err(|error| {
        ClientError::invalid_argument(&format!(
            "Request body does not match the action contract: {error}"
        ))
    })?;

    let setup = load_setup(options.home_override)?;
    let db_path = PathBuf::from(&setup.db_path);

    match request {
        ApiRequest::ListCustomers => {
            let connection = open_connection(&db_path)?;
            let rows = query_customer_list(&connection, &db_path)?;
            to_json(&rows)
        }
        ApiRequest::AddCustomer { customer_data } => {
            let connection = open_connection(&db_path)?;
            let record = insert_customer(&connection, &db_path, &customer_data)?;
            to_json(&record)
        }
        ApiRequest::AddTransaction { transaction_data } => {
            let mut connection = open_connection(&db_path)?;
            record_transaction(&mut connection, &db_path, &transaction_data)?;
            Ok(json!({ "success": true }))
        }
        ApiRequest::GetCustomerDetails { customer_id } => {
            let connection = open_connection(&db_path)?;
            match query_customer_details(&connection, &db_path, &customer_id) {
                Ok(details) => to_json(&details),
                Err(error) if error.code == "customer_not_found" => {
                    Ok(json!({ "error": NOT_FOUND_MESSAGE }))
                }
                Err(error) => Err(error),
            }
        }
        ApiRequest::DeleteCustomer { customer_id } => {
            let connection = open_connection(&db_path)?;
            match delete_customer(&connection, &db_path, &customer_id) {
                Ok(()) => Ok(json!({ "success": true })),
                Err(error) if error.code == "customer_not_found" => {
                    Ok(json!({ "error": NOT_FOUND_MESSAGE }))
                }
                Err(error) if error.code == "delete_failed" => {
                    Ok(json!({ "error": DELETE_FAILED_MESSAGE }))
                }
                Err(error) => Err(error),
            }
        }
        ApiRequest::Unknown => Ok(Value::Null),
    }
}

fn to_json<T>(data: &T) -> ClientResult<Value>
where
    T: serde::Serialize,
{
    serde_json::to_value(data).map_err(|error| ClientError::internal_serialization(&error.to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::ApiRequest;

    #[test]
    fn action_tag_selects_the_operation() {
        let request: Result<ApiRequest, _> =
            serde_json::from_value(json!({ "action": "listCustomers" }));
        assert!(matches!(request, Ok(ApiRequest::ListCustomers)));
    }

    #[test]
    fn unrecognized_action_becomes_unknown() {
        let request: Result<ApiRequest, _> =
            serde_json::from_value(json!({ "action": "exportLedger" }));
        assert!(matches!(request, Ok(ApiRequest::Unknown)));
    }

    #[test]
    fn transaction_payload_keeps_wire_field_names() {
        let request: Result<ApiRequest, _> = serde_json::from_value(json!({
            "action": "addTransaction",
            "transactionData": {
                "customer_id": "cus_1",
                "amount": 250.0,
                "type": "credit",
                "description": "rice bags",
                "due_date": "2026-10-01"
            }
        }));

        assert!(request.is_ok());
        if let Ok(ApiRequest::AddTransaction { transaction_data }) = request {
            assert_eq!(transaction_data.txn_type, "credit");
            assert_eq!(transaction_data.due_date.as_deref(), Some("2026-10-01"));
        }
    }

    #[test]
    fn missing_action_field_is_rejected() {
        let request: Result<ApiRequest, _> = serde_json::from_value(json!({ "customerId": "x" }));
        assert!(request.is_err());
    }
}
