use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use ulid::Ulid;

use crate::commands::load_setup;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{
    CustomerDeleteData, CustomerInput, CustomerListData, CustomerRecord, STATUS_UP_TO_DATE,
};
use crate::state::{map_sqlite_error, open_connection};
use crate::{ClientError, ClientResult};

/// Listing order plus the derived fields in one query: overdue customers
/// first, then ascending next due date with a sentinel maximum for customers
/// that have nothing coming due. The stored `status`/`next_due_date` columns
/// are ignored here so the listing stays correct as the calendar advances.
const LIST_CUSTOMERS_SQL: &str = "
    WITH next_due_dates AS (
        SELECT customer_id, MIN(due_date) AS next_due_date
        FROM transactions
        WHERE due_date >= DATE('now')
        GROUP BY customer_id
    ),
    overdue_status AS (
        SELECT DISTINCT
            customer_id,
            CASE
                WHEN EXISTS (
                    SELECT 1
                    FROM transactions t2
                    WHERE t2.customer_id = transactions.customer_id
                      AND t2.due_date < DATE('now')
                      AND t2.type = 'credit'
                ) THEN 'overdue'
                ELSE 'up-to-date'
            END AS current_status
        FROM transactions
    )
    SELECT
        c.customer_id,
        c.name,
        c.phone,
        c.address,
        c.total_credit,
        ndd.next_due_date,
        COALESCE(os.current_status, 'up-to-date') AS status,
        c.created_at
    FROM customers c
    LEFT JOIN next_due_dates ndd ON ndd.customer_id = c.customer_id
    LEFT JOIN overdue_status os ON os.customer_id = c.customer_id
    ORDER BY
        CASE WHEN os.current_status = 'overdue' THEN 0 ELSE 1 END,
        COALESCE(ndd.next_due_date, '9999-12-31')";

#[derive(Debug, Default)]
pub struct CustomerListOptions<'a> {
    pub home_override: Option<&'a Path>,
}

#[derive(Debug, Default)]
pub struct CustomerAddOptions<'a> {
    pub home_override: Option<&'a Path>,
}

#[derive(Debug, Default)]
pub struct CustomerDeleteOptions<'a> {
    pub home_override: Option<&'a Path>,
}

pub fn list() -> ClientResult<SuccessEnvelope> {
    list_with_options(CustomerListOptions {
        home_override: None,
    })
}

#[doc(hidden)]
pub fn list_with_options(options: CustomerListOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(options.home_override)?;
    let db_path = PathBuf::from(&setup.db_path);
    let connection = open_connection(&db_path)?;
    let rows = query_customer_list(&connection, &db_path)?;
    success("customer list", CustomerListData { rows })
}

pub fn query_customer_list(
    connection: &Connection,
    db_path: &Path,
) -> ClientResult<Vec<CustomerRecord>> {
    let mut statement = connection
        .prepare(LIST_CUSTOMERS_SQL)
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let rows_iter = statement
        .query_map([], |row| {
            Ok(CustomerRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                phone: row.get(2)?,
                address: row.get(3)?,
                total_credit: row.get(4)?,
                next_due_date: row.get(5)?,
                status: row.get(6)?,
                created_at: row.get(7)?,
            })
        })
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let mut rows = Vec::new();
    for row in rows_iter {
        rows.push(row.map_err(|error| map_sqlite_error(db_path, &error))?);
    }

    Ok(rows)
}

pub fn add(input: CustomerInput) -> ClientResult<SuccessEnvelope> {
    add_with_options(
        input,
        CustomerAddOptions {
            home_override: None,
        },
    )
}

#[doc(hidden)]
pub fn add_with_options(
    input: CustomerInput,
    options: CustomerAddOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(options.home_override)?;
    let db_path = PathBuf::from(&setup.db_path);
    let connection = open_connection(&db_path)?;
    let record = insert_customer(&connection, &db_path, &input)?;
    success("customer add", record)
}

pub fn insert_customer(
    connection: &Connection,
    db_path: &Path,
    input: &CustomerInput,
) -> ClientResult<CustomerRecord> {
    let customer_id = format!("cus_{}", Ulid::new());
    let created_at = now_timestamp();

    connection
        .execute(
            "INSERT INTO customers (customer_id, name, phone, address, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                &customer_id,
                &input.name,
                &input.phone,
                &input.address,
                &created_at
            ],
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    Ok(CustomerRecord {
        id: customer_id,
        name: input.name.clone(),
        phone: input.phone.clone(),
        address: input.address.clone(),
        total_credit: 0.0,
        next_due_date: None,
        status: STATUS_UP_TO_DATE.to_string(),
        created_at,
    })
}

pub fn delete(customer_id: &str) -> ClientResult<SuccessEnvelope> {
    delete_with_options(
        customer_id,
        CustomerDeleteOptions {
            home_override: None,
        },
    )
}

#[doc(hidden)]
pub fn delete_with_options(
    customer_id: &str,
    options: CustomerDeleteOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(options.home_override)?;
    let db_path = PathBuf::from(&setup.db_path);
    let connection = open_connection(&db_path)?;
    delete_customer(&connection, &db_path, customer_id)?;
    success(
        "customer delete",
        CustomerDeleteData {
            customer_id: customer_id.to_string(),
            deleted: true,
        },
    )
}

/// Removes a customer; their transactions go with them via the cascading
/// foreign key. A missing row and a store failure are distinct errors so the
/// caller can tell "already gone" apart from "delete did not happen".
pub fn delete_customer(
    connection: &Connection,
    db_path: &Path,
    customer_id: &str,
) -> ClientResult<()> {
    let exists = connection
        .query_row(
            "SELECT 1 FROM customers WHERE customer_id = ?1 LIMIT 1",
            [customer_id],
            |_row| Ok(true),
        )
        .optional()
        .map_err(|error| map_sqlite_error(db_path, &error))?
        .unwrap_or(false);

    if !exists {
        return Err(ClientError::customer_not_found(customer_id));
    }

    connection
        .execute("DELETE FROM customers WHERE customer_id = ?1", [customer_id])
        .map_err(|error| ClientError::delete_failed(customer_id, &error.to_string()))?;

    Ok(())
}

pub(crate) fn now_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
