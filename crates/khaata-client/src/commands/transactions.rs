use std::path::{Path, PathBuf};

use rusqlite::{Connection, TransactionBehavior, params};
use ulid::Ulid;

use crate::ClientResult;
use crate::commands::customers::now_timestamp;
use crate::commands::load_setup;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{TXN_TYPE_CREDIT, TransactionAddData, TransactionInput};
use crate::state::{map_sqlite_error, open_connection};

#[derive(Debug, Default)]
pub struct TransactionAddOptions<'a> {
    pub home_override: Option<&'a Path>,
}

pub fn add(input: TransactionInput) -> ClientResult<SuccessEnvelope> {
    add_with_options(
        input,
        TransactionAddOptions {
            home_override: None,
        },
    )
}

#[doc(hidden)]
pub fn add_with_options(
    input: TransactionInput,
    options: TransactionAddOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(options.home_override)?;
    let db_path = PathBuf::from(&setup.db_path);
    let mut connection = open_connection(&db_path)?;
    let txn_id = record_transaction(&mut connection, &db_path, &input)?;
    success(
        "txn add",
        TransactionAddData {
            txn_id,
            customer_id: input.customer_id,
            amount: input.amount,
            txn_type: input.txn_type,
            due_date: input.due_date,
        },
    )
}

/// Writes one ledger entry as a single all-or-nothing unit: the transaction
/// row, the running balance adjustment, and the refresh of the customer's
/// stored `next_due_date`/`status`. A partial commit would leave
/// `total_credit` out of sync with the transaction history, so the three
/// statements share one immediate transaction.
///
/// Nothing here checks that `type` is a known value or that `amount` is
/// positive; anything the store accepts is recorded as given. Unknown types
/// adjust the balance like a payment.
pub fn record_transaction(
    connection: &mut Connection,
    db_path: &Path,
    input: &TransactionInput,
) -> ClientResult<String> {
    let txn_id = format!("txn_{}", Ulid::new());
    let transaction_date = now_timestamp();

    let transaction = connection
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    transaction
        .execute(
            "INSERT INTO transactions
                (txn_id, customer_id, amount, type, description, due_date, transaction_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                &txn_id,
                &input.customer_id,
                input.amount,
                &input.txn_type,
                &input.description,
                &input.due_date,
                &transaction_date
            ],
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let credit_change = if input.txn_type == TXN_TYPE_CREDIT {
        input.amount
    } else {
        -input.amount
    };

    transaction
        .execute(
            "UPDATE customers
             SET total_credit = total_credit + ?2
             WHERE customer_id = ?1",
            params![&input.customer_id, credit_change],
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    transaction
        .execute(
            "UPDATE customers
             SET next_due_date = (
                     SELECT MIN(due_date)
                     FROM transactions
                     WHERE customer_id = ?1
                       AND due_date >= DATE('now')
                 ),
                 status = CASE
                     WHEN EXISTS (
                         SELECT 1
                         FROM transactions
                         WHERE customer_id = ?1
                           AND due_date < DATE('now')
                           AND type = 'credit'
                     ) THEN 'overdue'
                     ELSE 'up-to-date'
                 END
             WHERE customer_id = ?1",
            [&input.customer_id],
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    transaction
        .commit()
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    Ok(txn_id)
}
