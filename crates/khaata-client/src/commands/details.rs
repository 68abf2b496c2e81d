use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension, params};

use crate::commands::load_setup;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{
    CustomerDetailsData, CustomerRecord, LoanRecord, PaymentRecord, TXN_TYPE_CREDIT,
    TXN_TYPE_PAYMENT,
};
use crate::state::{map_sqlite_error, open_connection};
use crate::{ClientError, ClientResult};

const LOAN_DUE_DATE_SENTINEL: &str = "9999-12-31";

/// A credit row counts as overdue once its due date has passed and the
/// payments recorded on/after it no longer cover the credit amount. The
/// payment sum is per customer, not per loan, which mirrors the loan
/// grouping heuristic below.
const CUSTOMER_TRANSACTIONS_SQL: &str = "
    SELECT
        t.txn_id,
        t.amount,
        t.type,
        t.description,
        t.due_date,
        t.transaction_date,
        CASE
            WHEN t.type = 'credit'
             AND t.due_date < DATE('now')
             AND (
                 SELECT COALESCE(SUM(amount), 0)
                 FROM transactions
                 WHERE customer_id = ?1
                   AND type = 'payment'
                   AND transaction_date >= t.transaction_date
             ) < t.amount
            THEN 1
            ELSE 0
        END AS is_overdue
    FROM transactions t
    WHERE t.customer_id = ?1
    ORDER BY t.transaction_date DESC";

#[derive(Debug, Default)]
pub struct CustomerShowOptions<'a> {
    pub home_override: Option<&'a Path>,
}

#[derive(Debug, Clone)]
struct LedgerRow {
    txn_id: String,
    amount: f64,
    txn_type: String,
    description: Option<String>,
    due_date: Option<String>,
    transaction_date: String,
    is_overdue: bool,
}

pub fn show(customer_id: &str) -> ClientResult<SuccessEnvelope> {
    show_with_options(
        customer_id,
        CustomerShowOptions {
            home_override: None,
        },
    )
}

#[doc(hidden)]
pub fn show_with_options(
    customer_id: &str,
    options: CustomerShowOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(options.home_override)?;
    let db_path = PathBuf::from(&setup.db_path);
    let connection = open_connection(&db_path)?;
    let data = query_customer_details(&connection, &db_path, customer_id)?;
    success("customer show", data)
}

pub fn query_customer_details(
    connection: &Connection,
    db_path: &Path,
    customer_id: &str,
) -> ClientResult<CustomerDetailsData> {
    let customer = fetch_customer(connection, db_path, customer_id)?
        .ok_or_else(|| ClientError::customer_not_found(customer_id))?;

    let rows = fetch_ledger_rows(connection, db_path, customer_id)?;
    let loans = group_loans(&rows);

    Ok(CustomerDetailsData { customer, loans })
}

fn fetch_customer(
    connection: &Connection,
    db_path: &Path,
    customer_id: &str,
) -> ClientResult<Option<CustomerRecord>> {
    connection
        .query_row(
            "SELECT customer_id, name, phone, address, total_credit,
                    next_due_date, status, created_at
             FROM customers
             WHERE customer_id = ?1",
            [customer_id],
            |row| {
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
            },
        )
        .optional()
        .map_err(|error| map_sqlite_error(db_path, &error))
}

fn fetch_ledger_rows(
    connection: &Connection,
    db_path: &Path,
    customer_id: &str,
) -> ClientResult<Vec<LedgerRow>> {
    let mut statement = connection
        .prepare(CUSTOMER_TRANSACTIONS_SQL)
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let rows_iter = statement
        .query_map(params![customer_id], |row| {
            Ok(LedgerRow {
                txn_id: row.get(0)?,
                amount: row.get(1)?,
                txn_type: row.get(2)?,
                description: row.get(3)?,
                due_date: row.get(4)?,
                transaction_date: row.get(5)?,
                is_overdue: row.get::<_, i64>(6)? != 0,
            })
        })
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let mut rows = Vec::new();
    for row in rows_iter {
        rows.push(row.map_err(|error| map_sqlite_error(db_path, &error))?);
    }

    Ok(rows)
}

/// Groups the transaction history into loans: each credit picks up every
/// payment dated on/after it. With several outstanding credits one payment
/// lands under each of them; the double attribution is deliberate and must
/// not be collapsed into a first-in-first-out allocation here.
fn group_loans(rows: &[LedgerRow]) -> Vec<LoanRecord> {
    let mut loans: Vec<LoanRecord> = rows
        .iter()
        .filter(|row| row.txn_type == TXN_TYPE_CREDIT)
        .map(|credit| {
            let payments: Vec<PaymentRecord> = rows
                .iter()
                .filter(|row| {
                    row.txn_type == TXN_TYPE_PAYMENT
                        && row.transaction_date.as_str() >= credit.transaction_date.as_str()
                })
                .map(|payment| PaymentRecord {
                    amount: payment.amount,
                    date: payment.transaction_date.clone(),
                    description: payment.description.clone(),
                })
                .collect();

            let total_paid: f64 = payments.iter().map(|payment| payment.amount).sum();
            let item_sold = match credit.description.as_deref() {
                Some(text) if !text.is_empty() => text.to_string(),
                _ => "Credit".to_string(),
            };

            LoanRecord {
                id: credit.txn_id.clone(),
                credit_amount: credit.amount,
                item_sold,
                due_date: credit.due_date.clone(),
                credit_date: credit.transaction_date.clone(),
                total_paid,
                remaining_balance: credit.amount - total_paid,
                is_overdue: credit.is_overdue,
                payments,
            }
        })
        .collect();

    loans.sort_by(|left, right| {
        right
            .is_overdue
            .cmp(&left.is_overdue)
            .then_with(|| sort_due_date(left).cmp(sort_due_date(right)))
    });

    loans
}

fn sort_due_date(loan: &LoanRecord) -> &str {
    loan.due_date.as_deref().unwrap_or(LOAN_DUE_DATE_SENTINEL)
}

#[cfg(test)]
mod tests {
    use super::{LedgerRow, group_loans};

    fn credit(txn_id: &str, amount: f64, date: &str, due: &str, overdue: bool) -> LedgerRow {
        LedgerRow {
            txn_id: txn_id.to_string(),
            amount,
            txn_type: "credit".to_string(),
            description: None,
            due_date: Some(due.to_string()),
            transaction_date: date.to_string(),
            is_overdue: overdue,
        }
    }

    fn payment(txn_id: &str, amount: f64, date: &str) -> LedgerRow {
        LedgerRow {
            txn_id: txn_id.to_string(),
            amount,
            txn_type: "payment".to_string(),
            description: None,
            due_date: None,
            transaction_date: date.to_string(),
            is_overdue: false,
        }
    }

    #[test]
    fn payment_after_credit_reduces_remaining_balance() {
        let rows = vec![
            payment("txn_p1", 400.0, "2024-02-10T00:00:00Z"),
            credit("txn_c1", 1000.0, "2024-01-01T00:00:00Z", "2024-01-20", true),
        ];

        let loans = group_loans(&rows);
        assert_eq!(loans.len(), 1);
        assert_eq!(loans[0].total_paid, 400.0);
        assert_eq!(loans[0].remaining_balance, 600.0);
        assert!(loans[0].is_overdue);
    }

    #[test]
    fn payment_before_credit_is_not_attributed() {
        let rows = vec![
            credit("txn_c1", 500.0, "2024-03-01T00:00:00Z", "2024-04-01", false),
            payment("txn_p1", 200.0, "2024-02-01T00:00:00Z"),
        ];

        let loans = group_loans(&rows);
        assert_eq!(loans.len(), 1);
        assert_eq!(loans[0].total_paid, 0.0);
        assert_eq!(loans[0].remaining_balance, 500.0);
    }

    #[test]
    fn one_payment_lands_under_every_earlier_credit() {
        let rows = vec![
            payment("txn_p1", 300.0, "2024-03-15T00:00:00Z"),
            credit("txn_c2", 700.0, "2024-02-01T00:00:00Z", "2024-05-01", false),
            credit("txn_c1", 1000.0, "2024-01-01T00:00:00Z", "2024-04-01", false),
        ];

        let loans = group_loans(&rows);
        assert_eq!(loans.len(), 2);
        assert!(loans.iter().all(|loan| loan.total_paid == 300.0));
    }

    #[test]
    fn overdue_loans_sort_before_upcoming_ones() {
        let rows = vec![
            credit("txn_c1", 100.0, "2024-01-01T00:00:00Z", "2024-01-10", false),
            credit("txn_c2", 200.0, "2024-01-02T00:00:00Z", "2024-01-05", true),
        ];

        let loans = group_loans(&rows);
        assert_eq!(loans[0].id, "txn_c2");
        assert_eq!(loans[1].id, "txn_c1");
    }

    #[test]
    fn missing_description_falls_back_to_generic_label() {
        let rows = vec![credit(
            "txn_c1",
            100.0,
            "2024-01-01T00:00:00Z",
            "2024-02-01",
            false,
        )];

        let loans = group_loans(&rows);
        assert_eq!(loans[0].item_sold, "Credit");
    }
}
