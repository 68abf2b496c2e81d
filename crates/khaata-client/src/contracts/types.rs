use serde::{Deserialize, Serialize};

pub const STATUS_UP_TO_DATE: &str = "up-to-date";
pub const STATUS_OVERDUE: &str = "overdue";

pub const TXN_TYPE_CREDIT: &str = "credit";
pub const TXN_TYPE_PAYMENT: &str = "payment";

/// A customer row enriched with the derived listing fields. `next_due_date`
/// and `status` are recomputed from the transactions table at read time, not
/// taken from the stored columns.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerRecord {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub total_credit: f64,
    pub next_due_date: Option<String>,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerListData {
    pub rows: Vec<CustomerRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerInput {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Payload for recording a ledger transaction. The service stores the fields
/// as given; whether `type` is a known value or `amount` is positive is the
/// caller's concern (form validation lives in the client layer).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionInput {
    pub customer_id: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub txn_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionAddData {
    pub txn_id: String,
    pub customer_id: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub txn_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentRecord {
    pub amount: f64,
    pub date: String,
    pub description: Option<String>,
}

/// One credit transaction with every payment dated on/after it. A payment can
/// appear under more than one loan when a customer holds several credits; that
/// attribution heuristic is part of the contract, not an aggregation bug.
#[derive(Debug, Clone, Serialize)]
pub struct LoanRecord {
    pub id: String,
    pub credit_amount: f64,
    pub item_sold: String,
    pub due_date: Option<String>,
    pub credit_date: String,
    pub total_paid: f64,
    pub remaining_balance: f64,
    pub is_overdue: bool,
    pub payments: Vec<PaymentRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerDetailsData {
    pub customer: CustomerRecord,
    pub loans: Vec<LoanRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerDeleteData {
    pub customer_id: String,
    pub deleted: bool,
}
