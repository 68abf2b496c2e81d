use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsoDate(pub String);

impl IsoDate {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn parse_iso_date(value: &str) -> Result<IsoDate, String> {
    if value.len() != 10 {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    let bytes = value.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    for index in [0usize, 1, 2, 3, 5, 6, 8, 9] {
        if !bytes[index].is_ascii_digit() {
            return Err("date must use YYYY-MM-DD format".to_string());
        }
    }

    if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
        return Err("date must use valid calendar values".to_string());
    }

    Ok(IsoDate(value.to_string()))
}

pub fn parse_customer_name(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.chars().count() < 2 {
        return Err("name must be at least 2 characters".to_string());
    }
    Ok(trimmed.to_string())
}

pub fn parse_phone(value: &str) -> Result<String, String> {
    let digits = value.strip_prefix('+').unwrap_or(value);
    let valid_shape = digits
        .chars()
        .all(|ch| ch.is_ascii_digit() || ch == ' ' || ch == '-');
    let digit_count = digits.chars().filter(char::is_ascii_digit).count();

    if !valid_shape || digit_count < 10 {
        return Err(
            "phone must have at least 10 digits, with an optional leading `+`".to_string(),
        );
    }
    Ok(value.to_string())
}

pub fn parse_amount(value: &str) -> Result<f64, String> {
    let amount = value
        .parse::<f64>()
        .map_err(|_| "amount must be a number".to_string())?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err("amount must be a positive number".to_string());
    }
    Ok(amount)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TxnKind {
    /// Goods handed over on credit, to be repaid by the due date
    Credit,
    /// Money received against outstanding credit
    Payment,
}

/// Extended help shown after `khaata txn add --help`.
pub const TXN_ADD_AFTER_HELP: &str = "\
How transactions work:
  A `credit` records goods sold on credit. It increases the customer's
  outstanding balance and must carry a repayment due date.

  A `payment` records money received. It decreases the outstanding
  balance and never takes a due date.

  Each recorded transaction also refreshes the customer's stored
  status (`up-to-date` or `overdue`) and next due date.

What to do next:
  1. Find the customer id with `khaata customer list`.
  2. Record the entry:
     khaata txn add --customer cus_... --amount 250 --type credit \\
       --description \"Rice bags\" --due-date 2026-09-30
  3. Review the ledger with `khaata customer show cus_...`.

Field rules:
  --customer (required):
    The `cus_...` id from `khaata customer list`.

  --amount (required):
    A positive number. Use at most 2 decimal places.

  --type (required):
    `credit` or `payment`.

  --due-date (credit only):
    Date only, exactly `YYYY-MM-DD`, today or later.
    Payments are rejected if a due date is supplied.

  --description (optional):
    What was sold or how the payment arrived. Credits without a
    description show up as \"Credit\" in loan summaries.
";

/// Extended help shown after `khaata api --help`.
pub const API_AFTER_HELP: &str = "\
How the api command works:
  It sends one raw JSON request to the ledger endpoint and prints the
  JSON response. This is the same contract the other commands use, so
  it suits scripting and integration testing.

  The request body selects an operation with an `action` field:
    {\"action\": \"listCustomers\"}
    {\"action\": \"addCustomer\", \"customerData\": {\"name\": \"...\"}}
    {\"action\": \"addTransaction\", \"transactionData\": {...}}
    {\"action\": \"getCustomerDetails\", \"customerId\": \"cus_...\"}
    {\"action\": \"deleteCustomer\", \"customerId\": \"cus_...\"}

  Unrecognized actions answer with JSON `null`. Lookup failures answer
  in-band: {\"error\": \"Customer not found\"}.

Ways to pass the body:
  Quote it inline:  khaata api '{\"action\": \"listCustomers\"}'
  From a file:      khaata api --file request.json
  From stdin:       cat request.json | khaata api --file -

Note:
  The api command skips the client-side form checks that
  `customer add` and `txn add` apply. The ledger stores whatever the
  request carries, matching the endpoint contract.
";

#[derive(Debug, Parser)]
#[command(
    name = "khaata",
    version,
    about = "shopkeeper credit ledger",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage the customers in your ledger
    #[command(arg_required_else_help = true)]
    Customer {
        #[command(subcommand)]
        command: CustomerCommand,
    },
    /// Record credit and payment transactions
    #[command(arg_required_else_help = true)]
    Txn {
        #[command(subcommand)]
        command: TxnCommand,
    },
    /// Send a raw JSON action request to the ledger endpoint
    #[command(after_long_help = API_AFTER_HELP)]
    Api {
        /// Inline JSON request body (quote it)
        request: Option<String>,
        /// Read the request body from a file path, or `-` for stdin
        #[arg(long)]
        file: Option<String>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum CustomerCommand {
    /// List customers, most urgent repayment first
    List {
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Add a customer to the ledger
    Add {
        /// Customer name (at least 2 characters)
        #[arg(long, value_parser = parse_customer_name)]
        name: String,
        /// Phone number with at least 10 digits (optional leading `+`)
        #[arg(long, value_parser = parse_phone)]
        phone: Option<String>,
        /// Street address
        #[arg(long)]
        address: Option<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Show one customer with their loans and payments
    Show {
        /// The customer ID to inspect (e.g. cus_abc123)
        customer_id: String,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Delete a customer along with every transaction they hold
    Delete {
        /// The customer ID to delete (e.g. cus_abc123)
        customer_id: String,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum TxnCommand {
    /// Record a credit sale or a repayment against a customer
    #[command(after_long_help = TXN_ADD_AFTER_HELP)]
    Add {
        /// The customer ID the entry belongs to (e.g. cus_abc123)
        #[arg(long)]
        customer: String,
        /// Positive amount in rupees
        #[arg(long, value_parser = parse_amount)]
        amount: f64,
        /// Entry kind: credit or payment
        #[arg(long = "type", value_enum)]
        kind: TxnKind,
        /// What was sold, or how the payment arrived
        #[arg(long)]
        description: Option<String>,
        /// Repayment due date (YYYY-MM-DD, credits only)
        #[arg(long, value_parser = parse_iso_date)]
        due_date: Option<IsoDate>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
