use rusqlite::Connection;
use rusqlite_migration::{M, Migrations};

const BOOTSTRAP_SQL: &str = include_str!("migrations/0001_bootstrap.sql");

pub const REQUIRED_META_KEYS: [(&str, &str); 2] = [
    ("schema_version", "v1"),
    ("ledger_contract_version", "v1"),
];

/// Index names paired with the canonical SQL used to recreate them when a
/// ledger file lost them (for example after a manual `DROP INDEX`).
pub const REQUIRED_INDEXES: [(&str, &str); 3] = [
    (
        "idx_transactions_customer_id",
        "CREATE INDEX idx_transactions_customer_id ON transactions (customer_id)",
    ),
    (
        "idx_transactions_customer_due_date",
        "CREATE INDEX idx_transactions_customer_due_date ON transactions (customer_id, due_date)",
    ),
    (
        "idx_transactions_customer_date",
        "CREATE INDEX idx_transactions_customer_date ON transactions (customer_id, transaction_date)",
    ),
];

pub fn run_pending(conn: &mut Connection) -> rusqlite_migration::Result<()> {
    let migrations = Migrations::new(vec![M::up(BOOTSTRAP_SQL)]);
    migrations.to_latest(conn)
}

pub const EXPECTED_USER_VERSION: i64 = 1;
