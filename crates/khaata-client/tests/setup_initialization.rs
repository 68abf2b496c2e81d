use std::fs;
use std::path::{Path, PathBuf};

use khaata_client::setup::{SetupContext, ensure_initialized_at};
use rusqlite::{Connection, OptionalExtension};
use tempfile::tempdir;

fn temp_home() -> std::io::Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempdir()?;
    let home = dir.path().join("ledger-home");
    Ok((dir, home))
}

fn db_path(home: &Path) -> PathBuf {
    home.join("khaata.db")
}

fn initialize(home: &Path) -> SetupContext {
    let result = ensure_initialized_at(home);
    assert!(result.is_ok());
    result.unwrap_or(SetupContext {
        db_path: String::new(),
        schema_version: String::new(),
    })
}

fn object_exists(path: &Path, object_type: &str, name: &str) -> bool {
    let connection = Connection::open(path);
    assert!(connection.is_ok());
    if let Ok(conn) = connection {
        let found = conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = ?1 AND name = ?2 LIMIT 1",
                [object_type, name],
                |_row| Ok(true),
            )
            .optional();
        assert!(found.is_ok());
        return found.ok().flatten().unwrap_or(false);
    }
    false
}

fn meta_value(path: &Path, key: &str) -> Option<String> {
    let connection = Connection::open(path).ok()?;
    connection
        .query_row(
            "SELECT value FROM internal_meta WHERE key = ?1 LIMIT 1",
            [key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .ok()
        .flatten()
}

#[test]
fn first_run_creates_the_ledger_with_tables_and_meta() {
    let temp = temp_home();
    assert!(temp.is_ok());
    if let Ok((_temp, home)) = temp {
        let context = initialize(&home);
        assert_eq!(context.schema_version, "v1");

        let path = db_path(&home);
        assert!(path.exists());
        assert!(object_exists(&path, "table", "customers"));
        assert!(object_exists(&path, "table", "transactions"));
        assert!(object_exists(&path, "table", "internal_meta"));
        assert!(object_exists(&path, "index", "idx_transactions_customer_id"));
        assert_eq!(meta_value(&path, "schema_version"), Some("v1".to_string()));
        assert_eq!(
            meta_value(&path, "ledger_contract_version"),
            Some("v1".to_string())
        );
    }
}

#[test]
fn reinitializing_an_existing_ledger_is_a_no_op() {
    let temp = temp_home();
    assert!(temp.is_ok());
    if let Ok((_temp, home)) = temp {
        initialize(&home);

        let path = db_path(&home);
        let seeded = Connection::open(&path).and_then(|conn| {
            conn.execute(
                "INSERT INTO customers (customer_id, name, created_at)
                 VALUES ('cus_keep', 'Keep Me', '2024-01-01T00:00:00Z')",
                [],
            )
        });
        assert!(seeded.is_ok());

        let context = initialize(&home);
        assert_eq!(context.schema_version, "v1");

        let survived = Connection::open(&path).and_then(|conn| {
            conn.query_row("SELECT COUNT(*) FROM customers", [], |row| {
                row.get::<_, i64>(0)
            })
        });
        assert!(survived.is_ok());
        assert_eq!(survived.unwrap_or(0), 1);
    }
}

#[test]
fn dropped_index_is_recreated_on_the_next_run() {
    let temp = temp_home();
    assert!(temp.is_ok());
    if let Ok((_temp, home)) = temp {
        initialize(&home);

        let path = db_path(&home);
        let dropped = Connection::open(&path)
            .and_then(|conn| conn.execute("DROP INDEX idx_transactions_customer_due_date", []));
        assert!(dropped.is_ok());
        assert!(!object_exists(
            &path,
            "index",
            "idx_transactions_customer_due_date"
        ));

        initialize(&home);
        assert!(object_exists(
            &path,
            "index",
            "idx_transactions_customer_due_date"
        ));
    }
}

#[test]
fn missing_meta_key_is_restored_on_the_next_run() {
    let temp = temp_home();
    assert!(temp.is_ok());
    if let Ok((_temp, home)) = temp {
        initialize(&home);

        let path = db_path(&home);
        let removed = Connection::open(&path).and_then(|conn| {
            conn.execute(
                "DELETE FROM internal_meta WHERE key = 'ledger_contract_version'",
                [],
            )
        });
        assert!(removed.is_ok());

        initialize(&home);
        assert_eq!(
            meta_value(&path, "ledger_contract_version"),
            Some("v1".to_string())
        );
    }
}

#[test]
fn garbage_database_file_is_reported_as_corrupt() {
    let temp = temp_home();
    assert!(temp.is_ok());
    if let Ok((_temp, home)) = temp {
        let created = fs::create_dir_all(&home);
        assert!(created.is_ok());
        let garbage = "this is not a sqlite database at all\n".repeat(8);
        let written = fs::write(db_path(&home), garbage);
        assert!(written.is_ok());

        let result = ensure_initialized_at(&home);
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "ledger_corrupt");
        }
    }
}
