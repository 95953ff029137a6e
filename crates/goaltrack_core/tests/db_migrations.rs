use goaltrack_core::db::migrations::latest_version;
use goaltrack_core::db::{open_db, open_db_in_memory, schema_status, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_entries");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("goaltrack.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "kv_entries");
}

#[test]
fn open_db_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("state").join("goaltrack.db");

    let conn = open_db(&path).unwrap();

    assert!(path.exists());
    assert_table_exists(&conn, "kv_entries");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn fresh_file_reports_pending_steps_until_opened() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fresh.db");

    let raw = Connection::open(&path).unwrap();
    let status = schema_status(&raw).unwrap();
    assert_eq!(status.version, 0);
    assert_eq!(status.pending(), latest_version() as usize);
    assert!(!status.is_current());
    drop(raw);

    let conn = open_db(&path).unwrap();
    let status = schema_status(&conn).unwrap();
    assert!(status.is_current());
    assert_eq!(status.pending(), 0);
}

#[test]
fn failed_schema_step_is_named_and_rolled_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clash.db");

    // An index already owns the name the first step wants for its table.
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE other (x INTEGER);
         CREATE INDEX kv_entries ON other (x);",
    )
    .unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match &err {
        DbError::Migration { version, name, .. } => {
            assert_eq!(*version, 1);
            assert_eq!(*name, "kv_entries");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("step 1"));

    let conn = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&conn), 0);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
