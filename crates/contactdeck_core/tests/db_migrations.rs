use contactdeck_core::db::migrations::{current_user_version, latest_version};
use contactdeck_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn in_memory_database_has_kv_store_at_latest_version() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    let columns: Vec<String> = conn
        .prepare("SELECT name FROM pragma_table_info('kv_store') ORDER BY cid;")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(columns, ["key", "value", "updated_at"]);
}

#[test]
fn reopening_file_database_skips_applied_migrations() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contactdeck.db");

    let first = open_db(&path).unwrap();
    first
        .execute(
            "INSERT INTO kv_store (key, value) VALUES ('probe', '1');",
            [],
        )
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(current_user_version(&second).unwrap(), latest_version());
    let probe: String = second
        .query_row("SELECT value FROM kv_store WHERE key = 'probe';", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(probe, "1");
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 42;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 42);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unopenable_path_reports_target_and_code() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("prefs.db");

    let err = open_db(&path).unwrap_err();

    assert_eq!(err.code(), "db_open_failed");
    match &err {
        DbError::Open { target, .. } => assert_eq!(target, &path.display().to_string()),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("prefs.db"));
}
