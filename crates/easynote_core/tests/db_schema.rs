use easynote_core::db::migrations::latest_version;
use easynote_core::service::default_data::DEFAULT_NOTES;
use easynote_core::{
    DatabaseConfig, DbError, NotesDatabase, RepoError, SchemaOutcome, UpgradePolicy,
    DEFAULT_LIST_NAME,
};
use rusqlite::Connection;

#[test]
fn open_in_memory_creates_schema_and_seeds_default_data() {
    let db = NotesDatabase::open_in_memory().unwrap();

    assert_eq!(db.schema_outcome(), SchemaOutcome::Created);
    assert_eq!(db.schema_version().unwrap(), latest_version());
    for table in ["priorities", "lists", "notes"] {
        assert_table_exists(db.connection(), table);
    }

    assert_eq!(db.list_all_active_names().unwrap(), vec![DEFAULT_LIST_NAME]);
    let default_list = db.get_list_id_by_name(DEFAULT_LIST_NAME).unwrap();
    let notes = db.get_all_notes_from_list(default_list).unwrap();
    assert_eq!(notes.len(), DEFAULT_NOTES.len());
    assert!(notes
        .iter()
        .all(|note| note.list_name.as_deref() == Some(DEFAULT_LIST_NAME)));
}

#[test]
fn reopening_file_database_keeps_data_and_does_not_reseed() {
    let dir = tempfile::tempdir().unwrap();
    let config = DatabaseConfig::new(dir.path().join("notes.db"));

    let first = NotesDatabase::open(&config).unwrap();
    assert_eq!(first.schema_outcome(), SchemaOutcome::Created);
    first.add_list("Work").unwrap();
    drop(first);

    let second = NotesDatabase::open(&config).unwrap();
    assert_eq!(second.schema_outcome(), SchemaOutcome::Current);
    assert_eq!(
        second.list_all_active_names().unwrap(),
        vec![DEFAULT_LIST_NAME.to_string(), "Work".to_string()]
    );
    assert_eq!(second.get_all_notes().unwrap().len(), DEFAULT_NOTES.len());
    assert_eq!(second.list_priorities().unwrap().len(), 3);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = NotesDatabase::open(&DatabaseConfig::new(&path))
        .err()
        .expect("newer schema must be rejected");
    match err {
        RepoError::Db(DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        }) => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn outdated_schema_is_refused_by_default_and_data_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("old.db");
    write_version_one_database(&path);

    let err = NotesDatabase::open(&DatabaseConfig::new(&path))
        .err()
        .expect("outdated schema must be refused");
    assert!(matches!(
        err,
        RepoError::Db(DbError::SchemaUpgradeRefused { db_version: 1, .. })
    ));

    let conn = Connection::open(&path).unwrap();
    let legacy_rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(legacy_rows, 1);
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, 1);
}

#[test]
fn recreate_policy_drops_tables_without_reseeding() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("old.db");
    write_version_one_database(&path);

    let config = DatabaseConfig::new(&path).with_upgrade_policy(UpgradePolicy::Recreate);
    let db = NotesDatabase::open(&config).unwrap();

    assert_eq!(
        db.schema_outcome(),
        SchemaOutcome::Recreated { from_version: 1 }
    );
    assert_eq!(db.schema_version().unwrap(), latest_version());
    assert!(db.get_all_notes().unwrap().is_empty());
    assert!(db.list_all_active_names().unwrap().is_empty());
    assert!(db.list_priorities().unwrap().is_empty());
}

#[test]
fn opening_unwritable_location_reports_storage_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("nested").join("notes.db");

    let err = NotesDatabase::open(&DatabaseConfig::new(&path))
        .err()
        .expect("missing parent directory must fail");
    match err {
        RepoError::Db(DbError::StorageUnavailable { path: reported, .. }) => {
            assert_eq!(reported, path);
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn write_version_one_database(path: &std::path::Path) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE notes (note_id INTEGER PRIMARY KEY, text TEXT);
         INSERT INTO notes (text) VALUES ('legacy');
         PRAGMA user_version = 1;",
    )
    .unwrap();
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
