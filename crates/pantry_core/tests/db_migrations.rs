use pantry_core::db::migrations::latest_version;
use pantry_core::db::{
    open_db, open_db_in_memory, seed_default_locations, DbError, DEFAULT_LOCATIONS,
};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "locations");
    assert_table_exists(&conn, "pantry_items");
    assert_index_exists(&conn, "idx_locations_triple");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pantry.sqlite3");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "pantry_items");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

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
fn unique_index_migration_merges_duplicate_triples() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(include_str!("../src/db/migrations/0001_init.sql"))
        .unwrap();
    conn.execute_batch(
        "PRAGMA user_version = 1;
         INSERT INTO locations (room, spot_noun, spot_direction) VALUES ('kitchen', 'cabinet', 'top');
         INSERT INTO locations (room, spot_noun, spot_direction) VALUES ('kitchen', 'cabinet', 'top');
         INSERT INTO pantry_items (name, date_bought, date_expiry, category, location_id)
             VALUES ('Rice', '2024-01-01', '2024-06-01', 'food', 2);",
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    let location_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM locations;", [], |row| row.get(0))
        .unwrap();
    let item_location: i64 = conn
        .query_row("SELECT location_id FROM pantry_items;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(location_count, 1);
    assert_eq!(item_location, 1);
}

#[test]
fn foreign_keys_reject_items_without_location() {
    let conn = open_db_in_memory().unwrap();
    let err = conn
        .execute(
            "INSERT INTO pantry_items (name, date_bought, date_expiry, category, location_id)
             VALUES ('Rice', '2024-01-01', '2024-06-01', 'food', 42);",
            [],
        )
        .unwrap_err();
    assert!(err.to_string().contains("FOREIGN KEY"));
}

#[test]
fn seeding_inserts_defaults_once() {
    let mut conn = open_db_in_memory().unwrap();

    assert_eq!(
        seed_default_locations(&mut conn).unwrap(),
        DEFAULT_LOCATIONS.len()
    );
    assert_eq!(seed_default_locations(&mut conn).unwrap(), 0);

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM locations;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count as usize, DEFAULT_LOCATIONS.len());
}

#[test]
fn seeding_skips_non_empty_table() {
    let mut conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO locations (room, spot_noun, spot_direction) VALUES ('attic', '', '');",
        [],
    )
    .unwrap();

    assert_eq!(seed_default_locations(&mut conn).unwrap(), 0);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    assert_schema_object(conn, "table", table_name);
}

fn assert_index_exists(conn: &Connection, index_name: &str) {
    assert_schema_object(conn, "index", index_name);
}

fn assert_schema_object(conn: &Connection, kind: &str, name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = ?1 AND name = ?2
            );",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "{kind} {name} does not exist");
}
