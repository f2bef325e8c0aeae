use grocery_core::db::migrations::latest_version;
use grocery_core::db::{open_db, open_db_in_memory};
use grocery_core::{ItemStore, SqliteItemStore, StoreError};
use rusqlite::Connection;
use uuid::Uuid;

#[test]
fn create_commit_and_fetch_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let mut store = SqliteItemStore::try_new(&conn).unwrap();

    let id = store.create("Apples", "2").unwrap();
    store.commit().unwrap();

    let items = store.fetch_all().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, id);
    assert_eq!(items[0].name, "Apples");
    assert_eq!(items[0].quantity, "2");
}

#[test]
fn fetch_all_returns_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let mut store = SqliteItemStore::try_new(&conn).unwrap();

    let first = store.create("Milk", "").unwrap();
    let second = store.create("Bread", "1 loaf").unwrap();
    let third = store.create("Apples", "").unwrap();
    store.commit().unwrap();

    let ids: Vec<_> = store
        .fetch_all()
        .unwrap()
        .into_iter()
        .map(|item| item.id)
        .collect();
    assert_eq!(ids, [first, second, third]);
}

#[test]
fn store_does_not_enforce_name_uniqueness() {
    let conn = open_db_in_memory().unwrap();
    let mut store = SqliteItemStore::try_new(&conn).unwrap();

    store.create("Milk", "").unwrap();
    store.create("milk", "").unwrap();
    store.commit().unwrap();

    assert_eq!(store.fetch_all().unwrap().len(), 2);
}

#[test]
fn update_overwrites_fields_and_keeps_identity() {
    let conn = open_db_in_memory().unwrap();
    let mut store = SqliteItemStore::try_new(&conn).unwrap();

    let id = store.create("Milk", "1 gal").unwrap();
    store.commit().unwrap();

    store.update(id, "Oat Milk", "").unwrap();
    store.commit().unwrap();

    let items = store.fetch_all().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, id);
    assert_eq!(items[0].name, "Oat Milk");
    assert_eq!(items[0].quantity, "");
}

#[test]
fn update_and_delete_unknown_identity_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let mut store = SqliteItemStore::try_new(&conn).unwrap();
    let missing = Uuid::new_v4();

    let update_err = store.update(missing, "Eggs", "").unwrap_err();
    assert!(matches!(update_err, StoreError::NotFound(id) if id == missing));

    let delete_err = store.delete(missing).unwrap_err();
    assert!(matches!(delete_err, StoreError::NotFound(id) if id == missing));

    store.rollback().unwrap();
    assert!(!store.has_staged_changes());
}

#[test]
fn delete_removes_record() {
    let conn = open_db_in_memory().unwrap();
    let mut store = SqliteItemStore::try_new(&conn).unwrap();

    let keep = store.create("Bread", "").unwrap();
    let drop_id = store.create("Milk", "").unwrap();
    store.commit().unwrap();

    store.delete(drop_id).unwrap();
    store.commit().unwrap();

    let items = store.fetch_all().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, keep);
}

#[test]
fn rollback_discards_staged_mutations() {
    let conn = open_db_in_memory().unwrap();
    let mut store = SqliteItemStore::try_new(&conn).unwrap();

    store.create("Milk", "").unwrap();
    assert!(store.has_staged_changes());
    store.rollback().unwrap();

    assert!(store.fetch_all().unwrap().is_empty());
    assert!(conn.is_autocommit());
}

#[test]
fn commit_without_staged_changes_is_noop() {
    let conn = open_db_in_memory().unwrap();
    let mut store = SqliteItemStore::try_new(&conn).unwrap();

    store.commit().unwrap();
    store.rollback().unwrap();
    assert!(conn.is_autocommit());
}

#[test]
fn dropping_store_discards_uncommitted_changes() {
    let conn = open_db_in_memory().unwrap();
    {
        let mut store = SqliteItemStore::try_new(&conn).unwrap();
        store.create("Milk", "").unwrap();
    }

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM grocery_items;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
    assert!(conn.is_autocommit());
}

#[test]
fn committed_items_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grocery.db");

    let id = {
        let conn = open_db(&path).unwrap();
        let mut store = SqliteItemStore::try_new(&conn).unwrap();
        let id = store.create("Coffee", "1 bag").unwrap();
        store.commit().unwrap();
        id
    };

    let conn = open_db(&path).unwrap();
    let store = SqliteItemStore::try_new(&conn).unwrap();
    let items = store.fetch_all().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, id);
    assert_eq!(items[0].quantity, "1 bag");
}

#[test]
fn invalid_persisted_uuid_is_reported() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO grocery_items (uuid, name) VALUES ('not-a-uuid', 'Milk');",
        [],
    )
    .unwrap();

    let store = SqliteItemStore::try_new(&conn).unwrap();
    let err = store.fetch_all().unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}

#[test]
fn store_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteItemStore::try_new(&conn);
    match result {
        Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn store_rejects_connection_without_items_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteItemStore::try_new(&conn);
    assert!(matches!(
        result,
        Err(StoreError::MissingRequiredTable("grocery_items"))
    ));
}

#[test]
fn store_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE grocery_items (
            uuid TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteItemStore::try_new(&conn);
    assert!(matches!(
        result,
        Err(StoreError::MissingRequiredColumn {
            table: "grocery_items",
            column: "quantity"
        })
    ));
}
