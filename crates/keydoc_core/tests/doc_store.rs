use keydoc_core::db::open_db;
use keydoc_core::{
    DocumentStore, KeySpec, KeyedTable, Predicate, Record, SqliteDocumentStore, StoreError,
};
use serde_json::{json, Value};

fn record(fields: Value) -> Record {
    fields
        .as_object()
        .expect("fixture must be a JSON object")
        .clone()
}

// Inserts without replacing anything, regardless of existing contents.
fn never_matching() -> Predicate {
    Predicate::field_eq("__none__", json!(0))
}

#[test]
fn collections_in_one_store_are_isolated() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();

    store
        .upsert("users", &Predicate::All, &record(json!({"user_id": 1})))
        .unwrap();
    store
        .upsert("sessions", &Predicate::All, &record(json!({"token": "abc"})))
        .unwrap();

    store.truncate("users").unwrap();

    assert!(store.all("users").unwrap().is_empty());
    assert_eq!(store.all("sessions").unwrap().len(), 1);
}

#[test]
fn all_on_unknown_collection_is_empty() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();

    assert!(store.all("nothing_here").unwrap().is_empty());
}

#[test]
fn search_returns_matches_in_insertion_order() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();

    let first = record(json!({"user_id": 1, "name": "first"}));
    let second = record(json!({"user_id": 1, "name": "second"}));
    store.upsert("users", &never_matching(), &first).unwrap();
    store.upsert("users", &never_matching(), &second).unwrap();

    let matches = store
        .search("users", &Predicate::field_eq("user_id", json!(1)))
        .unwrap();
    assert_eq!(matches, vec![first, second]);
}

#[test]
fn find_one_tie_break_is_first_in_insertion_order() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();

    // Duplicate key values can only arise from mutation outside the
    // table's upsert path; simulate that directly at the store boundary.
    let first = record(json!({"user_id": 1, "name": "first"}));
    let second = record(json!({"user_id": 1, "name": "second"}));
    store.upsert("users", &never_matching(), &first).unwrap();
    store.upsert("users", &never_matching(), &second).unwrap();

    let table = KeyedTable::new(store, "users", KeySpec::new(["user_id"]));
    let found = table
        .find_one(&record(json!({"user_id": 1})))
        .unwrap()
        .unwrap();
    assert_eq!(found, first);
}

#[test]
fn upsert_updates_every_matching_record() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();

    store
        .upsert(
            "users",
            &never_matching(),
            &record(json!({"user_id": 1, "name": "first"})),
        )
        .unwrap();
    store
        .upsert(
            "users",
            &never_matching(),
            &record(json!({"user_id": 1, "name": "second"})),
        )
        .unwrap();

    let replacement = record(json!({"user_id": 1, "name": "converged"}));
    store
        .upsert(
            "users",
            &Predicate::field_eq("user_id", json!(1)),
            &replacement,
        )
        .unwrap();

    let all = store.all("users").unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|stored| *stored == replacement));
}

#[test]
fn corrupt_persisted_body_surfaces_as_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keydoc.db");

    let conn = open_db(&path).unwrap();
    conn.execute(
        "INSERT INTO documents (collection, body) VALUES ('users', 'not-json');",
        [],
    )
    .unwrap();
    drop(conn);

    let store = SqliteDocumentStore::open(&path).unwrap();
    let err = store.all("users").unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { .. }));
}

#[test]
fn non_object_persisted_body_surfaces_as_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keydoc.db");

    let conn = open_db(&path).unwrap();
    conn.execute(
        "INSERT INTO documents (collection, body) VALUES ('users', '[1, 2, 3]');",
        [],
    )
    .unwrap();
    drop(conn);

    let store = SqliteDocumentStore::open(&path).unwrap();
    let err = store.all("users").unwrap_err();
    match err {
        StoreError::Corrupt { detail, .. } => assert!(detail.contains("array")),
        other => panic!("unexpected error: {other}"),
    }
}
