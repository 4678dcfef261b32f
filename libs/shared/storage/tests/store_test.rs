use assert_matches::assert_matches;
use serde::{Deserialize, Serialize};
use serde_json::json;

use shared_storage::{load_typed, save_typed, DocumentStore, InMemoryStore, JsonFileStore, StorageError};

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct Record {
    name: String,
}

#[tokio::test]
async fn file_store_missing_document_loads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());

    let loaded = store.load("appointments.json").await.unwrap();
    assert!(loaded.is_none());
}

#[tokio::test]
async fn file_store_saves_pretty_printed_json() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());

    let document = json!([{ "time": "2024-01-01T10:00:00", "name": "p1" }]);
    store.save("appointments.json", &document).await.unwrap();

    let raw = std::fs::read_to_string(dir.path().join("appointments.json")).unwrap();
    assert!(raw.contains('\n'), "document should be pretty-printed");

    let loaded = store.load("appointments.json").await.unwrap();
    assert_eq!(loaded, Some(document));
    assert!(!dir.path().join("appointments.json.tmp").exists());
}

#[tokio::test]
async fn file_store_rejects_malformed_json() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("doctors.json"), "{ not json").unwrap();
    let store = JsonFileStore::new(dir.path());

    let result = store.load("doctors.json").await;
    assert_matches!(result, Err(StorageError::Malformed { .. }));
}

#[tokio::test]
async fn typed_helpers_default_when_missing() {
    let store = InMemoryStore::new();

    let records: Vec<Record> = load_typed(&store, "records").await.unwrap();
    assert!(records.is_empty());

    save_typed(&store, "records", &vec![Record { name: "a".to_string() }]).await.unwrap();
    let records: Vec<Record> = load_typed(&store, "records").await.unwrap();
    assert_eq!(records, vec![Record { name: "a".to_string() }]);
}

#[tokio::test]
async fn memory_store_can_fail_writes() {
    let store = InMemoryStore::new();
    store.set_fail_writes(true);

    let result = store.save("k", &json!([])).await;
    assert_matches!(result, Err(StorageError::Unavailable(_)));
    assert_eq!(store.save_count(), 0);
    assert!(store.snapshot("k").await.is_none());
}
