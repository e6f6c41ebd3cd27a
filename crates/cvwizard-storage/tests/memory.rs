use std::time::Duration;

use cvwizard_core::models::record::BlobPath;
use cvwizard_storage::memory::{MemoryBlobStore, MemoryKvStore};
use cvwizard_storage::state::{load_json, save_json};
use cvwizard_storage::{BlobStore, BlobUpload, KvStore};

fn pdf_upload(name: &str) -> BlobUpload {
    BlobUpload {
        file_name: name.to_string(),
        content_type: "application/pdf".to_string(),
        bytes: b"%PDF-1.7 test".to_vec(),
    }
}

#[tokio::test]
async fn upload_then_read_returns_same_bytes() {
    let store = MemoryBlobStore::new();
    let path = store.upload(pdf_upload("cv.pdf")).await.unwrap();

    assert!(path.as_str().starts_with("uploads/"));
    assert!(path.as_str().ends_with("/cv.pdf"));
    assert_eq!(store.read(&path).await.unwrap(), b"%PDF-1.7 test");
    assert_eq!(
        store.content_type(&path).await.as_deref(),
        Some("application/pdf")
    );
}

#[tokio::test]
async fn same_file_name_gets_distinct_paths() {
    let store = MemoryBlobStore::new();
    let a = store.upload(pdf_upload("cv.pdf")).await.unwrap();
    let b = store.upload(pdf_upload("cv.pdf")).await.unwrap();

    assert_ne!(a, b);
    assert_eq!(store.len().await, 2);
}

#[tokio::test]
async fn reading_missing_blob_is_not_found() {
    let store = MemoryBlobStore::new();
    let err = store
        .read(&BlobPath::new("uploads/nope/cv.pdf"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn delete_and_list_by_prefix() {
    let store = MemoryBlobStore::new();
    let a = store.upload(pdf_upload("a.pdf")).await.unwrap();
    store.upload(pdf_upload("b.pdf")).await.unwrap();

    assert_eq!(store.list("uploads/").await.unwrap().len(), 2);
    assert!(store.list("other/").await.unwrap().is_empty());

    store.delete(&a).await.unwrap();
    assert!(!store.exists(&a).await.unwrap());
    assert_eq!(store.list("uploads/").await.unwrap().len(), 1);

    // Deleting again is a no-op.
    store.delete(&a).await.unwrap();
}

#[tokio::test]
async fn locate_requires_existing_blob() {
    let store = MemoryBlobStore::new();
    let path = store.upload(pdf_upload("cv.pdf")).await.unwrap();

    let locator = store
        .locate(&path, Duration::from_secs(600))
        .await
        .unwrap();
    assert_eq!(locator.path, path);
    assert!(locator.url.starts_with("memory://uploads/"));
    assert!(locator.expires_at > jiff::Timestamp::now());

    let missing = store
        .locate(&BlobPath::new("uploads/x/y.pdf"), Duration::from_secs(600))
        .await
        .unwrap_err();
    assert!(missing.is_not_found());
}

#[tokio::test]
async fn kv_set_get_overwrite_delete() {
    let kv = MemoryKvStore::new();
    assert_eq!(kv.get("record:1").await.unwrap(), None);

    kv.set("record:1", "one".into()).await.unwrap();
    kv.set("record:1", "uno".into()).await.unwrap();
    assert_eq!(kv.get("record:1").await.unwrap().as_deref(), Some("uno"));

    kv.delete("record:1").await.unwrap();
    assert_eq!(kv.get("record:1").await.unwrap(), None);
}

#[tokio::test]
async fn kv_list_filters_prefix_and_loads_values_on_request() {
    let kv = MemoryKvStore::new();
    kv.set("record:1", "a".into()).await.unwrap();
    kv.set("record:2", "b".into()).await.unwrap();
    kv.set("settings", "c".into()).await.unwrap();

    let keys_only = kv.list("record:", false).await.unwrap();
    assert_eq!(keys_only.len(), 2);
    assert!(keys_only.iter().all(|e| e.value.is_none()));

    let mut with_values = kv.list("record:", true).await.unwrap();
    with_values.sort_by(|a, b| a.key.cmp(&b.key));
    assert_eq!(with_values[0].value.as_deref(), Some("a"));
    assert_eq!(with_values[1].value.as_deref(), Some("b"));
}

#[tokio::test]
async fn kv_flush_removes_everything() {
    let kv = MemoryKvStore::new();
    kv.set("record:1", "a".into()).await.unwrap();
    kv.set("other", "b".into()).await.unwrap();

    kv.flush().await.unwrap();
    assert!(kv.is_empty().await);
}

#[tokio::test]
async fn json_state_round_trip() {
    let kv = MemoryKvStore::new();
    let missing: Option<Vec<u32>> = load_json(&kv, "numbers").await.unwrap();
    assert!(missing.is_none());

    save_json(&kv, "numbers", &vec![1u32, 2, 3]).await.unwrap();
    let loaded: Option<Vec<u32>> = load_json(&kv, "numbers").await.unwrap();
    assert_eq!(loaded, Some(vec![1, 2, 3]));
}

#[tokio::test]
async fn json_state_rejects_malformed_value() {
    let kv = MemoryKvStore::new();
    kv.set("numbers", "not json".into()).await.unwrap();

    let result: Result<Option<Vec<u32>>, _> = load_json(&kv, "numbers").await;
    assert!(result.is_err());
}
