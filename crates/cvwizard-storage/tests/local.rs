use std::time::Duration;

use cvwizard_core::models::record::BlobPath;
use cvwizard_storage::error::StorageError;
use cvwizard_storage::local::{LocalBlobStore, LocalKvStore};
use cvwizard_storage::{BlobStore, BlobUpload, KvStore};

fn upload(name: &str, bytes: &[u8]) -> BlobUpload {
    BlobUpload {
        file_name: name.to_string(),
        content_type: "application/pdf".to_string(),
        bytes: bytes.to_vec(),
    }
}

#[tokio::test]
async fn blob_written_under_root() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalBlobStore::new(dir.path().join("blobs")).await.unwrap();

    let path = store.upload(upload("cv.pdf", b"%PDF-1.4")).await.unwrap();
    let on_disk = dir.path().join("blobs").join(path.as_str());
    assert_eq!(std::fs::read(on_disk).unwrap(), b"%PDF-1.4");
    assert_eq!(store.read(&path).await.unwrap(), b"%PDF-1.4");
    assert!(store.exists(&path).await.unwrap());
}

#[tokio::test]
async fn traversal_keys_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalBlobStore::new(dir.path()).await.unwrap();

    for key in ["../escape.pdf", "/etc/passwd", "uploads/../../x", ""] {
        let err = store.read(&BlobPath::new(key)).await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)), "{key}: {err}");
    }
}

#[tokio::test]
async fn missing_blob_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalBlobStore::new(dir.path()).await.unwrap();

    let path = BlobPath::new("uploads/none/cv.pdf");
    assert!(store.read(&path).await.unwrap_err().is_not_found());
    assert!(!store.exists(&path).await.unwrap());
    assert!(
        store
            .locate(&path, Duration::from_secs(60))
            .await
            .unwrap_err()
            .is_not_found()
    );
}

#[tokio::test]
async fn list_walks_nested_directories() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalBlobStore::new(dir.path()).await.unwrap();

    let a = store.upload(upload("a.pdf", b"a")).await.unwrap();
    let b = store.upload(upload("b.png", b"bb")).await.unwrap();

    let mut listed = store.list("uploads/").await.unwrap();
    listed.sort_by(|x, y| x.path.as_str().cmp(y.path.as_str()));
    let mut expected = vec![(a, 1u64), (b, 2u64)];
    expected.sort_by(|x, y| x.0.as_str().cmp(y.0.as_str()));

    assert_eq!(listed.len(), 2);
    for (entry, (path, size)) in listed.iter().zip(expected) {
        assert_eq!(entry.path, path);
        assert_eq!(entry.size, size);
    }
}

#[tokio::test]
async fn delete_removes_file_and_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalBlobStore::new(dir.path()).await.unwrap();

    let path = store.upload(upload("cv.pdf", b"x")).await.unwrap();
    store.delete(&path).await.unwrap();

    assert!(!store.exists(&path).await.unwrap());
    assert!(store.list("").await.unwrap().is_empty());
    store.delete(&path).await.unwrap();
}

#[tokio::test]
async fn locate_yields_file_url() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalBlobStore::new(dir.path()).await.unwrap();

    let path = store.upload(upload("cv.pdf", b"x")).await.unwrap();
    let locator = store
        .locate(&path, Duration::from_secs(3600))
        .await
        .unwrap();
    assert!(locator.url.starts_with("file://"));
    assert!(locator.url.ends_with("/cv.pdf"));
}

#[tokio::test]
async fn kv_round_trip_with_colon_keys() {
    let dir = tempfile::tempdir().unwrap();
    let kv = LocalKvStore::new(dir.path()).await.unwrap();

    kv.set("record:abc", r#"{"id":"abc"}"#.into()).await.unwrap();
    assert_eq!(
        kv.get("record:abc").await.unwrap().as_deref(),
        Some(r#"{"id":"abc"}"#)
    );

    let listed = kv.list("record:", true).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].key, "record:abc");
    assert_eq!(listed[0].value.as_deref(), Some(r#"{"id":"abc"}"#));

    kv.delete("record:abc").await.unwrap();
    kv.delete("record:abc").await.unwrap();
    assert_eq!(kv.get("record:abc").await.unwrap(), None);
}

#[tokio::test]
async fn kv_survives_reopen_and_flush_clears() {
    let dir = tempfile::tempdir().unwrap();
    {
        let kv = LocalKvStore::new(dir.path()).await.unwrap();
        kv.set("record:1", "one".into()).await.unwrap();
        kv.set("record:2", "two".into()).await.unwrap();
    }

    let kv = LocalKvStore::new(dir.path()).await.unwrap();
    assert_eq!(kv.list("record:", false).await.unwrap().len(), 2);

    kv.flush().await.unwrap();
    assert!(kv.list("", false).await.unwrap().is_empty());
}

#[tokio::test]
async fn undecodable_value_lists_without_value() {
    let dir = tempfile::tempdir().unwrap();
    let kv = LocalKvStore::new(dir.path()).await.unwrap();
    kv.set("record:good", "{}".into()).await.unwrap();
    std::fs::write(dir.path().join("record%3Abroken.kv"), [0xff, 0xfe, 0x00]).unwrap();

    let err = kv.get("record:broken").await.unwrap_err();
    assert!(matches!(err, StorageError::InvalidValue { ref key } if key == "record:broken"));

    let mut listed = kv.list("record:", true).await.unwrap();
    listed.sort_by(|a, b| a.key.cmp(&b.key));
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].key, "record:broken");
    assert_eq!(listed[0].value, None);
    assert_eq!(listed[1].value.as_deref(), Some("{}"));
}
