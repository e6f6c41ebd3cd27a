//! In-process stores. Nothing survives the process; used by tests and dry runs.

use std::collections::HashMap;
use std::time::Duration;

use cvwizard_core::BoxFuture;
use cvwizard_core::keys;
use cvwizard_core::models::record::BlobPath;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StorageError;
use crate::store::{BlobEntry, BlobLocator, BlobStore, BlobUpload, KvEntry, KvStore};

#[derive(Debug, Clone)]
struct StoredBlob {
    bytes: Vec<u8>,
    content_type: String,
}

#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, StoredBlob>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }

    pub async fn content_type(&self, path: &BlobPath) -> Option<String> {
        self.blobs
            .read()
            .await
            .get(path.as_str())
            .map(|b| b.content_type.clone())
    }
}

impl BlobStore for MemoryBlobStore {
    fn upload(&self, upload: BlobUpload) -> BoxFuture<'_, Result<BlobPath, StorageError>> {
        Box::pin(async move {
            let key = keys::upload(Uuid::new_v4(), &upload.file_name);
            self.blobs.write().await.insert(
                key.clone(),
                StoredBlob {
                    bytes: upload.bytes,
                    content_type: upload.content_type,
                },
            );
            Ok(BlobPath::new(key))
        })
    }

    fn read<'a>(&'a self, path: &'a BlobPath) -> BoxFuture<'a, Result<Vec<u8>, StorageError>> {
        Box::pin(async move {
            self.blobs
                .read()
                .await
                .get(path.as_str())
                .map(|b| b.bytes.clone())
                .ok_or_else(|| StorageError::NotFound {
                    key: path.to_string(),
                })
        })
    }

    fn exists<'a>(&'a self, path: &'a BlobPath) -> BoxFuture<'a, Result<bool, StorageError>> {
        Box::pin(async move { Ok(self.blobs.read().await.contains_key(path.as_str())) })
    }

    fn delete<'a>(&'a self, path: &'a BlobPath) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            self.blobs.write().await.remove(path.as_str());
            Ok(())
        })
    }

    fn list<'a>(&'a self, prefix: &'a str) -> BoxFuture<'a, Result<Vec<BlobEntry>, StorageError>> {
        Box::pin(async move {
            Ok(self
                .blobs
                .read()
                .await
                .iter()
                .filter(|(key, _)| key.starts_with(prefix))
                .map(|(key, blob)| BlobEntry {
                    path: BlobPath::new(key.clone()),
                    size: blob.bytes.len() as u64,
                })
                .collect())
        })
    }

    fn locate<'a>(
        &'a self,
        path: &'a BlobPath,
        ttl: Duration,
    ) -> BoxFuture<'a, Result<BlobLocator, StorageError>> {
        Box::pin(async move {
            if !self.blobs.read().await.contains_key(path.as_str()) {
                return Err(StorageError::NotFound {
                    key: path.to_string(),
                });
            }
            // Fresh nonce per call: locators are not stable across calls.
            let url = format!("memory://{path}?token={}", Uuid::new_v4().simple());
            Ok(BlobLocator::new(path, url, ttl))
        })
    }
}

#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl KvStore for MemoryKvStore {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>, StorageError>> {
        Box::pin(async move { Ok(self.entries.read().await.get(key).cloned()) })
    }

    fn set<'a>(&'a self, key: &'a str, value: String) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            self.entries.write().await.insert(key.to_string(), value);
            Ok(())
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            self.entries.write().await.remove(key);
            Ok(())
        })
    }

    fn list<'a>(
        &'a self,
        prefix: &'a str,
        with_values: bool,
    ) -> BoxFuture<'a, Result<Vec<KvEntry>, StorageError>> {
        Box::pin(async move {
            Ok(self
                .entries
                .read()
                .await
                .iter()
                .filter(|(key, _)| key.starts_with(prefix))
                .map(|(key, value)| KvEntry {
                    key: key.clone(),
                    value: with_values.then(|| value.clone()),
                })
                .collect())
        })
    }

    fn flush(&self) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            self.entries.write().await.clear();
            Ok(())
        })
    }
}
