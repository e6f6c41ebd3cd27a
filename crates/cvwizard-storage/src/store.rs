//! Collaborator traits for durable storage.
//!
//! Futures are boxed so the traits stay object-safe; callers hold them as
//! `Arc<dyn BlobStore>` / `Arc<dyn KvStore>`.

use std::time::Duration;

use cvwizard_core::BoxFuture;
use cvwizard_core::models::record::BlobPath;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// A file to be stored. The store chooses the final path.
#[derive(Debug, Clone)]
pub struct BlobUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobEntry {
    pub path: BlobPath,
    pub size: u64,
}

/// A short-lived, directly accessible location for a blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobLocator {
    pub path: BlobPath,
    pub url: String,
    pub expires_at: jiff::Timestamp,
}

impl BlobLocator {
    pub(crate) fn new(path: &BlobPath, url: String, ttl: Duration) -> Self {
        let expires_at = jiff::SignedDuration::try_from(ttl)
            .ok()
            .and_then(|ttl| jiff::Timestamp::now().checked_add(ttl).ok())
            .unwrap_or(jiff::Timestamp::MAX);
        Self {
            path: path.clone(),
            url,
            expires_at,
        }
    }
}

/// Binary object storage addressed by [`BlobPath`].
pub trait BlobStore: Send + Sync {
    /// Store the bytes and return the handle they can be read back by.
    fn upload(&self, upload: BlobUpload) -> BoxFuture<'_, Result<BlobPath, StorageError>>;

    /// Read a blob. `StorageError::NotFound` when it does not exist.
    fn read<'a>(&'a self, path: &'a BlobPath) -> BoxFuture<'a, Result<Vec<u8>, StorageError>>;

    fn exists<'a>(&'a self, path: &'a BlobPath) -> BoxFuture<'a, Result<bool, StorageError>>;

    fn delete<'a>(&'a self, path: &'a BlobPath) -> BoxFuture<'a, Result<(), StorageError>>;

    /// Every blob whose path starts with `prefix`, in no particular order.
    fn list<'a>(&'a self, prefix: &'a str) -> BoxFuture<'a, Result<Vec<BlobEntry>, StorageError>>;

    /// Resolve a blob into a locator valid for roughly `ttl`.
    fn locate<'a>(
        &'a self,
        path: &'a BlobPath,
        ttl: Duration,
    ) -> BoxFuture<'a, Result<BlobLocator, StorageError>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvEntry {
    pub key: String,
    /// Present only when values were requested from [`KvStore::list`].
    pub value: Option<String>,
}

/// Flat string key-value storage.
pub trait KvStore: Send + Sync {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>, StorageError>>;

    /// Insert or overwrite.
    fn set<'a>(&'a self, key: &'a str, value: String) -> BoxFuture<'a, Result<(), StorageError>>;

    fn delete<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<(), StorageError>>;

    /// Keys starting with `prefix` in store enumeration order, which is
    /// unspecified. Values are loaded only when `with_values` is set.
    fn list<'a>(
        &'a self,
        prefix: &'a str,
        with_values: bool,
    ) -> BoxFuture<'a, Result<Vec<KvEntry>, StorageError>>;

    /// Remove every key.
    fn flush(&self) -> BoxFuture<'_, Result<(), StorageError>>;
}
