//! Local filesystem stores, for running without AWS.
//!
//! Blobs are plain files under `<root>/`, keyed by their blob path. Key-value
//! entries are one file each under `<root>/`, with the key percent-encoded
//! into a portable file name.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cvwizard_core::BoxFuture;
use cvwizard_core::keys;
use cvwizard_core::models::record::BlobPath;
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::StorageError;
use crate::store::{BlobEntry, BlobLocator, BlobStore, BlobUpload, KvEntry, KvStore};

#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// Map a blob path to a file under the root, refusing anything that
    /// could escape it.
    fn file_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty()
            || key.starts_with('/')
            || key.contains('\\')
            || key.split('/').any(|segment| segment == ".." || segment == ".")
        {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key))
    }
}

impl BlobStore for LocalBlobStore {
    fn upload(&self, upload: BlobUpload) -> BoxFuture<'_, Result<BlobPath, StorageError>> {
        Box::pin(async move {
            let key = keys::upload(Uuid::new_v4(), &upload.file_name);
            let path = self.file_path(&key)?;
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&path, &upload.bytes).await?;
            debug!(path = %path.display(), bytes = upload.bytes.len(), "blob written");
            Ok(BlobPath::new(key))
        })
    }

    fn read<'a>(&'a self, path: &'a BlobPath) -> BoxFuture<'a, Result<Vec<u8>, StorageError>> {
        Box::pin(async move {
            let file = self.file_path(path.as_str())?;
            fs::read(&file).await.map_err(|e| not_found_or(e, path.as_str()))
        })
    }

    fn exists<'a>(&'a self, path: &'a BlobPath) -> BoxFuture<'a, Result<bool, StorageError>> {
        Box::pin(async move {
            let file = self.file_path(path.as_str())?;
            Ok(fs::try_exists(&file).await?)
        })
    }

    fn delete<'a>(&'a self, path: &'a BlobPath) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let file = self.file_path(path.as_str())?;
            match fs::remove_file(&file).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
            // Uploads live in their own directory; drop it once empty.
            if let Some(parent) = file.parent()
                && parent != self.root
            {
                let _ = fs::remove_dir(parent).await;
            }
            Ok(())
        })
    }

    fn list<'a>(&'a self, prefix: &'a str) -> BoxFuture<'a, Result<Vec<BlobEntry>, StorageError>> {
        Box::pin(async move {
            let mut entries = Vec::new();
            let mut pending = vec![self.root.clone()];

            while let Some(dir) = pending.pop() {
                let mut read_dir = match fs::read_dir(&dir).await {
                    Ok(rd) => rd,
                    Err(e) if e.kind() == ErrorKind::NotFound => continue,
                    Err(e) => return Err(e.into()),
                };
                while let Some(entry) = read_dir.next_entry().await? {
                    let metadata = entry.metadata().await?;
                    if metadata.is_dir() {
                        pending.push(entry.path());
                        continue;
                    }
                    let Some(key) = relative_key(&self.root, &entry.path()) else {
                        continue;
                    };
                    if key.starts_with(prefix) {
                        entries.push(BlobEntry {
                            path: BlobPath::new(key),
                            size: metadata.len(),
                        });
                    }
                }
            }

            Ok(entries)
        })
    }

    fn locate<'a>(
        &'a self,
        path: &'a BlobPath,
        ttl: Duration,
    ) -> BoxFuture<'a, Result<BlobLocator, StorageError>> {
        Box::pin(async move {
            let file = self.file_path(path.as_str())?;
            let absolute = fs::canonicalize(&file)
                .await
                .map_err(|e| not_found_or(e, path.as_str()))?;
            let url = format!("file://{}", absolute.display());
            Ok(BlobLocator::new(path, url, ttl))
        })
    }
}

/// Blob key for a file under `root`, always `/`-separated.
fn relative_key(root: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(root).ok()?;
    let parts: Vec<&str> = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    Some(parts.join("/"))
}

fn not_found_or(err: std::io::Error, key: &str) -> StorageError {
    if err.kind() == ErrorKind::NotFound {
        StorageError::NotFound {
            key: key.to_string(),
        }
    } else {
        StorageError::Io(err)
    }
}

#[derive(Debug, Clone)]
pub struct LocalKvStore {
    root: PathBuf,
}

impl LocalKvStore {
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.root.join(encode_key(key))
    }
}

impl KvStore for LocalKvStore {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>, StorageError>> {
        Box::pin(async move {
            match fs::read(self.entry_path(key)).await {
                Ok(bytes) => String::from_utf8(bytes)
                    .map(Some)
                    .map_err(|_| StorageError::InvalidValue {
                        key: key.to_string(),
                    }),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn set<'a>(&'a self, key: &'a str, value: String) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            // Write to a temp file then rename so readers never see a torn value.
            let path = self.entry_path(key);
            let tmp_path = path.with_extension("tmp");
            fs::write(&tmp_path, value.as_bytes()).await?;
            fs::rename(&tmp_path, &path).await?;
            debug!(key, "kv entry written");
            Ok(())
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            match fs::remove_file(self.entry_path(key)).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn list<'a>(
        &'a self,
        prefix: &'a str,
        with_values: bool,
    ) -> BoxFuture<'a, Result<Vec<KvEntry>, StorageError>> {
        Box::pin(async move {
            let mut entries = Vec::new();
            let mut read_dir = fs::read_dir(&self.root).await?;
            while let Some(entry) = read_dir.next_entry().await? {
                let file_name = entry.file_name();
                let Some(key) = file_name.to_str().and_then(decode_key) else {
                    continue;
                };
                if !key.starts_with(prefix) {
                    continue;
                }
                let value = if with_values {
                    match self.get(&key).await {
                        Ok(value) => value,
                        Err(StorageError::InvalidValue { .. }) => {
                            warn!(key = %key, "kv entry is not valid UTF-8, listing it without a value");
                            None
                        }
                        Err(e) => return Err(e),
                    }
                } else {
                    None
                };
                entries.push(KvEntry { key, value });
            }
            Ok(entries)
        })
    }

    fn flush(&self) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            let mut read_dir = fs::read_dir(&self.root).await?;
            while let Some(entry) = read_dir.next_entry().await? {
                if entry.file_type().await?.is_file() {
                    fs::remove_file(entry.path()).await?;
                }
            }
            Ok(())
        })
    }
}

const KV_FILE_SUFFIX: &str = ".kv";

/// Percent-encode everything outside `[A-Za-z0-9._-]` so any key becomes a
/// valid file name on every platform.
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len() + KV_FILE_SUFFIX.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'-' | b'_') {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded.push_str(KV_FILE_SUFFIX);
    encoded
}

fn decode_key(file_name: &str) -> Option<String> {
    let encoded = file_name.strip_suffix(KV_FILE_SUFFIX)?;
    let mut bytes = Vec::with_capacity(encoded.len());
    let mut iter = encoded.bytes();
    while let Some(byte) = iter.next() {
        if byte == b'%' {
            let hi = (iter.next()? as char).to_digit(16)?;
            let lo = (iter.next()? as char).to_digit(16)?;
            bytes.push((hi * 16 + lo) as u8);
        } else {
            bytes.push(byte);
        }
    }
    String::from_utf8(bytes).ok()
}
