//! S3-backed blob and key-value stores.
//!
//! Both stores can share one bucket: blobs live under `uploads/`, key-value
//! entries under `kv/` as one small JSON document each.

use std::time::Duration;

use aws_sdk_s3::Client;
use cvwizard_core::BoxFuture;
use cvwizard_core::keys;
use cvwizard_core::models::record::BlobPath;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::StorageError;
use crate::objects;
use crate::store::{BlobEntry, BlobLocator, BlobStore, BlobUpload, KvEntry, KvStore};

const KV_PREFIX: &str = "kv/";
const KV_SUFFIX: &str = ".json";

#[derive(Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
}

impl S3BlobStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

impl BlobStore for S3BlobStore {
    fn upload(&self, upload: BlobUpload) -> BoxFuture<'_, Result<BlobPath, StorageError>> {
        Box::pin(async move {
            let key = keys::upload(Uuid::new_v4(), &upload.file_name);
            let size = upload.bytes.len();
            objects::put_object(
                &self.client,
                &self.bucket,
                &key,
                upload.bytes,
                Some(&upload.content_type),
            )
            .await?;
            info!(bucket = %self.bucket, key = %key, bytes = size, "blob uploaded");
            Ok(BlobPath::new(key))
        })
    }

    fn read<'a>(&'a self, path: &'a BlobPath) -> BoxFuture<'a, Result<Vec<u8>, StorageError>> {
        Box::pin(objects::get_object(&self.client, &self.bucket, path.as_str()))
    }

    fn exists<'a>(&'a self, path: &'a BlobPath) -> BoxFuture<'a, Result<bool, StorageError>> {
        Box::pin(objects::head_object(&self.client, &self.bucket, path.as_str()))
    }

    fn delete<'a>(&'a self, path: &'a BlobPath) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            objects::delete_object(&self.client, &self.bucket, path.as_str()).await?;
            debug!(bucket = %self.bucket, key = %path, "blob deleted");
            Ok(())
        })
    }

    fn list<'a>(&'a self, prefix: &'a str) -> BoxFuture<'a, Result<Vec<BlobEntry>, StorageError>> {
        Box::pin(async move {
            let objects = objects::list_objects(&self.client, &self.bucket, prefix).await?;
            Ok(objects
                .into_iter()
                .map(|o| BlobEntry {
                    path: BlobPath::new(o.key),
                    size: u64::try_from(o.size).unwrap_or(0),
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
            let url = objects::presign_get(&self.client, &self.bucket, path.as_str(), ttl).await?;
            Ok(BlobLocator::new(path, url, ttl))
        })
    }
}

#[derive(Clone)]
pub struct S3KvStore {
    client: Client,
    bucket: String,
}

impl S3KvStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

fn object_key(key: &str) -> String {
    format!("{KV_PREFIX}{key}{KV_SUFFIX}")
}

fn kv_key(object_key: &str) -> Option<&str> {
    object_key.strip_prefix(KV_PREFIX)?.strip_suffix(KV_SUFFIX)
}

impl KvStore for S3KvStore {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>, StorageError>> {
        Box::pin(async move {
            match objects::get_object(&self.client, &self.bucket, &object_key(key)).await {
                Ok(body) => String::from_utf8(body)
                    .map(Some)
                    .map_err(|_| StorageError::InvalidValue {
                        key: key.to_string(),
                    }),
                Err(StorageError::NotFound { .. }) => Ok(None),
                Err(e) => Err(e),
            }
        })
    }

    fn set<'a>(&'a self, key: &'a str, value: String) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            objects::put_object(
                &self.client,
                &self.bucket,
                &object_key(key),
                value.into_bytes(),
                Some("application/json"),
            )
            .await?;
            debug!(bucket = %self.bucket, key, "kv entry written");
            Ok(())
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            objects::delete_object(&self.client, &self.bucket, &object_key(key)).await
        })
    }

    fn list<'a>(
        &'a self,
        prefix: &'a str,
        with_values: bool,
    ) -> BoxFuture<'a, Result<Vec<KvEntry>, StorageError>> {
        Box::pin(async move {
            let listed =
                objects::list_objects(&self.client, &self.bucket, &format!("{KV_PREFIX}{prefix}"))
                    .await?;

            let mut entries = Vec::with_capacity(listed.len());
            for object in listed {
                let Some(key) = kv_key(&object.key) else {
                    continue;
                };
                let value = if with_values {
                    match self.get(key).await {
                        Ok(value) => value,
                        Err(StorageError::InvalidValue { .. }) => {
                            warn!(bucket = %self.bucket, key, "kv entry is not valid UTF-8, listing it without a value");
                            None
                        }
                        Err(e) => return Err(e),
                    }
                } else {
                    None
                };
                entries.push(KvEntry {
                    key: key.to_string(),
                    value,
                });
            }
            Ok(entries)
        })
    }

    fn flush(&self) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            let deleted =
                objects::delete_objects_by_prefix(&self.client, &self.bucket, KV_PREFIX).await?;
            info!(bucket = %self.bucket, deleted, "kv store flushed");
            Ok(())
        })
    }
}
