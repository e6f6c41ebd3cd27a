//! Read side: enumerate stored records and resolve one for display.

use std::sync::Arc;
use std::time::Duration;

use cvwizard_core::keys::{self, RECORD_PREFIX};
use cvwizard_core::models::record::{BlobPath, Record, RecordId};
use cvwizard_storage::error::StorageError;
use cvwizard_storage::{BlobLocator, BlobStore, KvStore};
use thiserror::Error;
use tracing::{debug, warn};

use crate::context::PipelineContext;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("stored record {key} is malformed: {source}")]
    Malformed {
        key: String,
        source: serde_json::Error,
    },
}

/// A record together with short-lived locators for both of its blobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedRecord {
    pub record: Record,
    pub document: BlobLocator,
    pub preview: BlobLocator,
}

#[derive(Clone)]
pub struct Catalog {
    blobs: Arc<dyn BlobStore>,
    kv: Arc<dyn KvStore>,
}

impl Catalog {
    pub fn new(blobs: Arc<dyn BlobStore>, kv: Arc<dyn KvStore>) -> Self {
        Self { blobs, kv }
    }

    pub fn from_context(ctx: &PipelineContext) -> Self {
        Self::new(ctx.blobs.clone(), ctx.kv.clone())
    }

    /// Every stored record, provisional and final.
    ///
    /// Results come back in store enumeration order, which is unspecified;
    /// sort them if you need a stable order. Entries that do not parse as a
    /// record are logged and skipped.
    pub async fn list_all(&self) -> Result<Vec<Record>, CatalogError> {
        let entries = self.kv.list(RECORD_PREFIX, true).await?;

        let mut records = Vec::with_capacity(entries.len());
        let mut skipped = 0usize;
        for entry in entries {
            let Some(value) = entry.value else {
                warn!(key = %entry.key, "record entry has no value, skipping");
                skipped += 1;
                continue;
            };
            match serde_json::from_str::<Record>(&value) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(key = %entry.key, error = %e, "malformed record, skipping");
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            warn!(loaded = records.len(), skipped, "record listing was partial");
        } else {
            debug!(loaded = records.len(), "records listed");
        }
        Ok(records)
    }

    /// Only records whose evaluation finished.
    pub async fn list_completed(&self) -> Result<Vec<Record>, CatalogError> {
        let mut records = self.list_all().await?;
        records.retain(Record::is_complete);
        Ok(records)
    }

    /// Load one record and resolve its blobs to locators valid for `ttl`.
    ///
    /// `None` when the record does not exist or either of its blobs is gone.
    /// A stored value that is not a record is an error.
    pub async fn load_one(
        &self,
        id: RecordId,
        ttl: Duration,
    ) -> Result<Option<LoadedRecord>, CatalogError> {
        let key = keys::record(id);
        let Some(value) = self.kv.get(&key).await? else {
            return Ok(None);
        };
        let record: Record =
            serde_json::from_str(&value).map_err(|source| CatalogError::Malformed {
                key: key.clone(),
                source,
            })?;

        let Some(document) = self.locate(&record.document_path, ttl).await? else {
            warn!(key = %key, path = %record.document_path, "document blob missing");
            return Ok(None);
        };
        let Some(preview) = self.locate(&record.preview_path, ttl).await? else {
            warn!(key = %key, path = %record.preview_path, "preview blob missing");
            return Ok(None);
        };

        Ok(Some(LoadedRecord {
            record,
            document,
            preview,
        }))
    }

    async fn locate(
        &self,
        path: &BlobPath,
        ttl: Duration,
    ) -> Result<Option<BlobLocator>, StorageError> {
        if !self.blobs.exists(path).await? {
            return Ok(None);
        }
        match self.blobs.locate(path, ttl).await {
            Ok(locator) => Ok(Some(locator)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}
