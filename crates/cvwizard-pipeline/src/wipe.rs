use cvwizard_core::keys::UPLOADS_PREFIX;
use cvwizard_storage::error::StorageError;
use cvwizard_storage::{BlobStore, KvStore};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WipeSummary {
    pub blobs_deleted: usize,
}

/// Delete every uploaded blob, then clear the key-value store.
///
/// Stops at the first error; whatever was deleted before it stays deleted.
pub async fn wipe_all(
    blobs: &dyn BlobStore,
    kv: &dyn KvStore,
) -> Result<WipeSummary, StorageError> {
    let entries = blobs.list(UPLOADS_PREFIX).await?;
    for entry in &entries {
        blobs.delete(&entry.path).await?;
    }
    kv.flush().await?;

    info!(blobs_deleted = entries.len(), "all data wiped");
    Ok(WipeSummary {
        blobs_deleted: entries.len(),
    })
}
