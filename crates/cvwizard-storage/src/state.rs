use serde::{Serialize, de::DeserializeOwned};

use crate::error::StorageError;
use crate::store::KvStore;

/// Load a JSON value from the key-value store. `None` when the key is absent.
pub async fn load_json<T: DeserializeOwned>(
    kv: &dyn KvStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match kv.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Serialize `value` as JSON and write it under `key`, replacing any prior value.
pub async fn save_json<T: Serialize>(
    kv: &dyn KvStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let body = serde_json::to_string(value)?;
    kv.set(key, body).await
}
