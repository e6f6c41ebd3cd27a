//! Key/path conventions.
//!
//! Pure string functions with no storage dependency. These define the canonical
//! layout of records in the key-value store and of uploads in the blob store.

use uuid::Uuid;

use crate::models::record::RecordId;

/// Flat namespace shared by every persisted record.
pub const RECORD_PREFIX: &str = "record:";

/// Root of every uploaded blob (documents and previews).
pub const UPLOADS_PREFIX: &str = "uploads/";

pub fn record(id: RecordId) -> String {
    format!("{RECORD_PREFIX}{id}")
}

/// Recover the record id from a key produced by [`record`].
pub fn record_id_from_key(key: &str) -> Option<RecordId> {
    key.strip_prefix(RECORD_PREFIX)?.parse().ok()
}

/// Blob path for a single upload. Each upload gets its own id so two files
/// with the same name never collide.
pub fn upload(upload_id: Uuid, file_name: &str) -> String {
    format!("{UPLOADS_PREFIX}{upload_id}/{}", sanitize_file_name(file_name))
}

/// Keep `[A-Za-z0-9._-]`, replace everything else with `_`.
///
/// Leading dots are stripped so a name can never become `..` or a hidden file.
pub fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}
