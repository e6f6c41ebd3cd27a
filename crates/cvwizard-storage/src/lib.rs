//! cvwizard-storage
//!
//! Blob and key-value store collaborators. The traits live in [`store`];
//! S3, local-filesystem and in-memory backends implement them.

pub mod client;
pub mod error;
pub mod local;
pub mod memory;
pub mod objects;
pub mod s3;
pub mod state;
pub mod store;

pub use store::{BlobEntry, BlobLocator, BlobStore, BlobUpload, KvEntry, KvStore};
