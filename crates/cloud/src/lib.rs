//! Blob storage providers.
//!
//! The ingestion pipeline only needs two capabilities from image storage:
//! persist bytes under a key and return a retrievable URL, and list stored
//! objects under a prefix. [`StorageProvider`] captures that contract;
//! anything S3-compatible or a plain directory on disk satisfies it.

use async_trait::async_trait;
use serde::Serialize;

pub mod local;
pub mod s3;

pub use local::LocalStorage;
pub use s3::S3Storage;

/// Error type for blob store operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Invalid object key: {0}")]
    InvalidKey(String),
}

/// A stored object reference returned from listings.
#[derive(Debug, Clone, Serialize)]
pub struct StoredObject {
    /// The object key, relative to the store root.
    pub name: String,
    /// A URL the dashboard can fetch the object from.
    pub url: String,
}

/// Abstract blob store: put bytes, get a URL back; list by prefix.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Persist `bytes` under `key` and return a retrievable URL.
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String, StorageError>;

    /// List stored objects whose keys start with `prefix`.
    async fn list(&self, prefix: &str) -> Result<Vec<StoredObject>, StorageError>;
}

/// Reject keys that could escape the store root.
///
/// Keys are generated internally (tenant id + timestamp + random suffix),
/// so a failure here indicates a caller bug rather than user input.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() || key.starts_with('/') || key.split('/').any(|part| part == "..") {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Join a public base URL and an object key without doubling slashes.
pub(crate) fn join_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key)
}
