//! Filesystem-backed storage provider.
//!
//! Writes objects under a base directory and returns URLs joined onto a
//! configured public base (the API serves the directory at `/uploads`).
//! Used in development and in the integration test suite.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::{join_url, validate_key, StorageError, StorageProvider, StoredObject};

/// Blob store rooted at a local directory.
pub struct LocalStorage {
    base_dir: PathBuf,
    public_base_url: String,
}

impl LocalStorage {
    pub fn new(base_dir: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            public_base_url: public_base_url.into(),
        }
    }

    /// The directory objects are written under.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

#[async_trait]
impl StorageProvider for LocalStorage {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String, StorageError> {
        validate_key(key)?;

        let path = self.base_dir.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;

        tracing::debug!(key, size = bytes.len(), "Stored blob on local filesystem");
        Ok(join_url(&self.public_base_url, key))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<StoredObject>, StorageError> {
        let mut objects = Vec::new();
        let mut pending = vec![self.base_dir.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                // A store that has never been written to is an empty store.
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };

            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if entry.file_type().await?.is_dir() {
                    pending.push(path);
                    continue;
                }
                let Ok(relative) = path.strip_prefix(&self.base_dir) else {
                    continue;
                };
                let name = relative.to_string_lossy().replace('\\', "/");
                if name.starts_with(prefix) {
                    let url = join_url(&self.public_base_url, &name);
                    objects.push(StoredObject { name, url });
                }
            }
        }

        objects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(objects)
    }
}
