//! Blob storage for uploaded file bytes.

use crate::error::{IngestError, IngestResult};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tracing::debug;

/// Locator for a stored blob.
#[derive(Debug, Clone)]
pub struct StoredBlob {
    /// Public locator URL for the stored bytes.
    pub url: String,
}

/// External blob storage collaborator.
///
/// Implementations must produce collision-avoided names for repeated
/// uploads of the same file name.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, name: &str, bytes: &[u8]) -> IngestResult<StoredBlob>;
}

/// Blob store backed by a local directory.
///
/// Files are prefixed with a content-hash fragment, so distinct
/// contents under the same name never collide and identical uploads
/// overwrite their own copy.
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, name: &str, bytes: &[u8]) -> IngestResult<StoredBlob> {
        tokio::fs::create_dir_all(&self.root).await?;

        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let digest = hasher.finalize();
        let prefix: String = digest[..6].iter().map(|b| format!("{:02x}", b)).collect();

        let safe_name: String = name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        let path = self.root.join(format!("{}-{}", prefix, safe_name));
        tokio::fs::write(&path, bytes).await?;
        debug!("Stored blob at {}", path.display());

        let path = path
            .canonicalize()
            .map_err(|e| IngestError::Blob(e.to_string()))?;

        Ok(StoredBlob {
            url: format!("file://{}", path.display()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_put_returns_locator() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path());

        let blob = store.put("notes.txt", b"hello blob").await.unwrap();
        assert!(blob.url.starts_with("file://"));
        assert!(blob.url.ends_with("-notes.txt"));
    }

    #[tokio::test]
    async fn test_distinct_contents_do_not_collide() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path());

        let a = store.put("same.txt", b"first contents").await.unwrap();
        let b = store.put("same.txt", b"second contents").await.unwrap();
        assert_ne!(a.url, b.url);
    }

    #[tokio::test]
    async fn test_awkward_names_are_sanitized() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path());

        let blob = store.put("weird name?.txt", b"data").await.unwrap();
        assert!(!blob.url.contains('?'));
        assert!(blob.url.ends_with("-weird_name_.txt"));

        // Written inside the root
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
