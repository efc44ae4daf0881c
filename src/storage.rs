//! Blob storage seam for uploaded files.
//!
//! Uploads are opaque blobs handed to a [`BlobStore`], which returns a
//! retrievable URL that is persisted on the document row. The default
//! implementation writes under a local media root; a production deployment
//! swaps in an object-store-backed implementation behind the same trait.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use tracing::{debug, instrument};

static UPLOAD_SEQ: AtomicU64 = AtomicU64::new(0);

#[async_trait::async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug {
    /// Stores the bytes and returns the URL they will be retrievable at.
    async fn store(&self, filename: &str, data: &[u8]) -> Result<String>;
}

/// Filesystem-backed store used by the default configuration and tests.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

/// Strips path components and anything outside a conservative character
/// set, so a client-supplied filename can never escape the media root.
fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("upload");
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim_matches('.').is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[async_trait::async_trait]
impl BlobStore for LocalBlobStore {
    #[instrument(skip(data))]
    async fn store(&self, filename: &str, data: &[u8]) -> Result<String> {
        let seq = UPLOAD_SEQ.fetch_add(1, Ordering::SeqCst);
        let name = format!("{seq}_{}", sanitize_filename(filename));
        let path = self.root.join(&name);

        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("Failed to create media root {}", self.root.display()))?;
        tokio::fs::write(&path, data)
            .await
            .with_context(|| format!("Failed to write upload to {}", path.display()))?;

        debug!("Stored {} bytes at {}", data.len(), path.display());
        Ok(format!("/media/{name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename_strips_paths() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\temp\\deed.pdf"), "deed.pdf");
        assert_eq!(sanitize_filename("deed (final).pdf"), "deed__final_.pdf");
        assert_eq!(sanitize_filename(""), "upload");
        assert_eq!(sanitize_filename("...."), "upload");
    }

    #[tokio::test]
    async fn test_local_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path());

        let url = store.store("deed.pdf", b"deed bytes").await.unwrap();
        assert!(url.starts_with("/media/"));
        assert!(url.ends_with("_deed.pdf"));

        let name = url.strip_prefix("/media/").unwrap();
        let written = tokio::fs::read(dir.path().join(name)).await.unwrap();
        assert_eq!(written, b"deed bytes");
    }
}
