//! Local filesystem document storage
//!
//! Binaries live flat in the uploads directory under a server-assigned name:
//! a UUID v7 (time-ordered) followed by the lower-cased original extension.
//! Stored names are never taken from the client, and names read back from
//! requests are rejected if they could address anything outside the
//! directory.

use std::path::{Path, PathBuf};
use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use core_kernel::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_casefile::{DocumentMetadata, DocumentRecord, DocumentStorage};

use crate::error::StoreError;

/// Longest original extension carried over to the stored name
const MAX_EXTENSION_LEN: usize = 8;

/// [`DocumentStorage`] writing to a local directory
#[derive(Debug, Clone)]
pub struct LocalDocumentStorage {
    root: PathBuf,
}

impl LocalDocumentStorage {
    /// Creates the storage, creating the directory if needed
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).await.map_err(|e| StoreError::io(&root, e))?;
        info!(path = %root.display(), "Document storage ready");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Fresh unique name for an upload, keeping a short alphanumeric extension
    pub fn stored_filename_for(original_name: &str) -> String {
        let stem = Uuid::now_v7().simple().to_string();
        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty() && e.len() <= MAX_EXTENSION_LEN)
            .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()));

        match extension {
            Some(ext) => format!("{}.{}", stem, ext.to_ascii_lowercase()),
            None => stem,
        }
    }

    /// Resolves a stored name to its path inside the uploads directory
    pub fn path_for(&self, stored_filename: &str) -> Result<PathBuf, StoreError> {
        let invalid = stored_filename.is_empty()
            || stored_filename.contains("..")
            || stored_filename.contains('/')
            || stored_filename.contains('\\')
            || stored_filename.contains('\0');

        if invalid {
            return Err(StoreError::InvalidFilename(stored_filename.to_string()));
        }
        Ok(self.root.join(stored_filename))
    }

    async fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        let mut file = fs::File::create(path).await.map_err(|e| StoreError::io(path, e))?;
        file.write_all(bytes).await.map_err(|e| StoreError::io(path, e))?;
        file.sync_all().await.map_err(|e| StoreError::io(path, e))?;
        Ok(())
    }
}

impl DomainPort for LocalDocumentStorage {}

#[async_trait]
impl HealthCheckable for LocalDocumentStorage {
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let result = fs::metadata(&self.root).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        let (status, message) = match result {
            Ok(meta) if meta.is_dir() => (AdapterHealth::Healthy, None),
            Ok(_) => (
                AdapterHealth::Unhealthy,
                Some(format!("{} is not a directory", self.root.display())),
            ),
            Err(e) => (AdapterHealth::Unhealthy, Some(e.to_string())),
        };

        HealthCheckResult {
            adapter_id: "local-document-storage".to_string(),
            status,
            latency_ms,
            message,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl DocumentStorage for LocalDocumentStorage {
    #[instrument(skip(self, bytes, metadata), fields(original_name = %metadata.original_name))]
    async fn store_binary(
        &self,
        bytes: Vec<u8>,
        metadata: DocumentMetadata,
    ) -> Result<DocumentRecord, PortError> {
        let stored_filename = Self::stored_filename_for(&metadata.original_name);
        let path = self.path_for(&stored_filename)?;
        let start = Instant::now();

        self.write(&path, &bytes).await?;

        info!(
            path = %path.display(),
            size_bytes = bytes.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Document binary stored"
        );
        Ok(DocumentRecord::new(metadata, stored_filename, bytes.len() as u64))
    }

    async fn read_binary(&self, stored_filename: &str) -> Result<Vec<u8>, PortError> {
        let path = self.path_for(stored_filename)?;
        match fs::read(&path).await {
            Ok(bytes) => {
                debug!(path = %path.display(), size_bytes = bytes.len(), "Document binary read");
                Ok(bytes)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(stored_filename.to_string()).into())
            }
            Err(e) => Err(StoreError::io(&path, e).into()),
        }
    }

    async fn delete_binary(&self, stored_filename: &str) -> Result<(), PortError> {
        let path = self.path_for(stored_filename)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!(path = %path.display(), "Document binary deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Document binary already absent");
                Ok(())
            }
            Err(e) => Err(StoreError::io(&path, e).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_name_keeps_short_extension() {
        let name = LocalDocumentStorage::stored_filename_for("Tutanak.PDF");
        assert!(name.ends_with(".pdf"));
        assert_eq!(name.len(), 32 + 4);
    }

    #[test]
    fn test_stored_name_drops_odd_extension() {
        let name = LocalDocumentStorage::stored_filename_for("archive.tar-gz");
        assert!(!name.contains('.'));
        let name = LocalDocumentStorage::stored_filename_for("README");
        assert_eq!(name.len(), 32);
    }

    #[test]
    fn test_stored_names_are_unique() {
        let a = LocalDocumentStorage::stored_filename_for("a.png");
        let b = LocalDocumentStorage::stored_filename_for("a.png");
        assert_ne!(a, b);
    }

    #[test]
    fn test_path_traversal_rejected() {
        let storage = LocalDocumentStorage {
            root: PathBuf::from("uploads"),
        };
        for name in ["../database.json", "a/b.pdf", "..", "", "a\\b"] {
            assert!(matches!(storage.path_for(name), Err(StoreError::InvalidFilename(_))), "{}", name);
        }
        assert_eq!(storage.path_for("x.pdf").unwrap(), PathBuf::from("uploads/x.pdf"));
    }
}
