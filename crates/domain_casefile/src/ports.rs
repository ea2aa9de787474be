//! Case File Domain Ports
//!
//! The domain never touches the database file or the uploads directory
//! directly. It talks to two ports:
//!
//! - [`CaseFileStore`]: the record collection
//! - [`DocumentStorage`]: binary attachments
//!
//! `infra_store` provides the production adapters; the `mock` module
//! provides in-memory ones for tests.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use domain_casefile::CaseFileService;
//!
//! let service = CaseFileService::new(
//!     Arc::new(JsonCaseFileStore::open("database.json").await?),
//!     Arc::new(LocalDocumentStorage::new("uploads").await?),
//! );
//! ```

use async_trait::async_trait;

use core_kernel::{CaseFileId, DomainPort, HealthCheckable, PortError};

use crate::case_file::CaseFile;
use crate::document::{DocumentMetadata, DocumentRecord};

/// Persistence of case file records
///
/// Every call is independent; implementations are not required to offer
/// transactions across calls.
#[async_trait]
pub trait CaseFileStore: DomainPort + HealthCheckable {
    /// Returns every stored file in storage order
    async fn list_all(&self) -> Result<Vec<CaseFile>, PortError>;

    /// Retrieves a file by id, or `PortError::NotFound`
    async fn get(&self, id: &CaseFileId) -> Result<CaseFile, PortError>;

    /// Stores a new file; `PortError::Conflict` if the id is taken
    async fn create(&self, file: CaseFile) -> Result<CaseFile, PortError>;

    /// Overwrites the file stored under `id`, or `PortError::NotFound`
    async fn replace(&self, id: &CaseFileId, file: CaseFile) -> Result<CaseFile, PortError>;

    /// Removes a file and returns it, or `PortError::NotFound`
    async fn delete(&self, id: &CaseFileId) -> Result<CaseFile, PortError>;
}

/// Storage of uploaded binaries
#[async_trait]
pub trait DocumentStorage: DomainPort + HealthCheckable {
    /// Writes a binary under a fresh unique filename and returns its record
    async fn store_binary(
        &self,
        bytes: Vec<u8>,
        metadata: DocumentMetadata,
    ) -> Result<DocumentRecord, PortError>;

    /// Reads a stored binary, or `PortError::NotFound`
    async fn read_binary(&self, stored_filename: &str) -> Result<Vec<u8>, PortError>;

    /// Deletes a stored binary; deleting a missing binary succeeds
    async fn delete_binary(&self, stored_filename: &str) -> Result<(), PortError>;
}

/// In-memory implementations of the ports for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use chrono::Utc;

    use core_kernel::{AdapterHealth, DocumentId, HealthCheckResult};

    /// In-memory record store keeping insertion order
    #[derive(Debug, Default)]
    pub struct MockCaseFileStore {
        files: Arc<RwLock<Vec<CaseFile>>>,
    }

    impl MockCaseFileStore {
        /// Creates an empty store
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with files for testing
        pub async fn with_files(files: Vec<CaseFile>) -> Self {
            let store = Self::new();
            store.files.write().await.extend(files);
            store
        }
    }

    impl DomainPort for MockCaseFileStore {}

    #[async_trait]
    impl HealthCheckable for MockCaseFileStore {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "mock-case-file-store".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("Mock adapter always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl CaseFileStore for MockCaseFileStore {
        async fn list_all(&self) -> Result<Vec<CaseFile>, PortError> {
            Ok(self.files.read().await.clone())
        }

        async fn get(&self, id: &CaseFileId) -> Result<CaseFile, PortError> {
            self.files
                .read()
                .await
                .iter()
                .find(|f| &f.id == id)
                .cloned()
                .ok_or_else(|| PortError::not_found(CaseFileId::label(), id))
        }

        async fn create(&self, file: CaseFile) -> Result<CaseFile, PortError> {
            let mut files = self.files.write().await;
            if files.iter().any(|f| f.id == file.id) {
                return Err(PortError::conflict(format!("case file {} already exists", file.id)));
            }
            files.push(file.clone());
            Ok(file)
        }

        async fn replace(&self, id: &CaseFileId, file: CaseFile) -> Result<CaseFile, PortError> {
            let mut files = self.files.write().await;
            let slot = files
                .iter_mut()
                .find(|f| &f.id == id)
                .ok_or_else(|| PortError::not_found(CaseFileId::label(), id))?;
            *slot = file.clone();
            Ok(file)
        }

        async fn delete(&self, id: &CaseFileId) -> Result<CaseFile, PortError> {
            let mut files = self.files.write().await;
            let index = files
                .iter()
                .position(|f| &f.id == id)
                .ok_or_else(|| PortError::not_found(CaseFileId::label(), id))?;
            Ok(files.remove(index))
        }
    }

    /// In-memory binary storage
    ///
    /// Filenames listed with [`MockDocumentStorage::fail_deletes_for`] make
    /// `delete_binary` fail, to exercise best-effort cleanup paths.
    #[derive(Debug, Default)]
    pub struct MockDocumentStorage {
        binaries: Arc<RwLock<HashMap<String, Vec<u8>>>>,
        failing_deletes: Arc<RwLock<HashSet<String>>>,
    }

    impl MockDocumentStorage {
        /// Creates an empty storage
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes deletes of `stored_filename` fail
        pub async fn fail_deletes_for(&self, stored_filename: impl Into<String>) {
            self.failing_deletes.write().await.insert(stored_filename.into());
        }

        /// Returns true if a binary is stored under the filename
        pub async fn contains(&self, stored_filename: &str) -> bool {
            self.binaries.read().await.contains_key(stored_filename)
        }

        /// Number of stored binaries
        pub async fn len(&self) -> usize {
            self.binaries.read().await.len()
        }
    }

    impl DomainPort for MockDocumentStorage {}

    #[async_trait]
    impl HealthCheckable for MockDocumentStorage {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "mock-document-storage".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("Mock adapter always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl DocumentStorage for MockDocumentStorage {
        async fn store_binary(
            &self,
            bytes: Vec<u8>,
            metadata: DocumentMetadata,
        ) -> Result<DocumentRecord, PortError> {
            let stored_filename = DocumentId::generate().to_string();
            let size = bytes.len() as u64;
            self.binaries.write().await.insert(stored_filename.clone(), bytes);
            Ok(DocumentRecord::new(metadata, stored_filename, size))
        }

        async fn read_binary(&self, stored_filename: &str) -> Result<Vec<u8>, PortError> {
            self.binaries
                .read()
                .await
                .get(stored_filename)
                .cloned()
                .ok_or_else(|| PortError::not_found(DocumentId::label(), stored_filename))
        }

        async fn delete_binary(&self, stored_filename: &str) -> Result<(), PortError> {
            if self.failing_deletes.read().await.contains(stored_filename) {
                return Err(PortError::storage(format!("cannot delete {}", stored_filename)));
            }
            self.binaries.write().await.remove(stored_filename);
            Ok(())
        }
    }
}
