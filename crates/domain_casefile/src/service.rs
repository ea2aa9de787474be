//! Case file service
//!
//! Orchestrates the domain model and the two storage ports. Every operation
//! the presentation layer offers goes through [`CaseFileService`].
//!
//! Read-modify-write sequences (get, modify, replace) are not transactional;
//! two concurrent edits of the same file are last-write-wins.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use core_kernel::{CaseFileId, HealthCheckResult};

use crate::case_file::{CaseFile, CaseFileUpdate, CaseStatus, NewCaseFile};
use crate::completeness::missing_documents;
use crate::document::{DocumentMetadata, DocumentRecord, DocumentType, UploadPolicy};
use crate::error::CaseFileError;
use crate::ports::{CaseFileStore, DocumentStorage};
use crate::query::{self, sort_for_listing};
use crate::statistics::Statistics;
use crate::workflow::{TransitionOutcome, WorkflowAction};

/// Entry point for every case file operation
///
/// # Example
///
/// ```rust,ignore
/// let service = CaseFileService::new(store, documents);
/// let file = service.create(new_file).await?;
/// let outcome = service.mark_applied(&file.id).await?;
/// if outcome.close_view {
///     // the ready list is now empty
/// }
/// ```
#[derive(Clone)]
pub struct CaseFileService {
    store: Arc<dyn CaseFileStore>,
    documents: Arc<dyn DocumentStorage>,
    upload_policy: UploadPolicy,
}

impl CaseFileService {
    /// Creates a service with the default upload policy
    pub fn new(store: Arc<dyn CaseFileStore>, documents: Arc<dyn DocumentStorage>) -> Self {
        Self {
            store,
            documents,
            upload_policy: UploadPolicy::default(),
        }
    }

    /// Replaces the upload policy
    pub fn with_upload_policy(mut self, policy: UploadPolicy) -> Self {
        self.upload_policy = policy;
        self
    }

    pub fn upload_policy(&self) -> &UploadPolicy {
        &self.upload_policy
    }

    /// Every file in listing order
    pub async fn list(&self) -> Result<Vec<CaseFile>, CaseFileError> {
        let mut files = self.store.list_all().await?;
        sort_for_listing(&mut files);
        debug!(count = files.len(), "Listed case files");
        Ok(files)
    }

    pub async fn get(&self, id: &CaseFileId) -> Result<CaseFile, CaseFileError> {
        Ok(self.store.get(id).await?)
    }

    /// Opens and persists a new case file
    #[instrument(skip(self, new), fields(client = %new.client_name))]
    pub async fn create(&self, new: NewCaseFile) -> Result<CaseFile, CaseFileError> {
        self.ensure_unclaimed(None, &new.documents).await?;
        let file = CaseFile::create(new)?;
        let file = self.store.create(file).await?;
        info!(file_id = %file.id, status = %file.status, "Case file created");
        Ok(file)
    }

    /// Merges an update into a stored file
    ///
    /// Binaries of documents the update dropped are removed best-effort after
    /// the record is persisted.
    #[instrument(skip(self, update), fields(file_id = %id))]
    pub async fn update(&self, id: &CaseFileId, update: CaseFileUpdate) -> Result<CaseFile, CaseFileError> {
        let mut file = self.store.get(id).await?;
        if let Some(documents) = &update.documents {
            self.ensure_unclaimed(Some(id), documents).await?;
        }
        let dropped = file.apply_update(update)?;
        let file = self.store.replace(id, file).await?;

        self.delete_binaries(&dropped).await;
        info!(status = %file.status, dropped_documents = dropped.len(), "Case file updated");
        Ok(file)
    }

    /// Deletes a file and its document binaries
    #[instrument(skip(self), fields(file_id = %id))]
    pub async fn delete(&self, id: &CaseFileId) -> Result<CaseFile, CaseFileError> {
        let file = self.store.delete(id).await?;
        self.delete_binaries(&file.documents).await;
        info!(documents = file.documents.len(), "Case file deleted");
        Ok(file)
    }

    /// Free-text search, results in listing order
    pub async fn search(&self, term: &str) -> Result<Vec<CaseFile>, CaseFileError> {
        let files = self.list().await?;
        let hits: Vec<CaseFile> = query::search(&files, term).into_iter().cloned().collect();
        debug!(term, hits = hits.len(), "Searched case files");
        Ok(hits)
    }

    /// Files in one status, in listing order
    pub async fn partition(&self, status: CaseStatus) -> Result<Vec<CaseFile>, CaseFileError> {
        let files = self.list().await?;
        Ok(query::partition(&files, status).into_iter().cloned().collect())
    }

    /// Files still gathering documents
    pub async fn pending_files(&self) -> Result<Vec<CaseFile>, CaseFileError> {
        self.partition(CaseStatus::DocumentGatheringInProgress).await
    }

    /// Files ready for application
    pub async fn ready_files(&self) -> Result<Vec<CaseFile>, CaseFileError> {
        self.partition(CaseStatus::ReadyForApplication).await
    }

    pub async fn missing_documents(&self, id: &CaseFileId) -> Result<Vec<DocumentType>, CaseFileError> {
        let file = self.store.get(id).await?;
        Ok(missing_documents(&file))
    }

    /// Statistics recomputed over the whole collection
    pub async fn statistics(&self) -> Result<Statistics, CaseFileError> {
        let files = self.store.list_all().await?;
        Ok(Statistics::compute(&files))
    }

    /// Document gathering finished; file becomes ready for application
    pub async fn mark_ready(&self, id: &CaseFileId) -> Result<TransitionOutcome, CaseFileError> {
        self.transition(id, WorkflowAction::MarkReady).await
    }

    /// Application filed with the insurer
    pub async fn mark_applied(&self, id: &CaseFileId) -> Result<TransitionOutcome, CaseFileError> {
        self.transition(id, WorkflowAction::MarkApplied).await
    }

    #[instrument(skip(self), fields(file_id = %id))]
    async fn transition(&self, id: &CaseFileId, action: WorkflowAction) -> Result<TransitionOutcome, CaseFileError> {
        let mut file = self.store.get(id).await?;
        action.apply(&mut file)?;
        let file = self.store.replace(id, file).await?;

        let collection = self.store.list_all().await?;
        let outcome = TransitionOutcome::new(action, file, &collection);
        info!(
            to = %outcome.file.status,
            close_view = outcome.close_view,
            "Case file status changed"
        );
        Ok(outcome)
    }

    /// Stores an upload and returns a record not yet attached to any file
    ///
    /// The caller includes the record in a later create or update.
    #[instrument(skip(self, bytes, metadata), fields(name = %metadata.original_name, size = bytes.len()))]
    pub async fn upload_document(
        &self,
        bytes: Vec<u8>,
        metadata: DocumentMetadata,
    ) -> Result<DocumentRecord, CaseFileError> {
        self.upload_policy.check(&metadata.media_type, bytes.len())?;
        let record = self.documents.store_binary(bytes, metadata).await?;
        info!(stored_filename = %record.stored_filename, "Document uploaded");
        Ok(record)
    }

    /// Stores an upload and appends it to an existing file
    #[instrument(skip(self, bytes, metadata), fields(file_id = %id, size = bytes.len()))]
    pub async fn attach_document(
        &self,
        id: &CaseFileId,
        bytes: Vec<u8>,
        metadata: DocumentMetadata,
    ) -> Result<CaseFile, CaseFileError> {
        let mut file = self.store.get(id).await?;
        self.upload_policy.check(&metadata.media_type, bytes.len())?;

        let record = self.documents.store_binary(bytes, metadata).await?;
        let stored_filename = record.stored_filename.clone();
        file.attach_document(record);

        match self.store.replace(id, file).await {
            Ok(file) => {
                info!(%stored_filename, "Document attached");
                Ok(file)
            }
            Err(err) => {
                self.delete_binaries_by_name(&[stored_filename]).await;
                Err(err.into())
            }
        }
    }

    /// Removes a document, addressed by id or stored filename, from a file
    #[instrument(skip(self), fields(file_id = %id))]
    pub async fn remove_document(&self, id: &CaseFileId, reference: &str) -> Result<CaseFile, CaseFileError> {
        let mut file = self.store.get(id).await?;
        let removed = file.remove_document(reference)?;
        let file = self.store.replace(id, file).await?;

        self.delete_binaries(std::slice::from_ref(&removed)).await;
        info!(document_id = %removed.id, "Document removed");
        Ok(file)
    }

    /// Reads a stored binary
    pub async fn read_document(&self, stored_filename: &str) -> Result<Vec<u8>, CaseFileError> {
        Ok(self.documents.read_binary(stored_filename).await?)
    }

    /// Health of both storage adapters
    pub async fn health(&self) -> Vec<HealthCheckResult> {
        vec![
            self.store.health_check().await,
            self.documents.health_check().await,
        ]
    }

    /// Rejects records another file already owns and records listed twice
    async fn ensure_unclaimed(
        &self,
        owner: Option<&CaseFileId>,
        documents: &[DocumentRecord],
    ) -> Result<(), CaseFileError> {
        if documents.is_empty() {
            return Ok(());
        }

        for (index, record) in documents.iter().enumerate() {
            if documents[..index].iter().any(|other| other.shares_identity(record)) {
                return Err(CaseFileError::validation(format!(
                    "document {} is listed more than once",
                    record.id
                )));
            }
        }

        let files = self.store.list_all().await?;
        for record in documents {
            let claimed = files
                .iter()
                .filter(|f| Some(&f.id) != owner)
                .find(|f| f.documents.iter().any(|d| d.shares_identity(record)));
            if let Some(other) = claimed {
                warn!(document_id = %record.id, owner = %other.id, "Rejected document owned by another file");
                return Err(CaseFileError::validation(format!(
                    "document {} belongs to case file {}",
                    record.id, other.id
                )));
            }
        }
        Ok(())
    }

    async fn delete_binaries(&self, records: &[DocumentRecord]) {
        let names: Vec<String> = records.iter().map(|r| r.stored_filename.clone()).collect();
        self.delete_binaries_by_name(&names).await;
    }

    /// Best-effort: failures are logged and never propagated
    async fn delete_binaries_by_name(&self, names: &[String]) {
        for name in names {
            if let Err(err) = self.documents.delete_binary(name).await {
                warn!(stored_filename = %name, error = %err, "Failed to delete document binary");
            }
        }
    }
}
