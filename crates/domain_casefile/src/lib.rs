//! Case File Domain
//!
//! Insurance-claim case files: who the client is, which vehicle and opponent
//! are involved, which documents have been collected, and where the file
//! stands in the application workflow.
//!
//! # Lifecycle
//!
//! ```text
//! Evrak Tedarik Aşamasında -> Başvuruya Hazır -> Başvuru Yapıldı
//!                                  (any status via replace-update)
//! ```
//!
//! - [`case_file`]: the aggregate, its enumerations, create and merge-update
//! - [`completeness`]: required-document catalog and the missing-documents view
//! - [`workflow`]: guarded "mark ready" / "mark applied" transitions
//! - [`statistics`]: counts per claim type and per status
//! - [`query`]: listing order, partition views, free-text search
//! - [`ports`]: storage contracts implemented by `infra_store`
//! - [`service`]: orchestration used by the HTTP layer
//!
//! # Example
//!
//! ```rust
//! use domain_casefile::{CaseFile, CaseStatus, ClaimType, NewCaseFile, missing_documents};
//!
//! let file = CaseFile::create(NewCaseFile {
//!     client_name: "Ayşe Demir".to_string(),
//!     plate: "34 ABC 123".to_string(),
//!     claim_types: vec![ClaimType::TotalLossDifference],
//!     status: Some(CaseStatus::DocumentGatheringInProgress),
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! assert_eq!(missing_documents(&file).len(), 7);
//! ```

pub mod case_file;
pub mod document;
pub mod completeness;
pub mod workflow;
pub mod statistics;
pub mod query;
pub mod ports;
pub mod service;
pub mod error;

pub use case_file::{CaseFile, CaseFileUpdate, CaseStatus, ClaimType, NewCaseFile};
pub use document::{
    DocumentMetadata, DocumentRecord, DocumentType, UploadPolicy,
    ALLOWED_MEDIA_TYPES, DEFAULT_MAX_UPLOAD_BYTES, PUBLIC_UPLOADS_PREFIX,
    normalize_media_type, public_path,
};
pub use completeness::{missing_documents, Completeness, REQUIRED_DOCUMENTS};
pub use workflow::{mark_applied, mark_ready, TransitionOutcome, WorkflowAction};
pub use statistics::Statistics;
pub use query::{listing_cmp, partition, search, sort_for_listing};
pub use ports::{CaseFileStore, DocumentStorage};
pub use service::CaseFileService;
pub use error::CaseFileError;
