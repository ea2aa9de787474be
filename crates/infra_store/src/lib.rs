//! Storage Infrastructure
//!
//! Production adapters for the case file domain ports:
//!
//! - [`JsonCaseFileStore`]: case files in a single JSON database file,
//!   normalised from older layouts on read (see [`legacy`])
//! - [`LocalDocumentStorage`]: uploaded binaries in a local directory
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use domain_casefile::CaseFileService;
//! use infra_store::{JsonCaseFileStore, LocalDocumentStorage};
//!
//! let store = JsonCaseFileStore::open("database.json").await?;
//! let documents = LocalDocumentStorage::new("uploads").await?;
//! let service = CaseFileService::new(Arc::new(store), Arc::new(documents));
//! ```

pub mod error;
pub mod legacy;
pub mod json_store;
pub mod local_storage;

pub use error::StoreError;
pub use json_store::{Database, JsonCaseFileStore};
pub use legacy::{legacy_file_type, MULTIPLE_TYPES_LABEL};
pub use local_storage::LocalDocumentStorage;
