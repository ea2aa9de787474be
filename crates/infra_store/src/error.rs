//! Storage error types

use thiserror::Error;

use core_kernel::{DocumentId, PortError};

/// Errors raised by the storage adapters
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem access failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The database file is not valid JSON of the expected shape
    #[error("Corrupt database file {path}: {message}")]
    Corrupt { path: String, message: String },

    /// A stored record has no identifier and cannot be addressed
    #[error("Case file at position {index} has no id")]
    MissingId { index: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored filename would escape the uploads directory
    #[error("Invalid stored filename: {0}")]
    InvalidFilename(String),

    /// No stored binary under this filename
    #[error("Document binary not found: {0}")]
    NotFound(String),
}

impl StoreError {
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

impl From<StoreError> for PortError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(name) => PortError::not_found(DocumentId::label(), name),
            StoreError::InvalidFilename(name) => {
                PortError::validation(format!("invalid stored filename '{}'", name))
            }
            StoreError::Io { path, source } => {
                PortError::storage_with_source(format!("I/O error on {}", path), source)
            }
            StoreError::Serialization(e) => PortError::transformation(e.to_string()),
            other @ (StoreError::Corrupt { .. } | StoreError::MissingId { .. }) => {
                PortError::transformation(other.to_string())
            }
        }
    }
}
