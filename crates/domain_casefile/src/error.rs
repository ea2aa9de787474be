//! Case file domain errors

use thiserror::Error;

use core_kernel::{CoreError, DocumentId, PortError};

/// Errors that can occur in the case file domain
#[derive(Debug, Error)]
pub enum CaseFileError {
    /// Required field missing or a field value out of range
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Case file not found: {0}")]
    NotFound(String),

    /// Unknown document id or stored filename
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Unsupported media type: {0}")]
    UnsupportedMedia(String),

    #[error("Document exceeds the maximum size of {max_bytes} bytes")]
    PayloadTooLarge { max_bytes: usize },

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The storage collaborator failed; nothing was committed
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CaseFileError {
    /// Creates a Validation error with a message
    pub fn validation(message: impl Into<String>) -> Self {
        CaseFileError::Validation(message.into())
    }

    /// Creates a Validation error from several messages
    pub fn validation_failed(errors: Vec<String>) -> Self {
        CaseFileError::Validation(errors.join("; "))
    }

    /// Creates a NotFound error from any id type
    pub fn not_found(id: impl std::fmt::Display) -> Self {
        CaseFileError::NotFound(id.to_string())
    }
}

impl From<CoreError> for CaseFileError {
    fn from(err: CoreError) -> Self {
        CaseFileError::Validation(err.to_string())
    }
}

impl From<PortError> for CaseFileError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { entity_type, id } if entity_type == DocumentId::label() => {
                CaseFileError::DocumentNotFound(id)
            }
            PortError::NotFound { id, .. } => CaseFileError::NotFound(id),
            PortError::Validation { message } => CaseFileError::Validation(message),
            PortError::Conflict { message } => CaseFileError::Conflict(message),
            PortError::Storage { message, source } => match source {
                Some(source) => CaseFileError::Storage(format!("{}: {}", message, source)),
                None => CaseFileError::Storage(message),
            },
            PortError::Transformation { message } => CaseFileError::Storage(message),
        }
    }
}
