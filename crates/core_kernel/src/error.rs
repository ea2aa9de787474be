//! Core error types used across the system

use thiserror::Error;

/// Core error type for the kernel
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }

    pub fn invalid_date(value: impl Into<String>) -> Self {
        CoreError::InvalidDate(value.into())
    }
}
