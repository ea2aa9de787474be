//! API error handling

use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use domain_casefile::CaseFileError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMedia(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg.clone()),
            ApiError::UnsupportedMedia(msg) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "unsupported_media_type", msg.clone())
            }
            ApiError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large", msg.clone()),
            ApiError::Storage(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", msg.clone()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone()),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

impl From<CaseFileError> for ApiError {
    fn from(err: CaseFileError) -> Self {
        match err {
            CaseFileError::Validation(msg) => ApiError::Validation(msg),
            e @ (CaseFileError::NotFound(_) | CaseFileError::DocumentNotFound(_)) => {
                ApiError::NotFound(e.to_string())
            }
            e @ CaseFileError::InvalidStatusTransition { .. } => ApiError::Conflict(e.to_string()),
            CaseFileError::Conflict(msg) => ApiError::Conflict(msg),
            CaseFileError::UnsupportedMedia(media_type) => ApiError::UnsupportedMedia(format!(
                "{} is not accepted; allowed: JPG, PNG, GIF, PDF, DOC, DOCX, TXT",
                media_type
            )),
            e @ CaseFileError::PayloadTooLarge { .. } => ApiError::PayloadTooLarge(e.to_string()),
            CaseFileError::Storage(msg) => ApiError::Storage(msg),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(err.body_text())
        } else {
            ApiError::BadRequest(format!("Failed to read multipart body: {}", err.body_text()))
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        match rejection {
            JsonRejection::JsonDataError(_) => ApiError::Validation(message),
            JsonRejection::MissingJsonContentType(_) => ApiError::UnsupportedMedia(message),
            other if other.status() == StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge(message),
            _ => ApiError::BadRequest(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_status_codes() {
        let cases = [
            (CaseFileError::validation("plate is required"), StatusCode::UNPROCESSABLE_ENTITY),
            (CaseFileError::not_found("42"), StatusCode::NOT_FOUND),
            (CaseFileError::DocumentNotFound("a.pdf".to_string()), StatusCode::NOT_FOUND),
            (
                CaseFileError::InvalidStatusTransition {
                    from: "Kapandı".to_string(),
                    to: "Başvuru Yapıldı".to_string(),
                },
                StatusCode::CONFLICT,
            ),
            (CaseFileError::UnsupportedMedia("application/zip".to_string()), StatusCode::UNSUPPORTED_MEDIA_TYPE),
            (CaseFileError::PayloadTooLarge { max_bytes: 10 }, StatusCode::PAYLOAD_TOO_LARGE),
            (CaseFileError::Storage("disk full".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
