//! Document handlers
//!
//! Uploads are `multipart/form-data` with the binary in field `document` and
//! the document type label in field `type`.

use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use tracing::warn;

use domain_casefile::{DocumentMetadata, DocumentType};

use crate::dto::case_files::FileSavedResponse;
use crate::dto::documents::DocumentUploadedResponse;
use crate::handlers::case_files::parse_id;
use crate::{error::ApiError, AppState};

/// Multipart field carrying the binary
pub const DOCUMENT_FIELD: &str = "document";
/// Multipart field carrying the document type label
pub const TYPE_FIELD: &str = "type";

/// Parsed upload form
#[derive(Debug)]
pub struct UploadForm {
    pub bytes: Vec<u8>,
    pub metadata: DocumentMetadata,
}

/// Reads the upload form
///
/// A missing or unknown type label falls back to the generic document type.
/// A missing content type is guessed from the filename.
pub async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut file: Option<(Vec<u8>, String, Option<String>)> = None;
    let mut type_label: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(DOCUMENT_FIELD) => {
                if file.is_some() {
                    return Err(ApiError::BadRequest(
                        "Send exactly one field named 'document'".to_string(),
                    ));
                }
                let filename = field.file_name().map(str::to_string).unwrap_or_else(|| "belge".to_string());
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                file = Some((bytes.to_vec(), filename, content_type));
            }
            Some(TYPE_FIELD) => {
                type_label = Some(field.text().await?);
            }
            _ => {}
        }
    }

    let (bytes, filename, content_type) =
        file.ok_or_else(|| ApiError::BadRequest("No file selected".to_string()))?;

    let document_type = match type_label.as_deref().map(str::trim) {
        None | Some("") => DocumentType::General,
        Some(label) => DocumentType::from_label(label).unwrap_or_else(|| {
            warn!(label, "Unknown document type, storing as {}", DocumentType::General);
            DocumentType::General
        }),
    };

    let content_type = content_type.unwrap_or_else(|| content_type_for(&filename));

    Ok(UploadForm {
        bytes,
        metadata: DocumentMetadata::new(filename, document_type, content_type),
    })
}

/// Content type served for a stored filename, from its extension
pub fn content_type_for(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Stores an upload not yet attached to any file
pub async fn upload_document(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<DocumentUploadedResponse>, ApiError> {
    let form = read_upload_form(multipart).await?;
    let record = state.service.upload_document(form.bytes, form.metadata).await?;
    Ok(Json(record.into()))
}

/// Stores an upload and appends it to a file
pub async fn attach_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<FileSavedResponse>), ApiError> {
    let id = parse_id(id)?;
    let form = read_upload_form(multipart).await?;
    let file = state.service.attach_document(&id, form.bytes, form.metadata).await?;
    Ok((StatusCode::CREATED, Json(file.into())))
}

/// Removes a document, addressed by id or stored filename, from a file
pub async fn remove_document(
    State(state): State<AppState>,
    Path((id, doc_id)): Path<(String, String)>,
) -> Result<Json<FileSavedResponse>, ApiError> {
    let file = state.service.remove_document(&parse_id(id)?, &doc_id).await?;
    Ok(Json(file.into()))
}

/// Sends a stored binary as an attachment
pub async fn download_document(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let bytes = state.service.read_document(&filename).await?;
    binary_response(&filename, bytes, "attachment")
}

/// Sends a stored binary for inline display
pub async fn view_document(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let bytes = state.service.read_document(&filename).await?;
    binary_response(&filename, bytes, "inline")
}

fn binary_response(filename: &str, bytes: Vec<u8>, disposition: &str) -> Result<Response, ApiError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(filename))
        .header(
            header::CONTENT_DISPOSITION,
            format!("{}; filename=\"{}\"", disposition, filename),
        )
        .body(Body::from(bytes))
        .map_err(|e| ApiError::Internal(e.to_string()))
}
