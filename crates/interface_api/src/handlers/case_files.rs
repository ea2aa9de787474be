//! Case file handlers

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use core_kernel::CaseFileId;
use domain_casefile::TransitionOutcome;

use crate::dto::case_files::*;
use crate::{error::ApiError, AppState};

pub(crate) fn parse_id(id: String) -> Result<CaseFileId, ApiError> {
    CaseFileId::parse(id).map_err(|e| ApiError::BadRequest(e.to_string()))
}

fn annotate(files: Vec<domain_casefile::CaseFile>) -> Json<Vec<CaseFileResponse>> {
    Json(files.into_iter().map(CaseFileResponse::from).collect())
}

/// Lists every file in listing order
pub async fn list_files(
    State(state): State<AppState>,
) -> Result<Json<Vec<CaseFileResponse>>, ApiError> {
    Ok(annotate(state.service.list().await?))
}

/// Opens a new case file
pub async fn create_file(
    State(state): State<AppState>,
    payload: Result<Json<CreateCaseFileRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<FileSavedResponse>), ApiError> {
    let Json(request) = payload?;
    request.validate()?;
    let file = state.service.create(request.into_new_case_file()?).await?;
    Ok((StatusCode::CREATED, Json(file.into())))
}

/// Free-text search over client, plate, national ID and opponent
pub async fn search_files(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<CaseFileResponse>>, ApiError> {
    Ok(annotate(state.service.search(&query.q).await?))
}

/// Files still gathering documents
pub async fn pending_files(
    State(state): State<AppState>,
) -> Result<Json<Vec<CaseFileResponse>>, ApiError> {
    Ok(annotate(state.service.pending_files().await?))
}

/// Files ready for application
pub async fn ready_files(
    State(state): State<AppState>,
) -> Result<Json<Vec<CaseFileResponse>>, ApiError> {
    Ok(annotate(state.service.ready_files().await?))
}

pub async fn get_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CaseFileResponse>, ApiError> {
    let file = state.service.get(&parse_id(id)?).await?;
    Ok(Json(file.into()))
}

/// Replace-update with merge semantics
pub async fn update_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateCaseFileRequest>, JsonRejection>,
) -> Result<Json<FileSavedResponse>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;
    let file = state.service.update(&parse_id(id)?, request.into_update()?).await?;
    Ok(Json(file.into()))
}

/// Deletes a file and its documents
pub async fn delete_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let file = state.service.delete(&parse_id(id)?).await?;
    Ok(Json(DeletedResponse {
        success: true,
        message: format!("Case file {} deleted", file.id),
    }))
}

pub async fn missing_documents(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MissingDocumentsResponse>, ApiError> {
    let file = state.service.get(&parse_id(id)?).await?;
    Ok(Json(MissingDocumentsResponse::from(&file)))
}

pub async fn mark_ready(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TransitionOutcome>, ApiError> {
    Ok(Json(state.service.mark_ready(&parse_id(id)?).await?))
}

pub async fn mark_applied(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TransitionOutcome>, ApiError> {
    Ok(Json(state.service.mark_applied(&parse_id(id)?).await?))
}
