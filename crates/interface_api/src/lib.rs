//! HTTP API Layer
//!
//! This crate provides the JSON API for the case file tracker using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for case files, documents, statistics
//! - **Middleware**: Request ids, tracing, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(service, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderName,
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use domain_casefile::CaseFileService;

use crate::config::ApiConfig;
use crate::handlers::{case_files, documents, health, stats};
use crate::middleware::{audit_middleware, REQUEST_ID_HEADER};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CaseFileService>,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `service` - Case file service wired to its storage adapters
/// * `config` - API configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(service: Arc<CaseFileService>, config: ApiConfig) -> Router {
    let uploads = ServeDir::new(&config.uploads_dir);
    let body_limit = config.body_limit();
    let state = AppState { service, config };

    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Case file routes
    let file_routes = Router::new()
        .route("/", get(case_files::list_files).post(case_files::create_file))
        .route("/search", get(case_files::search_files))
        .route("/pending", get(case_files::pending_files))
        .route("/ready", get(case_files::ready_files))
        .route(
            "/:id",
            get(case_files::get_file)
                .put(case_files::update_file)
                .delete(case_files::delete_file),
        )
        .route("/:id/missing-documents", get(case_files::missing_documents))
        .route("/:id/mark-ready", post(case_files::mark_ready))
        .route("/:id/mark-applied", post(case_files::mark_applied))
        .route("/:id/documents", post(documents::attach_document))
        .route("/:id/documents/:doc_id", delete(documents::remove_document));

    let api_routes = Router::new()
        .nest("/files", file_routes)
        .route("/upload", post(documents::upload_document))
        .route("/download/:filename", get(documents::download_document))
        .route("/view/:filename", get(documents::view_document))
        .route("/stats", get(stats::get_stats))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum_middleware::from_fn(audit_middleware));

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    // Outermost first: the request id is set before tracing sees the request
    let http_layers = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api", api_routes)
        .nest_service("/uploads", uploads)
        .layer(http_layers)
        .with_state(state)
}
