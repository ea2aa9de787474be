//! Case Tracker - API Server Binary
//!
//! This binary starts the HTTP API server for the case file tracker.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin case-tracker-api
//!
//! # Run with environment variables
//! API_PORT=8080 API_DATA_FILE=/var/lib/case-tracker/database.json cargo run --bin case-tracker-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 3000)
//! * `API_DATA_FILE` - JSON database file (default: database.json)
//! * `API_UPLOADS_DIR` - Directory for uploaded documents (default: uploads)
//! * `API_MAX_UPLOAD_BYTES` - Largest accepted upload (default: 10 MiB)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use domain_casefile::{CaseFileService, DEFAULT_MAX_UPLOAD_BYTES};
use infra_store::{JsonCaseFileStore, LocalDocumentStorage};
use interface_api::{config::ApiConfig, create_router};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main entry point for the API server.
///
/// Initializes logging, loads configuration, opens the data file and the
/// uploads directory, and starts the HTTP server.
///
/// # Errors
///
/// Returns an error if:
/// - The data file exists but cannot be read as a database
/// - The uploads directory cannot be created
/// - Server fails to bind to the configured address
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = load_config();

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        data_file = %config.data_file.display(),
        uploads_dir = %config.uploads_dir.display(),
        "Starting Case Tracker API Server"
    );

    let store = JsonCaseFileStore::open(&config.data_file).await?;
    let documents = LocalDocumentStorage::new(&config.uploads_dir).await?;

    let service = CaseFileService::new(Arc::new(store), Arc::new(documents))
        .with_upload_policy(config.upload_policy());

    let app = create_router(Arc::new(service), config.clone());

    let addr: SocketAddr = config.server_addr().parse()?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Loads API configuration from environment variables.
///
/// Falls back to individual variables and defaults when the prefixed
/// source cannot be deserialized.
fn load_config() -> ApiConfig {
    ApiConfig::from_env().unwrap_or_else(|_| ApiConfig {
        host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
        port: std::env::var("API_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000),
        data_file: std::env::var("API_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("database.json")),
        uploads_dir: std::env::var("API_UPLOADS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("uploads")),
        max_upload_bytes: std::env::var("API_MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        log_level: std::env::var("API_LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string()),
    })
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for Ctrl+C or SIGTERM so in-flight requests can finish.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
