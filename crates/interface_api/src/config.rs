//! API configuration

use std::path::PathBuf;

use serde::Deserialize;

use domain_casefile::{UploadPolicy, DEFAULT_MAX_UPLOAD_BYTES};

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Path of the JSON database file
    pub data_file: PathBuf,
    /// Directory holding uploaded document binaries
    pub uploads_dir: PathBuf,
    /// Largest accepted upload in bytes
    pub max_upload_bytes: usize,
    /// Log level
    pub log_level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            data_file: PathBuf::from("database.json"),
            uploads_dir: PathBuf::from("uploads"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            log_level: "info".to_string(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_`-prefixed environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Upload limits derived from this configuration
    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy::with_max_bytes(self.max_upload_bytes)
    }

    /// Request body limit: the upload limit plus room for multipart framing
    pub fn body_limit(&self) -> usize {
        self.max_upload_bytes.saturating_add(1024 * 1024)
    }
}
