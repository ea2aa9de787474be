//! JSON database file adapter
//!
//! Implements [`CaseFileStore`] over a single pretty-printed JSON file:
//!
//! ```json
//! { "files": [...], "users": [...], "statistics": {...} }
//! ```
//!
//! The file is re-read on every call so hand edits are picked up. Writes go
//! through an in-process mutex and replace the file atomically (temporary
//! file, then rename), so concurrent requests never see a half-written
//! database. Several processes sharing one file are not supported.

use std::path::{Path, PathBuf};
use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use core_kernel::{
    AdapterHealth, CaseFileId, DomainPort, HealthCheckResult, HealthCheckable, PortError,
};
use domain_casefile::{CaseFile, CaseFileStore, Statistics};

use crate::error::StoreError;
use crate::legacy::{legacy_file_type, normalize_case_file, RawCaseFile};

/// In-memory image of the database file
#[derive(Debug, Clone, Default)]
pub struct Database {
    pub files: Vec<CaseFile>,
    /// Login records, carried through untouched
    pub users: Vec<Value>,
}

#[derive(Deserialize)]
struct RawDatabase {
    #[serde(default)]
    files: Vec<RawCaseFile>,
    #[serde(default)]
    users: Vec<Value>,
}

/// Case file plus the derived legacy `fileType` field
#[derive(Serialize)]
struct PersistedCaseFile<'a> {
    #[serde(flatten)]
    file: &'a CaseFile,
    #[serde(rename = "fileType")]
    file_type: &'static str,
}

#[derive(Serialize)]
struct PersistedDatabase<'a> {
    files: Vec<PersistedCaseFile<'a>>,
    users: &'a [Value],
    statistics: Statistics,
}

impl Database {
    /// Serialized form, with a fresh statistics snapshot
    fn to_json(&self) -> Result<Vec<u8>, StoreError> {
        let persisted = PersistedDatabase {
            files: self
                .files
                .iter()
                .map(|file| PersistedCaseFile {
                    file,
                    file_type: legacy_file_type(&file.claim_types),
                })
                .collect(),
            users: &self.users,
            statistics: Statistics::compute(&self.files),
        };
        Ok(serde_json::to_vec_pretty(&persisted)?)
    }
}

/// True when the file on disk already is what saving `db` would write
///
/// Legacy layouts and stale statistics compare unequal.
fn is_canonical(on_disk: &[u8], db: &Database) -> Result<bool, StoreError> {
    let on_disk: Value = serde_json::from_slice(on_disk)?;
    let canonical: Value = serde_json::from_slice(&db.to_json()?)?;
    Ok(on_disk == canonical)
}

/// [`CaseFileStore`] backed by a JSON file on local disk
#[derive(Debug)]
pub struct JsonCaseFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonCaseFileStore {
    /// Opens the database file, creating an empty one when it does not exist
    ///
    /// An existing file is read once so a corrupt database fails at startup
    /// rather than on the first request. Records needing normalisation are
    /// written back in canonical form, so later reads parse them cleanly.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        };

        if fs::try_exists(&store.path).await.map_err(|e| StoreError::io(&store.path, e))? {
            let bytes = store.read().await?;
            let db = store.parse(&bytes)?;
            if !is_canonical(&bytes, &db)? {
                store.save(&db).await?;
                info!(path = %store.path.display(), "Rewrote database in canonical form");
            }
            info!(path = %store.path.display(), files = db.files.len(), "Opened case file database");
        } else {
            if let Some(parent) = store.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).await.map_err(|e| StoreError::io(parent, e))?;
            }
            store.save(&Database::default()).await?;
            info!(path = %store.path.display(), "Created empty case file database");
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and normalises the whole database
    pub async fn load(&self) -> Result<Database, StoreError> {
        let bytes = self.read().await?;
        self.parse(&bytes)
    }

    async fn read(&self) -> Result<Vec<u8>, StoreError> {
        fs::read(&self.path).await.map_err(|e| StoreError::io(&self.path, e))
    }

    fn parse(&self, bytes: &[u8]) -> Result<Database, StoreError> {
        let raw: RawDatabase = serde_json::from_slice(bytes).map_err(|e| StoreError::Corrupt {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;

        let files = raw
            .files
            .into_iter()
            .enumerate()
            .map(|(index, file)| normalize_case_file(file, index))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Database {
            files,
            users: raw.users,
        })
    }

    async fn save(&self, db: &Database) -> Result<(), StoreError> {
        let bytes = db.to_json()?;
        let tmp = self.temp_path();

        fs::write(&tmp, &bytes).await.map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).await.map_err(|e| StoreError::io(&self.path, e))?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "Database written");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Serialised read-modify-write of the database
    async fn mutate<T>(
        &self,
        change: impl FnOnce(&mut Vec<CaseFile>) -> Result<T, PortError>,
    ) -> Result<T, PortError> {
        let _guard = self.write_lock.lock().await;
        let mut db = self.load().await?;
        let result = change(&mut db.files)?;
        self.save(&db).await?;
        Ok(result)
    }
}

impl DomainPort for JsonCaseFileStore {}

#[async_trait]
impl HealthCheckable for JsonCaseFileStore {
    /// Checks that the database file is readable and parses
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let result = self.load().await;
        let latency_ms = start.elapsed().as_millis() as u64;

        let (status, message) = match result {
            Ok(db) => (AdapterHealth::Healthy, Some(format!("{} case files", db.files.len()))),
            Err(e) => (AdapterHealth::Unhealthy, Some(e.to_string())),
        };

        HealthCheckResult {
            adapter_id: "json-case-file-store".to_string(),
            status,
            latency_ms,
            message,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl CaseFileStore for JsonCaseFileStore {
    async fn list_all(&self) -> Result<Vec<CaseFile>, PortError> {
        Ok(self.load().await?.files)
    }

    async fn get(&self, id: &CaseFileId) -> Result<CaseFile, PortError> {
        self.load()
            .await?
            .files
            .into_iter()
            .find(|f| &f.id == id)
            .ok_or_else(|| PortError::not_found(CaseFileId::label(), id))
    }

    #[instrument(skip(self, file), fields(file_id = %file.id))]
    async fn create(&self, file: CaseFile) -> Result<CaseFile, PortError> {
        self.mutate(|files| {
            if files.iter().any(|f| f.id == file.id) {
                return Err(PortError::conflict(format!("case file {} already exists", file.id)));
            }
            files.push(file.clone());
            Ok(file)
        })
        .await
    }

    #[instrument(skip(self, file), fields(file_id = %id))]
    async fn replace(&self, id: &CaseFileId, file: CaseFile) -> Result<CaseFile, PortError> {
        self.mutate(|files| {
            let slot = files
                .iter_mut()
                .find(|f| &f.id == id)
                .ok_or_else(|| PortError::not_found(CaseFileId::label(), id))?;
            *slot = file.clone();
            Ok(file)
        })
        .await
    }

    #[instrument(skip(self), fields(file_id = %id))]
    async fn delete(&self, id: &CaseFileId) -> Result<CaseFile, PortError> {
        self.mutate(|files| {
            let index = files
                .iter()
                .position(|f| &f.id == id)
                .ok_or_else(|| PortError::not_found(CaseFileId::label(), id))?;
            Ok(files.remove(index))
        })
        .await
    }
}
