//! File-backed risk assessment store
//!
//! The whole alpha-2 → document mapping lives in one JSON object on disk.
//! It is loaded once, kept behind an async `RwLock`, and rewritten in full
//! on every `put`. Writes hold the lock across modify-and-persist so two
//! concurrent updates to different countries can never drop each other.
//!
//! Persistence goes through a temp file in the target directory followed by
//! an atomic rename; a failed write leaves both the file and the in-memory
//! mapping as they were. Once a `put` has taken the lock its commit runs on
//! its own task, so dropping the caller's future cannot split memory from disk.

use crate::{Result, RiskError};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Opaque per-country risk document
pub type RiskAssessment = Value;

/// alpha-2 → document, sorted so the persisted file diffs cleanly
pub type RiskMap = BTreeMap<String, RiskAssessment>;

pub struct RiskStore {
    path: PathBuf,
    entries: Arc<RwLock<RiskMap>>,
}

impl RiskStore {
    /// Ensure the data directory exists and seed an empty document if none is present
    pub fn initialize(path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if path.exists() {
            return Ok(());
        }

        let failure = |source: io::Error| RiskError::PersistenceFailure {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = parent_dir(path) {
            fs::create_dir_all(dir).map_err(failure)?;
        }
        write_atomic(path, b"{}").map_err(failure)?;
        info!("Created empty risk data file at {:?}", path);
        Ok(())
    }

    /// Read the persisted mapping. A missing file is an empty store.
    pub fn load_all(path: impl AsRef<Path>) -> Result<RiskMap> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No risk data at {:?}, starting empty", path);
                return Ok(RiskMap::new());
            }
            Err(e) => {
                return Err(RiskError::DataUnavailable {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })
            }
        };

        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            if e.is_io() {
                RiskError::DataUnavailable {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
            } else {
                RiskError::CorruptStore {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
            }
        })
    }

    /// Load the persisted mapping and take ownership of it
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = Self::load_all(&path)?;
        info!("Loaded {} risk assessments from {:?}", entries.len(), path);

        Ok(Self {
            path,
            entries: Arc::new(RwLock::new(entries)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` means the country has never been assessed
    pub async fn get(&self, alpha2: &str) -> Option<RiskAssessment> {
        self.entries.read().await.get(alpha2).cloned()
    }

    pub async fn keys(&self) -> Vec<String> {
        self.entries.read().await.keys().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Replace the document stored for `alpha2` and flush the full mapping.
    ///
    /// The new mapping is built and written aside; memory only changes after
    /// the file has been replaced.
    pub async fn put(&self, alpha2: &str, document: RiskAssessment) -> Result<()> {
        let mut entries = Arc::clone(&self.entries).write_owned().await;
        let path = self.path.clone();
        let key = alpha2.to_string();

        let commit = tokio::spawn(async move {
            let mut next = (*entries).clone();
            next.insert(key, document);
            persist(path, &next).await?;
            *entries = next;
            Ok::<_, io::Error>(entries.len())
        });

        let failure = |source: io::Error| RiskError::PersistenceFailure {
            path: self.path.clone(),
            source,
        };
        let total = commit
            .await
            .map_err(|e| failure(io::Error::other(e)))?
            .map_err(failure)?;

        info!(country = alpha2, total, "Risk assessment updated");
        Ok(())
    }
}

async fn persist(path: PathBuf, entries: &RiskMap) -> io::Result<()> {
    let bytes = serde_json::to_vec_pretty(entries).map_err(io::Error::other)?;
    tokio::task::spawn_blocking(move || write_atomic(&path, &bytes))
        .await
        .map_err(io::Error::other)?
}

/// Parse a request body into a risk document.
///
/// Rejects bodies that carry no data: nothing at all, `null`, `false`, `0`,
/// `""`, `[]` or `{}`.
pub fn parse_document(body: &[u8]) -> Result<RiskAssessment> {
    let no_data = || RiskError::InvalidRequest("No data provided".to_string());

    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(no_data());
    }
    let document: Value = serde_json::from_slice(body)
        .map_err(|e| RiskError::InvalidRequest(format!("Invalid JSON body: {}", e)))?;

    if is_empty_document(&document) {
        return Err(no_data());
    }
    Ok(document)
}

fn is_empty_document(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn parent_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = parent_dir(path).unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
