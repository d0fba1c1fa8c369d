//! JSON-backed suggestion store used when the backend is unavailable or the
//! CLI runs with `--offline`.
//!
//! The file location mirrors the config file (tilde expansion, config
//! directory fallback) and every save rewrites the whole file on the blocking
//! thread pool.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;
use async_trait::async_trait;
use fieldhint_types::{FieldType, Suggestion};
use fieldhint_util::{StoreSettings, config_file_path, expand_tilde};
use thiserror::Error;
use tracing::{debug, warn};

use super::SuggestionStore;
use super::catalog::SuggestionCatalog;

/// Environment variable controlling the store file location.
pub const STORE_PATH_ENV: &str = "FIELDHINT_STORE_PATH";

/// Default filename for the persisted store.
pub const STORE_FILE_NAME: &str = "suggestions.json";

/// Errors surfaced by the JSON store.
#[derive(Debug, Error)]
pub enum JsonStoreError {
    /// I/O failure while reading or writing the store file.
    #[error("suggestion store I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization or deserialization failure.
    #[error("suggestion store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// A previous writer panicked while holding the catalog.
    #[error("suggestion store lock poisoned")]
    Poisoned,
}

/// Offline suggestion store persisted on disk.
#[derive(Debug)]
pub struct JsonSuggestionStore {
    path: PathBuf,
    catalog: Arc<Mutex<SuggestionCatalog>>,
    max_results: usize,
    max_entries_per_field: usize,
}

impl JsonSuggestionStore {
    /// Open (or lazily create) the store at `path`, or at the default location when omitted.
    pub fn new<P: Into<Option<PathBuf>>>(path: P, max_results: usize, max_entries_per_field: usize) -> Result<Self, JsonStoreError> {
        let resolved_path = match path.into() {
            Some(path) => expand_tilde(&path.to_string_lossy()),
            None => default_store_path(),
        };
        let catalog = load_catalog(&resolved_path)?;
        Ok(Self {
            path: resolved_path,
            catalog: Arc::new(Mutex::new(catalog)),
            max_results,
            max_entries_per_field,
        })
    }

    pub fn from_settings(settings: &StoreSettings) -> Result<Self, JsonStoreError> {
        Self::new(settings.path.clone(), settings.max_results, settings.max_entries_per_field)
    }

    /// Access the underlying store path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, SuggestionCatalog>, JsonStoreError> {
        lock_catalog(&self.catalog)
    }
}

fn lock_catalog(catalog: &Mutex<SuggestionCatalog>) -> Result<MutexGuard<'_, SuggestionCatalog>, JsonStoreError> {
    catalog.lock().map_err(|_| JsonStoreError::Poisoned)
}

fn persist(path: &Path, catalog: &SuggestionCatalog) -> Result<(), JsonStoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(catalog)?;
    fs::write(path, content)?;
    Ok(())
}

/// Update the catalog and rewrite the file. The lock is held across the write
/// so concurrent saves land on disk in the order they were applied.
fn record(
    catalog: &Mutex<SuggestionCatalog>,
    path: &Path,
    field_type: &FieldType,
    value: &str,
    max_entries: usize,
) -> Result<Option<Suggestion>, JsonStoreError> {
    let mut catalog = lock_catalog(catalog)?;
    let recorded = catalog.record(field_type, value, max_entries);
    if recorded.is_some() {
        persist(path, &catalog)?;
    }
    Ok(recorded)
}

#[async_trait]
impl SuggestionStore for JsonSuggestionStore {
    async fn search(&self, field_type: &FieldType, query: &str) -> Result<Vec<Suggestion>> {
        let catalog = self.lock()?;
        Ok(catalog.search(field_type, query, self.max_results))
    }

    async fn save(&self, field_type: &FieldType, value: &str) -> Result<()> {
        let catalog = Arc::clone(&self.catalog);
        let path = self.path.clone();
        let owned_field = field_type.clone();
        let owned_value = value.to_string();
        let max_entries = self.max_entries_per_field;
        let recorded = tokio::task::spawn_blocking(move || record(&catalog, &path, &owned_field, &owned_value, max_entries))
            .await??;
        if let Some(recorded) = recorded {
            debug!(
                field_type = %field_type,
                usage_count = recorded.usage_count,
                path = %self.path.display(),
                "suggestion recorded locally"
            );
        }
        Ok(())
    }
}

fn default_store_path() -> PathBuf {
    config_file_path(STORE_PATH_ENV, STORE_FILE_NAME)
}

fn load_catalog(path: &Path) -> Result<SuggestionCatalog, JsonStoreError> {
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<SuggestionCatalog>(&content) {
            Ok(catalog) => Ok(catalog),
            Err(error) => {
                warn!("Failed to parse suggestion store at {}: {}", path.display(), error);
                Ok(SuggestionCatalog::default())
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(SuggestionCatalog::default()),
        Err(error) => Err(JsonStoreError::Io(error)),
    }
}
