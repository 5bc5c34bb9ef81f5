//! JSON file persistence for whole collections.
//!
//! Each collection lives in one pretty-printed JSON array that is rewritten
//! in full on every save. There is no merge and no atomic rename: the last
//! writer wins.

use serde::{de::DeserializeOwned, Serialize};
use std::{fs, path::Path};
use crate::errors::{PersistenceError, PersistenceResult};

pub fn load<T: DeserializeOwned>(path: &Path) -> PersistenceResult<Vec<T>> {
    let data = fs::read_to_string(path).map_err(|e| PersistenceError::io(path, e))?;
    serde_json::from_str(&data).map_err(|e| PersistenceError::json(path, e))
}

pub fn save<T: Serialize>(path: &Path, records: &[T]) -> PersistenceResult<()> {
    let data = serde_json::to_string_pretty(records).map_err(|e| PersistenceError::json(path, e))?;
    write_file(path, &data)
}

// Overwrites `path`, creating its directory on first write
pub(crate) fn write_file(path: &Path, data: &str) -> PersistenceResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| PersistenceError::io(parent, e))?;
        }
    }
    fs::write(path, data).map_err(|e| PersistenceError::io(path, e))
}

/// Fail-soft load used at startup: any failure yields an empty collection.
pub fn load_or_empty<T: DeserializeOwned>(path: &Path, collection: &str) -> Vec<T> {
    match load(path) {
        Ok(records) => {
            tracing::info!("Loaded {} {} from {}", records.len(), collection, path.display());
            records
        }
        Err(e) if e.is_missing() => {
            tracing::debug!("No {} file at {}, starting empty", collection, path.display());
            Vec::new()
        }
        Err(e) => {
            tracing::warn!("Error loading {}: {}; starting empty", collection, e);
            Vec::new()
        }
    }
}

/// Best-effort save: failures are logged and the in-memory state is kept.
pub fn save_or_log<T: Serialize>(path: &Path, records: &[T], collection: &str) {
    if let Err(e) = save(path, records) {
        tracing::error!("Error saving {}: {}", collection, e);
    }
}
