use std::{fs, path::PathBuf};
use crate::errors::{PersistenceError, PersistenceResult};
use crate::models::Identity;
use super::json_store::write_file;

// Written on logout; parses back as "no session"
const NO_SESSION: &str = "null";

/// File-backed record of the single logged-in identity.
///
/// Whoever can read the file is treated as logged in as that identity.
/// There is one session for the whole service: a new login replaces it.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn save(&self, identity: &Identity) {
        let result = serde_json::to_string_pretty(identity)
            .map_err(|e| PersistenceError::json(&self.path, e))
            .and_then(|data| write_file(&self.path, &data));

        match result {
            Ok(()) => tracing::info!("Session opened for user: {}", identity.username),
            Err(e) => tracing::error!("Error saving logged in user: {}", e),
        }
    }

    pub fn load(&self) -> Option<Identity> {
        if !self.path.exists() {
            return None;
        }

        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) => {
                tracing::error!("Error loading logged in user: {}", PersistenceError::io(&self.path, e));
                return None;
            }
        };
        if data.trim().is_empty() {
            return None;
        }

        match serde_json::from_str::<Option<Identity>>(&data) {
            Ok(identity) => identity,
            Err(e) => {
                tracing::error!("Error loading logged in user: {}", PersistenceError::json(&self.path, e));
                None
            }
        }
    }

    pub fn clear(&self) -> PersistenceResult<()> {
        write_file(&self.path, NO_SESSION).map_err(|e| {
            tracing::error!("Error logging out: {}", e);
            e
        })?;
        tracing::info!("Session cleared");
        Ok(())
    }
}
