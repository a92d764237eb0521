//! Persistent key-value slots for client state that must survive restarts.
//!
//! SYSTEM CONTEXT
//! ==============
//! The only persisted value today is the bearer token, stored under
//! [`TOKEN_KEY`]. [`FileTokenStore`] keeps a small JSON object on disk;
//! [`MemoryTokenStore`] backs tests and `--no-persist` runs.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Fixed slot name for the bearer token.
pub const TOKEN_KEY: &str = "sunmark_auth_token";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O failed for {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("storage file {path} is not valid JSON: {source}")]
    Json { path: PathBuf, source: serde_json::Error },
}

/// Where the controller keeps the bearer token between runs.
pub trait TokenStore: Send + Sync {
    /// Read the persisted token, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backing store exists but cannot be read.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Persist `token`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backing store cannot be written.
    fn save(&self, token: &str) -> Result<(), StorageError>;

    /// Remove the persisted token. Clearing an empty store is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backing store cannot be written.
    fn clear(&self) -> Result<(), StorageError>;
}

/// JSON-file key-value store. Unrelated keys in the file are preserved.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_slots(&self) -> Result<BTreeMap<String, Value>, StorageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => return Err(StorageError::Io { path: self.path.clone(), source }),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw)
            .map_err(|source| StorageError::Json { path: self.path.clone(), source })
    }

    fn write_slots(&self, slots: &BTreeMap<String, Value>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|source| StorageError::Io { path: parent.to_path_buf(), source })?;
        }
        let raw = serde_json::to_string_pretty(slots)
            .map_err(|source| StorageError::Json { path: self.path.clone(), source })?;
        std::fs::write(&self.path, raw)
            .map_err(|source| StorageError::Io { path: self.path.clone(), source })
    }

    /// Load a JSON value for `key`. Missing files and keys read as `None`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the file is unreadable or corrupt.
    pub fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let mut slots = self.read_slots()?;
        let Some(value) = slots.remove(key) else {
            return Ok(None);
        };
        serde_json::from_value(value)
            .map(Some)
            .map_err(|source| StorageError::Json { path: self.path.clone(), source })
    }

    /// Save a JSON value for `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the file cannot be read back or written.
    pub fn save_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let mut slots = self.read_slots()?;
        let value = serde_json::to_value(value)
            .map_err(|source| StorageError::Json { path: self.path.clone(), source })?;
        slots.insert(key.to_owned(), value);
        self.write_slots(&slots)
    }

    /// Remove `key` from the file.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the file cannot be read back or written.
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut slots = self.read_slots()?;
        if slots.remove(key).is_some() {
            self.write_slots(&slots)?;
        }
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.load_json::<String>(TOKEN_KEY)?.filter(|t| !t.is_empty()))
    }

    fn save(&self, token: &str) -> Result<(), StorageError> {
        self.save_json(TOKEN_KEY, &token)
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.remove(TOKEN_KEY)
    }
}

/// In-process store; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self { token: Mutex::new(Some(token.to_owned())) }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.slot().clone())
    }

    fn save(&self, token: &str) -> Result<(), StorageError> {
        *self.slot() = Some(token.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.slot() = None;
        Ok(())
    }
}
