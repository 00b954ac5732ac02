//! Result store bridge
//!
//! Carries the [`ResultBundle`] from the upload page to the results view as a
//! single-slot register in session-scoped storage. Reading never fails:
//! a missing or undecodable value is simply "no results".

use crate::error::{ClientError, ClientResult};
use mla_common::models::ResultBundle;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Fixed storage key for the bundle
pub const RESULTS_KEY: &str = "analysisResults";

/// Session-scoped key/value storage
pub trait SessionStorage {
    fn get_item(&self, key: &str) -> ClientResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> ClientResult<()>;
    /// End the session, dropping every key
    fn clear(&self) -> ClientResult<()>;
}

/// Storage that lives as long as the value itself (one page instance)
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> ClientResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.items
            .lock()
            .map_err(|_| ClientError::Storage("session storage lock poisoned".to_string()))
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get_item(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> ClientResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        self.lock()?.clear();
        Ok(())
    }
}

/// Storage in `<root>/<session>/`, shared by every invocation naming that session
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    dir: PathBuf,
}

impl FileSessionStorage {
    /// Open (lazily) the named session under `root`
    ///
    /// Session names are limited to ASCII letters, digits, `-` and `_`.
    pub fn open(root: &Path, session: &str) -> ClientResult<Self> {
        let valid = !session.is_empty()
            && session
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ClientError::Config(format!("Invalid session name: {:?}", session)));
        }
        Ok(Self {
            dir: root.join(session),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn item_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl SessionStorage for FileSessionStorage {
    fn get_item(&self, key: &str) -> ClientResult<Option<String>> {
        match std::fs::read_to_string(self.item_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ClientError::Storage(e.to_string())),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> ClientResult<()> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| ClientError::Storage(format!("{}: {}", self.dir.display(), e)))?;

        // Write-then-rename so a reader never sees a partial value
        let target = self.item_path(key);
        let staging = self.dir.join(format!(".{}.tmp", key));
        std::fs::write(&staging, value)
            .map_err(|e| ClientError::Storage(format!("{}: {}", staging.display(), e)))?;
        std::fs::rename(&staging, &target)
            .map_err(|e| ClientError::Storage(format!("{}: {}", target.display(), e)))?;
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        match std::fs::remove_dir_all(&self.dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::Storage(e.to_string())),
        }
    }
}

/// Single-slot register for the current [`ResultBundle`]
pub struct ResultStore<S> {
    storage: S,
}

impl<S: SessionStorage> ResultStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Store the bundle, replacing any previous one
    pub fn put(&self, bundle: &ResultBundle) -> ClientResult<()> {
        let json = serde_json::to_string(bundle).map_err(mla_common::Error::from)?;
        self.storage.set_item(RESULTS_KEY, &json)?;
        tracing::debug!(filename = %bundle.filename, bytes = json.len(), "Stored analysis results");
        Ok(())
    }

    /// Read the bundle; absent, unreadable and malformed all yield `None`
    pub fn get(&self) -> Option<ResultBundle> {
        let raw = match self.storage.get_item(RESULTS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("No stored analysis results");
                return None;
            }
            Err(e) => {
                tracing::debug!(error = %e, "Stored analysis results unreadable");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(bundle) => Some(bundle),
            Err(e) => {
                tracing::debug!(error = %e, "Stored analysis results malformed");
                None
            }
        }
    }
}
