//! Store configuration
//!
//! The backing file location is supplied once at startup and never changes
//! for the lifetime of an open store. Settings can come from code or from a
//! TOML file:
//!
//! ```toml
//! # Path of the JSON document holding all collections
//! path = "data/stockroom.json"
//!
//! # How long an operation waits for the document lock (default: 5000)
//! lock_timeout_ms = 5000
//!
//! # fsync the temp file before renaming it over the document (default: true)
//! sync_writes = true
//! ```

use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for a document store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backing document path
    pub path: PathBuf,
    /// Upper bound on waiting for the document lock, in milliseconds
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
    /// Whether replaced documents are fsynced before the rename
    #[serde(default = "default_sync_writes")]
    pub sync_writes: bool,
}

fn default_lock_timeout_ms() -> u64 {
    5000
}

fn default_sync_writes() -> bool {
    true
}

impl StoreConfig {
    /// Config with default settings for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock_timeout_ms: default_lock_timeout_ms(),
            sync_writes: default_sync_writes(),
        }
    }

    /// Override the lock timeout.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Enable or disable fsync on replace.
    pub fn with_sync_writes(mut self, sync: bool) -> Self {
        self.sync_writes = sync;
        self
    }

    /// Lock timeout as a `Duration`.
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    /// Parse config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the text is not valid TOML or `path` is missing.
    pub fn from_toml(text: &str) -> StoreResult<Self> {
        let cfg: StoreConfig =
            toml::from_str(text).map_err(|e| StoreError::Config(e.to_string()))?;
        if cfg.path.as_os_str().is_empty() {
            return Err(StoreError::Config("path must not be empty".to_string()));
        }
        Ok(cfg)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> StoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            StoreError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }
}
