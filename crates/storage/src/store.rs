//! Document store: lifecycle of one backing file
//!
//! ## Locking
//!
//! Every store over the same resolved path shares one reader/writer lock
//! from the process-wide registry. Reads take it shared; `bootstrap`,
//! `mutate` and `atomic_replace` take it exclusive for the whole
//! load-modify-persist span, plus an advisory `fs2` lock on a `.lock`
//! sidecar so a second process cannot interleave writes. Both waits are
//! bounded by `lock_timeout_ms`; running out of time is
//! `StorageUnavailable`, never a hang.
//!
//! ## Atomic Replace
//!
//! The new document is written to a `.tmp` sidecar in the same directory,
//! optionally fsynced, then renamed over the target. A failed write removes
//! the sidecar and leaves the previous document in place.

use crate::codec;
use crate::document::Document;
use crate::registry::{self, DocumentLock};
use parking_lot::{RwLockReadGuard, RwLockWriteGuard};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use stockroom_core::{CancellationToken, StoreConfig, StoreError, StoreResult};
use tracing::{debug, info, warn};

const FILE_LOCK_POLL: Duration = Duration::from_millis(5);

/// Longest lock wait honored; larger timeouts are clamped to it.
const MAX_LOCK_WAIT: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// What a `mutate` closure wants done with the modified document
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// Persist the document, then return the value
    Commit(T),
    /// Discard the document untouched, then return the value
    Skip(T),
}

/// Advisory cross-process lock, released on drop
struct FileLock {
    file: File,
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}

/// Exclusive access to the document; the file lock drops first
struct WriteGuard<'a> {
    _file: FileLock,
    _mem: RwLockWriteGuard<'a, ()>,
}

/// Owner of one backing document
///
/// Holds no document state between calls: every operation starts from a
/// fresh read of the file.
pub struct DocumentStore {
    path: PathBuf,
    config: StoreConfig,
    lock: DocumentLock,
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("path", &self.path)
            .field("lock_timeout_ms", &self.config.lock_timeout_ms)
            .finish()
    }
}

impl DocumentStore {
    /// Open a store over `config.path`.
    ///
    /// Creates the parent directory if needed but does not touch the file;
    /// call [`DocumentStore::bootstrap`] for each collection.
    ///
    /// # Errors
    ///
    /// * `Config` - the path does not name a file
    /// * `StorageUnavailable` - the parent directory cannot be created or resolved
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        let path = resolve_path(&config.path)?;
        let lock = registry::lock_for(&path);
        debug!(target: "stockroom::store", path = %path.display(), "Opened document store");
        Ok(Self { path, config, lock })
    }

    /// Resolved backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Configuration this store was opened with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Make sure the document exists and has a `collection` child.
    ///
    /// * absent or blank file: write a fresh root holding only `collection`
    /// * root present, collection absent: append it, keep everything else
    /// * collection present: no write
    ///
    /// # Errors
    ///
    /// * `CorruptDocument` - the file does not parse or its root is not
    ///   `"source"`; the file is left untouched for operator repair
    /// * `StorageUnavailable` - the file cannot be read, written or locked
    pub fn bootstrap(&self, collection: &str) -> StoreResult<()> {
        let _guard = self.write_guard()?;

        let bytes = match fs::read(&self.path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(StoreError::unavailable(&self.path, e)),
        };

        match bytes {
            Some(bytes) if !codec::is_blank(&bytes) => {
                let mut doc = codec::decode(&bytes).map_err(|e| {
                    warn!(
                        target: "stockroom::store",
                        path = %self.path.display(),
                        error = %e,
                        "Refusing to bootstrap over a malformed document"
                    );
                    e
                })?;
                if doc.ensure_collection(collection) {
                    self.write_document(&doc)?;
                    info!(
                        target: "stockroom::store",
                        path = %self.path.display(),
                        collection,
                        "Added missing collection"
                    );
                }
            }
            _ => {
                self.write_document(&Document::with_collection(collection))?;
                info!(
                    target: "stockroom::store",
                    path = %self.path.display(),
                    collection,
                    "Created new document"
                );
            }
        }
        Ok(())
    }

    /// Read and parse the whole document.
    ///
    /// # Errors
    ///
    /// * `StorageUnavailable` - the file cannot be opened, or the lock was not
    ///   granted in time
    /// * `CorruptDocument` - the file does not parse
    pub fn load(&self) -> StoreResult<Document> {
        let _guard = self.read_guard()?;
        self.read_document()
    }

    /// Run `f` against a freshly loaded snapshot.
    pub fn read<T>(&self, f: impl FnOnce(&Document) -> StoreResult<T>) -> StoreResult<T> {
        let doc = self.load()?;
        f(&doc)
    }

    /// Load, modify and (maybe) persist the document as one unit.
    ///
    /// The exclusive lock is held from the load until the replace finished.
    /// `cancel` is checked before the load and again right before the
    /// persist step; a cancelled mutation never writes.
    ///
    /// # Errors
    ///
    /// * `Cancelled` - `cancel` fired before the persist step
    /// * whatever `f` returns, with nothing written
    /// * `StorageUnavailable` / `CorruptDocument` from load and replace
    pub fn mutate<T>(
        &self,
        cancel: &CancellationToken,
        f: impl FnOnce(&mut Document) -> StoreResult<Outcome<T>>,
    ) -> StoreResult<T> {
        cancel.check()?;
        let _guard = self.write_guard()?;
        let mut doc = self.read_document()?;

        match f(&mut doc)? {
            Outcome::Skip(value) => Ok(value),
            Outcome::Commit(value) => {
                cancel.check()?;
                self.write_document(&doc)?;
                Ok(value)
            }
        }
    }

    /// Replace the whole document.
    ///
    /// Either the new document is fully in place afterwards or the previous
    /// one still is.
    pub fn atomic_replace(&self, doc: &Document) -> StoreResult<()> {
        let _guard = self.write_guard()?;
        self.write_document(doc)
    }

    // =========================================================================
    // Internals (caller holds the appropriate lock)
    // =========================================================================

    fn read_document(&self) -> StoreResult<Document> {
        let bytes = fs::read(&self.path).map_err(|e| StoreError::unavailable(&self.path, e))?;
        let doc = codec::decode(&bytes)?;
        debug!(
            target: "stockroom::store",
            path = %self.path.display(),
            bytes = bytes.len(),
            "Loaded document"
        );
        Ok(doc)
    }

    fn write_document(&self, doc: &Document) -> StoreResult<()> {
        let bytes = codec::encode(doc)?;
        let tmp_path = sidecar(&self.path, ".tmp");

        if let Err(e) = self.write_via_temp(&tmp_path, &bytes) {
            let _ = fs::remove_file(&tmp_path);
            warn!(
                target: "stockroom::store",
                path = %self.path.display(),
                error = %e,
                "Document replace failed, previous contents kept"
            );
            return Err(StoreError::unavailable(&self.path, e));
        }

        debug!(
            target: "stockroom::store",
            path = %self.path.display(),
            bytes = bytes.len(),
            "Replaced document"
        );
        Ok(())
    }

    fn write_via_temp(&self, tmp_path: &Path, bytes: &[u8]) -> io::Result<()> {
        {
            let mut file = File::create(tmp_path)?;
            file.write_all(bytes)?;
            if self.config.sync_writes {
                file.sync_all()?;
            }
        }
        fs::rename(tmp_path, &self.path)
    }

    fn lock_deadline(&self) -> Instant {
        Instant::now() + self.config.lock_timeout().min(MAX_LOCK_WAIT)
    }

    fn read_guard(&self) -> StoreResult<RwLockReadGuard<'_, ()>> {
        let deadline = self.lock_deadline();
        self.lock
            .try_read_until(deadline)
            .ok_or_else(|| self.lock_timeout("shared"))
    }

    fn write_guard(&self) -> StoreResult<WriteGuard<'_>> {
        let deadline = self.lock_deadline();
        let mem = self
            .lock
            .try_write_until(deadline)
            .ok_or_else(|| self.lock_timeout("exclusive"))?;
        let file = self.lock_file(deadline)?;
        Ok(WriteGuard {
            _file: file,
            _mem: mem,
        })
    }

    fn lock_file(&self, deadline: Instant) -> StoreResult<FileLock> {
        let lock_path = sidecar(&self.path, ".lock");
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&lock_path)
            .map_err(|e| {
                StoreError::unavailable(&self.path, format!("failed to open lock file: {}", e))
            })?;

        loop {
            match fs2::FileExt::try_lock_exclusive(&file) {
                Ok(()) => return Ok(FileLock { file }),
                Err(_) if Instant::now() < deadline => std::thread::sleep(FILE_LOCK_POLL),
                Err(_) => {
                    warn!(
                        target: "stockroom::store",
                        path = %self.path.display(),
                        "Document is locked by another process"
                    );
                    return Err(StoreError::unavailable(
                        &self.path,
                        "document is locked by another process",
                    ));
                }
            }
        }
    }

    fn lock_timeout(&self, mode: &str) -> StoreError {
        warn!(
            target: "stockroom::store",
            path = %self.path.display(),
            mode,
            timeout_ms = self.config.lock_timeout_ms,
            "Timed out waiting for document lock"
        );
        StoreError::unavailable(
            &self.path,
            format!(
                "timed out after {}ms waiting for {} lock",
                self.config.lock_timeout_ms, mode
            ),
        )
    }
}

/// Canonical path of the backing file.
///
/// An existing file (or symlink to one) is canonicalized as a whole, so
/// every name for it shares one lock. A file that does not exist yet is
/// resolved through its canonical parent directory.
fn resolve_path(path: &Path) -> StoreResult<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        StoreError::Config(format!("'{}' does not name a file", path.display()))
    })?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| StoreError::unavailable(path, e))?;
    let parent = parent
        .canonicalize()
        .map_err(|e| StoreError::unavailable(path, e))?;
    let joined = parent.join(file_name);
    match joined.canonicalize() {
        Ok(target) if target.is_file() => Ok(target),
        _ => Ok(joined),
    }
}

fn sidecar(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}
