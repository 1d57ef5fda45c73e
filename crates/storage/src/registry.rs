//! Process-wide document lock registry
//!
//! Ensures every `DocumentStore` over the same file shares one reader/writer
//! lock, no matter how many stores were opened for it. Uses weak references
//! so entries go away when the last store for a path is dropped.
//!
//! Uses parking_lot so a panicking writer does not poison the lock for
//! every later operation.

use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

/// Lock guarding one backing document
pub type DocumentLock = Arc<RwLock<()>>;

/// Global registry of document locks (resolved path -> weak lock)
static DOCUMENT_LOCKS: Lazy<Mutex<HashMap<PathBuf, Weak<RwLock<()>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Lock for `path`, shared with every other live store over the same path.
///
/// `path` must already be resolved; two spellings of one file only share a
/// lock if they resolve to the same `PathBuf`.
pub fn lock_for(path: &Path) -> DocumentLock {
    let mut registry = DOCUMENT_LOCKS.lock();

    if let Some(lock) = registry.get(path).and_then(Weak::upgrade) {
        return lock;
    }

    registry.retain(|_, weak| weak.strong_count() > 0);
    let lock = Arc::new(RwLock::new(()));
    registry.insert(path.to_path_buf(), Arc::downgrade(&lock));
    lock
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_path_same_lock() {
        let a = lock_for(Path::new("/registry-test/one.json"));
        let b = lock_for(Path::new("/registry-test/one.json"));
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_different_paths_different_locks() {
        let a = lock_for(Path::new("/registry-test/two.json"));
        let b = lock_for(Path::new("/registry-test/three.json"));
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_dropped_lock_is_replaced() {
        let path = Path::new("/registry-test/four.json");
        let first = lock_for(path);
        let weak = Arc::downgrade(&first);
        drop(first);
        assert!(weak.upgrade().is_none());

        let second = lock_for(path);
        assert_eq!(Arc::strong_count(&second), 1);
    }
}
