//! Progress persistence.
//!
//! The persisted record is deliberately tiny: a JSON array of
//! `[node_id, count]` pairs stored under a single fixed key. Stores are
//! injected into [`crate::visits::VisitTracker`] so tests can swap in
//! an in-memory fake.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fixed key the progress record lives under. On disk this becomes the
/// file stem in the data directory.
pub const STORAGE_KEY: &str = "logged_episodes_v2";

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),
}

/// A place visit counts can be written to and read back from.
///
/// Writes are synchronous: when `save` returns, the record is durable
/// as far as the store can make it. Callers treat failures as
/// non-fatal (§ error handling: in-memory state stays authoritative).
pub trait ProgressStore {
    /// Read the record. An absent record is `Ok(vec![])`; malformed
    /// content is an error the caller recovers from.
    fn load(&self) -> Result<Vec<(String, u32)>, StoreError>;

    /// Replace the record.
    fn save(&mut self, entries: &[(String, u32)]) -> Result<(), StoreError>;

    /// Remove the record entirely.
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// File-backed store: one JSON file in a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store backed by an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Conventional path inside a data directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{STORAGE_KEY}.json")),
        }
    }

    /// Where this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgressStore for FileStore {
    fn load(&self) -> Result<Vec<(String, u32)>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&mut self, entries: &[(String, u32)]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string(entries)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store holding the record as one serialized string slot,
/// the same shape the original keeps under its storage key. The
/// deterministic test double.
#[derive(Debug, Default)]
pub struct MemoryStore {
    raw: RefCell<Option<String>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with arbitrary raw text, so tests can feed a
    /// malformed record through the recovery path.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: RefCell::new(Some(raw.into())),
        }
    }

    /// The raw serialized record, if any.
    pub fn raw(&self) -> Option<String> {
        self.raw.borrow().clone()
    }
}

impl ProgressStore for MemoryStore {
    fn load(&self) -> Result<Vec<(String, u32)>, StoreError> {
        match self.raw.borrow().as_deref() {
            None => Ok(Vec::new()),
            Some(raw) => Ok(serde_json::from_str(raw)?),
        }
    }

    fn save(&mut self, entries: &[(String, u32)]) -> Result<(), StoreError> {
        *self.raw.borrow_mut() = Some(serde_json::to_string(entries)?);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        *self.raw.borrow_mut() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert!(store.load().unwrap().is_empty());

        let entries = vec![("atom_a".to_string(), 2), ("atom_b".to_string(), 1)];
        store.save(&entries).unwrap();
        assert_eq!(store.load().unwrap(), entries);

        store.clear().unwrap();
        assert!(store.load().unwrap().is_empty());
        assert!(store.raw().is_none());
    }

    #[test]
    fn test_memory_store_malformed_is_an_error() {
        let store = MemoryStore::with_raw("{not valid json");
        assert!(matches!(store.load(), Err(StoreError::Json(_))));
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = TempDir::new().expect("temp dir");
        let mut store = FileStore::in_dir(dir.path());

        // Absent file reads as empty.
        assert!(store.load().unwrap().is_empty());

        let entries = vec![("atom_x".to_string(), 4)];
        store.save(&entries).unwrap();
        assert!(store.path().exists());
        assert_eq!(store.load().unwrap(), entries);

        // Clear is idempotent.
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(!store.path().exists());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_file_store_creates_missing_data_dir() {
        let dir = TempDir::new().expect("temp dir");
        let mut store = FileStore::in_dir(dir.path().join("nested"));
        store.save(&[("atom_a".to_string(), 1)]).unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn test_file_store_malformed_is_an_error() {
        let dir = TempDir::new().expect("temp dir");
        let store = FileStore::in_dir(dir.path());
        std::fs::write(store.path(), "[[broken").unwrap();
        assert!(matches!(store.load(), Err(StoreError::Json(_))));
    }
}
