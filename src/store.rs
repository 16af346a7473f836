use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing::{error, info};

use crate::snapshot::{self, Format};

/// Errors surfaced by store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store lock poisoned")]
    Poisoned,
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// In-memory key-value store
///
/// A single coarse mutex serializes every operation, including the file I/O
/// done by [`save`](Store::save) and [`load`](Store::load), so each operation
/// observes and produces a consistent state. Per-key locking would raise
/// throughput under contention but is not needed for the current workload.
pub struct Store {
    entries: Mutex<HashMap<String, String>>,
}

impl Store {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Insert or replace the entry for `key`
    pub fn set(&self, key: String, value: String) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        info!("set {} = {}", key, value);
        entries.insert(key, value);
        Ok(())
    }

    /// Get the current value for `key`, if any
    pub fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    /// Delete the entry for `key`; no-op if absent.
    ///
    /// Logs the removal whether or not the key was present, matching the
    /// observable behavior callers already rely on.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.remove(key);
        info!("removed key: {}", key);
        Ok(())
    }

    /// Check whether `key` has an entry
    pub fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.contains_key(key))
    }

    /// Remove all entries
    pub fn clear(&self) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.clear();
        info!("store cleared");
        Ok(())
    }

    /// Snapshot listing of all entries at this instant, in unspecified order
    pub fn entries(&self) -> Result<Vec<(String, String)>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    /// Serialize all entries to a snapshot file at `path`.
    ///
    /// The snapshot is rendered in memory first, so an unwritable destination
    /// leaves nothing behind for a later `load` to trip over.
    pub fn save(&self, path: impl AsRef<Path>, format: Format) -> Result<(), StoreError> {
        let path = path.as_ref();
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        let text = snapshot::encode(format, &entries);
        if let Err(source) = std::fs::write(path, &text) {
            error!("could not write snapshot {}: {}", path.display(), source);
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
        info!("saved {} entries to {}", entries.len(), path.display());
        Ok(())
    }

    /// Replace the store's contents with the entries from the snapshot at
    /// `path`. The format is detected from the file itself.
    ///
    /// On failure to open or read the file the existing contents are left
    /// untouched. Malformed records in the snapshot are skipped.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(source) => {
                error!("could not open snapshot {}: {}", path.display(), source);
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        *entries = snapshot::decode(&text).into_iter().collect();
        info!("loaded {} entries from {}", entries.len(), path.display());
        Ok(())
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::Builder;

    #[test]
    fn test_set_then_get() {
        let store = Store::new();
        store.set("name".to_string(), "Ada".to_string()).unwrap();
        assert_eq!(store.get("name").unwrap(), Some("Ada".to_string()));
    }

    #[test]
    fn test_get_absent() {
        let store = Store::new();
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn test_set_replaces_value() {
        let store = Store::new();
        store.set("k".to_string(), "v1".to_string()).unwrap();
        store.set("k".to_string(), "v2".to_string()).unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v2".to_string()));
    }

    #[test]
    fn test_remove_and_exists() {
        let store = Store::new();
        store.set("lang".to_string(), "Rust".to_string()).unwrap();
        assert!(store.exists("lang").unwrap());
        store.remove("lang").unwrap();
        assert!(!store.exists("lang").unwrap());
        // Removing an absent key is a no-op
        store.remove("lang").unwrap();
    }

    #[test]
    fn test_clear() {
        let store = Store::new();
        store.set("a".to_string(), "1".to_string()).unwrap();
        store.set("b".to_string(), "2".to_string()).unwrap();
        store.clear().unwrap();
        assert!(!store.exists("a").unwrap());
        assert!(!store.exists("b").unwrap());
        assert!(store.entries().unwrap().is_empty());
    }

    #[test]
    fn test_example_sequence() {
        let store = Store::new();
        store.set("name".to_string(), "Ada".to_string()).unwrap();
        store.set("lang".to_string(), "Rust".to_string()).unwrap();
        assert_eq!(store.get("name").unwrap(), Some("Ada".to_string()));
        store.remove("lang").unwrap();
        assert!(!store.exists("lang").unwrap());
        store.clear().unwrap();
        assert!(!store.exists("name").unwrap());
    }

    #[test]
    fn test_entries_lists_all() {
        let store = Store::new();
        store.set("a".to_string(), "1".to_string()).unwrap();
        store.set("b".to_string(), "2".to_string()).unwrap();
        let mut listing = store.entries().unwrap();
        listing.sort();
        assert_eq!(
            listing,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_save_load_round_trip_json() {
        let dir = Builder::new().prefix("corekv-test").tempdir().unwrap();
        let path = dir.path().join("snap.json");

        let store = Store::new();
        store.set("name".to_string(), "Ada".to_string()).unwrap();
        store.set("lang".to_string(), "Rust".to_string()).unwrap();
        store.save(&path, Format::Json).unwrap();

        let restored = Store::new();
        restored.load(&path).unwrap();
        assert_eq!(restored.get("name").unwrap(), Some("Ada".to_string()));
        assert_eq!(restored.get("lang").unwrap(), Some("Rust".to_string()));
        assert_eq!(restored.entries().unwrap().len(), 2);
    }

    #[test]
    fn test_save_load_round_trip_line() {
        let dir = Builder::new().prefix("corekv-test").tempdir().unwrap();
        let path = dir.path().join("snap.txt");

        let store = Store::new();
        store
            .set("host".to_string(), "localhost:8080".to_string())
            .unwrap();
        store.save(&path, Format::Line).unwrap();

        let restored = Store::new();
        restored.load(&path).unwrap();
        assert_eq!(
            restored.get("host").unwrap(),
            Some("localhost:8080".to_string())
        );
    }

    #[test]
    fn test_load_replaces_contents() {
        let dir = Builder::new().prefix("corekv-test").tempdir().unwrap();
        let path = dir.path().join("snap.json");

        let store = Store::new();
        store.set("kept".to_string(), "yes".to_string()).unwrap();
        store.save(&path, Format::Json).unwrap();

        let other = Store::new();
        other.set("stale".to_string(), "gone".to_string()).unwrap();
        other.load(&path).unwrap();
        assert!(!other.exists("stale").unwrap());
        assert!(other.exists("kept").unwrap());
    }

    #[test]
    fn test_load_missing_file_leaves_contents() {
        let dir = Builder::new().prefix("corekv-test").tempdir().unwrap();
        let path = dir.path().join("no-such-file");

        let store = Store::new();
        store.set("k".to_string(), "v".to_string()).unwrap();
        let err = store.load(&path).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
    }

    #[test]
    fn test_save_unwritable_destination() {
        let dir = Builder::new().prefix("corekv-test").tempdir().unwrap();

        let store = Store::new();
        store.set("k".to_string(), "v".to_string()).unwrap();
        // A directory is not a writable file destination
        let err = store.save(dir.path(), Format::Json).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn test_load_skips_malformed_records() {
        let dir = Builder::new().prefix("corekv-test").tempdir().unwrap();
        let path = dir.path().join("snap.txt");
        std::fs::write(&path, "good=1\nthis line has no separator\nalso=2\n").unwrap();

        let store = Store::new();
        store.load(&path).unwrap();
        assert_eq!(store.get("good").unwrap(), Some("1".to_string()));
        assert_eq!(store.get("also").unwrap(), Some("2".to_string()));
        assert_eq!(store.entries().unwrap().len(), 2);
    }

    #[test]
    fn test_round_trip_escaped_characters() {
        let dir = Builder::new().prefix("corekv-test").tempdir().unwrap();
        let path = dir.path().join("snap.json");

        let store = Store::new();
        store
            .set("quote".to_string(), "say \"hi\"".to_string())
            .unwrap();
        store
            .set("path".to_string(), "C:\\temp".to_string())
            .unwrap();
        store.save(&path, Format::Json).unwrap();

        let restored = Store::new();
        restored.load(&path).unwrap();
        assert_eq!(
            restored.get("quote").unwrap(),
            Some("say \"hi\"".to_string())
        );
        assert_eq!(restored.get("path").unwrap(), Some("C:\\temp".to_string()));
    }

    #[test]
    fn test_concurrent_set_single_winner() {
        let store = Arc::new(Store::new());
        let mut handles = Vec::new();
        for value in ["v1", "v2"] {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                for _ in 0..200 {
                    store.set("k".to_string(), value.to_string()).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        let winner = store.get("k").unwrap().unwrap();
        assert!(winner == "v1" || winner == "v2");
        assert!(store.exists("k").unwrap());
    }
}
