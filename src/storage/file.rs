//! JSON file backend: one file per namespace

use std::{
    fs,
    path::{Path, PathBuf},
};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::store::{Entries, KeyValueStore};
use crate::error::StorageError;

/// Store persisted as a flat JSON object at `<dir>/<namespace>.json`
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Entries,
}

impl JsonFileStore {
    /// Open the namespace under `dir`, starting empty if no file exists yet.
    ///
    /// A file that is not a JSON object is treated as empty and gets
    /// overwritten by the next commit. Only I/O failures are errors.
    pub fn open(dir: &Path, namespace: &str) -> Result<Self, StorageError> {
        let path = dir.join(format!("{}.json", namespace));

        let entries = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            match serde_json::from_str::<Map<String, Value>>(&contents) {
                Ok(map) => {
                    debug!("Loaded {} entries from {}", map.len(), path.display());
                    Entries(map)
                }
                Err(e) => {
                    warn!("Ignoring unreadable store at {}: {}", path.display(), e);
                    Entries::default()
                }
            }
        } else {
            info!("No store at {}, starting empty", path.display());
            Entries::default()
        };

        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_i64(&self, key: &str) -> Result<Option<i64>, StorageError> {
        self.entries.get_i64(key)
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>, StorageError> {
        self.entries.get_bool(key)
    }

    fn put_i64(&mut self, key: &str, value: i64) {
        self.entries.put(key, Value::from(value));
    }

    fn put_bool(&mut self, key: &str, value: bool) {
        self.entries.put(key, Value::from(value));
    }

    /// Write through a temporary file and rename, so a crash never leaves a
    /// half-written store behind
    fn commit(&mut self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(&self.entries.0)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;

        debug!("Committed {} entries to {}", self.entries.0.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_missing_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(temp_dir.path(), "prefs").unwrap();

        assert_eq!(store.get_i64("anything").unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_commit_then_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::open(temp_dir.path(), "prefs").unwrap();
        store.put_i64("end", 1_234);
        store.put_bool("active", true);
        store.commit().unwrap();

        let reopened = JsonFileStore::open(temp_dir.path(), "prefs").unwrap();
        assert_eq!(reopened.get_i64("end").unwrap(), Some(1_234));
        assert_eq!(reopened.get_bool("active").unwrap(), Some(true));
        assert!(!temp_dir.path().join("prefs.json.tmp").exists());
    }

    #[test]
    fn test_uncommitted_writes_are_not_persisted() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::open(temp_dir.path(), "prefs").unwrap();
        store.put_i64("end", 1);

        let reopened = JsonFileStore::open(temp_dir.path(), "prefs").unwrap();
        assert_eq!(reopened.get_i64("end").unwrap(), None);
    }

    #[test]
    fn test_commit_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let mut store = JsonFileStore::open(&nested, "prefs").unwrap();
        store.put_bool("flag", false);
        store.commit().unwrap();

        assert!(nested.join("prefs.json").exists());
    }

    #[test]
    fn test_garbage_file_opens_empty_and_is_overwritten() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("prefs.json"), "not json").unwrap();

        let mut store = JsonFileStore::open(temp_dir.path(), "prefs").unwrap();
        assert_eq!(store.get_i64("end").unwrap(), None);

        store.put_i64("end", 42);
        store.commit().unwrap();

        let reopened = JsonFileStore::open(temp_dir.path(), "prefs").unwrap();
        assert_eq!(reopened.get_i64("end").unwrap(), Some(42));
    }

    #[test]
    fn test_non_object_file_opens_empty() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("prefs.json"), "[1, 2, 3]").unwrap();

        let store = JsonFileStore::open(temp_dir.path(), "prefs").unwrap();
        assert_eq!(store.get_bool("flag").unwrap(), None);
    }

    #[test]
    fn test_unreadable_path_is_an_io_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("prefs.json")).unwrap();

        let err = JsonFileStore::open(temp_dir.path(), "prefs").unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
    }
}
