//! Key-value store abstraction and the in-memory backend

use serde_json::{Map, Value};

use crate::error::StorageError;

/// A flat preferences-style store of integers and booleans.
///
/// Writes are buffered until [`commit`](Self::commit).
pub trait KeyValueStore {
    fn get_i64(&self, key: &str) -> Result<Option<i64>, StorageError>;
    fn get_bool(&self, key: &str) -> Result<Option<bool>, StorageError>;
    fn put_i64(&mut self, key: &str, value: i64);
    fn put_bool(&mut self, key: &str, value: bool);
    fn commit(&mut self) -> Result<(), StorageError>;
}

/// Typed access to a JSON object of entries, shared by the backends
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Entries(pub(crate) Map<String, Value>);

impl Entries {
    pub(crate) fn get_i64(&self, key: &str) -> Result<Option<i64>, StorageError> {
        match self.0.get(key) {
            None => Ok(None),
            Some(value) => value.as_i64().map(Some).ok_or_else(|| StorageError::Corrupt {
                key: key.to_string(),
                reason: format!("expected an integer, found {}", value),
            }),
        }
    }

    pub(crate) fn get_bool(&self, key: &str) -> Result<Option<bool>, StorageError> {
        match self.0.get(key) {
            None => Ok(None),
            Some(value) => value.as_bool().map(Some).ok_or_else(|| StorageError::Corrupt {
                key: key.to_string(),
                reason: format!("expected a boolean, found {}", value),
            }),
        }
    }

    pub(crate) fn put(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_string(), value);
    }
}

/// Store that lives only as long as the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Entries,
    commits: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful commits so far.
    ///
    /// Nothing is written anywhere, so this count is the only way for a
    /// caller to check that a save actually reached the store.
    pub fn commits(&self) -> usize {
        self.commits
    }
}

impl KeyValueStore for MemoryStore {
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

    fn commit(&mut self) -> Result<(), StorageError> {
        self.commits += 1;
        Ok(())
    }
}
