//! Client storage: a persistent string-keyed store.
//!
//! This module provides:
//! - The `ClientStorage` trait (get/set/remove plus a JSON-array append)
//! - `FileStorage`, a JSON file on disk used by the CLI
//! - `MemoryStorage`, an in-memory store used by tests
//!
//! Values are plain strings; structured values are JSON-serialized by the
//! caller. Concurrent writers are not coordinated: the last write wins.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Opaque bearer token. Presence means "logged in".
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// `"true"` once a verification has succeeded.
pub const IS_VERIFIED_KEY: &str = "is_verified";

/// JSON array of issued API key records.
pub const API_KEYS_KEY: &str = "api_keys";

/// String-keyed persistent storage.
pub trait ClientStorage {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError>;

    fn remove(&mut self, key: &str) -> Result<(), AppError>;

    /// Read a JSON array stored under `key` (absent means empty).
    fn get_json_list<T>(&self, key: &str) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned,
        Self: Sized,
    {
        match self.get(key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    /// Read-modify-write append of `item` to the JSON array under `key`.
    ///
    /// # Errors
    ///
    /// Fails without writing if the stored value is not a JSON array.
    fn append_json<T>(&mut self, key: &str, item: &T) -> Result<(), AppError>
    where
        T: Serialize,
        Self: Sized,
    {
        let mut items: Vec<serde_json::Value> = self.get_json_list(key)?;
        items.push(serde_json::to_value(item)?);
        self.set(key, &serde_json::to_string(&items)?)
    }
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage preloaded with the given entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl ClientStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), AppError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Storage persisted as a single JSON object file.
///
/// The whole file is loaded on open and rewritten on every mutation.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open the store at `path`, starting empty if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not a
    /// JSON object of strings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();

        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!("Opened client storage at {}", path.display());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&self.entries)?)?;
        Ok(())
    }
}

impl ClientStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), AppError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn append_starts_from_empty_list() {
        let mut storage = MemoryStorage::new();
        storage.append_json(API_KEYS_KEY, &json!({"n": 1})).unwrap();
        storage.append_json(API_KEYS_KEY, &json!({"n": 2})).unwrap();

        let items: Vec<serde_json::Value> = storage.get_json_list(API_KEYS_KEY).unwrap();
        assert_eq!(items, vec![json!({"n": 1}), json!({"n": 2})]);
    }

    #[test]
    fn append_rejects_non_array_value() {
        let mut storage = MemoryStorage::with_entries([(API_KEYS_KEY, "{\"oops\":1}")]);
        assert!(matches!(
            storage.append_json(API_KEYS_KEY, &json!(1)),
            Err(AppError::Serialization(_))
        ));
        assert_eq!(
            storage.get(API_KEYS_KEY).unwrap().as_deref(),
            Some("{\"oops\":1}")
        );
    }

    #[test]
    fn file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("local_storage.json");

        let mut storage = FileStorage::open(&path).unwrap();
        storage.set(AUTH_TOKEN_KEY, "tok").unwrap();
        storage.append_json(API_KEYS_KEY, &json!({"id": "a"})).unwrap();

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("tok"));
        let keys: Vec<serde_json::Value> = reopened.get_json_list(API_KEYS_KEY).unwrap();
        assert_eq!(keys.len(), 1);
    }

    #[test]
    fn file_storage_remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local_storage.json");

        let mut storage = FileStorage::open(&path).unwrap();
        storage.set(AUTH_TOKEN_KEY, "tok").unwrap();
        storage.remove(AUTH_TOKEN_KEY).unwrap();

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get(AUTH_TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local_storage.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(FileStorage::open(&path).is_err());
    }
}
