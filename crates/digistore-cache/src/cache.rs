//! Typed JSON cache over a key-value store.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::store::{FileStore, KvStore, MemoryStore};
use crate::CacheError;

/// Type-safe cache with automatic JSON serialization.
///
/// Cloning is cheap; clones share the same store.
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn KvStore>,
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache").finish_non_exhaustive()
    }
}

impl Cache {
    /// Wrap an existing store.
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Cache backed by a fresh in-memory store.
    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Cache backed by a directory of JSON files.
    pub fn open_dir(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        Ok(Self::new(Arc::new(FileStore::open(dir)?)))
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.store.get(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Set a value in the cache.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.store.set(key, &bytes)
    }

    /// Delete a value from the cache.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.delete(key)
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.store.exists(key)
    }

    /// Get all keys in the cache.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.store.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Prefs {
        language: String,
    }

    #[test]
    fn test_typed_round_trip() {
        let cache = Cache::memory();
        let prefs = Prefs {
            language: "ar".into(),
        };
        cache.set("ui-storage", &prefs).unwrap();

        let loaded: Option<Prefs> = cache.get("ui-storage").unwrap();
        assert_eq!(loaded, Some(prefs));
        assert!(cache.exists("ui-storage").unwrap());

        cache.delete("ui-storage").unwrap();
        assert_eq!(cache.get::<Prefs>("ui-storage").unwrap(), None);
    }

    #[test]
    fn test_corrupt_record_is_an_error() {
        let store = Arc::new(MemoryStore::new());
        store.set("ui-storage", b"not json").unwrap();
        let cache = Cache::new(store);
        assert!(matches!(
            cache.get::<Prefs>("ui-storage"),
            Err(CacheError::SerializeError(_))
        ));
    }

    #[test]
    fn test_clones_share_store() {
        let cache = Cache::memory();
        let other = cache.clone();
        cache.set("k", &1u32).unwrap();
        assert_eq!(other.get::<u32>("k").unwrap(), Some(1));
        assert_eq!(other.keys().unwrap(), vec!["k"]);
    }
}
