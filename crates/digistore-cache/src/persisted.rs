//! Write-through persistence for engine state.

use std::ops::Deref;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::{Cache, CacheError};

/// State that is saved to its cache record after every update.
///
/// The wrapped value holds the pure transition logic; this type only adds
/// load-or-default on startup and a best-effort save after each mutation.
/// Save failures are logged and otherwise ignored.
#[derive(Debug)]
pub struct Persisted<T> {
    key: String,
    value: T,
    cache: Cache,
}

impl<T> Persisted<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Load the record at `key`, falling back to `T::default()` when it is
    /// missing or unreadable.
    pub fn load(cache: Cache, key: impl Into<String>) -> Self {
        let key = key.into();
        let value = match cache.get::<T>(&key) {
            Ok(Some(value)) => {
                debug!(key = %key, "state restored");
                value
            }
            Ok(None) => T::default(),
            Err(e) => {
                warn!(key = %key, error = %e, "discarding unreadable state record");
                T::default()
            }
        };
        Self { key, value, cache }
    }
}

impl<T: Serialize> Persisted<T> {
    /// Wrap a value without reading the cache.
    pub fn new(cache: Cache, key: impl Into<String>, value: T) -> Self {
        Self {
            key: key.into(),
            value,
            cache,
        }
    }

    /// Record name.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Mutate the value, then save it.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        let result = f(&mut self.value);
        self.save();
        result
    }

    /// Mutate the value, saving it only if `f` succeeds.
    ///
    /// `f` must leave the value untouched when it fails.
    pub fn try_update<R, E>(&mut self, f: impl FnOnce(&mut T) -> Result<R, E>) -> Result<R, E> {
        let result = f(&mut self.value)?;
        self.save();
        Ok(result)
    }

    /// Replace the value, then save it.
    pub fn replace(&mut self, value: T) -> T {
        let old = std::mem::replace(&mut self.value, value);
        self.save();
        old
    }

    /// Save the value, reporting failures.
    pub fn flush(&self) -> Result<(), CacheError> {
        self.cache.set(&self.key, &self.value)
    }

    /// Unwrap the value.
    pub fn into_inner(self) -> T {
        self.value
    }

    fn save(&self) {
        if let Err(e) = self.flush() {
            warn!(key = %self.key, error = %e, "failed to persist state");
        }
    }
}

impl<T> Deref for Persisted<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{KvStore, MemoryStore};
    use serde::Deserialize;
    use std::sync::Arc;

    #[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
    struct Counter {
        hits: u32,
    }

    struct FailingStore;

    impl KvStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
            Ok(None)
        }
        fn set(&self, _key: &str, _value: &[u8]) -> Result<(), CacheError> {
            Err(CacheError::StoreError("disk full".into()))
        }
        fn delete(&self, _key: &str) -> Result<(), CacheError> {
            Ok(())
        }
        fn keys(&self) -> Result<Vec<String>, CacheError> {
            Ok(vec![])
        }
    }

    #[test]
    fn test_missing_record_defaults() {
        let state: Persisted<Counter> = Persisted::load(Cache::memory(), "counter");
        assert_eq!(*state, Counter::default());
        assert_eq!(state.key(), "counter");
    }

    #[test]
    fn test_update_writes_through() {
        let cache = Cache::memory();
        let mut state: Persisted<Counter> = Persisted::load(cache.clone(), "counter");
        let hits = state.update(|c| {
            c.hits += 2;
            c.hits
        });
        assert_eq!(hits, 2);

        let reloaded: Persisted<Counter> = Persisted::load(cache, "counter");
        assert_eq!(reloaded.hits, 2);
    }

    #[test]
    fn test_unreadable_record_defaults() {
        let store = Arc::new(MemoryStore::new());
        store.set("counter", b"{ broken").unwrap();
        let state: Persisted<Counter> = Persisted::load(Cache::new(store), "counter");
        assert_eq!(state.hits, 0);
    }

    #[test]
    fn test_save_failure_is_not_surfaced() {
        let mut state: Persisted<Counter> =
            Persisted::load(Cache::new(Arc::new(FailingStore)), "counter");
        state.update(|c| c.hits += 1);
        assert_eq!(state.hits, 1);
        assert!(state.flush().is_err());
    }

    #[test]
    fn test_try_update_saves_only_on_success() {
        let cache = Cache::memory();
        let mut state: Persisted<Counter> = Persisted::load(cache.clone(), "counter");

        let rejected: Result<(), &str> = state.try_update(|_| Err("nope"));
        assert!(rejected.is_err());
        assert!(!cache.exists("counter").unwrap());

        let accepted: Result<u32, &str> = state.try_update(|c| {
            c.hits = 3;
            Ok(c.hits)
        });
        assert_eq!(accepted, Ok(3));
        assert_eq!(cache.get::<Counter>("counter").unwrap(), Some(Counter { hits: 3 }));
    }

    #[test]
    fn test_replace() {
        let cache = Cache::memory();
        let mut state = Persisted::new(cache.clone(), "counter", Counter { hits: 5 });
        let old = state.replace(Counter { hits: 9 });
        assert_eq!(old.hits, 5);
        assert_eq!(cache.get::<Counter>("counter").unwrap(), Some(Counter { hits: 9 }));
    }
}
