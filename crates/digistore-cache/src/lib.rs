//! Key-value persistence for DigiStore.
//!
//! Engine state is stored as named JSON records (`cart-storage`,
//! `wishlist-storage`, `ui-storage`, `user-storage`) in a [`KvStore`].
//!
//! # Example
//!
//! ```rust
//! use digistore_cache::{Cache, Persisted};
//!
//! let cache = Cache::memory();
//! let mut visits: Persisted<u32> = Persisted::load(cache.clone(), "visits");
//! visits.update(|v| *v += 1);
//!
//! assert_eq!(cache.get::<u32>("visits").unwrap(), Some(1));
//! ```

mod cache;
mod error;
mod persisted;
mod store;

pub use cache::Cache;
pub use error::CacheError;
pub use persisted::Persisted;
pub use store::{FileStore, KvStore, MemoryStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, KvStore, Persisted};
}
