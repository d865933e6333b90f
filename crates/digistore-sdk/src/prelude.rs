//! Prelude for convenient imports.
//!
//! ```rust
//! use digistore_sdk::prelude::*;
//! ```

// Facade
pub use crate::{SdkError, Storefront, StorefrontConfig};

// Commerce
pub use digistore_commerce::prelude::*;

// Locale and preferences
pub use digistore_i18n::{Language, TextDirection, Translator, UiPreferences};

// Session
pub use digistore_auth::{AuthError, RegisterRequest, SessionEngine, User, UserUpdate};

// Storage
pub use digistore_cache::{Cache, KvStore, Persisted};
