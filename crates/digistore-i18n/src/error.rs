//! Locale error types.

use thiserror::Error;

/// Errors raised while loading catalogs or changing preferences.
///
/// Key resolution itself never fails; a miss resolves to the key.
#[derive(Error, Debug)]
pub enum I18nError {
    /// A key collides with an existing text or group at the same path.
    #[error("Conflicting message key '{key}': {reason}")]
    KeyConflict { key: String, reason: String },

    /// Key is empty or has an empty path segment.
    #[error("Invalid message key '{0}'")]
    InvalidKey(String),

    /// Catalog file is not valid message JSON.
    #[error("Invalid message catalog {path}: {reason}")]
    InvalidCatalog { path: String, reason: String },

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    /// I/O error while reading a catalog.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
