//! SDK error types.

use thiserror::Error;

/// Errors surfaced by the storefront facade.
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration file could not be read or parsed.
    #[error("Invalid configuration {path}: {reason}")]
    Config { path: String, reason: String },

    /// Reference data failed to load.
    #[error(transparent)]
    Commerce(#[from] digistore_commerce::CommerceError),

    /// Message catalogs failed to load, or a preference was rejected.
    #[error(transparent)]
    I18n(#[from] digistore_i18n::I18nError),

    /// Storage backend failed to open.
    #[error(transparent)]
    Cache(#[from] digistore_cache::CacheError),

    /// Session operation failed.
    #[error(transparent)]
    Auth(#[from] digistore_auth::AuthError),

    /// Checkout attempted on an empty cart.
    #[error("Cart is empty")]
    EmptyCart,
}
