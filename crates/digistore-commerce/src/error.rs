//! Commerce error types.

use thiserror::Error;

/// Errors raised while loading or querying reference data.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Reference data failed to parse or failed a load-time check.
    #[error("Invalid reference data in {source_name}: {reason}")]
    InvalidReferenceData { source_name: String, reason: String },

    /// I/O error while reading reference data.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
