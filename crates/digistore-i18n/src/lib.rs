//! Localisation for DigiStore.
//!
//! - [`Language`]: `fr` (fallback), `en`, `ar` (right to left)
//! - [`MessageCatalog`]: per-language messages as a typed tree
//! - [`Translator`]: dotted-key resolution with fallback and interpolation
//! - [`UiPreferences`]: selected language and display currency

pub mod catalog;
pub mod error;
pub mod language;
pub mod preferences;
pub mod translator;

pub use catalog::{LoadMode, Lookup, MessageCatalog, MessageNode};
pub use error::I18nError;
pub use language::{Language, TextDirection};
pub use preferences::UiPreferences;
pub use translator::Translator;
