//! # DigiStore SDK
//!
//! Storefront state for a multi-currency digital-goods shop: cart and
//! coupons, wishlist, language and currency preference, and a simulated
//! session, each saved to storage after every change.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use digistore_sdk::prelude::*;
//!
//! # fn main() -> Result<(), SdkError> {
//! let config = StorefrontConfig::load("digistore.toml")?.with_env_overrides();
//! digistore_sdk::telemetry::init(&config.logging);
//!
//! let mut store = Storefront::open(&config)?;
//! store.add_to_cart(&ProductId::new("prd-windows-11-pro"), 1)?;
//! store.apply_coupon("SAVE10");
//! println!("{}", store.format_price(&store.pricing().total));
//! # Ok(())
//! # }
//! ```
//!
//! ## Crates
//!
//! - [`digistore_commerce`]: money, catalog, cart, coupons, wishlist, orders
//! - [`digistore_i18n`]: languages, message catalogs, UI preference
//! - [`digistore_auth`]: users and the session engine
//! - [`digistore_cache`]: storage backends and write-through state

pub mod config;
mod error;
pub mod prelude;
pub mod storefront;
pub mod telemetry;

// Re-export domain crates
pub use digistore_auth;
pub use digistore_cache;
pub use digistore_commerce;
pub use digistore_i18n;

pub use config::{
    generate_default_config, DataConfig, LogFormat, LoggingConfig, SessionConfig,
    StorageBackend, StorageConfig, StorefrontConfig,
};
pub use error::SdkError;
pub use storefront::{Storefront, CART_RECORD, UI_RECORD, USER_RECORD, WISHLIST_RECORD};
