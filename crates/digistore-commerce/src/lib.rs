//! Storefront domain types and logic for DigiStore.
//!
//! - **Catalog**: products, categories, reference data loading
//! - **Cart**: cart lines, coupons, pricing
//! - **Money**: base-currency amounts, conversion and display formatting
//! - **Wishlist**: saved products
//! - **Checkout**: order records
//!
//! # Example
//!
//! ```rust
//! use digistore_commerce::prelude::*;
//!
//! let product = Product::new("steam-20", "Steam 20", Money::base(1000), "gaming");
//! let coupons = CouponBook::new(vec![
//!     Coupon::percentage("SAVE10", 10.0).with_min_amount(Money::base(1500)),
//! ]);
//!
//! let mut cart = Cart::new();
//! cart.add_item(&product, 2);
//! assert!(cart.apply_coupon("save10", &coupons));
//! assert_eq!(cart.total_price(), Money::base(1800));
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod wishlist;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, ExchangeRates, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, ExchangeRates, Money};

    // Catalog
    pub use crate::catalog::{Category, Product, ProductBadge, ReferenceData};

    // Cart
    pub use crate::cart::{
        Cart, CartPricing, Coupon, CouponBook, CouponKind, CouponRejection, LineItem,
        LinePricing, SelectedOptions,
    };

    // Checkout
    pub use crate::checkout::{Order, OrderDownload, OrderStatus};

    pub use crate::wishlist::{Wishlist, WishlistEntry};
}
