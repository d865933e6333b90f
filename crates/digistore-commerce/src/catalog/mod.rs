//! Product catalog module.
//!
//! Contains products, the category tree and the reference data bundle.

pub mod category;
mod product;
mod reference;

pub use category::Category;
pub use product::{Product, ProductBadge};
pub use reference::{
    ReferenceData, CATEGORIES_FILE, COUPONS_FILE, EXCHANGE_RATES_FILE, PRODUCTS_FILE,
};
