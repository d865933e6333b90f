//! Immutable reference data loaded once at startup.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::cart::{Coupon, CouponBook};
use crate::catalog::{category, Category, Product, ProductBadge};
use crate::error::CommerceError;
use crate::ids::{CategoryId, ProductId};
use crate::money::ExchangeRates;

/// File names inside a reference data directory.
pub const PRODUCTS_FILE: &str = "products.json";
pub const CATEGORIES_FILE: &str = "categories.json";
pub const COUPONS_FILE: &str = "coupons.json";
pub const EXCHANGE_RATES_FILE: &str = "exchange_rates.json";

/// Products, categories, coupons and exchange rates.
///
/// The engines only ever read this; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub coupons: CouponBook,
    pub rates: ExchangeRates,
}

impl ReferenceData {
    /// Assemble reference data from already-parsed parts.
    pub fn new(
        products: Vec<Product>,
        categories: Vec<Category>,
        coupons: Vec<Coupon>,
        rates: ExchangeRates,
    ) -> Self {
        Self {
            products,
            categories,
            coupons: CouponBook::new(coupons),
            rates,
        }
    }

    /// Load every reference file from a directory.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, CommerceError> {
        let dir = dir.as_ref();
        let products: Vec<Product> = read_json(&dir.join(PRODUCTS_FILE))?;
        let categories: Vec<Category> = read_json(&dir.join(CATEGORIES_FILE))?;
        let coupons: Vec<Coupon> = read_json(&dir.join(COUPONS_FILE))?;
        let rates: ExchangeRates = read_json(&dir.join(EXCHANGE_RATES_FILE))?;

        for currency in crate::money::Currency::ALL {
            let rate = rates.rate(currency);
            if !(rate.is_finite() && rate > 0.0) {
                return Err(CommerceError::InvalidReferenceData {
                    source_name: EXCHANGE_RATES_FILE.to_string(),
                    reason: format!("rate for {} must be a positive number, got {}", currency, rate),
                });
            }
        }

        info!(
            products = products.len(),
            categories = categories.len(),
            coupons = coupons.len(),
            dir = %dir.display(),
            "reference data loaded"
        );

        Ok(Self::new(products, categories, coupons, rates))
    }

    /// Look up a product by id.
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Look up a product by id, failing with a typed error.
    pub fn require_product(&self, id: &ProductId) -> Result<&Product, CommerceError> {
        self.product(id)
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))
    }

    /// Products belonging to a category, in catalog order.
    pub fn products_in_category<'a>(
        &'a self,
        category_id: &'a CategoryId,
    ) -> impl Iterator<Item = &'a Product> + 'a {
        self.products
            .iter()
            .filter(move |p| &p.category_id == category_id)
    }

    /// Products carrying a badge, in catalog order.
    pub fn products_with_badge(&self, badge: ProductBadge) -> impl Iterator<Item = &Product> + '_ {
        self.products.iter().filter(move |p| p.has_badge(badge))
    }

    /// Other products of the same category, in catalog order.
    pub fn related_products<'a>(
        &'a self,
        product: &'a Product,
    ) -> impl Iterator<Item = &'a Product> + 'a {
        self.products_in_category(&product.category_id)
            .filter(move |p| p.id != product.id)
    }

    /// Look up a category anywhere in the tree.
    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        category::find_by_id(&self.categories, id)
    }

    /// Look up a category by slug anywhere in the tree.
    pub fn category_by_slug(&self, slug: &str) -> Option<&Category> {
        category::find_by_slug(&self.categories, slug)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CommerceError> {
    debug!(path = %path.display(), "reading reference file");
    let content = std::fs::read_to_string(path).map_err(|source| CommerceError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|e| CommerceError::InvalidReferenceData {
        source_name: path.display().to_string(),
        reason: e.to_string(),
    })
}
