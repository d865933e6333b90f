//! Product types.

use crate::ids::{CategoryId, ProductId};
use crate::money::{base_amount, option_base_amount, Money};
use serde::{Deserialize, Serialize};

/// Merchandising badge shown on a product card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductBadge {
    New,
    Bestseller,
    Sale,
    Popular,
    Featured,
}

impl ProductBadge {
    /// Badges in home page order.
    pub const ALL: [ProductBadge; 5] = [
        ProductBadge::Featured,
        ProductBadge::New,
        ProductBadge::Bestseller,
        ProductBadge::Sale,
        ProductBadge::Popular,
    ];

    /// Parse a badge name, ignoring case.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(code.trim()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductBadge::New => "new",
            ProductBadge::Bestseller => "bestseller",
            ProductBadge::Sale => "sale",
            ProductBadge::Popular => "popular",
            ProductBadge::Featured => "featured",
        }
    }
}

/// A digital product in the catalog.
///
/// Prices are denominated in the base currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Full description.
    #[serde(default)]
    pub description: String,
    /// Selling price.
    #[serde(with = "base_amount")]
    pub price: Money,
    /// Price before markdown, shown struck through.
    #[serde(default, with = "option_base_amount", skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Money>,
    /// Owning category.
    pub category_id: CategoryId,
    /// Image URLs, first one is the cover.
    #[serde(default)]
    pub images: Vec<String>,
    /// Tags for filtering/search.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub badges: Vec<ProductBadge>,
    /// Average rating, 0 to 5.
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub review_count: u32,
    /// Delivered digitally (key, download, account).
    #[serde(default)]
    pub is_digital: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_platforms: Option<Vec<String>>,
}

impl Product {
    /// Create a minimal digital product.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Money,
        category_id: impl Into<CategoryId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            original_price: None,
            category_id: category_id.into(),
            images: Vec::new(),
            tags: Vec::new(),
            badges: Vec::new(),
            rating: 0.0,
            review_count: 0,
            is_digital: true,
            download_url: None,
            license_key: None,
            features: None,
            file_size: None,
            supported_platforms: None,
        }
    }

    /// Check if the product is marked down (original price above price).
    pub fn is_on_sale(&self) -> bool {
        self.original_price
            .map(|op| op.amount_minor > self.price.amount_minor)
            .unwrap_or(false)
    }

    /// Calculate the markdown percentage if on sale, rounded to a whole percent.
    pub fn discount_percentage(&self) -> Option<u32> {
        self.original_price.and_then(|op| {
            if op.amount_minor > self.price.amount_minor {
                let savings = op.amount_minor - self.price.amount_minor;
                Some(((savings as f64 / op.amount_minor as f64) * 100.0).round() as u32)
            } else {
                None
            }
        })
    }

    /// Check whether the product carries a badge.
    pub fn has_badge(&self, badge: ProductBadge) -> bool {
        self.badges.contains(&badge)
    }

    /// Cover image, if any.
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}
