//! Cart pricing breakdown.

use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Complete pricing breakdown for a cart, in the base currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartPricing {
    /// Sum of line subtotals.
    pub subtotal: Money,
    /// Amount actually taken off, `subtotal - total`.
    pub discount: Money,
    /// Final total, never negative.
    pub total: Money,
    /// Code of the applied coupon, if any.
    pub coupon_code: Option<String>,
    /// Per-line breakdown.
    pub lines: Vec<LinePricing>,
}

impl CartPricing {
    /// Check if a discount reduces the total.
    pub fn has_discount(&self) -> bool {
        self.discount.is_positive()
    }

    /// Get discount percentage of subtotal.
    pub fn discount_percentage(&self) -> f64 {
        if self.subtotal.amount_minor == 0 {
            return 0.0;
        }
        (self.discount.amount_minor as f64 / self.subtotal.amount_minor as f64) * 100.0
    }
}

/// Pricing for a single cart line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinePricing {
    pub product_id: ProductId,
    pub unit_price: Money,
    pub quantity: i64,
    /// `unit_price * quantity`.
    pub subtotal: Money,
}
