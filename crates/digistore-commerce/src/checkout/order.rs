//! Order types.

use crate::cart::{Cart, LineItem};
use crate::ids::{OrderId, ProductId};
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order placed, awaiting payment.
    #[default]
    Pending,
    /// Payment received, keys being issued.
    Processing,
    /// Delivered to the customer.
    Completed,
    Failed,
    Refunded,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Failed => "failed",
            OrderStatus::Refunded => "refunded",
        }
    }

    /// Check if order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Completed | OrderStatus::Failed | OrderStatus::Refunded
        )
    }
}

/// Download grant attached to a completed order line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderDownload {
    pub product_id: ProductId,
    pub download_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// Snapshot of the cart lines.
    pub items: Vec<LineItem>,
    /// Amount charged, after discounts.
    pub total: Money,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    /// Email of the customer who placed the order.
    pub user_email: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub download_links: Vec<OrderDownload>,
}

impl Order {
    /// Create a pending order from the current cart contents.
    ///
    /// Download grants are issued for every line whose product carries a
    /// download URL.
    pub fn from_cart(cart: &Cart, user_email: impl Into<String>) -> Self {
        let download_links = cart
            .lines()
            .iter()
            .filter_map(|line| {
                line.product.download_url.as_ref().map(|url| OrderDownload {
                    product_id: line.product_id.clone(),
                    download_url: url.clone(),
                    license_key: line.product.license_key.clone(),
                    expires_at: None,
                })
            })
            .collect();

        Self {
            id: OrderId::generate(),
            items: cart.lines().to_vec(),
            total: cart.total_price(),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            user_email: user_email.into(),
            download_links,
        }
    }

    /// Total number of units ordered.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Move the order to a new status.
    pub fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{Coupon, CouponBook};
    use crate::catalog::Product;

    #[test]
    fn test_order_from_cart() {
        let mut windows = Product::new("win11", "Windows 11 Pro", Money::base(4000), "software");
        windows.download_url = Some("https://dl.example.com/win11".into());
        windows.license_key = Some("XXXX-YYYY".into());
        let steam = Product::new("steam-20", "Steam 20", Money::base(3000), "gaming");

        let mut cart = Cart::new();
        cart.add_item(&windows, 1);
        cart.add_item(&steam, 2);
        let book = CouponBook::new(vec![Coupon::fixed("FLAT", Money::base(1000))]);
        assert!(cart.apply_coupon("FLAT", &book));

        let order = Order::from_cart(&cart, "amine@example.com");
        assert!(order.id.as_str().starts_with("ord_"));
        assert_eq!(order.total, Money::base(9000));
        assert_eq!(order.item_count(), 3);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.download_links.len(), 1);
        assert_eq!(order.download_links[0].license_key.as_deref(), Some("XXXX-YYYY"));
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&OrderStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
        assert!(OrderStatus::Refunded.is_terminal());
        assert!(!OrderStatus::Processing.is_terminal());
    }
}
