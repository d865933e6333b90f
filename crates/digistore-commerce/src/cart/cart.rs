//! Cart and line item types.

use std::collections::BTreeMap;

use crate::cart::{CartPricing, Coupon, CouponBook, CouponRejection, LinePricing};
use crate::catalog::Product;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Options picked on the product page (e.g. region, platform).
pub type SelectedOptions = BTreeMap<String, String>;

/// A shopping cart.
///
/// Lines keep insertion order and each product appears at most once. The
/// applied coupon is validated when applied and not again afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Items in the cart.
    pub items: Vec<LineItem>,
    /// Coupon accepted by the last successful apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_coupon: Option<Coupon>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` units of a product.
    ///
    /// Increments the existing line for the product or appends a new one.
    /// A non-positive quantity leaves the cart untouched.
    pub fn add_item(&mut self, product: &Product, quantity: i64) {
        self.add_item_with_options(product, quantity, None);
    }

    /// Add a product, recording selected options on a newly created line.
    ///
    /// Options are ignored when the product already has a line.
    pub fn add_item_with_options(
        &mut self,
        product: &Product,
        quantity: i64,
        options: Option<SelectedOptions>,
    ) {
        if quantity <= 0 {
            debug!(product_id = %product.id, quantity, "ignoring non-positive quantity");
            return;
        }

        if let Some(existing) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            existing.quantity = existing.quantity.saturating_add(quantity);
            debug!(
                product_id = %product.id,
                quantity = existing.quantity,
                "cart line incremented"
            );
            return;
        }

        let mut item = LineItem::new(product.clone(), quantity);
        item.selected_options = options;
        self.items.push(item);
        debug!(product_id = %product.id, quantity, "cart line added");
    }

    /// Set a line's quantity exactly.
    ///
    /// A quantity of zero or less removes the line. Unknown products are
    /// ignored. Returns whether the cart changed.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_item(product_id);
        }

        match self.items.iter_mut().find(|i| &i.product_id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                debug!(product_id = %product_id, quantity, "cart line quantity set");
                true
            }
            None => false,
        }
    }

    /// Remove a product's line. Returns whether a line was removed.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.product_id != product_id);
        let removed = self.items.len() < len_before;
        if removed {
            debug!(product_id = %product_id, "cart line removed");
        }
        removed
    }

    /// Clear all items and the applied coupon.
    pub fn clear(&mut self) {
        self.items.clear();
        self.applied_coupon = None;
        debug!("cart cleared");
    }

    /// Get total item count (sum of quantities).
    pub fn total_items(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Get number of unique items.
    pub fn unique_items(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the line for a product.
    pub fn line(&self, product_id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.product_id == product_id)
    }

    /// All lines in insertion order.
    pub fn lines(&self) -> &[LineItem] {
        &self.items
    }

    /// Sum of `price * quantity` over all lines.
    pub fn subtotal(&self) -> Money {
        Money::saturating_sum(self.items.iter().map(LineItem::subtotal), Currency::BASE)
    }

    /// Discount the applied coupon grants on the current subtotal.
    pub fn discount(&self) -> Money {
        match &self.applied_coupon {
            Some(coupon) => coupon.discount_for(self.subtotal()),
            None => Money::zero(Currency::BASE),
        }
    }

    /// Subtotal minus the coupon discount, floored at zero.
    pub fn total_price(&self) -> Money {
        self.subtotal().saturating_sub_floor_zero(&self.discount())
    }

    /// Calculate the full pricing breakdown.
    pub fn pricing(&self) -> CartPricing {
        let lines = self
            .items
            .iter()
            .map(|item| LinePricing {
                product_id: item.product_id.clone(),
                unit_price: item.product.price,
                quantity: item.quantity,
                subtotal: item.subtotal(),
            })
            .collect();

        let subtotal = self.subtotal();
        let total = subtotal.saturating_sub_floor_zero(&self.discount());

        CartPricing {
            subtotal,
            discount: subtotal.saturating_sub_floor_zero(&total),
            total,
            coupon_code: self.applied_coupon.as_ref().map(|c| c.code.clone()),
            lines,
        }
    }

    /// Apply a coupon by code. Returns whether it was accepted.
    pub fn apply_coupon(&mut self, code: &str, coupons: &CouponBook) -> bool {
        self.try_apply_coupon_at(code, coupons, Utc::now()).is_ok()
    }

    /// Apply a coupon by code, evaluated at `now`.
    ///
    /// On success the coupon replaces any previously applied one. On
    /// rejection the cart is left unchanged.
    pub fn try_apply_coupon_at(
        &mut self,
        code: &str,
        coupons: &CouponBook,
        now: DateTime<Utc>,
    ) -> Result<&Coupon, CouponRejection> {
        let coupon = coupons.find(code).ok_or(CouponRejection::NotFound)?;

        if let Err(rejection) = coupon.validate(self.subtotal(), now) {
            debug!(code, %rejection, "coupon rejected");
            return Err(rejection);
        }

        info!(code = %coupon.code, "coupon applied");
        let applied: &Coupon = self.applied_coupon.insert(coupon.clone());
        Ok(applied)
    }

    /// Remove the applied coupon. Returns whether one was applied.
    pub fn remove_coupon(&mut self) -> bool {
        self.applied_coupon.take().is_some()
    }
}

/// A line item in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product ID, unique within the cart.
    #[serde(rename = "id")]
    pub product_id: ProductId,
    /// Product snapshot taken when the line was created.
    pub product: Product,
    /// Quantity, always at least one.
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_options: Option<SelectedOptions>,
}

impl LineItem {
    /// Create a new line item.
    pub fn new(product: Product, quantity: i64) -> Self {
        Self {
            product_id: product.id.clone(),
            product,
            quantity,
            selected_options: None,
        }
    }

    /// Line subtotal (`price * quantity`).
    pub fn subtotal(&self) -> Money {
        self.product.price.saturating_mul(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn product(id: &str, price: i64) -> Product {
        Product::new(id, format!("Product {}", id), Money::base(price), "gaming")
    }

    fn book() -> CouponBook {
        CouponBook::new(vec![
            Coupon::percentage("SAVE10", 10.0).with_min_amount(Money::base(1500)),
            Coupon::percentage("HALF", 50.0).with_max_discount(Money::base(2000)),
            Coupon::fixed("MINUS1000", Money::base(1000)),
            Coupon::percentage("OLD", 10.0).with_expiry(Utc::now() - Duration::days(30)),
        ])
    }

    #[test]
    fn test_cart_creation() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), Money::base(0));
    }

    #[test]
    fn test_add_item() {
        let mut cart = Cart::new();
        cart.add_item(&product("p1", 1000), 2);

        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.unique_items(), 1);
        assert_eq!(cart.subtotal(), Money::base(2000));
    }

    #[test]
    fn test_add_same_item_increases_quantity() {
        let mut cart = Cart::new();
        let p = product("p1", 1000);
        cart.add_item(&p, 1);
        cart.add_item(&p, 2);

        assert_eq!(cart.unique_items(), 1);
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut cart = Cart::new();
        cart.add_item(&product("b", 100), 1);
        cart.add_item(&product("a", 100), 1);
        cart.add_item(&product("b", 100), 1);

        let ids: Vec<&str> = cart.lines().iter().map(|l| l.product_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_non_positive_add_is_ignored() {
        let mut cart = Cart::new();
        cart.add_item(&product("p1", 1000), 0);
        cart.add_item(&product("p1", 1000), -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_with_options() {
        let mut cart = Cart::new();
        let mut options = SelectedOptions::new();
        options.insert("region".into(), "EU".into());
        cart.add_item_with_options(&product("p1", 1000), 1, Some(options));

        let line = cart.line(&ProductId::new("p1")).unwrap();
        assert_eq!(
            line.selected_options.as_ref().and_then(|o| o.get("region")).map(String::as_str),
            Some("EU")
        );
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = Cart::new();
        cart.add_item(&product("p1", 1000), 1);

        assert!(cart.update_quantity(&ProductId::new("p1"), 5));
        assert_eq!(cart.total_items(), 5);

        assert!(!cart.update_quantity(&ProductId::new("ghost"), 5));
        assert_eq!(cart.unique_items(), 1);
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let mut cart = Cart::new();
        cart.add_item(&product("p1", 1000), 3);

        assert!(cart.update_quantity(&ProductId::new("p1"), 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_item_idempotent() {
        let mut cart = Cart::new();
        cart.add_item(&product("p1", 1000), 1);

        assert!(cart.remove_item(&ProductId::new("p1")));
        assert!(!cart.remove_item(&ProductId::new("p1")));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear_drops_coupon() {
        let mut cart = Cart::new();
        cart.add_item(&product("p1", 1000), 2);
        assert!(cart.apply_coupon("SAVE10", &book()));

        cart.clear();
        assert!(cart.is_empty());
        assert!(cart.applied_coupon.is_none());
    }

    #[test]
    fn test_capped_percentage_coupon() {
        let mut cart = Cart::new();
        cart.add_item(&product("p1", 10000), 1);

        assert!(cart.apply_coupon("HALF", &book()));
        assert_eq!(cart.discount(), Money::base(2000));
        assert_eq!(cart.total_price(), Money::base(8000));
    }

    #[test]
    fn test_fixed_coupon_floors_at_zero() {
        let mut cart = Cart::new();
        cart.add_item(&product("p1", 500), 1);

        assert!(cart.apply_coupon("minus1000", &book()));
        assert_eq!(cart.total_price(), Money::base(0));

        let pricing = cart.pricing();
        assert_eq!(pricing.discount, Money::base(500));
        assert_eq!(pricing.coupon_code.as_deref(), Some("MINUS1000"));
    }

    #[test]
    fn test_below_minimum_keeps_previous_coupon() {
        let mut cart = Cart::new();
        cart.add_item(&product("p1", 1000), 1);
        assert!(cart.apply_coupon("HALF", &book()));

        let result = cart.try_apply_coupon_at("SAVE10", &book(), Utc::now());
        assert_eq!(
            result.err(),
            Some(CouponRejection::BelowMinimum {
                minimum: Money::base(1500),
                subtotal: Money::base(1000),
            })
        );
        assert_eq!(cart.applied_coupon.as_ref().map(|c| c.code.as_str()), Some("HALF"));
    }

    #[test]
    fn test_unknown_and_expired_coupons() {
        let mut cart = Cart::new();
        cart.add_item(&product("p1", 5000), 1);

        assert_eq!(
            cart.try_apply_coupon_at("NOPE", &book(), Utc::now()).err(),
            Some(CouponRejection::NotFound)
        );
        assert_eq!(
            cart.try_apply_coupon_at("OLD", &book(), Utc::now()).err(),
            Some(CouponRejection::Expired)
        );
        assert!(cart.applied_coupon.is_none());
    }

    #[test]
    fn test_coupon_expiring_now_still_applies() {
        let now = Utc::now();
        let book = CouponBook::new(vec![Coupon::percentage("LAST", 10.0).with_expiry(now)]);
        let mut cart = Cart::new();
        cart.add_item(&product("p1", 1000), 1);

        assert!(cart.try_apply_coupon_at("LAST", &book, now).is_ok());
        assert!(cart.remove_coupon());
        assert_eq!(
            cart.try_apply_coupon_at("LAST", &book, now + Duration::seconds(1)).err(),
            Some(CouponRejection::Expired)
        );
    }

    #[test]
    fn test_percentage_total_keeps_fraction() {
        let book = CouponBook::new(vec![Coupon::percentage("TEN", 10.0)]);
        let mut cart = Cart::new();
        cart.add_item(&product("p1", 1005), 1);
        assert!(cart.apply_coupon("TEN", &book));

        let pricing = cart.pricing();
        assert_eq!(pricing.discount.to_decimal(), 100.5);
        assert_eq!(pricing.total.to_decimal(), 904.5);
    }

    #[test]
    fn test_coupon_replaced_on_success() {
        let mut cart = Cart::new();
        cart.add_item(&product("p1", 2000), 1);
        assert!(cart.apply_coupon("SAVE10", &book()));
        assert!(cart.apply_coupon("MINUS1000", &book()));

        assert_eq!(cart.total_price(), Money::base(1000));
        assert!(cart.remove_coupon());
        assert!(!cart.remove_coupon());
        assert_eq!(cart.total_price(), Money::base(2000));
    }

    #[test]
    fn test_applied_coupon_not_revalidated() {
        let mut cart = Cart::new();
        let p = product("p", 1000);
        cart.add_item(&p, 2);
        assert!(cart.apply_coupon("SAVE10", &book()));
        assert_eq!(cart.total_price(), Money::base(1800));

        cart.update_quantity(&p.id, 1);
        assert!(cart.subtotal() < Money::base(1500));
        assert!(cart.applied_coupon.is_some());
        assert_eq!(cart.total_price(), Money::base(900));
    }

    #[test]
    fn test_serde_shape() {
        let mut cart = Cart::new();
        cart.add_item(&product("p1", 1000), 2);
        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json["items"][0]["id"], "p1");
        assert_eq!(json["items"][0]["quantity"], 2);

        let back: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(back, cart);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(usize, i64),
        Remove(usize),
        Update(usize, i64),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..4, -2i64..6).prop_map(|(p, q)| Op::Add(p, q)),
            (0usize..4).prop_map(Op::Remove),
            (0usize..4, -2i64..6).prop_map(|(p, q)| Op::Update(p, q)),
        ]
    }

    proptest! {
        #[test]
        fn prop_total_items_matches_lines(ops in proptest::collection::vec(op_strategy(), 0..40)) {
            let products: Vec<Product> = (0..4).map(|i| product(&format!("p{}", i), 100)).collect();
            let mut cart = Cart::new();

            for op in ops {
                match op {
                    Op::Add(p, q) => cart.add_item(&products[p], q),
                    Op::Remove(p) => { cart.remove_item(&products[p].id); }
                    Op::Update(p, q) => { cart.update_quantity(&products[p].id, q); }
                }

                prop_assert!(cart.lines().iter().all(|l| l.quantity >= 1));
                let sum: i64 = cart.lines().iter().map(|l| l.quantity).sum();
                prop_assert_eq!(cart.total_items(), sum);
            }
        }
    }
}
