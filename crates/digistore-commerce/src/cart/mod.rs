//! Shopping cart module.
//!
//! Contains the cart, its lines, coupons and the pricing breakdown.

mod cart;
mod coupon;
mod pricing;

pub use cart::{Cart, LineItem, SelectedOptions};
pub use coupon::{Coupon, CouponBook, CouponKind, CouponRejection};
pub use pricing::{CartPricing, LinePricing};
