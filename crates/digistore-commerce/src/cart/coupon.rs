//! Coupon codes and discount math.

use crate::money::{option_base_amount, Currency, Money};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a coupon's `value` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CouponKind {
    /// `value` is a percent of the subtotal.
    Percentage,
    /// `value` is a fixed amount in the base currency.
    Fixed,
}

/// A coupon definition from reference data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    /// Code typed by the customer, matched case-insensitively.
    pub code: String,
    #[serde(rename = "type")]
    pub kind: CouponKind,
    /// Percent or base-currency amount depending on `kind`.
    pub value: f64,
    /// Minimum subtotal for the coupon to apply.
    #[serde(default, with = "option_base_amount", skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<Money>,
    /// Cap on a percentage discount.
    #[serde(default, with = "option_base_amount", skip_serializing_if = "Option::is_none")]
    pub max_discount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Maximum number of redemptions (None = unlimited).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_limit: Option<u32>,
    #[serde(default)]
    pub usage_count: u32,
    pub is_active: bool,
}

impl Coupon {
    /// Create an active percentage coupon.
    pub fn percentage(code: impl Into<String>, percent: f64) -> Self {
        Self::with_kind(code, CouponKind::Percentage, percent)
    }

    /// Create an active fixed-amount coupon.
    pub fn fixed(code: impl Into<String>, amount: Money) -> Self {
        Self::with_kind(code, CouponKind::Fixed, amount.to_decimal())
    }

    fn with_kind(code: impl Into<String>, kind: CouponKind, value: f64) -> Self {
        Self {
            code: code.into(),
            kind,
            value,
            min_amount: None,
            max_discount: None,
            expires_at: None,
            usage_limit: None,
            usage_count: 0,
            is_active: true,
        }
    }

    /// Set the minimum order amount.
    pub fn with_min_amount(mut self, min: Money) -> Self {
        self.min_amount = Some(min);
        self
    }

    /// Set the maximum discount.
    pub fn with_max_discount(mut self, max: Money) -> Self {
        self.max_discount = Some(max);
        self
    }

    /// Set the expiry timestamp.
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Set the usage limit and current count.
    pub fn with_usage(mut self, limit: u32, count: u32) -> Self {
        self.usage_limit = Some(limit);
        self.usage_count = count;
        self
    }

    /// Check whether `code` names this coupon, ignoring case.
    pub fn matches(&self, code: &str) -> bool {
        self.code.to_lowercase() == code.to_lowercase()
    }

    /// Minimum amount, with zero meaning no minimum.
    pub fn effective_min_amount(&self) -> Option<Money> {
        self.min_amount.filter(Money::is_positive)
    }

    /// Discount cap, with zero meaning no cap.
    pub fn effective_max_discount(&self) -> Option<Money> {
        self.max_discount.filter(Money::is_positive)
    }

    /// Check if the coupon has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|exp| exp < now).unwrap_or(false)
    }

    /// Check if the usage limit is reached. A zero limit is unlimited.
    pub fn is_exhausted(&self) -> bool {
        match self.usage_limit {
            Some(limit) if limit > 0 => self.usage_count >= limit,
            _ => false,
        }
    }

    /// Validate the coupon against a subtotal at `now`.
    ///
    /// Checks run in a fixed order: active, expiry, usage, then minimum.
    pub fn validate(&self, subtotal: Money, now: DateTime<Utc>) -> Result<(), CouponRejection> {
        if !self.is_active {
            return Err(CouponRejection::Inactive);
        }
        if self.is_expired_at(now) {
            return Err(CouponRejection::Expired);
        }
        if self.is_exhausted() {
            return Err(CouponRejection::UsageExhausted);
        }
        if let Some(minimum) = self.effective_min_amount() {
            if subtotal < minimum {
                return Err(CouponRejection::BelowMinimum { minimum, subtotal });
            }
        }
        Ok(())
    }

    /// Discount granted on `subtotal`.
    ///
    /// Percentage discounts are capped by `max_discount`. A fixed discount
    /// is returned as-is; the cart floors the total at zero.
    pub fn discount_for(&self, subtotal: Money) -> Money {
        match self.kind {
            CouponKind::Percentage => {
                let discount = subtotal.percentage(self.value);
                match self.effective_max_discount() {
                    Some(cap) if discount > cap => cap,
                    _ => discount,
                }
            }
            CouponKind::Fixed => Money::from_decimal(self.value, Currency::BASE),
        }
    }
}

/// Why a coupon code was not applied.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CouponRejection {
    #[error("Unknown coupon code")]
    NotFound,

    #[error("Coupon is not active")]
    Inactive,

    #[error("Coupon has expired")]
    Expired,

    #[error("Coupon usage limit reached")]
    UsageExhausted,

    #[error("Order subtotal {subtotal} is below the coupon minimum {minimum}")]
    BelowMinimum { minimum: Money, subtotal: Money },
}

/// The set of coupons a cart may apply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CouponBook {
    coupons: Vec<Coupon>,
}

impl CouponBook {
    pub fn new(coupons: Vec<Coupon>) -> Self {
        Self { coupons }
    }

    /// Find a coupon by code, ignoring case.
    ///
    /// An active coupon wins over inactive ones sharing its code; an
    /// inactive match is returned only when no active one exists.
    pub fn find(&self, code: &str) -> Option<&Coupon> {
        let mut matching = self.coupons.iter().filter(|c| c.matches(code));
        let first = matching.next()?;
        if first.is_active {
            return Some(first);
        }
        Some(matching.find(|c| c.is_active).unwrap_or(first))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coupon> {
        self.coupons.iter()
    }

    pub fn len(&self) -> usize {
        self.coupons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coupons.is_empty()
    }
}

impl From<Vec<Coupon>> for CouponBook {
    fn from(coupons: Vec<Coupon>) -> Self {
        Self::new(coupons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_percentage_discount_capped() {
        let coupon = Coupon::percentage("HALF", 50.0).with_max_discount(Money::base(2000));
        assert_eq!(coupon.discount_for(Money::base(10000)), Money::base(2000));
        assert_eq!(coupon.discount_for(Money::base(3000)), Money::base(1500));
    }

    #[test]
    fn test_zero_cap_is_unset() {
        let coupon = Coupon::percentage("HALF", 50.0).with_max_discount(Money::base(0));
        assert_eq!(coupon.discount_for(Money::base(10000)), Money::base(5000));
    }

    #[test]
    fn test_fixed_discount_not_clamped_here() {
        let coupon = Coupon::fixed("MINUS1000", Money::base(1000));
        assert_eq!(coupon.discount_for(Money::base(500)), Money::base(1000));
    }

    #[test]
    fn test_matches_ignores_case() {
        let coupon = Coupon::percentage("SAVE10", 10.0);
        assert!(coupon.matches("save10"));
        assert!(coupon.matches("Save10"));
        assert!(!coupon.matches(" SAVE10 "));
        assert!(!coupon.matches("SAVE20"));
    }

    #[test]
    fn test_validation_order() {
        let now = Utc::now();
        // expired and exhausted and below minimum: expiry wins
        let coupon = Coupon::percentage("X", 10.0)
            .with_expiry(now - Duration::days(1))
            .with_usage(5, 5)
            .with_min_amount(Money::base(10_000));
        assert_eq!(
            coupon.validate(Money::base(100), now),
            Err(CouponRejection::Expired)
        );

        let coupon = coupon.with_expiry(now + Duration::days(1));
        assert_eq!(
            coupon.validate(Money::base(100), now),
            Err(CouponRejection::UsageExhausted)
        );

        let coupon = coupon.with_usage(10, 5);
        assert_eq!(
            coupon.validate(Money::base(100), now),
            Err(CouponRejection::BelowMinimum {
                minimum: Money::base(10_000),
                subtotal: Money::base(100),
            })
        );
        assert!(coupon.validate(Money::base(10_000), now).is_ok());
    }

    #[test]
    fn test_expiry_is_strictly_in_the_past() {
        let now = Utc::now();
        let coupon = Coupon::percentage("X", 10.0).with_expiry(now);
        assert!(!coupon.is_expired_at(now));
        assert!(coupon.validate(Money::base(100), now).is_ok());
        assert!(coupon.is_expired_at(now + Duration::milliseconds(1)));
    }

    #[test]
    fn test_zero_usage_limit_is_unlimited() {
        let coupon = Coupon::percentage("X", 10.0).with_usage(0, 42);
        assert!(!coupon.is_exhausted());
    }

    #[test]
    fn test_inactive_rejected_first() {
        let mut coupon = Coupon::percentage("X", 10.0);
        coupon.is_active = false;
        assert_eq!(
            coupon.validate(Money::base(100), Utc::now()),
            Err(CouponRejection::Inactive)
        );
    }

    #[test]
    fn test_deserialize_reference_coupon() {
        let json = r#"{
            "code": "WELCOME20",
            "type": "percentage",
            "value": 20,
            "minAmount": 2000,
            "maxDiscount": 1000,
            "expiresAt": "2030-12-31T23:59:59Z",
            "usageLimit": 1000,
            "usageCount": 150,
            "isActive": true
        }"#;
        let coupon: Coupon = serde_json::from_str(json).unwrap();
        assert_eq!(coupon.kind, CouponKind::Percentage);
        assert_eq!(coupon.min_amount, Some(Money::base(2000)));
        assert_eq!(coupon.usage_limit, Some(1000));
        assert!(coupon.expires_at.is_some());
    }

    #[test]
    fn test_book_find() {
        let book = CouponBook::new(vec![
            Coupon::percentage("SAVE10", 10.0),
            Coupon::fixed("FLAT500", Money::base(500)),
        ]);
        assert_eq!(book.find("flat500").map(|c| c.kind), Some(CouponKind::Fixed));
        assert!(book.find("nothing").is_none());
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn test_book_prefers_active_duplicate() {
        let mut retired = Coupon::percentage("DUP", 50.0);
        retired.is_active = false;
        let current = Coupon::percentage("dup", 10.0);

        let book = CouponBook::new(vec![retired.clone(), current.clone()]);
        assert_eq!(book.find("Dup"), Some(&current));

        let book = CouponBook::new(vec![retired.clone()]);
        assert_eq!(book.find("DUP"), Some(&retired));
        assert_eq!(
            book.find("DUP").map(|c| c.validate(Money::base(100), Utc::now())),
            Some(Err(CouponRejection::Inactive))
        );
    }
}
