//! Money, currencies and currency conversion.
//!
//! Amounts are stored as integers in hundredths of their currency to avoid
//! floating-point drift in cart math. The Algerian dinar is the base
//! currency: every product price, coupon threshold and cart total is held in
//! DZD, and EUR/USD values are derived for display through [`ExchangeRates`].
//! Dinars keep centimes internally and are only rounded to whole units when
//! rendered.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum Currency {
    /// Algerian dinar, the base currency.
    #[default]
    DZD,
    EUR,
    USD,
}

impl Currency {
    /// The currency all catalog amounts are denominated in.
    pub const BASE: Currency = Currency::DZD;

    /// Every supported currency, base first.
    pub const ALL: [Currency; 3] = [Currency::DZD, Currency::EUR, Currency::USD];

    /// Get the currency code (e.g., "USD").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::DZD => "DZD",
            Currency::EUR => "EUR",
            Currency::USD => "USD",
        }
    }

    /// Get the currency symbol (e.g., "$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::DZD => "\u{62f}.\u{62c}",
            Currency::EUR => "\u{20ac}",
            Currency::USD => "$",
        }
    }

    /// Number of minor digits every amount is stored with.
    pub const MINOR_DIGITS: u32 = 2;

    /// Get the number of decimal places shown for this currency.
    ///
    /// Dinar amounts are displayed as whole units.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::DZD => 0,
            Currency::EUR | Currency::USD => 2,
        }
    }

    /// Check if this is the base currency.
    pub fn is_base(&self) -> bool {
        *self == Currency::BASE
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "DZD" => Some(Currency::DZD),
            "EUR" => Some(Currency::EUR),
            "USD" => Some(Currency::USD),
            _ => None,
        }
    }

    fn minor_factor(&self) -> f64 {
        10_f64.powi(Self::MINOR_DIGITS as i32)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
///
/// Amounts are stored in hundredths of the currency (dinar centimes,
/// euro/dollar cents).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct Money {
    /// Amount in hundredths of the currency.
    pub amount_minor: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    const MINOR_PER_UNIT: i64 = 10_i64.pow(Currency::MINOR_DIGITS);

    /// Create a new Money value from minor units.
    pub fn new(amount_minor: i64, currency: Currency) -> Self {
        Self {
            amount_minor,
            currency,
        }
    }

    /// Create an amount of whole dinars.
    ///
    /// ```
    /// use digistore_commerce::money::Money;
    /// assert_eq!(Money::base(1500).amount_minor, 150_000);
    /// ```
    pub fn base(dinars: i64) -> Self {
        Self::new(dinars.saturating_mul(Self::MINOR_PER_UNIT), Currency::BASE)
    }

    /// Create a Money value from a decimal amount.
    ///
    /// ```
    /// use digistore_commerce::money::{Money, Currency};
    /// let price = Money::from_decimal(49.99, Currency::EUR);
    /// assert_eq!(price.amount_minor, 4999);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        let amount_minor = (amount * currency.minor_factor()).round() as i64;
        Self::new(amount_minor, currency)
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_minor == 0
    }

    /// Check if this is positive.
    pub fn is_positive(&self) -> bool {
        self.amount_minor > 0
    }

    /// Amount in whole units, if it has no fractional part.
    pub fn whole_units(&self) -> Option<i64> {
        (self.amount_minor % Self::MINOR_PER_UNIT == 0)
            .then(|| self.amount_minor / Self::MINOR_PER_UNIT)
    }

    /// Convert to a decimal value in major units.
    pub fn to_decimal(&self) -> f64 {
        self.amount_minor as f64 / self.currency.minor_factor()
    }

    /// Try to add another Money value, returning None on currency mismatch or overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_minor
            .checked_add(other.amount_minor)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Try to subtract another Money value.
    pub fn try_subtract(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_minor
            .checked_sub(other.amount_minor)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Multiply by a scalar, saturating at the numeric bounds.
    pub fn saturating_mul(&self, factor: i64) -> Money {
        Money::new(self.amount_minor.saturating_mul(factor), self.currency)
    }

    /// Multiply by a decimal factor, rounding half away from zero.
    pub fn multiply_decimal(&self, factor: f64) -> Money {
        let new_amount = (self.amount_minor as f64 * factor).round() as i64;
        Money::new(new_amount, self.currency)
    }

    /// Calculate a percentage of this amount, to the nearest minor unit.
    pub fn percentage(&self, percent: f64) -> Money {
        self.multiply_decimal(percent / 100.0)
    }

    /// Subtract, flooring the result at zero.
    ///
    /// Mismatched currencies leave the amount untouched.
    pub fn saturating_sub_floor_zero(&self, other: &Money) -> Money {
        if self.currency != other.currency {
            return *self;
        }
        let amount = self.amount_minor.saturating_sub(other.amount_minor).max(0);
        Money::new(amount, self.currency)
    }

    /// Sum amounts of one currency, saturating instead of overflowing.
    pub fn saturating_sum(iter: impl IntoIterator<Item = Money>, currency: Currency) -> Money {
        iter.into_iter()
            .filter(|m| m.currency == currency)
            .fold(Money::zero(currency), |acc, m| {
                Money::new(acc.amount_minor.saturating_add(m.amount_minor), currency)
            })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", render(self.to_decimal(), self.currency))
    }
}

/// Serde adapter for base-currency amounts written as plain JSON numbers.
///
/// Reference data stores prices as `"price": 2500`; fractional inputs keep
/// their centimes.
pub mod base_amount {
    use super::Money;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        match money.whole_units() {
            Some(whole) => serializer.serialize_i64(whole),
            None => serializer.serialize_f64(money.to_decimal()),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Ok(Money::from_decimal(amount, super::Currency::BASE))
    }
}

/// Optional variant of [`base_amount`].
pub mod option_base_amount {
    use super::Money;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        money: &Option<Money>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match money {
            Some(m) => super::base_amount::serialize(m, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Money>, D::Error> {
        let amount = Option::<f64>::deserialize(deserializer)?;
        Ok(amount.map(|a| Money::from_decimal(a, super::Currency::BASE)))
    }
}

// =============================================================================
// Exchange rates and conversion
// =============================================================================

/// Exchange rates, expressed as units of each currency per one unit of the
/// base currency.
///
/// Each supported currency has its own field, so a rate table missing a
/// currency cannot be constructed or deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRates {
    #[serde(rename = "DZD")]
    pub dzd: f64,
    #[serde(rename = "EUR")]
    pub eur: f64,
    #[serde(rename = "USD")]
    pub usd: f64,
}

impl ExchangeRates {
    /// Build a rate table from the two non-base rates.
    pub fn new(eur: f64, usd: f64) -> Self {
        Self { dzd: 1.0, eur, usd }
    }

    /// Units of `currency` per one dinar.
    pub fn rate(&self, currency: Currency) -> f64 {
        match currency {
            Currency::DZD => self.dzd,
            Currency::EUR => self.eur,
            Currency::USD => self.usd,
        }
    }
}

/// Convert an amount between currencies through the base currency.
///
/// ```
/// use digistore_commerce::money::{convert, Currency, ExchangeRates};
/// let rates = ExchangeRates::new(0.0068, 0.0074);
/// assert!((convert(1000.0, Currency::DZD, Currency::EUR, &rates) - 6.8).abs() < 1e-9);
/// ```
pub fn convert(amount: f64, from: Currency, to: Currency, rates: &ExchangeRates) -> f64 {
    if from == to {
        return amount;
    }

    let base_amount = if from.is_base() {
        amount
    } else {
        amount / rates.rate(from)
    };

    if to.is_base() {
        base_amount
    } else {
        base_amount * rates.rate(to)
    }
}

/// Convert a Money value, rounding to the target currency's minor unit.
pub fn convert_money(money: &Money, to: Currency, rates: &ExchangeRates) -> Money {
    if money.currency == to {
        return *money;
    }
    Money::from_decimal(convert(money.to_decimal(), money.currency, to, rates), to)
}

/// Format a base-currency amount for display in `currency`.
///
/// - DZD: `1 234 د.ج` (no decimals)
/// - EUR: `1 234,56 €`
/// - USD: `$1,234.56`
pub fn format(amount: f64, currency: Currency, rates: &ExchangeRates) -> String {
    render(convert(amount, Currency::BASE, currency, rates), currency)
}

/// Format a base-currency Money value for display in `currency`.
pub fn format_money(money: &Money, currency: Currency, rates: &ExchangeRates) -> String {
    render(
        convert(money.to_decimal(), money.currency, currency, rates),
        currency,
    )
}

/// Render an amount already expressed in `currency`.
fn render(amount: f64, currency: Currency) -> String {
    let places = currency.decimal_places();
    let factor = 10_u64.pow(places);
    let minor = (amount.abs() * factor as f64).round() as u64;
    let whole = minor / factor;
    let frac = minor % factor;
    let sign = if amount < 0.0 && minor != 0 { "-" } else { "" };

    match currency {
        Currency::DZD => format!("{}{} {}", sign, group_digits(whole, ' '), currency.symbol()),
        Currency::EUR => format!(
            "{}{},{:0width$} {}",
            sign,
            group_digits(whole, ' '),
            frac,
            currency.symbol(),
            width = places as usize
        ),
        Currency::USD => format!(
            "{}{}{}.{:0width$}",
            sign,
            currency.symbol(),
            group_digits(whole, ','),
            frac,
            width = places as usize
        ),
    }
}

/// Insert `separator` between groups of three digits.
fn group_digits(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rates() -> ExchangeRates {
        ExchangeRates::new(0.0068, 0.0074)
    }

    #[test]
    fn test_money_from_decimal() {
        let m = Money::from_decimal(49.99, Currency::USD);
        assert_eq!(m.amount_minor, 4999);

        let m = Money::from_decimal(1500.4, Currency::DZD);
        assert_eq!(m.amount_minor, 150_040);
        assert_eq!(m.whole_units(), None);
        assert_eq!(Money::base(1500).whole_units(), Some(1500));
    }

    #[test]
    fn test_money_percentage() {
        assert_eq!(Money::base(10000).percentage(10.0), Money::base(1000));
        assert_eq!(Money::base(999).percentage(15.0).to_decimal(), 149.85);
        assert_eq!(Money::base(1005).percentage(10.0).to_decimal(), 100.5);
    }

    #[test]
    fn test_fractional_dinars_round_only_for_display() {
        let total = Money::base(1005).saturating_sub_floor_zero(&Money::base(1005).percentage(10.0));
        assert_eq!(total.to_decimal(), 904.5);
        assert_eq!(total.to_string(), "905 \u{62f}.\u{62c}");
        assert_eq!(format_money(&total, Currency::EUR, &rates()), "6,15 \u{20ac}");
    }

    #[test]
    fn test_base_amount_keeps_centimes() {
        #[derive(Serialize, Deserialize)]
        struct Price {
            #[serde(with = "base_amount")]
            price: Money,
        }

        let price: Price = serde_json::from_str(r#"{"price": 1499.99}"#).unwrap();
        assert_eq!(price.price.amount_minor, 149_999);
        assert_eq!(serde_json::to_string(&price).unwrap(), r#"{"price":1499.99}"#);

        let whole = Price { price: Money::base(2500) };
        assert_eq!(serde_json::to_string(&whole).unwrap(), r#"{"price":2500}"#);
    }

    #[test]
    fn test_money_and_currency_ordering() {
        assert!(Money::base(999) < Money::base(1000));
        assert!(Currency::DZD < Currency::EUR);
    }

    #[test]
    fn test_money_try_add_currency_mismatch() {
        let dzd = Money::base(1000);
        let eur = Money::new(1000, Currency::EUR);
        assert!(dzd.try_add(&eur).is_none());
        assert_eq!(dzd.try_add(&dzd).unwrap(), Money::base(2000));
    }

    #[test]
    fn test_floor_zero_subtraction() {
        let subtotal = Money::base(500);
        let discount = Money::base(1000);
        assert!(subtotal.saturating_sub_floor_zero(&discount).is_zero());
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("USD"), Some(Currency::USD));
        assert_eq!(Currency::from_code("eur"), Some(Currency::EUR));
        assert_eq!(Currency::from_code("GBP"), None);
    }

    #[test]
    fn test_convert_identity() {
        assert_eq!(convert(123.45, Currency::EUR, Currency::EUR, &rates()), 123.45);
    }

    #[test]
    fn test_convert_through_base() {
        let r = rates();
        let eur = convert(1000.0, Currency::DZD, Currency::EUR, &r);
        assert!((eur - 6.8).abs() < 1e-9);

        let dzd = convert(6.8, Currency::EUR, Currency::DZD, &r);
        assert!((dzd - 1000.0).abs() < 1e-6);

        // EUR -> USD goes through DZD
        let usd = convert(6.8, Currency::EUR, Currency::USD, &r);
        assert!((usd - 7.4).abs() < 1e-9);
    }

    #[test]
    fn test_convert_money_rounds_to_minor_unit() {
        let converted = convert_money(&Money::base(1234), Currency::USD, &rates());
        assert_eq!(converted.currency, Currency::USD);
        assert_eq!(converted.amount_minor, 913); // 9.1316 USD
    }

    #[test]
    fn test_format_per_currency() {
        let r = ExchangeRates::new(0.01, 0.02);
        assert_eq!(format(1234567.0, Currency::DZD, &r), "1 234 567 \u{62f}.\u{62c}");
        assert_eq!(format(123456.0, Currency::EUR, &r), "1 234,56 \u{20ac}");
        assert_eq!(format(123456.0, Currency::USD, &r), "$2,469.12");
        assert_eq!(format(0.0, Currency::USD, &r), "$0.00");
    }

    #[test]
    fn test_format_negative() {
        let r = rates();
        assert_eq!(format(-1500.0, Currency::DZD, &r), "-1 500 \u{62f}.\u{62c}");
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits(0, ','), "0");
        assert_eq!(group_digits(999, ','), "999");
        assert_eq!(group_digits(1000, ','), "1,000");
        assert_eq!(group_digits(1234567, ','), "1,234,567");
    }

    fn currency_strategy() -> impl Strategy<Value = Currency> {
        prop_oneof![
            Just(Currency::DZD),
            Just(Currency::EUR),
            Just(Currency::USD)
        ]
    }

    proptest! {
        #[test]
        fn prop_convert_round_trip(
            amount in 0.0f64..1.0e9,
            from in currency_strategy(),
            to in currency_strategy(),
        ) {
            let r = rates();
            let back = convert(convert(amount, from, to, &r), to, from, &r);
            let tolerance = 1e-9 * amount.abs().max(1.0);
            prop_assert!((back - amount).abs() <= tolerance);
        }
    }
}
