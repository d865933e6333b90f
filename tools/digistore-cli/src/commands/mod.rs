//! CLI command implementations.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod convert;
pub mod coupon;
pub mod prefs;
pub mod session;
pub mod translate;
pub mod wishlist;

use clap::{Args, Subcommand};

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: Option<ProductsCommand>,
}

#[derive(Subcommand)]
pub enum ProductsCommand {
    /// List products, optionally filtered.
    List {
        /// Category slug (e.g. `software`).
        #[arg(short, long)]
        category: Option<String>,
        /// Badge (featured, new, bestseller, sale, popular).
        #[arg(short, long)]
        badge: Option<String>,
        /// Show at most this many products.
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show one product with its related products.
    Show {
        /// Product ID.
        product: String,
    },
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show cart lines and totals.
    Show,
    /// Add a product.
    Add {
        /// Product ID.
        product: String,
        /// Number of units.
        #[arg(short, long, default_value = "1")]
        quantity: i64,
        /// Selected option, as `name=value` (repeatable).
        #[arg(short, long = "option", value_parser = parse_key_value)]
        options: Vec<(String, String)>,
    },
    /// Set a line's quantity (0 removes it).
    Update {
        /// Product ID.
        product: String,
        /// New quantity.
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a product.
    Remove {
        /// Product ID.
        product: String,
    },
    /// Empty the cart.
    Clear {
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the coupon command.
#[derive(Args)]
pub struct CouponArgs {
    #[command(subcommand)]
    pub command: CouponCommand,
}

#[derive(Subcommand)]
pub enum CouponCommand {
    /// Apply a coupon code to the cart.
    Apply {
        /// Coupon code (case-insensitive).
        code: String,
    },
    /// Remove the applied coupon.
    Remove,
    /// List known coupon codes.
    List,
}

/// Arguments for the wishlist command.
#[derive(Args)]
pub struct WishlistArgs {
    #[command(subcommand)]
    pub command: Option<WishlistCommand>,
}

#[derive(Subcommand)]
pub enum WishlistCommand {
    /// Show wishlisted products.
    Show,
    /// Add a product.
    Add {
        /// Product ID.
        product: String,
    },
    /// Remove a product.
    Remove {
        /// Product ID.
        product: String,
    },
    /// Move a wishlisted product into the cart.
    Move {
        /// Product ID.
        product: String,
    },
    /// Empty the wishlist.
    Clear,
}

/// Arguments for the prefs command.
#[derive(Args)]
pub struct PrefsArgs {
    #[command(subcommand)]
    pub command: Option<PrefsCommand>,
}

#[derive(Subcommand)]
pub enum PrefsCommand {
    /// Show current preferences.
    Show,
    /// Set the UI language (fr, en, ar).
    Language {
        /// Language code.
        code: String,
    },
    /// Set the display currency (DZD, EUR, USD).
    Currency {
        /// Currency code.
        code: String,
    },
}

/// Arguments for the translate command.
#[derive(Args)]
pub struct TranslateArgs {
    /// Message key, e.g. `cart.title`.
    pub key: String,

    /// Language code (default: preferred language).
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Placeholder value, as `name=value` (repeatable).
    #[arg(short, long = "param", value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,

    /// Resolve the plural form for this count.
    #[arg(long)]
    pub count: Option<u64>,
}

/// Arguments for the convert command.
#[derive(Args)]
pub struct ConvertArgs {
    /// Amount to convert.
    pub amount: f64,

    /// Source currency.
    #[arg(short, long, default_value = "DZD")]
    pub from: String,

    /// Target currency (default: every other currency).
    #[arg(short, long)]
    pub to: Option<String>,
}

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    /// Email address.
    pub email: String,

    /// Password (prompted when omitted).
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Arguments for the register command.
#[derive(Args)]
pub struct RegisterArgs {
    /// Email address.
    pub email: String,

    /// First name.
    #[arg(long)]
    pub first_name: String,

    /// Last name.
    #[arg(long)]
    pub last_name: String,

    /// Password (prompted when omitted).
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Print the config file in use.
    Path,
    /// Initialize a new config file.
    Init {
        /// Where to write the file.
        #[arg(long, default_value = "digistore.toml")]
        path: String,
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the configuration and reference data.
    Validate,
}

/// Parse `name=value`.
fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", raw))?;
    if key.is_empty() {
        return Err(format!("empty name in '{}'", raw));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("name=Amine").unwrap(),
            ("name".to_string(), "Amine".to_string())
        );
        assert_eq!(
            parse_key_value("edition=Pro=Plus").unwrap(),
            ("edition".to_string(), "Pro=Plus".to_string())
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }
}
