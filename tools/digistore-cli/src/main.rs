//! DigiStore CLI - drive a storefront from the command line.
//!
//! Commands:
//! - `digistore products` / `categories` - Browse the catalog
//! - `digistore cart` - Show and edit the cart
//! - `digistore coupon` - Apply or remove a coupon code
//! - `digistore wishlist` - Show and edit the wishlist
//! - `digistore prefs` - Language and currency preference
//! - `digistore translate` - Resolve a message key
//! - `digistore convert` - Convert an amount between currencies
//! - `digistore login` / `register` / `logout` / `whoami` - Session
//! - `digistore checkout` - Place an order from the cart
//! - `digistore config` - Manage configuration

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    CartArgs, ConfigArgs, ConvertArgs, CouponArgs, LoginArgs, PrefsArgs, ProductsArgs,
    RegisterArgs, TranslateArgs, WishlistArgs,
};

/// DigiStore CLI - browse, fill a cart and check out
#[derive(Parser)]
#[command(name = "digistore")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse products
    Products(ProductsArgs),

    /// List the category tree
    Categories,

    /// Show and edit the cart
    Cart(CartArgs),

    /// Apply or remove a coupon code
    Coupon(CouponArgs),

    /// Show and edit the wishlist
    Wishlist(WishlistArgs),

    /// Show or change language and currency
    Prefs(PrefsArgs),

    /// Resolve a message key in the current (or given) language
    Translate(TranslateArgs),

    /// Convert an amount between currencies
    Convert(ConvertArgs),

    /// Log in
    Login(LoginArgs),

    /// Create an account and log in
    Register(RegisterArgs),

    /// Log out
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Place an order from the cart
    Checkout,

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    // Execute command
    let result = match cli.command {
        Commands::Products(args) => commands::catalog::products(args, &ctx).await,
        Commands::Categories => commands::catalog::categories(&ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Coupon(args) => commands::coupon::run(args, &ctx).await,
        Commands::Wishlist(args) => commands::wishlist::run(args, &ctx).await,
        Commands::Prefs(args) => commands::prefs::run(args, &ctx).await,
        Commands::Translate(args) => commands::translate::run(args, &ctx).await,
        Commands::Convert(args) => commands::convert::run(args, &ctx).await,
        Commands::Login(args) => commands::session::login(args, &ctx).await,
        Commands::Register(args) => commands::session::register(args, &ctx).await,
        Commands::Logout => commands::session::logout(&ctx).await,
        Commands::Whoami => commands::session::whoami(&ctx).await,
        Commands::Checkout => commands::checkout::run(&ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
