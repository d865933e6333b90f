//! Wishlist commands.

use anyhow::{bail, Result};
use digistore_sdk::digistore_commerce::ProductId;

use super::{WishlistArgs, WishlistCommand};
use crate::context::Context;

/// Run the wishlist command.
pub async fn run(args: WishlistArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.storefront()?;

    match args.command.unwrap_or(WishlistCommand::Show) {
        WishlistCommand::Show => {
            let products = store.wishlist_products();
            if ctx.output.is_json() {
                ctx.output.json(&products);
                return Ok(());
            }

            ctx.output.header(&store.t("nav.wishlist"));
            if products.is_empty() {
                ctx.output.info(&store.t("wishlist.empty"));
            }
            for product in products {
                ctx.output.list_item(&format!(
                    "{}  {}  {}",
                    product.id,
                    product.name,
                    store.format_price(&product.price)
                ));
            }
        }
        WishlistCommand::Add { product } => {
            if store.add_to_wishlist(&ProductId::new(&product))? {
                ctx.output.success(&store.t("wishlist.added"));
            } else {
                ctx.output.info(&format!("'{}' is already in the wishlist", product));
            }
        }
        WishlistCommand::Remove { product } => {
            if !store.remove_from_wishlist(&ProductId::new(&product)) {
                bail!("'{}' is not in the wishlist", product);
            }
            ctx.output.success(&store.t("wishlist.removed"));
        }
        WishlistCommand::Move { product } => {
            let id = ProductId::new(&product);
            if !store.is_in_wishlist(&id) {
                bail!("'{}' is not in the wishlist", product);
            }
            store.add_to_cart(&id, 1)?;
            store.remove_from_wishlist(&id);
            ctx.output.success(&store.t("product.addToCart"));
        }
        WishlistCommand::Clear => {
            store.clear_wishlist();
            ctx.output.success(&store.t("wishlist.empty"));
        }
    }

    Ok(())
}
