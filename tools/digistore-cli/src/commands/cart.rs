//! Cart commands.

use anyhow::{bail, Result};
use dialoguer::Confirm;
use digistore_sdk::digistore_commerce::cart::SelectedOptions;
use digistore_sdk::digistore_commerce::ProductId;
use digistore_sdk::Storefront;
use serde_json::json;

use super::{CartArgs, CartCommand};
use crate::context::Context;
use crate::output::truncate;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.storefront()?;

    match args.command.unwrap_or(CartCommand::Show) {
        CartCommand::Show => {}
        CartCommand::Add {
            product,
            quantity,
            options,
        } => {
            if quantity <= 0 {
                bail!("Quantity must be at least 1");
            }
            let options: Option<SelectedOptions> =
                (!options.is_empty()).then(|| options.into_iter().collect());
            store.add_to_cart_with_options(&ProductId::new(&product), quantity, options)?;
            ctx.output.success(&format!("{} × {}", store.t("product.addToCart"), quantity));
        }
        CartCommand::Update { product, quantity } => {
            if !store.update_quantity(&ProductId::new(&product), quantity) {
                bail!("'{}' is not in the cart", product);
            }
            ctx.output.success(&format!("{}: {}", store.t("cart.quantity"), quantity.max(0)));
        }
        CartCommand::Remove { product } => {
            if !store.remove_from_cart(&ProductId::new(&product)) {
                bail!("'{}' is not in the cart", product);
            }
            ctx.output.success(&store.t("cart.remove"));
        }
        CartCommand::Clear { yes } => {
            if store.cart().is_empty() {
                ctx.output.info(&store.t("cart.empty"));
                return Ok(());
            }
            let confirmed = yes
                || ctx.output.is_json()
                || Confirm::new()
                    .with_prompt(format!("{}?", store.t("common.confirm")))
                    .default(false)
                    .interact()?;
            if !confirmed {
                ctx.output.info(&store.t("common.cancel"));
                return Ok(());
            }
            store.clear_cart();
            ctx.output.success(&store.t("cart.empty"));
            return Ok(());
        }
    }

    show(&store, ctx);
    Ok(())
}

/// Print the cart and its totals in the preferred currency.
pub fn show(store: &Storefront, ctx: &Context) {
    let pricing = store.pricing();

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "items": store.cart().lines(),
            "pricing": pricing,
            "currency": store.preferences().currency,
        }));
        return;
    }

    ctx.output.header(&store.t("cart.title"));
    if store.cart().is_empty() {
        ctx.output.info(&store.t("cart.empty"));
        return;
    }

    let widths = [24, 30, 5, 14];
    for line in store.cart().lines() {
        let quantity = line.quantity.to_string();
        let subtotal = store.format_price(&line.subtotal());
        ctx.output.table_row(
            &[
                line.product_id.as_str(),
                &truncate(&line.product.name, 30),
                &quantity,
                &subtotal,
            ],
            &widths,
        );
    }

    println!();
    ctx.output.kv(
        &store.t("cart.quantity"),
        &store.t_plural("cart.items", store.cart().total_items().max(0) as u64),
    );
    ctx.output.kv(&store.t("cart.subtotal"), &store.format_price(&pricing.subtotal));
    if let Some(code) = &pricing.coupon_code {
        ctx.output.kv(
            &store.t("cart.discount"),
            &format!("-{} ({})", store.format_price(&pricing.discount), code),
        );
    }
    ctx.output.kv(&store.t("cart.total"), &store.format_price(&pricing.total));
}
