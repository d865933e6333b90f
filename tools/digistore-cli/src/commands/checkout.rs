//! Checkout.

use anyhow::Result;

use crate::context::Context;
use crate::output::status_badge;

/// Place an order from the cart for the logged-in user.
pub async fn run(ctx: &Context) -> Result<()> {
    let mut store = ctx.storefront()?;
    let order = store.place_order()?;

    if ctx.output.is_json() {
        ctx.output.json(&order);
        return Ok(());
    }

    ctx.output
        .success(&store.t_with("order.placed", &[("id", order.id.as_str())]));
    ctx.output.kv("status", &status_badge(order.status));
    ctx.output.kv(&store.t("cart.total"), &store.format_price(&order.total));
    ctx.output.kv(
        &store.t("cart.quantity"),
        &store.t_plural("cart.items", order.item_count().max(0) as u64),
    );

    for link in &order.download_links {
        ctx.output.list_item(&format!("{}: {}", link.product_id, link.download_url));
        if let Some(key) = &link.license_key {
            ctx.output.kv("license", key);
        }
    }
    Ok(())
}
