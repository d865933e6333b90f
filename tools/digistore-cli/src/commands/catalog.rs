//! Product and category browsing.

use anyhow::{anyhow, Result};
use digistore_sdk::digistore_commerce::catalog::{Category, Product, ProductBadge};
use digistore_sdk::digistore_commerce::money::{convert_money, Currency};
use digistore_sdk::digistore_commerce::ProductId;
use digistore_sdk::Storefront;
use serde_json::json;

use super::{ProductsArgs, ProductsCommand};
use crate::context::Context;
use crate::output::truncate;

/// Products shown under "related" on a product page.
const RELATED_LIMIT: usize = 4;

/// Run the products command.
pub async fn products(args: ProductsArgs, ctx: &Context) -> Result<()> {
    let store = ctx.storefront()?;
    let command = args.command.unwrap_or(ProductsCommand::List {
        category: None,
        badge: None,
        limit: None,
    });

    match command {
        ProductsCommand::List {
            category,
            badge,
            limit,
        } => list(&store, ctx, category.as_deref(), badge.as_deref(), limit),
        ProductsCommand::Show { product } => show(&store, ctx, &ProductId::new(&product)),
    }
}

fn list(
    store: &Storefront,
    ctx: &Context,
    category: Option<&str>,
    badge: Option<&str>,
    limit: Option<usize>,
) -> Result<()> {
    let reference = store.reference();
    let badge = badge
        .map(|code| ProductBadge::from_code(code).ok_or_else(|| anyhow!("Unknown badge: {}", code)))
        .transpose()?;

    let mut products: Vec<&Product> = match category {
        Some(slug) => {
            let category = reference
                .category_by_slug(slug)
                .ok_or_else(|| anyhow!("Unknown category: {}", slug))?;
            reference.products_in_category(&category.id).collect()
        }
        None => reference.products.iter().collect(),
    };
    if let Some(badge) = badge {
        products.retain(|p| p.has_badge(badge));
    }
    products.truncate(limit.unwrap_or(usize::MAX));

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    if products.is_empty() {
        ctx.output.info("No products match");
        return Ok(());
    }

    let widths = [26, 28, 14, 6];
    for product in products {
        let sale = product
            .discount_percentage()
            .map(|pct| format!("-{}%", pct))
            .unwrap_or_default();
        ctx.output.table_row(
            &[
                product.id.as_str(),
                &truncate(&product.name, widths[1]),
                &store.format_price(&product.price),
                &sale,
            ],
            &widths,
        );
    }
    Ok(())
}

fn show(store: &Storefront, ctx: &Context, id: &ProductId) -> Result<()> {
    let reference = store.reference();
    let product = reference.require_product(id)?;
    let related: Vec<&Product> = reference
        .related_products(product)
        .take(RELATED_LIMIT)
        .collect();

    if ctx.output.is_json() {
        let prices: Vec<_> = Currency::ALL
            .into_iter()
            .map(|c| convert_money(&product.price, c, &reference.rates))
            .collect();
        ctx.output.json(&json!({
            "product": product,
            "prices": prices,
            "related": related.iter().map(|p| &p.id).collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    ctx.output.header(&product.name);
    if !product.description.is_empty() {
        ctx.output.info(&product.description);
    }
    ctx.output.kv("Price", &store.format_price(&product.price));
    if let (Some(original), Some(pct)) = (product.original_price, product.discount_percentage()) {
        ctx.output
            .kv("Was", &format!("{} (-{}%)", store.format_price(&original), pct));
    }
    for currency in Currency::ALL {
        let converted = convert_money(&product.price, currency, &reference.rates);
        ctx.output.kv(currency.code(), &converted.to_string());
    }
    if !product.badges.is_empty() {
        let badges: Vec<&str> = product.badges.iter().map(ProductBadge::as_str).collect();
        ctx.output.kv("Badges", &badges.join(", "));
    }
    if let Some(cover) = product.cover_image() {
        ctx.output.kv("Image", cover);
    }
    if let Some(category) = reference.category(&product.category_id) {
        ctx.output.kv("Category", &category.name);
    }

    if let Some(features) = product.features.as_deref().filter(|f| !f.is_empty()) {
        ctx.output.header(&store.t("product.features"));
        for feature in features {
            ctx.output.list_item(feature);
        }
    }

    if !related.is_empty() {
        ctx.output.header("Related");
        for p in related {
            ctx.output
                .list_item(&format!("{}  {}  {}", p.id, p.name, store.format_price(&p.price)));
        }
    }
    Ok(())
}

/// Run the categories command.
pub async fn categories(ctx: &Context) -> Result<()> {
    let store = ctx.storefront()?;
    let roots = &store.reference().categories;

    if ctx.output.is_json() {
        ctx.output.json(roots);
        return Ok(());
    }

    for root in roots {
        print_tree(&store, ctx, root, 0);
    }
    Ok(())
}

fn print_tree(store: &Storefront, ctx: &Context, category: &Category, depth: usize) {
    let count = store.reference().products_in_category(&category.id).count();
    ctx.output.list_item(&format!(
        "{}{} ({})  {}",
        "  ".repeat(depth),
        category.name,
        category.slug,
        count
    ));
    for child in &category.subcategories {
        print_tree(store, ctx, child, depth + 1);
    }
}
