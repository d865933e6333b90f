//! Language and currency preference commands.

use anyhow::Result;
use digistore_sdk::Storefront;
use serde_json::json;

use super::{PrefsArgs, PrefsCommand};
use crate::context::Context;

/// Run the prefs command.
pub async fn run(args: PrefsArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.storefront()?;

    match args.command.unwrap_or(PrefsCommand::Show) {
        PrefsCommand::Show => {}
        PrefsCommand::Language { code } => {
            let language = store.set_language_code(&code)?;
            ctx.output.success(&format!(
                "{}: {}",
                store.t("common.language"),
                language.native_name()
            ));
        }
        PrefsCommand::Currency { code } => {
            let currency = store.set_currency_code(&code)?;
            ctx.output.success(&format!(
                "{}: {} ({})",
                store.t("common.currency"),
                currency.code(),
                currency.symbol()
            ));
        }
    }

    show(&store, ctx);
    Ok(())
}

fn show(store: &Storefront, ctx: &Context) {
    let prefs = store.preferences();

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "language": prefs.language,
            "currency": prefs.currency,
            "direction": prefs.text_direction().as_str(),
        }));
        return;
    }

    ctx.output.kv(&store.t("common.language"), prefs.language.code());
    ctx.output.kv(&store.t("common.currency"), prefs.currency.code());
    ctx.output.kv("dir", prefs.text_direction().as_str());
}
