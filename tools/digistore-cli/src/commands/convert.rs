//! Currency conversion.

use anyhow::{anyhow, Result};
use digistore_sdk::digistore_commerce::money::{self, Currency};
use serde_json::json;

use super::ConvertArgs;
use crate::context::Context;

fn parse_currency(code: &str) -> Result<Currency> {
    Currency::from_code(code).ok_or_else(|| anyhow!("Unsupported currency: {}", code))
}

/// Run the convert command.
pub async fn run(args: ConvertArgs, ctx: &Context) -> Result<()> {
    let store = ctx.storefront()?;
    let rates = &store.reference().rates;
    let from = parse_currency(&args.from)?;

    let targets: Vec<Currency> = match args.to.as_deref() {
        Some(code) => vec![parse_currency(code)?],
        None => Currency::ALL.into_iter().filter(|c| *c != from).collect(),
    };

    // Display formatting takes base-currency amounts
    let base_amount = money::convert(args.amount, from, Currency::BASE, rates);

    let results: Vec<_> = targets
        .iter()
        .map(|to| {
            let amount = money::convert(args.amount, from, *to, rates);
            (*to, amount, money::format(base_amount, *to, rates))
        })
        .collect();

    if ctx.output.is_json() {
        let rows: Vec<_> = results
            .iter()
            .map(|(to, amount, formatted)| {
                json!({ "currency": to, "amount": amount, "formatted": formatted })
            })
            .collect();
        ctx.output.json(&json!({ "from": from, "amount": args.amount, "results": rows }));
        return Ok(());
    }

    ctx.output.info(&money::format(base_amount, from, rates));
    for (to, _, formatted) in results {
        ctx.output.kv(to.code(), &formatted);
    }
    Ok(())
}
