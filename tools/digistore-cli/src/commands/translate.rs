//! Message key resolution.

use anyhow::{bail, Result};
use digistore_sdk::digistore_i18n::Language;
use serde_json::json;

use super::TranslateArgs;
use crate::context::Context;

/// Run the translate command.
pub async fn run(args: TranslateArgs, ctx: &Context) -> Result<()> {
    let store = ctx.storefront()?;

    let language = match args.lang.as_deref() {
        Some(code) => match Language::from_code(code) {
            Some(language) => language,
            None => bail!("Unsupported language: {}", code),
        },
        None => store.preferences().language,
    };

    let mut text = match args.count {
        Some(count) => store.translator().resolve_plural(language, &args.key, count),
        None => store.translator().resolve(language, &args.key),
    };
    for (name, value) in &args.params {
        text = text.replace(&format!("{{{}}}", name), value);
    }

    let missing = store.translator().missing_keys();
    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "key": args.key,
            "language": language,
            "direction": language.direction().as_str(),
            "text": text,
            "missing": !missing.is_empty(),
        }));
        return Ok(());
    }

    println!("{}", text);
    if !missing.is_empty() {
        ctx.output.warn(&format!("No translation for '{}'", args.key));
    }
    Ok(())
}
