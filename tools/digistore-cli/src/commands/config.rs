//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};
use digistore_sdk::{generate_default_config, StorageBackend};

use super::{ConfigArgs, ConfigCommand};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Path => show_path(ctx),
        ConfigCommand::Init { path, force } => init_config(&path, force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    print!("{}", toml::to_string_pretty(&ctx.config)?);
    Ok(())
}

fn show_path(ctx: &Context) -> Result<()> {
    match &ctx.config_path {
        Some(path) => println!("{}", path.display()),
        None => bail!("No config file found. Run `digistore config init` to create one."),
    }
    Ok(())
}

fn init_config(path: &str, force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.resolve_path(path);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;
    ctx.output.success(&format!("Created: {}", config_path.display()));
    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    let data_dir = &ctx.config.data.dir;
    if !data_dir.is_dir() {
        errors.push(format!("data.dir '{}' is not a directory", data_dir.display()));
    }

    let messages_dir = ctx.config.data.messages_dir();
    if !messages_dir.is_dir() {
        warnings.push(format!(
            "messages directory '{}' not found; keys will resolve to themselves",
            messages_dir.display()
        ));
    }

    if ctx.config.storage.backend == StorageBackend::Memory {
        warnings.push("storage.backend is 'memory'; nothing survives between commands".to_string());
    }

    if ctx.config.session.latency_ms > 10_000 {
        warnings.push(format!(
            "session.latency_ms = {} makes every login take over 10s",
            ctx.config.session.latency_ms
        ));
    }

    // Loading the storefront checks the reference data itself
    if errors.is_empty() {
        if let Err(e) = ctx.storefront() {
            errors.push(format!("{:#}", e));
        }
    }

    // Print results
    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}
