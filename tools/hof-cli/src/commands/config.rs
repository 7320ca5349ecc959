//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let config = &ctx.config;
    ctx.output.info("[database]");
    ctx.output.kv("url_env", &config.database.url_env);
    ctx.output.kv(
        "url",
        if config.database_url().is_some() {
            "(set)"
        } else {
            "(missing)"
        },
    );
    ctx.output
        .kv("max_connections", &config.database.max_connections.to_string());

    ctx.output.info("[storefront]");
    ctx.output.kv("currency", &config.storefront.currency);
    ctx.output.kv("messaging_host", &config.storefront.messaging_host);
    ctx.output
        .kv("reload_delay_ms", &config.storefront.reload_delay_ms.to_string());

    ctx.output.info("[storage]");
    ctx.output
        .kv("path", &ctx.storage_path().display().to_string());

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("hof.toml");

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
