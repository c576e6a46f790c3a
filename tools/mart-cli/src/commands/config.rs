//! Configuration management commands.

use std::path::PathBuf;

use anyhow::{bail, Result};
use mart_observability::{LogFormat, LogLevel};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, MartConfig, CONFIG_NAMES};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Get { key } => get_config(&key, ctx).await,
        ConfigCommand::Set { key, value } => set_config(&key, &value, ctx).await,
        ConfigCommand::Init { base_url, force } => init_config(&base_url, force, ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    ctx.output.blank();
    ctx.output.info("[api]");
    ctx.output.kv("base_url", &ctx.config.api.base_url);
    ctx.output.kv("timeout_secs", &ctx.config.api.timeout_secs.to_string());
    ctx.output
        .kv("cart_timeout_secs", &ctx.config.api.cart_timeout_secs.to_string());
    ctx.output.kv(
        "connect_timeout_secs",
        &ctx.config.api.connect_timeout_secs.to_string(),
    );

    ctx.output.blank();
    ctx.output.info("[storage]");
    ctx.output
        .kv("data_dir", &ctx.config.data_dir().display().to_string());

    ctx.output.blank();
    ctx.output.info("[logging]");
    ctx.output
        .kv("level", ctx.config.logging.level.as_directive());
    ctx.output.kv("format", format_name(ctx.config.logging.format));

    ctx.output.blank();
    ctx.output.info("[checkout]");
    ctx.output.kv(
        "default_delivery",
        ctx.config.checkout.default_delivery.as_str(),
    );

    ctx.output.blank();
    let login = if ctx.credentials.is_authenticated() {
        "logged in"
    } else {
        "not logged in"
    };
    ctx.output.kv("session", login);

    Ok(())
}

async fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&ctx.config, key)?;

    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

async fn set_config(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let Some(config_path) = ctx.config_path.clone() else {
        bail!("No config file found. Run `mart config init` to create one.");
    };

    // Load the file itself so environment overrides are not written back
    let mut config = MartConfig::load(&config_path)?;
    set_config_value(&mut config, key, value)?;
    config.save(&config_path)?;

    ctx.output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

async fn init_config(base_url: &str, force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, generate_default_config(base_url))?;

    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn format_name(format: LogFormat) -> &'static str {
    match format {
        LogFormat::Json => "json",
        LogFormat::Human => "human",
    }
}

fn get_config_value(config: &MartConfig, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["api", "base_url"] => Ok(config.api.base_url.clone()),
        ["api", "timeout_secs"] => Ok(config.api.timeout_secs.to_string()),
        ["api", "cart_timeout_secs"] => Ok(config.api.cart_timeout_secs.to_string()),
        ["api", "connect_timeout_secs"] => Ok(config.api.connect_timeout_secs.to_string()),
        ["storage", "data_dir"] => Ok(config.data_dir().display().to_string()),
        ["logging", "level"] => Ok(config.logging.level.as_directive().to_string()),
        ["logging", "format"] => Ok(format_name(config.logging.format).to_string()),
        ["checkout", "default_delivery"] => {
            Ok(config.checkout.default_delivery.as_str().to_string())
        }
        _ => bail!("Unknown config key: {}", key),
    }
}

fn set_config_value(config: &mut MartConfig, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["api", "base_url"] => config.api.base_url = value.to_string(),
        ["api", "timeout_secs"] => config.api.timeout_secs = value.parse()?,
        ["api", "cart_timeout_secs"] => config.api.cart_timeout_secs = value.parse()?,
        ["api", "connect_timeout_secs"] => config.api.connect_timeout_secs = value.parse()?,
        ["storage", "data_dir"] => config.storage.data_dir = Some(PathBuf::from(value)),
        ["logging", "level"] => config.logging.level = value.parse::<LogLevel>()?,
        ["logging", "format"] => {
            config.logging.format = match value.to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                "human" => LogFormat::Human,
                other => bail!("Unknown log format: {} (expected json or human)", other),
            }
        }
        ["checkout", "default_delivery"] => config.checkout.default_delivery = value.parse()?,
        _ => bail!("Unknown or read-only config key: {}", key),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mart_commerce::checkout::DeliveryOption;

    #[test]
    fn test_set_then_get() {
        let mut config = MartConfig::default();
        set_config_value(&mut config, "checkout.default_delivery", "Express").unwrap();
        set_config_value(&mut config, "logging.level", "debug").unwrap();
        set_config_value(&mut config, "api.cart_timeout_secs", "45").unwrap();

        assert_eq!(config.checkout.default_delivery, DeliveryOption::Express);
        assert_eq!(get_config_value(&config, "logging.level").unwrap(), "debug");
        assert_eq!(get_config_value(&config, "api.cart_timeout_secs").unwrap(), "45");
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = MartConfig::default();
        assert!(set_config_value(&mut config, "checkout.default_delivery", "drone").is_err());
        assert!(set_config_value(&mut config, "api.timeout_secs", "soon").is_err());
        assert!(set_config_value(&mut config, "logging.format", "xml").is_err());
        assert!(get_config_value(&config, "deploy.canary").is_err());
        assert_eq!(config, MartConfig::default());
    }
}
