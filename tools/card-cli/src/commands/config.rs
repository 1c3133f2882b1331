//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};
use card_core::ContainerAttributes;
use console::Term;
use dialoguer::Confirm;

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::{Context, CONFIG_NAMES};

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match ctx.config_path {
        Some(ref path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    ctx.output.info("");
    ctx.output.info("[logging]");
    ctx.output.kv("level", &ctx.config.logging.level);
    ctx.output.kv("format", &format!("{:?}", ctx.config.logging.format).to_lowercase());

    let base = ctx.base_dir();
    for container in &ctx.config.containers {
        ctx.output.info("");
        ctx.output.info("[[containers]]");
        ctx.output.kv("name", container.name.as_str());
        match container.cards_file {
            Some(ref file) => ctx.output.kv("cards_file", &file.display().to_string()),
            None => ctx.output.kv("cards", &container.cards.to_string()),
        }
        if !container.track {
            ctx.output.kv("track", "false");
        }

        let attributes = ContainerAttributes::read(&container.attributes);
        if attributes.slider {
            let viewport = attributes.viewport();
            ctx.output.kv("items_per_view", &viewport.items_per_view().to_string());
            ctx.output
                .kv("interval", &format!("{}ms", viewport.autoplay_interval_ms()));
            ctx.output.kv(
                "controls",
                match (container.prev_button, container.next_button) {
                    (true, true) => "prev, next",
                    (true, false) => "prev",
                    (false, true) => "next",
                    (false, false) => "none",
                },
            );
        } else {
            ctx.output.kv("slider", "off");
        }

        if let Err(e) = container.card_count(&base) {
            ctx.output.warn(&format!("{}: {:#}", container.name, e));
        }
    }

    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        if !Term::stdout().is_term() {
            bail!(
                "Config file already exists: {}. Use --force to overwrite.",
                config_path.display()
            );
        }

        let confirmed = Confirm::new()
            .with_prompt(format!("Overwrite {}?", config_path.display()))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Init cancelled");
            return Ok(());
        }
    }

    fs::write(&config_path, generate_default_config())?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let mut warnings: Vec<String> = Vec::new();

    if ctx.config.containers.is_empty() {
        warnings.push("no containers configured".to_string());
    }

    for container in &ctx.config.containers {
        let attributes = ContainerAttributes::read(&container.attributes);
        if !attributes.slider {
            continue;
        }
        if !container.track {
            warnings.push(format!(
                "containers.{}: slider without a track will not mount",
                container.name
            ));
        }
        if container.cards_file.is_none() && container.cards == 0 {
            warnings.push(format!(
                "containers.{}: slider without cards will not mount",
                container.name
            ));
        }
    }

    ctx.config.validate(&ctx.base_dir())?;

    if warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}
