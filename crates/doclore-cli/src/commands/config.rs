//! Config command - show and edit configuration.

use super::{get_paths, load_config};
use anyhow::{Context, Result};
use colored::Colorize;

/// Show the current configuration.
pub fn show() -> Result<()> {
    let paths = get_paths()?;
    let config = load_config()?;

    println!("{} {}", "Config file:".cyan(), paths.config_file.display());
    println!();

    let rendered = toml::to_string_pretty(&config).context("Failed to render configuration")?;
    println!("{}", rendered);

    Ok(())
}

/// Set a configuration value.
pub fn set(key: &str, value: &str) -> Result<()> {
    let mut config = load_config()?;

    config
        .set_value(key, value)
        .with_context(|| format!("Cannot set '{key}'"))?;
    config.save().context("Failed to save configuration")?;

    println!("{} {} = {}", "✓".green(), key.white().bold(), value);

    Ok(())
}
