//! Init command - create config and database.

use super::get_paths;
use anyhow::{Context, Result};
use colored::Colorize;
use doclore_config::Config;
use doclore_db::Database;

/// Run the init command.
pub fn run() -> Result<()> {
    let paths = get_paths()?;
    paths.ensure_dirs().context("Failed to create directories")?;

    if paths.config_file.exists() {
        println!(
            "{} Config already exists at {}",
            "Note:".yellow(),
            paths.config_file.display()
        );
    } else {
        Config::create_default_file(&paths.config_file)
            .context("Failed to write default config")?;
        println!(
            "{} Created config at {}",
            "✓".green(),
            paths.config_file.display()
        );
    }

    // Opening runs migrations
    Database::open(&paths.database_file).context("Failed to create database")?;
    println!(
        "{} Database ready at {}",
        "✓".green(),
        paths.database_file.display()
    );

    println!();
    println!("Next steps:");
    println!("  1. Export your API key (see llm.api_key_env in the config)");
    println!("  2. {} to ingest a file", "doclore add <file>".cyan());
    println!("  3. {} to ask about it", "doclore ask \"...\"".cyan());

    Ok(())
}
