//! Link command - ingest a web page.

use super::{get_database, get_ingestor, load_config};
use anyhow::{Context, Result};
use colored::Colorize;
use tokio::runtime::Runtime;

/// Run the link command.
pub fn run(url: &str) -> Result<()> {
    let db = get_database()?;
    let config = load_config()?;
    let ingestor = get_ingestor(&db, &config)?;

    let rt = Runtime::new().context("Failed to create async runtime")?;

    println!("{} {}", "Fetching:".cyan().bold(), url);

    let outcome = rt.block_on(ingestor.ingest_link(url))?;

    println!(
        "{} {} ({} chunks)",
        "✓".green(),
        outcome.document.title.white().bold(),
        outcome.chunk_count,
    );
    println!("  id: {}", outcome.document.id.dimmed());

    Ok(())
}
