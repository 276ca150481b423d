//! Search command - direct similarity search over the store.

use super::{get_client, get_database, load_config};
use anyhow::{Context, Result};
use colored::Colorize;
use doclore_chat::{search_documents, RetrievalOptions};
use tokio::runtime::Runtime;

/// Run the search command.
pub fn run(query: &str, limit: Option<usize>) -> Result<()> {
    let db = get_database()?;
    let config = load_config()?;
    let client = get_client(&config)?;

    let rt = Runtime::new().context("Failed to create async runtime")?;

    let mut options = RetrievalOptions::from_config(&config.retrieval);
    if let Some(limit) = limit {
        options.top_k = limit;
    }

    println!("{} {}", "Query:".cyan().bold(), query);
    println!("{}", "─".repeat(70));
    println!();

    let block = rt
        .block_on(search_documents(&db, &client, &options, query))
        .context("Search failed")?;

    println!("{}", block);

    Ok(())
}
