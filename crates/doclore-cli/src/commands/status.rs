//! Status command - knowledge base statistics.

use super::get_database;
use anyhow::Result;
use colored::Colorize;

/// Run the status command.
pub fn run() -> Result<()> {
    let db = get_database()?;
    let stats = db.stats()?;

    println!("{}", "Knowledge base".cyan().bold());
    println!("{}", "─".repeat(40));
    println!("Documents: {}", stats.total_documents);

    for (status, count) in &stats.documents_by_status {
        let label = match status.as_str() {
            "completed" => status.green(),
            "failed" => status.red(),
            _ => status.yellow(),
        };
        println!("  {}: {}", label, count);
    }

    println!("Chunks:    {}", stats.total_chunks);

    if stats.total_chunks == 0 && stats.total_documents == 0 {
        println!();
        println!("Nothing ingested yet. Try {}.", "doclore add <file>".cyan());
    }

    Ok(())
}
