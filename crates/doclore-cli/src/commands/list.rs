//! List command - show ingested documents.

use super::{format_size, get_database, load_config};
use anyhow::Result;
use colored::Colorize;
use doclore_core::DocumentStatus;

/// Run the list command.
pub fn run(limit: i64) -> Result<()> {
    let db = get_database()?;
    let config = load_config()?;

    let documents = db.list_documents(Some(limit))?;

    if documents.is_empty() {
        println!("No documents yet. Add one with {}.", "doclore add".cyan());
        return Ok(());
    }

    for doc in documents {
        let status = match doc.status {
            DocumentStatus::Completed => doc.status.as_str().green(),
            DocumentStatus::Processing => doc.status.as_str().yellow(),
            DocumentStatus::Failed => doc.status.as_str().red(),
        };

        let size = doc
            .file_size
            .map(format_size)
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{} {} [{}] {} {} {}",
            doc.id[..8].dimmed(),
            doc.title.white().bold(),
            doc.kind,
            status,
            size,
            doc.created_at
                .format(&config.ui.date_format)
                .to_string()
                .dimmed(),
        );
    }

    Ok(())
}
