//! Delete command - remove a document and its chunks.

use super::get_database;
use anyhow::Result;
use colored::Colorize;

/// Run the delete command.
pub fn run(id: &str) -> Result<()> {
    let db = get_database()?;

    let doc = db.get_document_by_prefix(id)?;
    db.delete_document(&doc.id)?;

    println!(
        "{} Deleted \"{}\" and its chunks",
        "✓".green(),
        doc.title.white().bold()
    );

    Ok(())
}
