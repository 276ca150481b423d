//! Add command - ingest local files.

use super::{format_size, get_database, get_ingestor, load_config};
use anyhow::{Context, Result};
use colored::Colorize;
use futures_util::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Run the add command.
///
/// Files are ingested concurrently, one task per document; embedding
/// batches within each document stay sequential.
pub fn run(files: Vec<PathBuf>) -> Result<()> {
    let db = get_database()?;
    let config = load_config()?;
    let ingestor = Arc::new(get_ingestor(&db, &config)?);

    let rt = Runtime::new().context("Failed to create async runtime")?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let results = rt.block_on(async {
        let tasks: Vec<_> = files
            .into_iter()
            .map(|path| {
                let ingestor = Arc::clone(&ingestor);
                tokio::spawn(async move {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| path.display().to_string());

                    let bytes = match std::fs::read(&path) {
                        Ok(bytes) => bytes,
                        Err(e) => return (name, Err(anyhow::anyhow!("{}", e))),
                    };

                    let mime = guess_mime_type(&path);
                    let result = ingestor
                        .ingest_file(&name, &bytes, mime)
                        .await
                        .map_err(anyhow::Error::from);
                    (name, result)
                })
            })
            .collect();

        join_all(tasks).await
    });

    let mut failures = 0;

    for task_result in results {
        let (name, result) = task_result.context("Ingestion task panicked")?;
        match result {
            Ok(outcome) => {
                pb.println(format!(
                    "{} {} ({} chunks, {})",
                    "✓".green(),
                    name.white().bold(),
                    outcome.chunk_count,
                    format_size(outcome.document.file_size.unwrap_or(0)),
                ));
            }
            Err(e) => {
                failures += 1;
                pb.println(format!("{} {}: {}", "✗".red(), name.white().bold(), e));
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();

    if failures > 0 {
        anyhow::bail!("{} file(s) failed to ingest", failures);
    }

    Ok(())
}

fn guess_mime_type(path: &std::path::Path) -> Option<&'static str> {
    match path
        .extension()
        .and_then(|e| e.to_str())?
        .to_lowercase()
        .as_str()
    {
        "txt" => Some("text/plain"),
        "md" | "markdown" => Some("text/markdown"),
        "html" | "htm" => Some("text/html"),
        "json" => Some("application/json"),
        "csv" => Some("text/csv"),
        "xml" => Some("application/xml"),
        "yaml" | "yml" => Some("application/yaml"),
        _ => None,
    }
}
