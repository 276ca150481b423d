//! CLI command implementations.

pub mod add;
pub mod ask;
pub mod config;
pub mod delete;
pub mod init;
pub mod link;
pub mod list;
pub mod search;
pub mod status;

use anyhow::{Context, Result};
use doclore_config::{AppPaths, Config};
use doclore_db::Database;
use doclore_ingest::{IngestOptions, Ingestor, LocalBlobStore, TiktokenCounter};
use doclore_llm::OpenAiClient;
use std::sync::Arc;

/// Get the application paths.
pub fn get_paths() -> Result<AppPaths> {
    AppPaths::new().context("Failed to determine application directories")
}

/// Get a database connection, ensuring doclore is initialized.
pub fn get_database() -> Result<Database> {
    let paths = get_paths()?;

    if !paths.is_initialized() {
        anyhow::bail!("Doclore is not initialized. Run 'doclore init' first.");
    }

    Database::open(&paths.database_file).context("Failed to open database")
}

/// Load the configuration.
pub fn load_config() -> Result<Config> {
    Config::load().context("Failed to load configuration")
}

/// Build the model service client from config.
pub fn get_client(config: &Config) -> Result<OpenAiClient> {
    OpenAiClient::from_config(&config.llm).context("Failed to create model service client")
}

/// Build an ingestor wired to the local blob store and the tiktoken
/// counter.
pub fn get_ingestor(db: &Database, config: &Config) -> Result<Ingestor> {
    let paths = get_paths()?;
    let client = get_client(config)?;
    let counter = TiktokenCounter::new().context("Failed to load tokenizer")?;

    Ok(Ingestor::new(
        db.clone(),
        Arc::new(client),
        Arc::new(LocalBlobStore::new(&paths.blob_dir)),
        Arc::new(counter),
        IngestOptions::from_config(&config.processing),
    ))
}

/// Format a file size in human-readable form.
pub fn format_size(bytes: i64) -> String {
    const KB: i64 = 1024;
    const MB: i64 = KB * 1024;
    const GB: i64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
