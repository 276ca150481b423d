//! Doclore CLI - Local document knowledge base with retrieval-augmented chat.

mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Doclore - ask questions about your documents
#[derive(Parser)]
#[command(name = "doclore")]
#[command(version)]
#[command(about = "Local document knowledge base with retrieval-augmented chat", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize doclore (create config and database)
    Init,

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Add one or more files to the knowledge base
    Add {
        /// Paths of text files to ingest
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Add a web page to the knowledge base
    Link {
        /// URL to fetch and ingest
        url: String,
    },

    /// Ask a question about the ingested documents
    Ask {
        /// Your question
        question: String,
    },

    /// Search the ingested documents directly
    Search {
        /// Search query
        query: String,

        /// Maximum results
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List ingested documents
    List {
        /// Maximum number of documents to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Delete a document and its chunks
    Delete {
        /// Document ID (or unique prefix)
        id: String,
    },

    /// Show knowledge base statistics
    Status,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., llm.model)
        key: String,

        /// Value to set
        value: String,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("doclore=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("doclore=info,warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Init => commands::init::run(),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::show(),
            ConfigCommands::Set { key, value } => commands::config::set(&key, &value),
        },
        Commands::Add { files } => commands::add::run(files),
        Commands::Link { url } => commands::link::run(&url),
        Commands::Ask { question } => commands::ask::run(&question),
        Commands::Search { query, limit } => commands::search::run(&query, limit),
        Commands::List { limit } => commands::list::run(limit),
        Commands::Delete { id } => commands::delete::run(&id),
        Commands::Status => commands::status::run(),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
