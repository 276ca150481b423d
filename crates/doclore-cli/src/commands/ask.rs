//! Ask command - retrieval-augmented question answering.

use super::{get_client, get_database, load_config};
use anyhow::{Context, Result};
use colored::Colorize;
use doclore_chat::{ChatOptions, ChatSession};
use tokio::runtime::Runtime;

/// Run the ask command.
pub fn run(question: &str) -> Result<()> {
    let db = get_database()?;
    let config = load_config()?;
    let client = get_client(&config)?;

    let rt = Runtime::new().context("Failed to create async runtime")?;

    println!("{} {}", "Question:".cyan().bold(), question);
    println!("{}", "─".repeat(70));
    println!();

    let options = ChatOptions::from_config(&config.retrieval);
    let session = ChatSession::new(&db, &client, &client, options);

    let answer = rt
        .block_on(session.answer(question))
        .context("Failed to generate answer")?;

    println!("{}", "Answer:".green().bold());
    println!();
    println!("{}", answer.text);
    println!();
    println!(
        "{}",
        format!(
            "({} step(s), {} document lookup(s))",
            answer.steps, answer.tool_invocations
        )
        .dimmed()
    );

    Ok(())
}
