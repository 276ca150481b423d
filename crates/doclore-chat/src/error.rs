//! Error types for retrieval and chat orchestration.

use thiserror::Error;

/// Errors that can occur while answering a question.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Database error: {0}")]
    Database(#[from] doclore_db::DbError),

    #[error("Model service error: {0}")]
    Llm(#[from] doclore_llm::LlmError),

    /// The model kept calling tools until the step cap without ever
    /// producing a final text answer.
    #[error("No answer after {steps} steps; the model never produced a final response")]
    StepLimitExceeded { steps: usize },

    /// The model returned neither text nor a tool call.
    #[error("The model returned an empty response")]
    EmptyResponse,

    #[error("The model requested an unknown tool: {0}")]
    UnknownTool(String),

    #[error("Could not parse tool arguments: {0}")]
    BadToolArguments(String),
}

/// Result type for chat operations.
pub type ChatResult<T> = Result<T, ChatError>;
