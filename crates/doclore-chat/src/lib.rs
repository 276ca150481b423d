//! Doclore Chat - retrieval tool and chat orchestration.
//!
//! The retrieval tool embeds a query, searches stored chunk embeddings,
//! and formats a citation block the model can read. The orchestrator
//! drives a bounded tool-calling loop around it.

mod error;
mod orchestrator;
mod retrieval;

pub use error::{ChatError, ChatResult};
pub use orchestrator::{ChatAnswer, ChatOptions, ChatSession};
pub use retrieval::{
    search_documents, search_tool_definition, RetrievalOptions, EMPTY_STORE_MESSAGE,
    NO_MATCH_MESSAGE, SEARCH_TOOL_NAME,
};
