//! Trait seams over the model service.
//!
//! The ingestion pipeline and chat orchestrator depend on these traits
//! rather than on [`OpenAiClient`] directly, so tests can substitute
//! deterministic implementations (see [`crate::mock`]).

use crate::client::OpenAiClient;
use crate::error::LlmResult;
use crate::types::{AssistantTurn, ChatMessage, ToolDefinition};
use async_trait::async_trait;

/// An embedding service with a fixed model and dimensionality.
///
/// Queries and stored chunks must be embedded by the same implementation
/// so they share an embedding space.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text.
    async fn embed(&self, text: &str) -> LlmResult<Vec<f32>>;

    /// Embed multiple texts, preserving input order.
    async fn embed_many(&self, texts: &[String]) -> LlmResult<Vec<Vec<f32>>>;

    /// Model identifier, recorded alongside stored vectors.
    fn model_name(&self) -> &str;

    /// Embedding vector dimensionality.
    fn dimensions(&self) -> usize;
}

/// A chat-completion service that can request tool invocations.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run one completion step over the conversation so far.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> LlmResult<AssistantTurn>;
}

#[async_trait]
impl Embedder for OpenAiClient {
    async fn embed(&self, text: &str) -> LlmResult<Vec<f32>> {
        self.embed_text(text).await
    }

    async fn embed_many(&self, texts: &[String]) -> LlmResult<Vec<Vec<f32>>> {
        self.embed_texts(texts).await
    }

    fn model_name(&self) -> &str {
        self.embedding_model()
    }

    fn dimensions(&self) -> usize {
        self.embedding_dimensions()
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> LlmResult<AssistantTurn> {
        self.chat_step(messages, tools).await
    }
}
