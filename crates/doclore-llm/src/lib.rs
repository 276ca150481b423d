//! Doclore LLM - model service integration for embeddings and tool-calling chat.
//!
//! This crate provides an async client for an OpenAI-compatible API
//! (`/embeddings` and `/chat/completions`), the [`Embedder`] and
//! [`ChatModel`] traits that decouple the pipeline from the network,
//! and the sequential [`EmbeddingBatcher`].

mod batch;
mod client;
mod error;
pub mod mock;
mod traits;
mod types;

pub use batch::EmbeddingBatcher;
pub use client::OpenAiClient;
pub use error::{LlmError, LlmResult};
pub use traits::{ChatModel, Embedder};
pub use types::*;
