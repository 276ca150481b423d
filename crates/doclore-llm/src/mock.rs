//! Deterministic mock implementations for tests and offline runs.

use crate::error::{LlmError, LlmResult};
use crate::traits::{ChatModel, Embedder};
use crate::types::{AssistantTurn, ChatMessage, ToolDefinition};
use async_trait::async_trait;
use std::sync::Mutex;

/// A deterministic embedder: each text maps to a stable vector derived
/// from a cheap hash of its bytes. Records batch sizes so tests can
/// assert call order and sequencing.
pub struct MockEmbedder {
    dimensions: usize,
    batch_log: Mutex<Vec<usize>>,
    single_calls: Mutex<usize>,
    fail_after_batches: Option<usize>,
}

impl MockEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            batch_log: Mutex::new(Vec::new()),
            single_calls: Mutex::new(0),
            fail_after_batches: None,
        }
    }

    /// Fail every `embed_many` call after the first `n` batches succeed.
    pub fn failing_after(mut self, n: usize) -> Self {
        self.fail_after_batches = Some(n);
        self
    }

    /// The vector this mock produces for `text`.
    pub fn vector_for(&self, text: &str) -> Vec<f32> {
        let mut hash: u32 = 2166136261;
        for byte in text.bytes() {
            hash ^= byte as u32;
            hash = hash.wrapping_mul(16777619);
        }

        (0..self.dimensions)
            .map(|i| {
                let v = hash.wrapping_add(i as u32).wrapping_mul(2654435761);
                (v % 1000) as f32 / 1000.0
            })
            .collect()
    }

    /// Sizes of the batches embedded so far, in call order.
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_log.lock().unwrap().clone()
    }

    /// Number of single-text `embed` calls made so far.
    pub fn embed_calls(&self) -> usize {
        *self.single_calls.lock().unwrap()
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> LlmResult<Vec<f32>> {
        *self.single_calls.lock().unwrap() += 1;
        Ok(self.vector_for(text))
    }

    async fn embed_many(&self, texts: &[String]) -> LlmResult<Vec<Vec<f32>>> {
        let mut log = self.batch_log.lock().unwrap();
        if let Some(limit) = self.fail_after_batches {
            if log.len() >= limit {
                return Err(LlmError::ApiError {
                    status: 500,
                    message: "mock embedder failure".to_string(),
                });
            }
        }
        log.push(texts.len());
        drop(log);

        Ok(texts.iter().map(|t| self.vector_for(t)).collect())
    }

    fn model_name(&self) -> &str {
        "mock-embedder"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// A scripted chat model: plays back a fixed sequence of assistant
/// turns, one per `complete` call.
pub struct MockChatModel {
    turns: Mutex<std::vec::IntoIter<AssistantTurn>>,
}

impl MockChatModel {
    pub fn with_turns(turns: Vec<AssistantTurn>) -> Self {
        Self {
            turns: Mutex::new(turns.into_iter()),
        }
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    async fn complete(
        &self,
        _messages: &[ChatMessage],
        _tools: &[ToolDefinition],
    ) -> LlmResult<AssistantTurn> {
        self.turns
            .lock()
            .unwrap()
            .next()
            .ok_or(LlmError::EmptyResponse)
    }
}
