//! Content chunking with a hard token ceiling.
//!
//! Splitting happens in two passes: a word-bounded pass that builds
//! chunks of a target size, and an enforcement pass that recursively
//! halves anything the embedding model's tokenizer would reject.

use crate::error::{IngestError, IngestResult};
use tiktoken_rs::{cl100k_base, CoreBPE};

/// Configuration for chunking.
#[derive(Debug, Clone)]
pub struct ChunkConfig {
    /// Target size of each chunk in words.
    pub chunk_size_words: usize,
    /// Chunks at or below this many characters are dropped as noise.
    pub min_chunk_chars: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size_words: 400,
            min_chunk_chars: 50,
        }
    }
}

/// Word-bounded chunker.
pub struct Chunker {
    config: ChunkConfig,
}

impl Chunker {
    /// Create a new chunker with the given configuration.
    pub fn new(config: ChunkConfig) -> Self {
        Self { config }
    }

    /// Split sanitized text into chunks of `chunk_size_words` words.
    ///
    /// Words are grouped consecutively without overlap and rejoined with
    /// single spaces, so output order reflects document order. Chunks at
    /// or below the character floor are discarded.
    pub fn split(&self, text: &str) -> Vec<String> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return vec![];
        }

        let mut chunks = Vec::new();
        for group in words.chunks(self.config.chunk_size_words.max(1)) {
            let chunk = group.join(" ");
            if chunk.chars().count() > self.config.min_chunk_chars {
                chunks.push(chunk);
            }
        }

        chunks
    }
}

/// Counts tokens the way the embedding model's tokenizer would.
///
/// Injected rather than global so tests can substitute a deterministic
/// counter.
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;
}

/// Token counter backed by the cl100k_base encoding, matching
/// text-embedding-3-small.
pub struct TiktokenCounter {
    bpe: CoreBPE,
}

impl TiktokenCounter {
    pub fn new() -> IngestResult<Self> {
        let bpe = cl100k_base().map_err(|e| IngestError::Tokenizer(e.to_string()))?;
        Ok(Self { bpe })
    }
}

impl TokenCounter for TiktokenCounter {
    fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}

/// Guarantee every chunk fits under the embedding model's token limit.
///
/// Chunks within the ceiling pass through untouched. Oversized chunks
/// are split at their character midpoint and both halves re-checked
/// recursively, preserving order. The midpoint may sever a word; that
/// is intentional, since the embedding model tokenizes sub-word units
/// anyway. Without this pass the embedding service would reject the
/// chunk outright and its content would be lost.
pub fn enforce_token_limit(
    chunks: Vec<String>,
    max_tokens: usize,
    counter: &dyn TokenCounter,
) -> Vec<String> {
    let mut safe = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        split_within_limit(&chunk, max_tokens, counter, &mut safe);
    }
    safe
}

fn split_within_limit(
    chunk: &str,
    max_tokens: usize,
    counter: &dyn TokenCounter,
    out: &mut Vec<String>,
) {
    if counter.count(chunk) <= max_tokens {
        out.push(chunk.to_string());
        return;
    }

    let char_count = chunk.chars().count();
    if char_count <= 1 {
        // Cannot split further; a single char over the limit cannot
        // occur with a real tokenizer.
        out.push(chunk.to_string());
        return;
    }

    // Each half is strictly shorter than the input, so the recursion
    // terminates for any finite chunk.
    let mid = chunk
        .char_indices()
        .nth(char_count / 2)
        .map(|(i, _)| i)
        .unwrap_or(chunk.len());
    let (left, right) = chunk.split_at(mid);

    split_within_limit(left, max_tokens, counter, out);
    split_within_limit(right, max_tokens, counter, out);
}
