//! Configuration structures and loading.

use crate::error::{ConfigError, ConfigResult};
use crate::paths::AppPaths;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub processing: ProcessingConfig,

    #[serde(default)]
    pub retrieval: RetrievalConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> ConfigResult<Self> {
        let paths = AppPaths::new().ok_or(ConfigError::NoConfigDir)?;
        Self::load_from(&paths.config_file)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> ConfigResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> ConfigResult<()> {
        let paths = AppPaths::new().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&paths.config_file)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> ConfigResult<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Create a default config file with comments.
    pub fn create_default_file(path: &PathBuf) -> ConfigResult<()> {
        let default_config = Self::default_config_string();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, default_config)?;
        Ok(())
    }

    /// Generate a default config file with helpful comments.
    pub fn default_config_string() -> String {
        r#"# Doclore Configuration
# Local document knowledge base with retrieval-augmented chat

[general]
# Data directory for database and blobs
# data_dir = "~/.local/share/doclore"

[llm]
# Base URL of an OpenAI-compatible API
base_url = "https://api.openai.com/v1"

# Environment variable holding the API key
api_key_env = "OPENAI_API_KEY"

# Model for answering questions (must support tool calling)
model = "gpt-4o"

# Model for generating embeddings
embedding_model = "text-embedding-3-small"

# Embedding vector dimensionality (fixed per model)
embedding_dimensions = 1536

# Request timeout in seconds
timeout_seconds = 120

[processing]
# Words per chunk
chunk_size_words = 400

# Chunks at or below this many characters are dropped as noise
min_chunk_chars = 50

# Hard token ceiling per chunk (embedding model context limit)
max_chunk_tokens = 7500

# Chunks per embedding request
embed_batch_size = 50

# Characters of extracted text stored as the document preview
preview_chars = 10000

[retrieval]
# Chunks returned per query
top_k = 3

# Minimum cosine similarity for a chunk to count as relevant
min_similarity = 0.5

# Maximum tool-calling steps per question
max_steps = 5

[ui]
# Enable colored output
color = true

# Date format (strftime)
date_format = "%Y-%m-%d %H:%M"
"#
        .to_string()
    }

    /// Set a dotted configuration key to a string value.
    pub fn set_value(&mut self, key: &str, value: &str) -> ConfigResult<()> {
        match key {
            "llm.base_url" => self.llm.base_url = value.to_string(),
            "llm.api_key_env" => self.llm.api_key_env = value.to_string(),
            "llm.model" => self.llm.model = value.to_string(),
            "llm.embedding_model" => self.llm.embedding_model = value.to_string(),
            "llm.embedding_dimensions" => {
                self.llm.embedding_dimensions = value
                    .parse()
                    .map_err(|_| ConfigError::Invalid(format!("not a number: {value}")))?;
            }
            "llm.timeout_seconds" => {
                self.llm.timeout_seconds = value
                    .parse()
                    .map_err(|_| ConfigError::Invalid(format!("not a number: {value}")))?;
            }
            "retrieval.top_k" => {
                self.retrieval.top_k = value
                    .parse()
                    .map_err(|_| ConfigError::Invalid(format!("not a number: {value}")))?;
            }
            "retrieval.min_similarity" => {
                self.retrieval.min_similarity = value
                    .parse()
                    .map_err(|_| ConfigError::Invalid(format!("not a number: {value}")))?;
            }
            "retrieval.max_steps" => {
                self.retrieval.max_steps = value
                    .parse()
                    .map_err(|_| ConfigError::Invalid(format!("not a number: {value}")))?;
            }
            _ => {
                return Err(ConfigError::Invalid(format!("unknown config key: {key}")));
            }
        }
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeneralConfig {
    pub data_dir: Option<String>,
}

/// Model service settings (OpenAI-compatible API).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key_env: String,
    pub model: String,
    pub embedding_model: String,
    pub embedding_dimensions: usize,
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            model: "gpt-4o".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            embedding_dimensions: 1536,
            timeout_seconds: 120,
        }
    }
}

/// Ingestion processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    pub chunk_size_words: usize,
    pub min_chunk_chars: usize,
    pub max_chunk_tokens: usize,
    pub embed_batch_size: usize,
    pub preview_chars: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            chunk_size_words: 400,
            min_chunk_chars: 50,
            max_chunk_tokens: 7500,
            embed_batch_size: 50,
            preview_chars: 10_000,
        }
    }
}

/// Retrieval and chat settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
    pub min_similarity: f32,
    pub max_steps: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            min_similarity: 0.5,
            max_steps: 5,
        }
    }
}

/// UI/Display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub color: bool,
    pub date_format: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            color: true,
            date_format: "%Y-%m-%d %H:%M".to_string(),
        }
    }
}
