//! HTTP client for an OpenAI-compatible model service.

use crate::error::{LlmError, LlmResult};
use crate::types::*;
use doclore_config::LlmConfig;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

/// Client for the embeddings and chat-completions endpoints.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    embedding_model: String,
    embedding_dimensions: usize,
    timeout: Duration,
}

impl OpenAiClient {
    /// Create a new client from configuration.
    ///
    /// The API key is read from the environment variable named in the
    /// config (`llm.api_key_env`).
    pub fn from_config(config: &LlmConfig) -> LlmResult<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            LlmError::InvalidConfig(format!(
                "API key environment variable '{}' is not set",
                config.api_key_env
            ))
        })?;

        let timeout = Duration::from_secs(config.timeout_seconds);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(LlmError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            embedding_model: config.embedding_model.clone(),
            embedding_dimensions: config.embedding_dimensions,
            timeout,
        })
    }

    /// The configured chat model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The configured embedding model name.
    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    /// The configured embedding dimensionality.
    pub fn embedding_dimensions(&self) -> usize {
        self.embedding_dimensions
    }

    /// Generate an embedding for a single text.
    pub async fn embed_text(&self, text: &str) -> LlmResult<Vec<f32>> {
        let mut vectors = self.embed_texts(&[text.to_string()]).await?;
        vectors.pop().ok_or(LlmError::EmptyResponse)
    }

    /// Generate embeddings for multiple texts in one request.
    ///
    /// The result is ordered to match the input: `vectors[i]` embeds
    /// `texts[i]`.
    pub async fn embed_texts(&self, texts: &[String]) -> LlmResult<Vec<Vec<f32>>> {
        let url = format!("{}/embeddings", self.base_url);
        debug!(
            "Embedding {} texts with model {}",
            texts.len(),
            self.embedding_model
        );

        let request = EmbeddingsRequest {
            model: self.embedding_model.clone(),
            input: texts.to_vec(),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        let body: EmbeddingsResponse = response.json().await?;

        if body.data.len() != texts.len() {
            return Err(LlmError::ParseError(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                body.data.len()
            )));
        }

        // The API tags each embedding with its input index; re-order
        // explicitly rather than trusting response order.
        let mut vectors: Vec<Option<Vec<f32>>> = vec![None; texts.len()];
        for item in body.data {
            if item.index >= texts.len() {
                return Err(LlmError::ParseError(format!(
                    "embedding index {} out of range",
                    item.index
                )));
            }
            if item.embedding.len() != self.embedding_dimensions {
                return Err(LlmError::DimensionMismatch {
                    expected: self.embedding_dimensions,
                    actual: item.embedding.len(),
                });
            }
            vectors[item.index] = Some(item.embedding);
        }

        vectors
            .into_iter()
            .map(|v| v.ok_or_else(|| LlmError::ParseError("missing embedding index".to_string())))
            .collect()
    }

    /// Run one chat-completion step with the given tools available.
    pub async fn chat_step(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> LlmResult<AssistantTurn> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(
            "Chat completion with model {} ({} messages)",
            self.model,
            messages.len()
        );

        let request = ChatRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            tools: if tools.is_empty() {
                None
            } else {
                Some(tools.to_vec())
            },
            temperature: None,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        let body: ChatResponse = response.json().await?;
        let choice = body.choices.into_iter().next().ok_or(LlmError::EmptyResponse)?;

        let turn = AssistantTurn::from(choice.message);
        info!(
            "Model turn: {} tool call(s), text={}",
            turn.tool_calls.len(),
            turn.text().is_some()
        );
        Ok(turn)
    }

    fn map_request_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_connect() {
            LlmError::Connection {
                host: self.base_url.clone(),
            }
        } else if e.is_timeout() {
            LlmError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else {
            LlmError::Http(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_requires_api_key() {
        let config = LlmConfig {
            api_key_env: "DOCLORE_TEST_KEY_THAT_IS_NOT_SET".to_string(),
            ..LlmConfig::default()
        };
        let client = OpenAiClient::from_config(&config);
        assert!(matches!(client, Err(LlmError::InvalidConfig(_))));
    }

    #[test]
    fn test_client_creation() {
        std::env::set_var("DOCLORE_TEST_KEY", "sk-test");
        let config = LlmConfig {
            api_key_env: "DOCLORE_TEST_KEY".to_string(),
            base_url: "https://api.openai.com/v1/".to_string(),
            ..LlmConfig::default()
        };
        let client = OpenAiClient::from_config(&config).unwrap();
        // Trailing slash is trimmed
        assert_eq!(client.base_url, "https://api.openai.com/v1");
        assert_eq!(client.model(), "gpt-4o");
    }
}
