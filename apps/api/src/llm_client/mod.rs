/// LLM Client — the single point of entry for all chat-completion calls in MetaTag.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// All LLM interactions MUST go through this module.
use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// Output cap for every completion call in the service.
const MAX_TOKENS: u32 = 2048;
/// Deterministic sampling. The cache, not the model, is what guarantees
/// identical-input-to-identical-output within a process lifetime.
const TEMPERATURE: f32 = 0.0;
const MAX_RETRIES: u32 = 3;

/// The model versions a session may select.
///
/// `ClaudeNext` is announced but not yet callable — it carries no API id and
/// must be rejected before any remote call is attempted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupportedModel {
    #[default]
    #[serde(rename = "claude-sonnet-4-5")]
    ClaudeSonnet45,
    #[serde(rename = "claude-opus-4-1")]
    ClaudeOpus41,
    #[serde(rename = "claude-next")]
    ClaudeNext,
}

impl SupportedModel {
    /// Wire-level model id for the Messages API. `None` for placeholders.
    pub fn api_id(&self) -> Option<&'static str> {
        match self {
            SupportedModel::ClaudeSonnet45 => Some("claude-sonnet-4-5"),
            SupportedModel::ClaudeOpus41 => Some("claude-opus-4-1-20250805"),
            SupportedModel::ClaudeNext => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SupportedModel::ClaudeSonnet45 => "claude-sonnet-4-5",
            SupportedModel::ClaudeOpus41 => "claude-opus-4-1",
            SupportedModel::ClaudeNext => "claude-next",
        }
    }
}

impl fmt::Display for SupportedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Chat-completion seam. Production uses [`LlmClient`]; tests substitute
/// counting or echoing stubs behind this trait.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Issues one completion with exactly two messages (system + user) and
    /// returns the first text block of the response.
    async fn complete(&self, system: &str, user: &str, model_id: &str)
        -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// The single LLM client used by all flows in MetaTag.
/// Wraps the Anthropic Messages API with retry logic.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Makes a raw call to the Messages API, returning the full response object.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    pub async fn call(
        &self,
        system: &str,
        user: &str,
        model_id: &str,
    ) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: model_id,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: user,
            }],
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                // Try to parse error message
                let message = serde_json::from_str::<AnthropicError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let llm_response: LlmResponse = response.json().await?;

            debug!(
                "LLM call succeeded: input_tokens={}, output_tokens={}",
                llm_response.usage.input_tokens, llm_response.usage.output_tokens
            );

            return Ok(llm_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl ChatCompletion for LlmClient {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        model_id: &str,
    ) -> Result<String, LlmError> {
        let response = self.call(system, user, model_id).await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?;
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_labels_round_trip_through_serde() {
        for model in [
            SupportedModel::ClaudeSonnet45,
            SupportedModel::ClaudeOpus41,
            SupportedModel::ClaudeNext,
        ] {
            let json = serde_json::to_string(&model).unwrap();
            assert_eq!(json, format!("\"{}\"", model.label()));
            let recovered: SupportedModel = serde_json::from_str(&json).unwrap();
            assert_eq!(recovered, model);
        }
    }

    #[test]
    fn test_placeholder_model_has_no_api_id() {
        assert!(SupportedModel::ClaudeNext.api_id().is_none());
        assert!(SupportedModel::ClaudeSonnet45.api_id().is_some());
        assert!(SupportedModel::ClaudeOpus41.api_id().is_some());
    }

    #[test]
    fn test_default_model_is_sonnet() {
        assert_eq!(SupportedModel::default(), SupportedModel::ClaudeSonnet45);
    }

    #[test]
    fn test_unknown_model_label_is_rejected() {
        let result: Result<SupportedModel, _> = serde_json::from_str("\"gpt-4\"");
        assert!(result.is_err());
    }
}
