/// LLM Client — the single point of entry for all model-provider calls.
///
/// ARCHITECTURAL RULE: No other module may talk to a provider API directly.
/// Summarizers and drafters only see the `LanguageModel` trait, so the
/// template fallbacks and the tests never need a network.
///
/// No retries: a failed call is reported once
/// and the caller substitutes its template text.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod config;
pub mod prompts;

pub use config::{LlmProvider, LlmSettings};

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM reply had an unexpected shape: {0}")]
    UnexpectedShape(&'static str),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// One prompt/response exchange with the model.
#[derive(Debug, Clone, Copy)]
pub struct Completion<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the provider for a JSON object when it supports a JSON mode.
    pub json: bool,
}

/// The narrow capability every LLM-backed component depends on.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Returns the trimmed text of the model's reply. Never returns an empty string.
    async fn complete(&self, completion: Completion<'_>) -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

/// Both providers wrap failures as `{"error": {"message": ...}}`.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl AnthropicResponse {
    /// Extracts the text content from the first text block.
    fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// HTTP-backed `LanguageModel` for the configured provider.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    provider: LlmProvider,
    api_key: String,
    model: String,
    endpoint: String,
}

impl LlmClient {
    /// Builds a client for `settings`. The credential is passed in explicitly
    /// so the caller decides whether an LLM path exists at all.
    pub fn new(settings: &LlmSettings, api_key: &str) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            provider: settings.provider,
            api_key: api_key.to_string(),
            model: settings.model.clone(),
            endpoint: settings.endpoint.clone(),
        })
    }

    async fn call_anthropic(&self, completion: Completion<'_>) -> Result<String, LlmError> {
        let body = AnthropicRequest {
            model: &self.model,
            max_tokens: completion.max_tokens,
            temperature: completion.temperature,
            system: completion.system,
            messages: vec![ChatMessage {
                role: "user",
                content: completion.prompt,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;

        let reply: AnthropicResponse = response.json().await?;
        if let Some(usage) = &reply.usage {
            debug!(
                "LLM call succeeded: input_tokens={}, output_tokens={}",
                usage.input_tokens, usage.output_tokens
            );
        }

        Ok(reply.text().unwrap_or_default().to_string())
    }

    async fn call_openai(&self, completion: Completion<'_>) -> Result<String, LlmError> {
        let body = OpenAiRequest {
            model: &self.model,
            max_tokens: completion.max_tokens,
            temperature: completion.temperature,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: completion.system,
                },
                ChatMessage {
                    role: "user",
                    content: completion.prompt,
                },
            ],
            response_format: completion.json.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;

        let reply: OpenAiResponse = response.json().await?;
        if let Some(usage) = &reply.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }
}

#[async_trait]
impl LanguageModel for LlmClient {
    async fn complete(&self, completion: Completion<'_>) -> Result<String, LlmError> {
        let text = match self.provider {
            LlmProvider::OpenAi => self.call_openai(completion).await?,
            LlmProvider::Anthropic => self.call_anthropic(completion).await?,
        };
        non_empty(text)
    }
}

/// Maps a non-2xx response to `LlmError::Api`, pulling out the provider's message if it sent one.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);

    Err(LlmError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Trims a reply and rejects it if nothing is left.
pub fn non_empty(text: String) -> Result<String, LlmError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(LlmError::EmptyContent);
    }
    if trimmed.len() == text.len() {
        Ok(text)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Removes a Markdown code fence (optionally tagged `json`) wrapped around a model reply.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(fenced) = text.strip_prefix("```") else {
        return text;
    };
    let body = fenced.strip_prefix("json").unwrap_or(fenced).trim_start();
    body.strip_suffix("```").map(str::trim).unwrap_or(body)
}
