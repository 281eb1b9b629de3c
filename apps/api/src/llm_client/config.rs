//! LLM provider settings, resolved once at startup by `Config::from_env`.

use std::fmt;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";

const DEFAULT_OPENAI_MODEL: &str = "gpt-4-turbo-preview";
const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-opus-20240229";

/// Which hosted API the drafting calls go to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LlmProvider {
    /// OpenAI chat completions (or any compatible proxy)
    #[default]
    OpenAi,
    /// Anthropic messages API
    Anthropic,
}

impl LlmProvider {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "openai" => Some(Self::OpenAi),
            "anthropic" | "claude" => Some(Self::Anthropic),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn key_var(&self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Self::OpenAi => OPENAI_API_URL,
            Self::Anthropic => ANTHROPIC_API_URL,
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAi => DEFAULT_OPENAI_MODEL,
            Self::Anthropic => DEFAULT_ANTHROPIC_MODEL,
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection settings for the model provider.
///
/// `api_key` is `None` when no credential is configured; in that case the
/// service runs in template mode and no `LlmClient` is ever built.
#[derive(Clone, PartialEq)]
pub struct LlmSettings {
    pub provider: LlmProvider,
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl LlmSettings {
    /// The configured credential, if it is present and non-blank.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

// Hand-written so the key never ends up in logs.
impl fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmSettings")
            .field("provider", &self.provider)
            .field("api_key", &self.credential().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
