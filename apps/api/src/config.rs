use anyhow::{anyhow, Context, Result};

use crate::llm_client::{LlmProvider, LlmSettings};

/// Who the letters are from. Constant for a deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct Letterhead {
    pub foundation_name: String,
    pub signoff: String,
}

/// Application configuration loaded from environment variables.
///
/// A missing model credential is not an error: it selects template mode.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmSettings,
    /// Characters of proposal text sent to the model for analysis.
    pub analysis_max_chars: usize,
    pub max_upload_bytes: usize,
    pub letterhead: Letterhead,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let provider = match var("LLM_PROVIDER") {
            Some(name) => LlmProvider::from_name(&name).ok_or_else(|| {
                anyhow!("LLM_PROVIDER must be 'openai' or 'anthropic', got '{name}'")
            })?,
            None => LlmProvider::default(),
        };

        let llm = LlmSettings {
            provider,
            api_key: var(provider.key_var()),
            model: var("LLM_MODEL").unwrap_or_else(|| provider.default_model().to_string()),
            endpoint: var("LLM_ENDPOINT")
                .unwrap_or_else(|| provider.default_endpoint().to_string()),
            timeout_secs: parse_or(&var, "LLM_TIMEOUT_SECS", 60)?,
        };

        Ok(Config {
            llm,
            analysis_max_chars: parse_or(&var, "ANALYSIS_MAX_CHARS", 8000)?,
            max_upload_bytes: parse_or(&var, "MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            letterhead: Letterhead {
                foundation_name: var("FOUNDATION_NAME")
                    .unwrap_or_else(|| "The Community Trust".to_string()),
                signoff: var("LETTER_SIGNOFF").unwrap_or_else(|| "The Program Team".to_string()),
            },
            port: parse_or(&var, "PORT", 8000)?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// True when a model credential is configured.
    pub fn ai_enabled(&self) -> bool {
        self.llm.credential().is_some()
    }
}

fn parse_or<T>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
