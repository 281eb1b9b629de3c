use std::sync::Arc;

use anyhow::{Context, Result};

use crate::analysis::summarizer::{LlmSummarizer, ProposalSummarizer, TemplateSummarizer};
use crate::config::Config;
use crate::drafting::drafter::{DeclineDrafter, LlmDrafter, TemplateDrafter};
use crate::llm_client::{LanguageModel, LlmClient};

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Template or LLM-backed, chosen once from the configured credential.
    pub summarizer: Arc<dyn ProposalSummarizer>,
    pub drafter: Arc<dyn DeclineDrafter>,
}

impl AppState {
    /// Picks the backends from the config: a credential selects the LLM-backed
    /// pair, no credential selects the template pair.
    pub fn from_config(config: Config) -> Result<Self> {
        match config.llm.credential() {
            Some(api_key) => {
                let client = LlmClient::new(&config.llm, api_key)
                    .context("Failed to build LLM HTTP client")?;
                Ok(Self::with_model(config, Arc::new(client)))
            }
            None => Ok(Self::templates_only(config)),
        }
    }

    /// LLM-backed state around any `LanguageModel`.
    pub fn with_model(config: Config, model: Arc<dyn LanguageModel>) -> Self {
        Self {
            summarizer: Arc::new(LlmSummarizer::new(model.clone(), config.analysis_max_chars)),
            drafter: Arc::new(LlmDrafter::new(model, config.letterhead.clone())),
            config,
        }
    }

    pub fn templates_only(config: Config) -> Self {
        Self {
            summarizer: Arc::new(TemplateSummarizer),
            drafter: Arc::new(TemplateDrafter::new(config.letterhead.clone())),
            config,
        }
    }
}
