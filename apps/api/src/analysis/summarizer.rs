//! Proposal summarizers — pluggable, trait-based extraction of a `ProposalSummary`.
//!
//! `TemplateSummarizer` is pure pattern matching and needs no credential.
//! `LlmSummarizer` asks the model and falls back to the template path on any failure.
//!
//! `AppState` holds an `Arc<dyn ProposalSummarizer>`, chosen once at startup.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::analysis::fallback::{fallback_summary, partial_summary};
use crate::analysis::prompts::{EXTRACTION_PROMPT_TEMPLATE, EXTRACTION_SYSTEM};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{strip_json_fences, Completion, LanguageModel, LlmError};
use crate::models::summary::ProposalSummary;
use crate::text::truncate_chars;

const EXTRACTION_TEMPERATURE: f32 = 0.1;
const EXTRACTION_MAX_TOKENS: u32 = 1500;

/// A summary plus, when a fallback was taken after a model failure, why.
#[derive(Debug, Clone, PartialEq)]
pub struct Summarized {
    pub summary: ProposalSummary,
    pub error: Option<String>,
}

impl Summarized {
    fn clean(summary: ProposalSummary) -> Self {
        Self {
            summary,
            error: None,
        }
    }
}

/// Implement this to swap extraction backends without touching the handler.
#[async_trait]
pub trait ProposalSummarizer: Send + Sync {
    /// Never fails: every error path resolves to a fallback summary.
    async fn summarize(&self, text: &str, filename: Option<&str>) -> Summarized;

    /// "template" | "llm" — for logs and the health endpoint.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// TemplateSummarizer
// ────────────────────────────────────────────────────────────────────────────

/// Deterministic summarizer used when no model credential is configured.
pub struct TemplateSummarizer;

#[async_trait]
impl ProposalSummarizer for TemplateSummarizer {
    async fn summarize(&self, text: &str, filename: Option<&str>) -> Summarized {
        Summarized::clean(fallback_summary(text, filename))
    }

    fn backend(&self) -> &'static str {
        "template"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LlmSummarizer
// ────────────────────────────────────────────────────────────────────────────

/// Model-backed summarizer.
///
/// Fallback order:
/// 1. reply parses as a JSON object → mapped summary
/// 2. reply arrives but is not a JSON object → `partial_summary` of the reply
/// 3. call fails → `fallback_summary` of the input text
pub struct LlmSummarizer {
    model: Arc<dyn LanguageModel>,
    max_chars: usize,
    system: String,
}

impl LlmSummarizer {
    pub fn new(model: Arc<dyn LanguageModel>, max_chars: usize) -> Self {
        Self {
            model,
            max_chars,
            system: format!("{EXTRACTION_SYSTEM} {JSON_ONLY_SYSTEM}"),
        }
    }
}

#[async_trait]
impl ProposalSummarizer for LlmSummarizer {
    async fn summarize(&self, text: &str, filename: Option<&str>) -> Summarized {
        let excerpt = truncate_chars(text.trim(), self.max_chars);
        if excerpt.is_empty() {
            // Nothing to extract from; the template summary says so.
            return Summarized::clean(fallback_summary(text, filename));
        }

        let prompt = EXTRACTION_PROMPT_TEMPLATE.replace("{proposal_text}", excerpt);
        let completion = Completion {
            system: &self.system,
            prompt: &prompt,
            temperature: EXTRACTION_TEMPERATURE,
            max_tokens: EXTRACTION_MAX_TOKENS,
            json: true,
        };

        let reply = match self.model.complete(completion).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Analysis LLM call failed, using template summary: {e}");
                return Summarized {
                    summary: fallback_summary(text, filename),
                    error: Some(format!("analysis model call failed: {e}")),
                };
            }
        };

        match parse_summary_reply(&reply) {
            Ok(summary) => {
                debug!("Analysis reply parsed for {:?}", summary.organization_name);
                Summarized::clean(summary)
            }
            Err(e) => {
                warn!("Analysis reply was not a JSON summary, keeping a partial summary: {e}");
                Summarized {
                    summary: partial_summary(&reply),
                    error: Some(format!("analysis reply could not be parsed: {e}")),
                }
            }
        }
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}

fn parse_summary_reply(reply: &str) -> Result<ProposalSummary, LlmError> {
    let value: Value = serde_json::from_str(strip_json_fences(reply))?;
    ProposalSummary::from_model_json(&value)
        .ok_or(LlmError::UnexpectedShape("expected a JSON object"))
}
