//! Decline drafters — produce the internal rationale and external letter.
//!
//! `TemplateDrafter` interpolates fixed templates. `LlmDrafter` issues two
//! independent model calls; each one degrades to its own template on failure,
//! so one bad call never costs the other document.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::config::Letterhead;
use crate::drafting::prompts::{
    EXTERNAL_LETTER_PROMPT_TEMPLATE, EXTERNAL_LETTER_SYSTEM, INTERNAL_MEMO_PROMPT_TEMPLATE,
    INTERNAL_MEMO_SYSTEM,
};
use crate::drafting::templates;
use crate::llm_client::prompts::FACTUAL_INSTRUCTION;
use crate::llm_client::{Completion, LanguageModel, LlmError};
use crate::models::decline::DeclineRequest;
use crate::models::summary::non_blank;

const MEMO_TEMPERATURE: f32 = 0.3;
const LETTER_TEMPERATURE: f32 = 0.4;
const DRAFT_MAX_TOKENS: u32 = 400;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Where one generated document came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Drafted {
    /// Written by the model.
    Model(String),
    /// Template text because no model is configured.
    Template(String),
    /// Template text because the model call failed.
    Fallback { text: String, cause: String },
}

impl Drafted {
    #[cfg(test)]
    pub fn text(&self) -> &str {
        match self {
            Drafted::Model(text) | Drafted::Template(text) => text,
            Drafted::Fallback { text, .. } => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Drafted::Model(text) | Drafted::Template(text) => text,
            Drafted::Fallback { text, .. } => text,
        }
    }

    pub fn cause(&self) -> Option<&str> {
        match self {
            Drafted::Fallback { cause, .. } => Some(cause),
            Drafted::Model(_) | Drafted::Template(_) => None,
        }
    }
}

/// Both documents for one decline request.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub internal_rationale: Drafted,
    pub external_reply: Drafted,
}

impl Draft {
    /// Human-readable note of which documents fell back and why.
    pub fn diagnostics(&self) -> Option<String> {
        let notes: Vec<String> = [
            ("internal_rationale", &self.internal_rationale),
            ("external_reply", &self.external_reply),
        ]
        .into_iter()
        .filter_map(|(name, drafted)| drafted.cause().map(|cause| format!("{name}: {cause}")))
        .collect();

        (!notes.is_empty()).then(|| notes.join("; "))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap drafting backends without touching the handler.
#[async_trait]
pub trait DeclineDrafter: Send + Sync {
    /// Never fails; both documents are always non-empty.
    async fn draft(&self, request: &DeclineRequest) -> Draft;

    /// "template" | "llm" — for logs and the health endpoint.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// TemplateDrafter
// ────────────────────────────────────────────────────────────────────────────

pub struct TemplateDrafter {
    letterhead: Letterhead,
}

impl TemplateDrafter {
    pub fn new(letterhead: Letterhead) -> Self {
        Self { letterhead }
    }
}

#[async_trait]
impl DeclineDrafter for TemplateDrafter {
    async fn draft(&self, request: &DeclineRequest) -> Draft {
        Draft {
            internal_rationale: Drafted::Template(template_memo(request)),
            external_reply: Drafted::Template(template_letter(request, &self.letterhead)),
        }
    }

    fn backend(&self) -> &'static str {
        "template"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LlmDrafter
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmDrafter {
    model: Arc<dyn LanguageModel>,
    letterhead: Letterhead,
}

impl LlmDrafter {
    pub fn new(model: Arc<dyn LanguageModel>, letterhead: Letterhead) -> Self {
        Self { model, letterhead }
    }

    async fn model_memo(&self, request: &DeclineRequest) -> Result<String, LlmError> {
        let label = request.reason_label();
        let summary_json = serde_json::to_string_pretty(&request.proposal_summary)?;
        let justification = match request.justification() {
            "" => "(none given)",
            text => text,
        };

        let system = INTERNAL_MEMO_SYSTEM.replace("{foundation}", &self.letterhead.foundation_name);
        let prompt = INTERNAL_MEMO_PROMPT_TEMPLATE
            .replace("{factual_instruction}", FACTUAL_INSTRUCTION)
            .replace("{summary_json}", &summary_json)
            .replace("{reason_label_lower}", &label.to_lowercase())
            .replace("{reason_label}", label)
            .replace("{specific_reasons}", justification);

        let memo = self
            .model
            .complete(Completion {
                system: &system,
                prompt: &prompt,
                temperature: MEMO_TEMPERATURE,
                max_tokens: DRAFT_MAX_TOKENS,
                json: false,
            })
            .await?;

        Ok(ensure_rationale_line(&memo, label))
    }

    async fn model_letter(&self, request: &DeclineRequest) -> Result<String, LlmError> {
        let organization = addressee(request);
        let system =
            EXTERNAL_LETTER_SYSTEM.replace("{foundation}", &self.letterhead.foundation_name);
        let prompt = EXTERNAL_LETTER_PROMPT_TEMPLATE
            .replace("{foundation}", &self.letterhead.foundation_name)
            .replace("{signoff}", &self.letterhead.signoff)
            .replace("{organization}", organization);

        self.model
            .complete(Completion {
                system: &system,
                prompt: &prompt,
                temperature: LETTER_TEMPERATURE,
                max_tokens: DRAFT_MAX_TOKENS,
                json: false,
            })
            .await
    }
}

#[async_trait]
impl DeclineDrafter for LlmDrafter {
    async fn draft(&self, request: &DeclineRequest) -> Draft {
        let (memo, letter) = tokio::join!(self.model_memo(request), self.model_letter(request));

        let internal_rationale = match memo {
            Ok(text) => Drafted::Model(text),
            Err(e) => {
                warn!("Internal rationale LLM call failed, using template: {e}");
                Drafted::Fallback {
                    text: template_memo(request),
                    cause: e.to_string(),
                }
            }
        };

        let external_reply = match letter {
            Ok(text) => Drafted::Model(text),
            Err(e) => {
                warn!("External letter LLM call failed, using template: {e}");
                Drafted::Fallback {
                    text: template_letter(request, &self.letterhead),
                    cause: e.to_string(),
                }
            }
        };

        Draft {
            internal_rationale,
            external_reply,
        }
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn template_memo(request: &DeclineRequest) -> String {
    templates::internal_rationale(
        &request.proposal_summary,
        request.reason_label(),
        request.justification(),
    )
}

fn template_letter(request: &DeclineRequest, letterhead: &Letterhead) -> String {
    templates::external_letter(non_blank(&request.proposal_summary.organization_name), letterhead)
}

fn addressee(request: &DeclineRequest) -> &str {
    non_blank(&request.proposal_summary.organization_name).unwrap_or(templates::DEFAULT_ADDRESSEE)
}

/// Makes the memo end with exactly `Rationale: <label>`. The model's own
/// rationale line and anything it wrote after it (a signature, a note) are dropped.
fn ensure_rationale_line(memo: &str, label: &str) -> String {
    let lines: Vec<&str> = memo.lines().collect();
    let end = lines
        .iter()
        .rposition(|line| is_rationale_line(line))
        .unwrap_or(lines.len());
    let body = lines[..end].join("\n");
    let body = body.trim_end();

    if body.is_empty() {
        format!("Rationale: {label}")
    } else {
        format!("{body}\n\nRationale: {label}")
    }
}

/// `Rationale:` with or without Markdown emphasis or heading marks.
fn is_rationale_line(line: &str) -> bool {
    line.trim()
        .trim_start_matches(['*', '_', '#'])
        .trim_start()
        .starts_with("Rationale:")
}
