//! Axum route handler for the Analyze operation.

use std::time::Instant;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::summary::ProposalSummary;
use crate::errors::AppJson;
use crate::state::AppState;
use crate::text::truncate_chars;

const PREVIEW_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text_content: String,
    #[serde(default)]
    pub filename: Option<String>,
    /// Fingerprint returned by `/upload`; only used to correlate logs.
    #[serde(default)]
    pub proposal_hash: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub summary: ProposalSummary,
    pub analysis_time_ms: u64,
    pub extracted_text_preview: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// POST /analyze
///
/// Always answers 200. Model failures are reported in `error` and the
/// summary comes from a fallback path instead.
pub async fn handle_analyze(
    State(state): State<AppState>,
    AppJson(request): AppJson<AnalyzeRequest>,
) -> Json<AnalyzeResponse> {
    let started = Instant::now();

    let filename = request
        .filename
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());
    let result = state
        .summarizer
        .summarize(&request.text_content, filename)
        .await;

    let analysis_time_ms = started.elapsed().as_millis() as u64;
    info!(
        proposal_hash = request.proposal_hash.as_deref().unwrap_or("-"),
        backend = state.summarizer.backend(),
        fallback = result.error.is_some(),
        "Analyzed proposal for {:?} in {analysis_time_ms}ms",
        result.summary.organization_name
    );

    Json(AnalyzeResponse {
        summary: result.summary,
        analysis_time_ms,
        extracted_text_preview: truncate_chars(&request.text_content, PREVIEW_CHARS).to_string(),
        error: result.error,
    })
}
