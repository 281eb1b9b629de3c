//! Axum route handlers for the Generate operation and the reason picker.

use std::time::Instant;

use axum::{extract::State, Json};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::models::decline::{DeclineRequest, GeneratedOutput};
use crate::models::reason::{reason_options, ReasonOption};
use crate::errors::AppJson;
use crate::state::AppState;

/// POST /generate
///
/// Always answers 200 with both documents. Per-document model failures are
/// summarized in `error`; the affected document is template text.
pub async fn handle_generate(
    State(state): State<AppState>,
    AppJson(request): AppJson<DeclineRequest>,
) -> Json<GeneratedOutput> {
    let session_id = request
        .session_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let span = info_span!("generate", %session_id, reason_code = %request.reason_code);

    async move {
        let started = Instant::now();
        let draft = state.drafter.draft(&request).await;
        let generation_time_ms = started.elapsed().as_millis() as u64;
        let error = draft.diagnostics();

        info!(
            backend = state.drafter.backend(),
            fallback = error.is_some(),
            "Generated decline documents for {:?} in {generation_time_ms}ms",
            request.proposal_summary.organization_name
        );

        Json(GeneratedOutput {
            internal_rationale: draft.internal_rationale.into_text(),
            external_reply: draft.external_reply.into_text(),
            generation_time_ms,
            error,
        })
    }
    .instrument(span)
    .await
}

/// GET /reason-codes
///
/// The closed set of decline reasons, in picker order.
pub async fn handle_reason_codes() -> Json<Vec<ReasonOption>> {
    Json(reason_options())
}
