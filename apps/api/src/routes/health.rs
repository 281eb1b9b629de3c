use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status and whether model drafting is active.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "decline-api",
        "version": env!("CARGO_PKG_VERSION"),
        "ai_enabled": state.config.ai_enabled(),
        "provider": state.config.llm.provider.as_str(),
        "backend": state.drafter.backend(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
