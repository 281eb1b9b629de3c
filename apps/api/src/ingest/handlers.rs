//! Axum route handler for proposal uploads.

use std::time::Instant;

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::ingest::extract::{extract_text, proposal_hash, DocumentKind};
use crate::state::AppState;
use crate::text::{clean_extracted_text, word_count};

const FILE_FIELD: &str = "file";

/// What the wizard keeps in session state after an upload.
#[derive(Debug, Serialize)]
pub struct UploadedFile {
    pub proposal_hash: String,
    pub text_content: String,
    pub filename: String,
    pub size: usize,
    pub word_count: usize,
    pub extraction_time_ms: u64,
}

/// POST /upload
///
/// Multipart form with a single `file` field (PDF, .docx or plain text).
/// Unlike analyze/generate this endpoint reports failures via HTTP status,
/// and the client blocks the wizard with a retry prompt.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadedFile>, AppError> {
    let started = Instant::now();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("proposal").to_string();
        let kind = DocumentKind::detect(field.content_type(), Some(&filename))?;
        let content = field.bytes().await.map_err(multipart_error)?;

        if content.len() > state.config.max_upload_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "File too large. Maximum size is {} bytes.",
                state.config.max_upload_bytes
            )));
        }

        let size = content.len();
        let hash = proposal_hash(&content);
        let text_content = clean_extracted_text(&extract_text(kind, content).await?);
        let word_count = word_count(&text_content);
        let extraction_time_ms = started.elapsed().as_millis() as u64;

        info!(
            proposal_hash = %hash,
            "Extracted {word_count} words from {filename} ({size} bytes) in {extraction_time_ms}ms"
        );

        return Ok(Json(UploadedFile {
            proposal_hash: hash,
            text_content,
            filename,
            size,
            word_count,
            extraction_time_ms,
        }));
    }

    Err(AppError::Validation(format!(
        "Missing multipart field '{FILE_FIELD}'"
    )))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(e.body_text())
    }
}
