//! File -> plain text.

use std::io::{Cursor, Read};

use bytes::Bytes;
use quick_xml::events::Event;
use quick_xml::Reader;
use sha2::{Digest, Sha256};
use zip::ZipArchive;

use crate::errors::AppError;

/// Hex characters of the SHA-256 kept as the proposal fingerprint.
const HASH_PREFIX_LEN: usize = 12;

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Main story of a .docx package; headers, footers and comments live elsewhere.
const DOCX_BODY_PART: &str = "word/document.xml";

/// Document formats the service can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Word,
    PlainText,
}

impl DocumentKind {
    /// Classifies an upload by its declared content type, falling back to the
    /// filename extension when the browser sent a generic type.
    pub fn detect(content_type: Option<&str>, filename: Option<&str>) -> Result<Self, AppError> {
        let mime = content_type
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_lowercase())
            .unwrap_or_default();

        match mime.as_str() {
            "application/pdf" => return Ok(Self::Pdf),
            DOCX_MIME => return Ok(Self::Word),
            "text/plain" | "text/markdown" => return Ok(Self::PlainText),
            _ => {}
        }

        let extension = filename
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_lowercase());

        match extension.as_deref() {
            Some("pdf") => Ok(Self::Pdf),
            Some("docx") => Ok(Self::Word),
            Some("txt") | Some("md") => Ok(Self::PlainText),
            Some("doc") => Err(AppError::UnsupportedMediaType(
                "Legacy .doc files are not supported. Please save the proposal as .docx or PDF."
                    .to_string(),
            )),
            _ => Err(AppError::UnsupportedMediaType(format!(
                "Unsupported file type: {}. Only PDF and Word documents are allowed.",
                if mime.is_empty() { "unknown" } else { mime.as_str() }
            ))),
        }
    }
}

/// Extracts raw text. PDF and Word parsing is CPU-bound and runs on the blocking pool.
pub async fn extract_text(kind: DocumentKind, content: Bytes) -> Result<String, AppError> {
    match kind {
        DocumentKind::PlainText => Ok(String::from_utf8_lossy(&content).into_owned()),
        DocumentKind::Pdf => {
            on_blocking_pool(move || {
                pdf_extract::extract_text_from_mem(&content).map_err(|e| {
                    AppError::Extraction(format!("PDF text extraction failed: {e:?}"))
                })
            })
            .await
        }
        DocumentKind::Word => on_blocking_pool(move || docx_text(&content)).await,
    }
}

async fn on_blocking_pool<F>(parse: F) -> Result<String, AppError>
where
    F: FnOnce() -> Result<String, AppError> + Send + 'static,
{
    tokio::task::spawn_blocking(parse)
        .await
        // A panic inside a parser surfaces as a JoinError.
        .map_err(|e| AppError::Extraction(format!("document parser aborted: {e}")))?
}

/// Text of a .docx body: one line per non-blank paragraph, in document
/// order. Table cells are paragraphs too, so their text comes along.
fn docx_text(content: &[u8]) -> Result<String, AppError> {
    let mut archive = ZipArchive::new(Cursor::new(content))
        .map_err(|e| AppError::Extraction(format!("Word document is not a valid package: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY_PART)
        .map_err(|e| AppError::Extraction(format!("Word document has no {DOCX_BODY_PART}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| AppError::Extraction(format!("Word document body unreadable: {e}")))?;

    paragraphs_from_document_xml(&xml)
        .map(|paragraphs| paragraphs.join("\n"))
        .map_err(|e| AppError::Extraction(format!("Word document XML is malformed: {e}")))
}

fn paragraphs_from_document_xml(xml: &str) -> Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => {
                    if !current.trim().is_empty() {
                        paragraphs.push(current.trim_end().to_string());
                    }
                    current.clear();
                }
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" | b"w:cr" => current.push('\n'),
                _ => {}
            },
            Event::Text(text) if in_text_run => current.push_str(&text.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

/// Short content fingerprint: the first 12 hex characters of the SHA-256.
pub fn proposal_hash(content: &[u8]) -> String {
    let digest = hex::encode(Sha256::digest(content));
    digest[..HASH_PREFIX_LEN].to_string()
}
