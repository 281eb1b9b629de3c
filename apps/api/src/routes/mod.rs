pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, Method,
    },
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::analysis::handlers::handle_analyze;
use crate::drafting::handlers::{handle_generate, handle_reason_codes};
use crate::ingest::handlers::handle_upload;
use crate::state::AppState;

/// Headroom above the file limit for multipart boundaries and part headers.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/reason-codes", get(handle_reason_codes))
        .route("/analyze", post(handle_analyze))
        .route("/generate", post(handle_generate))
        .route("/upload", post(handle_upload))
        .layer(
            ServiceBuilder::new()
                .layer(cors_layer())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

/// The wizard is served from a different origin than the API.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::ingest::extract::testing::{docx_with_body, ACME_BODY};
    use crate::llm_client::testing::ScriptedModel;

    const BOUNDARY: &str = "decline-test-boundary";

    fn template_app() -> Router {
        let config = Config::from_vars(|_| None).unwrap();
        build_router(AppState::templates_only(config))
    }

    fn app_with_upload_limit(limit: usize) -> Router {
        let config = Config::from_vars(|key| {
            (key == "MAX_UPLOAD_BYTES").then(|| limit.to_string())
        })
        .unwrap();
        build_router(AppState::templates_only(config))
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        read_json(response).await
    }

    async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn multipart_request(field: &str, filename: &str, content_type: &str, content: &[u8]) -> Request<Body> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/upload")
            .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap()
    }

    fn acme_request(reason_code: &str) -> Value {
        json!({
            "reason_code": reason_code,
            "specific_reasons": "No plan to sustain funding after grant period.",
            "proposal_summary": {
                "organizationName": "Acme Org",
                "grantAmount": "$20,000",
                "projectDescription": "clothing drive"
            }
        })
    }

    #[tokio::test]
    async fn test_health_reports_template_mode() {
        let response = template_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let (status, body) = read_json(response).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["ai_enabled"], false);
        assert_eq!(body["backend"], "template");
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_any_origin() {
        let response = template_app()
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/generate")
                    .header("origin", "https://wizard.example.org")
                    .header("access-control-request-method", "POST")
                    .header("access-control-request-headers", "content-type,apikey")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
    }

    #[tokio::test]
    async fn test_reason_codes_lists_all_reasons() {
        let response = template_app()
            .oneshot(Request::builder().uri("/reason-codes").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let (status, body) = read_json(response).await;

        assert_eq!(status, StatusCode::OK);
        let options = body.as_array().unwrap();
        assert_eq!(options.len(), 8);
        assert_eq!(options[7]["value"], "sustainability");
        assert_eq!(options[7]["label"], "Sustainability Concerns");
    }

    #[tokio::test]
    async fn test_analyze_without_credential_uses_text_heuristics() {
        let (status, body) = post_json(
            template_app(),
            "/analyze",
            json!({ "text_content": "Organization: Test Org\nFounded: 2020\nGrant Request: $50,000" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"]["organizationName"], "Organization");
        assert_eq!(body["summary"]["grantAmount"], "$50,000");
        assert_eq!(body["summary"]["foundingYear"], "2020");
        assert!(body.get("error").is_none());
        assert!(body["analysis_time_ms"].is_u64());
    }

    #[tokio::test]
    async fn test_analyze_model_failure_still_answers_ok() {
        let config = Config::from_vars(|_| None).unwrap();
        let state = AppState::with_model(config, Arc::new(ScriptedModel::failing()));

        let (status, body) = post_json(
            build_router(state),
            "/analyze",
            json!({ "text_content": "We request $12,500.", "filename": "harbor-arts.pdf" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"]["grantAmount"], "$12,500");
        assert!(body["error"].as_str().unwrap().contains("rate limited"));
    }

    #[tokio::test]
    async fn test_generate_sustainability_template() {
        let (status, body) = post_json(template_app(), "/generate", acme_request("sustainability")).await;

        assert_eq!(status, StatusCode::OK);
        let rationale = body["internal_rationale"].as_str().unwrap();
        assert!(rationale.starts_with("Acme Org"));
        assert!(rationale.contains("$20,000"));
        assert!(rationale.contains("No plan to sustain funding after grant period."));
        assert!(rationale.ends_with("\nRationale: Sustainability Concerns"));

        let letter = body["external_reply"].as_str().unwrap();
        assert!(letter.starts_with("Dear Acme Org,"));
        assert!(!letter.contains("sustain"));
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_generate_unknown_reason_code_is_not_an_error() {
        let (status, body) = post_json(template_app(), "/generate", acme_request("not_a_real_code")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["internal_rationale"]
            .as_str()
            .unwrap()
            .ends_with("Rationale: the specified reason"));
    }

    #[tokio::test]
    async fn test_generate_accepts_loosely_typed_summary() {
        let (status, body) = post_json(
            template_app(),
            "/generate",
            json!({
                "reason_code": "sustainability",
                "specific_reasons": "",
                "proposal_summary": {
                    "organizationName": "Acme Org",
                    "foundingYear": 2020,
                    "keyDeliverables": "clothing drive"
                }
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let rationale = body["internal_rationale"].as_str().unwrap();
        assert!(rationale.starts_with("Acme Org, founded in 2020,"));
        assert!(rationale.ends_with("Rationale: Sustainability Concerns"));
        assert!(!body["external_reply"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_json_body_uses_error_envelope() {
        let response = template_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/generate")
                    .header("content-type", "application/json")
                    .body(Body::from("{\"reason_code\": "))
                    .unwrap(),
            )
            .await
            .unwrap();
        let (status, body) = read_json(response).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(!body["error"]["message"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_json_body_without_content_type_is_unsupported() {
        let response = template_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/analyze")
                    .body(Body::from(r#"{"text_content": "Acme"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        let (status, body) = read_json(response).await;

        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"]["code"], "UNSUPPORTED_MEDIA_TYPE");
    }

    #[tokio::test]
    async fn test_generate_model_failure_falls_back_per_document() {
        let config = Config::from_vars(|_| None).unwrap();
        let model = Arc::new(ScriptedModel::failing());
        let state = AppState::with_model(config, model.clone());

        let (status, body) = post_json(build_router(state), "/generate", acme_request("sustainability")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(model.calls(), 2);
        assert!(body["internal_rationale"]
            .as_str()
            .unwrap()
            .ends_with("Rationale: Sustainability Concerns"));
        assert!(body["external_reply"].as_str().unwrap().starts_with("Dear Acme Org,"));

        let error = body["error"].as_str().unwrap();
        assert!(error.contains("internal_rationale"));
        assert!(error.contains("external_reply"));
    }

    #[tokio::test]
    async fn test_upload_plain_text() {
        let response = template_app()
            .oneshot(multipart_request(
                "file",
                "acme.txt",
                "text/plain",
                b"Acme Org\n\n==========\nWe request   $20,000 for a clothing drive.\n",
            ))
            .await
            .unwrap();
        let (status, body) = read_json(response).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["filename"], "acme.txt");
        assert_eq!(
            body["text_content"],
            "Acme Org\nWe request $20,000 for a clothing drive."
        );
        assert_eq!(body["word_count"], 9);
        assert_eq!(body["proposal_hash"].as_str().unwrap().len(), 12);
    }

    #[tokio::test]
    async fn test_upload_word_document() {
        let docx = docx_with_body(ACME_BODY);
        let response = template_app()
            .oneshot(multipart_request(
                "file",
                "acme.docx",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                &docx,
            ))
            .await
            .unwrap();
        let (status, body) = read_json(response).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["filename"], "acme.docx");
        assert_eq!(body["size"], docx.len());
        assert_eq!(
            body["text_content"],
            "Acme Org\nFounded in 2020 & growing\nBudget\n$50,000"
        );
    }

    #[tokio::test]
    async fn test_upload_rejects_oversized_file() {
        let response = app_with_upload_limit(16)
            .oneshot(multipart_request("file", "big.txt", "text/plain", &[b'a'; 64]))
            .await
            .unwrap();
        let (status, body) = read_json(response).await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
    }

    #[tokio::test]
    async fn test_upload_rejects_unsupported_type() {
        let response = template_app()
            .oneshot(multipart_request("file", "scan.png", "image/png", b"\x89PNG"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_upload_requires_file_field() {
        let response = template_app()
            .oneshot(multipart_request("attachment", "acme.txt", "text/plain", b"Acme"))
            .await
            .unwrap();
        let (status, body) = read_json(response).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
