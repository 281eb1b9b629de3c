use serde::{Deserialize, Serialize};

use crate::models::reason::label_for_code;
use crate::models::summary::{deserialize_lenient, ProposalSummary};
use crate::text::truncate_chars;

/// Upper bound on the reviewer's free-text justification.
pub const MAX_SPECIFIC_REASONS_CHARS: usize = 2000;

/// Input to the generate operation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeclineRequest {
    #[serde(default)]
    pub reason_code: String,
    #[serde(default)]
    pub specific_reasons: String,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub proposal_summary: ProposalSummary,
    /// Correlation id for logs only; generated when the client sends none.
    #[serde(default)]
    pub session_id: Option<String>,
}

impl DeclineRequest {
    pub fn reason_label(&self) -> &'static str {
        label_for_code(&self.reason_code)
    }

    /// The justification, trimmed and cut to [`MAX_SPECIFIC_REASONS_CHARS`].
    pub fn justification(&self) -> &str {
        truncate_chars(self.specific_reasons.trim(), MAX_SPECIFIC_REASONS_CHARS).trim_end()
    }
}

/// Response body of the generate operation.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedOutput {
    pub internal_rationale: String,
    pub external_reply: String,
    /// Wall-clock time spent drafting. Informational only.
    pub generation_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default() {
        let request: DeclineRequest = serde_json::from_str(r#"{"reason_code": "sustainability"}"#).unwrap();
        assert_eq!(request.reason_label(), "Sustainability Concerns");
        assert_eq!(request.justification(), "");
        assert_eq!(request.proposal_summary, ProposalSummary::default());
        assert!(request.session_id.is_none());
    }

    #[test]
    fn test_summary_accepts_loose_types() {
        let request: DeclineRequest = serde_json::from_str(
            r#"{
                "reason_code": "sustainability",
                "proposal_summary": {
                    "organizationName": "Acme Org",
                    "foundingYear": 2020,
                    "keyDeliverables": "clothing drive",
                    "peopleServed": null
                }
            }"#,
        )
        .unwrap();
        let summary = request.proposal_summary;
        assert_eq!(summary.founding_year.as_deref(), Some("2020"));
        assert_eq!(summary.key_deliverables, Some(vec!["clothing drive".to_string()]));
        assert!(summary.people_served.is_none());

        let request: DeclineRequest =
            serde_json::from_str(r#"{"proposal_summary": "not an object"}"#).unwrap();
        assert_eq!(request.proposal_summary, ProposalSummary::default());
    }

    #[test]
    fn test_justification_is_bounded() {
        let request = DeclineRequest {
            specific_reasons: format!("  {}  ", "x".repeat(MAX_SPECIFIC_REASONS_CHARS + 50)),
            ..Default::default()
        };
        assert_eq!(
            request.justification().chars().count(),
            MAX_SPECIFIC_REASONS_CHARS
        );
    }

    #[test]
    fn test_error_is_omitted_when_absent() {
        let output = GeneratedOutput {
            internal_rationale: "memo".to_string(),
            external_reply: "letter".to_string(),
            generation_time_ms: 3,
            error: None,
        };
        let value = serde_json::to_value(&output).unwrap();
        assert!(value.get("error").is_none());
        assert_eq!(value["generation_time_ms"], 3);
    }
}
