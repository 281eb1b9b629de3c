//! Deterministic summaries used when no model is configured or the model fails.
//!
//! Everything here is best-effort pattern matching over raw text. Same input,
//! same output; nothing reads the clock or a random source.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::summary::ProposalSummary;
use crate::text::truncate_chars;

pub const GENERIC_ORGANIZATION: &str = "Organization";
pub const AMOUNT_PLACEHOLDER: &str = "Amount not specified";
pub const UNKNOWN_AMOUNT: &str = "Unknown";
pub const GENERIC_POPULATION: &str = "Community members";
pub const GENERIC_SCOPE: &str = "Not specified";
pub const NO_TEXT_DESCRIPTION: &str = "No proposal text was provided";

/// Characters of proposal text kept as the fallback project description.
const DESCRIPTION_CHARS: usize = 500;
/// Characters of an unparseable model reply kept as the project description.
const PARTIAL_REPLY_CHARS: usize = 200;

static AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\d[\d,]*(?:\.\d{2})?").expect("amount pattern is valid"));

static FOUNDING_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:founded|established|since)(?:\s+in)?\s*:?\s*(\d{4})\b")
        .expect("founding year pattern is valid")
});

/// Summary built from the proposal text and filename alone.
pub fn fallback_summary(text: &str, filename: Option<&str>) -> ProposalSummary {
    let description = truncate_chars(text.trim(), DESCRIPTION_CHARS).trim_end();

    ProposalSummary {
        organization_name: Some(
            filename
                .and_then(organization_from_filename)
                .unwrap_or_else(|| GENERIC_ORGANIZATION.to_string()),
        ),
        founding_year: founding_year(text),
        grant_amount: Some(
            grant_amount(text).unwrap_or_else(|| AMOUNT_PLACEHOLDER.to_string()),
        ),
        project_description: Some(if description.is_empty() {
            NO_TEXT_DESCRIPTION.to_string()
        } else {
            description.to_string()
        }),
        target_population: Some(GENERIC_POPULATION.to_string()),
        geographic_scope: Some(GENERIC_SCOPE.to_string()),
        ..Default::default()
    }
}

/// Summary salvaged from a model reply that was not valid JSON.
pub fn partial_summary(reply: &str) -> ProposalSummary {
    let excerpt = truncate_chars(reply.trim(), PARTIAL_REPLY_CHARS).trim_end();

    ProposalSummary {
        organization_name: Some(GENERIC_ORGANIZATION.to_string()),
        grant_amount: Some(UNKNOWN_AMOUNT.to_string()),
        project_description: (!excerpt.is_empty()).then(|| excerpt.to_string()),
        target_population: Some(GENERIC_POPULATION.to_string()),
        geographic_scope: Some(GENERIC_SCOPE.to_string()),
        ..Default::default()
    }
}

/// First `$`-prefixed amount in the text, e.g. `$50,000` or `$1,250.00`.
pub fn grant_amount(text: &str) -> Option<String> {
    AMOUNT.find(text).map(|m| m.as_str().to_string())
}

pub fn founding_year(text: &str) -> Option<String> {
    FOUNDING_YEAR
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|year| year.as_str().to_string())
}

/// Turns an upload filename into a display name:
/// `C:\fakepath\Acme_Org-proposal.pdf` becomes `Acme Org proposal`.
pub fn organization_from_filename(filename: &str) -> Option<String> {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let stem = match base.rsplit_once('.') {
        Some((stem, _extension)) => stem,
        None => base,
    };

    let words: Vec<&str> = stem
        .split(|c: char| c == '_' || c == '-' || c == '.' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .collect();

    (!words.is_empty()).then(|| words.join(" "))
}
