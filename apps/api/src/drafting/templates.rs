//! Template fallbacks for the two generated documents.
//!
//! Plain string interpolation, no model involved. Both functions always
//! return non-empty text.

use crate::config::Letterhead;
use crate::models::summary::{non_blank, ProposalSummary};

pub const DEFAULT_ADDRESSEE: &str = "Applicant";

/// Two-paragraph internal memo ending in `Rationale: <label>`.
pub fn internal_rationale(summary: &ProposalSummary, label: &str, justification: &str) -> String {
    let organization = non_blank(&summary.organization_name).unwrap_or("The organization");
    let amount = non_blank(&summary.grant_amount).unwrap_or("requested funding");
    let description = non_blank(&summary.project_description)
        .map(without_final_period)
        .unwrap_or("their proposed project");

    let mut memo = String::from(organization);
    if let Some(year) = non_blank(&summary.founding_year) {
        memo.push_str(&format!(", founded in {year},"));
    }
    match non_blank(&summary.organization_mission) {
        Some(mission) => memo.push_str(&format!(" {}.", without_final_period(mission))),
        None => memo.push_str(" serves the community."),
    }
    memo.push_str(&format!(
        " This {amount} request is to support {description}."
    ));
    if let Some(budget) = non_blank(&summary.project_budget) {
        memo.push_str(&format!(" The project budget is {budget}."));
    }
    if let Some(budget) = non_blank(&summary.current_budget) {
        memo.push_str(&format!(
            " The organization's current operating budget is {budget}."
        ));
    }

    memo.push_str(&format!(
        "\n\nI recommend this request be declined for {}.",
        label.to_lowercase()
    ));
    if !justification.is_empty() {
        memo.push(' ');
        memo.push_str(justification);
    }

    memo.push_str(&format!("\n\nRationale: {label}"));
    memo
}

/// Fixed respectful decline letter; only the addressee varies per request.
pub fn external_letter(organization: Option<&str>, letterhead: &Letterhead) -> String {
    let addressee = organization.unwrap_or(DEFAULT_ADDRESSEE);
    let foundation = &letterhead.foundation_name;

    format!(
        "Dear {addressee},

Thank you for your proposal submission to {foundation}. We genuinely appreciate your \
organization's dedication to serving the community and the considerable time you invested \
in preparing your application.

After careful review by our program team and board, we have determined that we will not be \
able to provide funding for this request at this time. While we recognize the important work \
your organization does, this proposal does not align with our current funding priorities.

We encourage you to review our funding guidelines and invite you to consider applying for \
future opportunities that may better align with your organization's mission and our \
strategic priorities.

Thank you again for considering {foundation} as a partner in your work.

Best regards,
{signoff}",
        signoff = letterhead.signoff,
    )
}

fn without_final_period(text: &str) -> &str {
    text.trim_end_matches('.').trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letterhead() -> Letterhead {
        Letterhead {
            foundation_name: "The Community Trust".to_string(),
            signoff: "The Program Team".to_string(),
        }
    }

    fn acme() -> ProposalSummary {
        ProposalSummary {
            organization_name: Some("Acme Org".to_string()),
            grant_amount: Some("$20,000".to_string()),
            project_description: Some("clothing drive".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_acme_memo() {
        let memo = internal_rationale(
            &acme(),
            "Sustainability Concerns",
            "No plan to sustain funding after grant period.",
        );
        assert_eq!(
            memo,
            "Acme Org serves the community. This $20,000 request is to support clothing drive.\n\n\
             I recommend this request be declined for sustainability concerns. \
             No plan to sustain funding after grant period.\n\n\
             Rationale: Sustainability Concerns"
        );
        assert!(memo.ends_with("\nRationale: Sustainability Concerns"));
    }

    #[test]
    fn test_full_summary_memo() {
        let summary = ProposalSummary {
            founding_year: Some("1998".to_string()),
            organization_mission: Some("runs neighborhood youth programs.".to_string()),
            project_budget: Some("$85,000".to_string()),
            current_budget: Some("$1.2 million".to_string()),
            ..acme()
        };
        let memo = internal_rationale(&summary, "Incomplete Proposal", "");
        let first_paragraph = memo.split("\n\n").next().unwrap();
        assert_eq!(
            first_paragraph,
            "Acme Org, founded in 1998, runs neighborhood youth programs. \
             This $20,000 request is to support clothing drive. \
             The project budget is $85,000. \
             The organization's current operating budget is $1.2 million."
        );
        assert!(memo.contains("declined for incomplete proposal.\n\n"));
    }

    #[test]
    fn test_empty_summary_uses_defaults() {
        let memo = internal_rationale(&ProposalSummary::default(), "the specified reason", "");
        assert!(memo.starts_with(
            "The organization serves the community. This requested funding request is to support their proposed project."
        ));
        assert!(memo.ends_with("Rationale: the specified reason"));
    }

    #[test]
    fn test_blank_fields_count_as_absent() {
        let summary = ProposalSummary {
            organization_name: Some("   ".to_string()),
            founding_year: Some("".to_string()),
            ..Default::default()
        };
        let memo = internal_rationale(&summary, "Incomplete Proposal", "");
        assert!(memo.starts_with("The organization serves"));
        assert!(!memo.contains("founded in"));
    }

    #[test]
    fn test_letter_addresses_organization() {
        let letter = external_letter(Some("Acme Org"), &letterhead());
        assert!(letter.starts_with("Dear Acme Org,\n\n"));
        assert!(letter.contains("The Community Trust"));
        assert!(letter.ends_with("Best regards,\nThe Program Team"));
    }

    #[test]
    fn test_letter_default_addressee() {
        let letter = external_letter(None, &letterhead());
        assert!(letter.starts_with("Dear Applicant,"));
    }

    #[test]
    fn test_letter_never_leaks_internal_reasons() {
        let letter = external_letter(Some("Acme Org"), &letterhead());
        assert!(!letter.contains("Rationale"));
        assert!(!letter.to_lowercase().contains("sustainab"));
    }
}
