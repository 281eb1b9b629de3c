use serde::Serialize;

/// Label used when a request carries a code outside the closed set.
pub const UNKNOWN_REASON_LABEL: &str = "the specified reason";

/// Why a proposal was declined. Closed set; the label shown in the picker is
/// the label written into every generated document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclineReason {
    ProjectCapability,
    GeneralOperating,
    HigherMerit,
    OutsideGuidelines,
    IncompleteProposal,
    GeographicScope,
    StrategicMismatch,
    Sustainability,
}

impl DeclineReason {
    /// Picker order.
    pub const ALL: [DeclineReason; 8] = [
        DeclineReason::ProjectCapability,
        DeclineReason::GeneralOperating,
        DeclineReason::HigherMerit,
        DeclineReason::OutsideGuidelines,
        DeclineReason::IncompleteProposal,
        DeclineReason::GeographicScope,
        DeclineReason::StrategicMismatch,
        DeclineReason::Sustainability,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::ProjectCapability => "project_capability",
            Self::GeneralOperating => "general_operating",
            Self::HigherMerit => "higher_merit",
            Self::OutsideGuidelines => "outside_guidelines",
            Self::IncompleteProposal => "incomplete_proposal",
            Self::GeographicScope => "geographic_scope",
            Self::StrategicMismatch => "strategic_mismatch",
            Self::Sustainability => "sustainability",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ProjectCapability => "Project Capability Problems",
            Self::GeneralOperating => "General Operating Support",
            Self::HigherMerit => "Other Projects Higher Merit",
            Self::OutsideGuidelines => "Outside Approved Guidelines",
            Self::IncompleteProposal => "Incomplete Proposal",
            Self::GeographicScope => "Geographic Scope Limitation",
            Self::StrategicMismatch => "Strategic Priority Mismatch",
            Self::Sustainability => "Sustainability Concerns",
        }
    }

    /// Exact, case-sensitive match on the wire code.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|reason| reason.code() == code)
    }
}

/// Resolves a wire code to its label; unknown codes get [`UNKNOWN_REASON_LABEL`].
pub fn label_for_code(code: &str) -> &'static str {
    DeclineReason::from_code(code.trim())
        .map(|reason| reason.label())
        .unwrap_or(UNKNOWN_REASON_LABEL)
}

/// One entry of `GET /reason-codes`.
#[derive(Debug, Clone, Serialize)]
pub struct ReasonOption {
    pub value: &'static str,
    pub label: &'static str,
}

pub fn reason_options() -> Vec<ReasonOption> {
    DeclineReason::ALL
        .iter()
        .map(|reason| ReasonOption {
            value: reason.code(),
            label: reason.label(),
        })
        .collect()
}
