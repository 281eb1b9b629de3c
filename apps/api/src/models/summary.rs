use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Key facts pulled out of a proposal document.
///
/// Every field is optional free text. Absent fields still serialize (as
/// `null`) so the review screen always receives the same shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProposalSummary {
    pub organization_name: Option<String>,
    pub organization_mission: Option<String>,
    pub founding_year: Option<String>,
    pub grant_amount: Option<String>,
    pub project_description: Option<String>,
    pub target_population: Option<String>,
    pub geographic_scope: Option<String>,
    pub current_budget: Option<String>,
    pub project_budget: Option<String>,
    pub people_served: Option<String>,
    pub key_deliverables: Option<Vec<String>>,
    pub timeline: Option<String>,
    pub key_partners: Option<Vec<String>>,
    pub evaluation_methods: Option<String>,
}

/// JSON keys of `ProposalSummary`, in declaration order.
#[cfg(test)]
pub const SUMMARY_FIELDS: [&str; 14] = [
    "organizationName",
    "organizationMission",
    "foundingYear",
    "grantAmount",
    "projectDescription",
    "targetPopulation",
    "geographicScope",
    "currentBudget",
    "projectBudget",
    "peopleServed",
    "keyDeliverables",
    "timeline",
    "keyPartners",
    "evaluationMethods",
];

impl ProposalSummary {
    /// Maps a model's JSON reply onto the summary.
    ///
    /// Models are loose with types, so numbers become strings, a lone string
    /// where a list belongs becomes a one-item list, and anything else counts
    /// as absent. Returns `None` only when the reply is not a JSON object.
    pub fn from_model_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let text = |key: &str| object.get(key).and_then(lenient_text);
        let list = |key: &str| lenient_list(object, key);

        Some(Self {
            organization_name: text("organizationName"),
            organization_mission: text("organizationMission"),
            founding_year: text("foundingYear"),
            grant_amount: text("grantAmount"),
            project_description: text("projectDescription"),
            target_population: text("targetPopulation"),
            geographic_scope: text("geographicScope"),
            current_budget: text("currentBudget"),
            project_budget: text("projectBudget"),
            people_served: text("peopleServed"),
            key_deliverables: list("keyDeliverables"),
            timeline: text("timeline"),
            key_partners: list("keyPartners"),
            evaluation_methods: text("evaluationMethods"),
        })
    }
}

/// `deserialize_with` helper for client-supplied summaries.
///
/// The review screen may send back whatever shape it received or edited,
/// so the same lenient mapping applies. Anything that is not an object
/// counts as an empty summary.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<ProposalSummary, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(ProposalSummary::from_model_json(&value).unwrap_or_default())
}

/// The field's value when it holds something other than whitespace.
pub fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn lenient_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(lenient_text).collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        Value::Null | Value::Bool(_) | Value::Object(_) => None,
    }
}

fn lenient_list(object: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    match object.get(key)? {
        Value::Array(items) => {
            let items: Vec<String> = items.iter().filter_map(lenient_text).collect();
            (!items.is_empty()).then_some(items)
        }
        other => lenient_text(other).map(|item| vec![item]),
    }
}
