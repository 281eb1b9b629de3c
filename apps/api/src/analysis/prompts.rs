// LLM prompt constants for proposal analysis.

/// Role prompt for extraction; combined with `JSON_ONLY_SYSTEM` at call time.
pub const EXTRACTION_SYSTEM: &str = "You are an expert grant proposal analyst. \
    Extract information accurately and concisely.";

/// Extraction prompt template. Replace `{proposal_text}` before sending.
pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"Analyze this grant proposal and extract the following information.

Return a JSON object with this EXACT schema (no extra fields):
{
  "organizationName": "Name of the organization",
  "organizationMission": "Brief mission statement",
  "foundingYear": "Year founded",
  "grantAmount": "Amount requested, with $ symbol",
  "projectDescription": "Brief description of the project or program",
  "targetPopulation": "Who will be served",
  "geographicScope": "Geographic area of service",
  "currentBudget": "Organization's current operating budget",
  "projectBudget": "Total project budget",
  "peopleServed": "Number of people to be served",
  "keyDeliverables": ["Main", "deliverables"],
  "timeline": "Project timeline or duration",
  "keyPartners": ["Partner", "organizations"],
  "evaluationMethods": "How success will be measured"
}

If a field is not found in the proposal, use null for that field.
Extract only factual information directly stated in the proposal.

PROPOSAL TEXT:
{proposal_text}"#;
