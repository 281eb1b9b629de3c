// LLM prompt constants for decline drafting.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for the internal memo. Replace `{foundation}`.
pub const INTERNAL_MEMO_SYSTEM: &str = "You are a grant officer at {foundation} writing \
    internal memos for the foundation's board. Be concise and factual.";

/// Internal memo prompt.
/// Replace: {factual_instruction}, {summary_json}, {reason_label}, {reason_label_lower},
///          {specific_reasons} (last, since it is reviewer-supplied text)
pub const INTERNAL_MEMO_PROMPT_TEMPLATE: &str = r#"Write an internal decline memo in EXACTLY this two-paragraph format:

[Organization name], founded in [year], [mission/description]. This [grant amount] request is to support [project description]. [Add 1-2 relevant details about scope, budget, or population served.]

I recommend this request be declined for {reason_label_lower}. [Restate the reviewer's reasons below in clear, professional prose.]

Rationale: {reason_label}

Requirements:
- Total length: 150-200 words
- Factual, objective tone; no subjective assessments
- Include the specific grant amount when it is known
- Omit the founding clause when the year is unknown
- The final line must be exactly "Rationale: {reason_label}"

{factual_instruction}

PROPOSAL SUMMARY:
{summary_json}

REVIEWER'S REASONS FOR DECLINING:
{specific_reasons}"#;

/// System prompt for the external letter. Replace `{foundation}`.
pub const EXTERNAL_LETTER_SYSTEM: &str = "You are writing on behalf of {foundation}. \
    Be professional and empathetic.";

/// External letter prompt. Replace: {organization}, {foundation}, {signoff}
pub const EXTERNAL_LETTER_PROMPT_TEMPLATE: &str = r#"Write a professional, empathetic decline letter for a grant application from {organization}.

Requirements:
- Address the letter to {organization}
- Thank them for their application to {foundation}
- Acknowledge the importance of their work
- State that the request will not be funded at this time, without giving specific reasons
- Encourage them to apply for future opportunities
- Sign the letter "{signoff}"
- Keep it concise: 150-200 words

Do NOT mention specific decline reasons, internal rationale, or board deliberations."#;
