// Shared prompt fragments.
// Each module that calls the model defines its own prompts.rs alongside it;
// only cross-cutting instructions live here.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Keeps generated text anchored to what the proposal actually says.
pub const FACTUAL_INSTRUCTION: &str = "\
    Use only facts stated in the material provided. \
    Do NOT infer, embellish, or invent names, amounts, dates, or outcomes. \
    If a detail is missing, leave it out rather than guessing.";
