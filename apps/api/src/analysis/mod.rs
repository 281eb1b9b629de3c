// Analyze operation: proposal text -> ProposalSummary.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod fallback;
pub mod handlers;
pub mod prompts;
pub mod summarizer;
