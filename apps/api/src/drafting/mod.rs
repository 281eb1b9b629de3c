// Generate operation: decline request -> internal rationale + external letter.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod drafter;
pub mod handlers;
pub mod prompts;
pub mod templates;
