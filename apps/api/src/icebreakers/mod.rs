// Icebreaker generation: input validation → prompt → model fallback → reply validation.
// All LLM calls go through llm_client; nothing here talks to the provider directly.

pub mod classify;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod response;
pub mod validation;
