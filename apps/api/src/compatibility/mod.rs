// Compatibility analysis: prompt construction, response parsing, and the
// orchestrator that drives one analysis run.
// All LLM calls go through llm_client, no direct HTTP calls here.

pub mod orchestrator;
pub mod parser;
pub mod prompts;
