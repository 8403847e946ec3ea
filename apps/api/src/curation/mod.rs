// Product curation pipeline.
// Scoring → diversity-capped preselection → rule-based result → optional LLM re-ranking.
// All LLM calls go through llm_client via the `Reranker` seam.

pub mod handlers;
pub mod orchestrator;
pub mod prompts;
pub mod reasoning;
pub mod reranker;
pub mod scoring;
pub mod selector;
