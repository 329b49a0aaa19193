// src/services/seo/mod.rs
// DOCUMENTATION: LLM-backed SEO metadata generation

pub mod generator;
pub mod keywords;
pub mod llm_client;
pub mod prompt;

pub use generator::SeoService;
pub use llm_client::LlmClient;
