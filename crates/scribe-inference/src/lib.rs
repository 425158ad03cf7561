//! # scribe-inference
//!
//! Everything between a note and the language model.
//!
//! This crate provides:
//! - Prompt builders for brainstorming and search query generation
//! - A best-effort parser turning free-text or JSON model output into
//!   labeled bullets and web results
//! - An OpenAI-compatible generation backend (feature `openai`, default)
//! - [`AiService`] implementations: model-backed, HTTP client, and a
//!   sample-data fallback wrapper
//! - Environment-driven inference configuration
//!
//! # Feature Flags
//!
//! - `openai` (default): Enable the OpenAI-compatible backend
//! - `mock`: Expose [`mock::MockGenerationBackend`] to dependent crates
//!
//! # Example
//!
//! ```rust,no_run
//! use scribe_inference::{ModelAiService, OpenAIBackend};
//! use scribe_core::{AiService, BrainstormRequest};
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = OpenAIBackend::from_env().unwrap();
//!     let service = ModelAiService::new(backend);
//!     let request = BrainstormRequest {
//!         document_context: "Essay draft".to_string(),
//!         document_goal: "Research paper on the enlightenment".to_string(),
//!         note_content: "Voltaire and tolerance".to_string(),
//!     };
//!     let ideas = service.brainstorm(&request).await.unwrap();
//!     println!("{:?}", ideas.bullet_points);
//! }
//! ```

pub mod config;
pub mod fallback;
pub mod http_service;
pub mod parser;
pub mod prompts;
pub mod service;

#[cfg(feature = "openai")]
pub mod openai;

// Mock generation backend for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use scribe_core::*;

#[cfg(feature = "openai")]
pub use openai::{OpenAIBackend, OpenAIConfig};

pub use config::{AiMode, ConfigError, InferenceConfig, PromptStyle};
pub use fallback::SampleFallbackAiService;
pub use http_service::HttpAiService;
pub use parser::{
    parse_free_text, parse_model_output, parse_structured_brainstorm, parse_web_results,
    FreeTextSections, LabeledIdea, ParsedModelOutput, SourceEntry,
};
pub use prompts::{
    build_brainstorm_prompt, build_search_query_prompt, build_structured_brainstorm_prompt,
    build_web_results_prompt,
};
pub use service::ModelAiService;
