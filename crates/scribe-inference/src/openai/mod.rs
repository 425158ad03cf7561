//! OpenAI-compatible chat completions backend.
//!
//! Works with any endpoint speaking the `/chat/completions` protocol:
//! OpenAI itself, Azure OpenAI, Ollama in compatibility mode, vLLM or
//! LM Studio.
//!
//! # Example
//!
//! ```rust,no_run
//! use scribe_inference::openai::{OpenAIBackend, OpenAIConfig};
//! use scribe_core::{GenerationBackend, GenerationRequest};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = OpenAIConfig {
//!         base_url: "http://localhost:11434/v1".to_string(), // Ollama
//!         api_key: None,
//!         gen_model: "llama3".to_string(),
//!         timeout_seconds: 120,
//!     };
//!     let backend = OpenAIBackend::new(config).unwrap();
//!
//!     let request = GenerationRequest::system("Suggest a title for an essay on Voltaire.")
//!         .with_temperature(0.7);
//!     let text = backend.generate(&request).await.unwrap();
//! }
//! ```

mod backend;
mod error;
mod types;

pub use backend::{OpenAIBackend, OpenAIConfig, DEFAULT_OPENAI_URL, DEFAULT_TIMEOUT_SECS};
pub use error::CompletionFailure;
pub use types::*;
