//! Core traits for scribe abstractions.
//!
//! These traits define the seams to external collaborators (the hosted
//! model, the brainstorm/search service, the document editor, key-value
//! persistence), enabling pluggable backends and testability.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// GENERATION TRAITS
// =============================================================================

/// A single completion request sent to a language model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Instructions sent as the system message.
    pub system: String,
    /// Optional user message; empty prompts are sent with only a system turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Ask the model for a JSON object response.
    #[serde(default)]
    pub json_response: bool,
}

impl GenerationRequest {
    /// Request carrying only system instructions.
    pub fn system(system: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            prompt: None,
            temperature: None,
            max_tokens: None,
            json_response: false,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn json(mut self) -> Self {
        self.json_response = true;
        self
    }
}

/// Backend for text generation.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Run one completion and return the raw message content.
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

// =============================================================================
// AI SERVICE TRAITS
// =============================================================================

/// The brainstorm / web-search boundary the composer talks to.
///
/// Implementations return `Err` for transport failures and error bodies;
/// the composer turns those into canned messages.
#[async_trait]
pub trait AiService: Send + Sync {
    /// Produce labeled brainstorm bullets for a note.
    async fn brainstorm(&self, request: &BrainstormRequest) -> Result<BrainstormResponse>;

    /// Produce simulated web search results for a note.
    async fn web_search(&self, request: &WebSearchRequest) -> Result<WebSearchResponse>;
}

// =============================================================================
// DOCUMENT TRAITS
// =============================================================================

/// Read-only view of the document the notes support.
#[async_trait]
pub trait DocumentContextProvider: Send + Sync {
    /// Current document text.
    async fn document_context(&self) -> String;

    /// Current document goal, falling back to a default when unset.
    async fn document_goal(&self) -> String;
}

// =============================================================================
// PERSISTENCE TRAITS
// =============================================================================

/// Generic key-value persistence with JSON values.
///
/// No transactional guarantees: each `set` replaces the whole value.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key was never written.
    async fn get(&self, key: &str) -> Result<Option<JsonValue>>;

    /// Write (replace) a value.
    async fn set(&self, key: &str, value: JsonValue) -> Result<()>;
}
