//! Mock generation backend for deterministic testing.
//!
//! ## Usage
//!
//! ```rust
//! use scribe_inference::mock::MockGenerationBackend;
//! use scribe_core::{GenerationBackend, GenerationRequest};
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = MockGenerationBackend::new()
//!         .with_fixed_response("Expansion Ideas:\n- Compare with Locke");
//!
//!     let text = backend
//!         .generate(&GenerationRequest::system("brainstorm"))
//!         .await
//!         .unwrap();
//!     assert!(text.contains("Locke"));
//! }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use scribe_core::{Error, GenerationBackend, GenerationRequest, Result};

/// Mock generation backend for testing.
///
/// Responses are picked in this order: the first mapping whose needle occurs
/// in the system prompt, the JSON response for JSON-mode requests, then the
/// fixed response.
#[derive(Clone)]
pub struct MockGenerationBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<GenerationRequest>>>,
}

#[derive(Debug, Clone)]
struct MockConfig {
    model_name: String,
    mappings: Vec<(String, String)>,
    default_response: String,
    json_response: Option<String>,
    latency_ms: u64,
    fail: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            model_name: "mock-model".to_string(),
            mappings: Vec::new(),
            default_response: "Mock response".to_string(),
            json_response: None,
            latency_ms: 0,
            fail: false,
        }
    }
}

impl MockGenerationBackend {
    /// Create a new mock backend with default configuration.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the response returned when nothing more specific matches.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).default_response = response.into();
        self
    }

    /// Set the response for requests made in JSON mode.
    pub fn with_json_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).json_response = Some(response.into());
        self
    }

    /// Answer `output` whenever the system prompt contains `needle`.
    pub fn with_response_mapping(
        mut self,
        needle: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Arc::make_mut(&mut self.config)
            .mappings
            .push((needle.into(), output.into()));
        self
    }

    pub fn with_model_name(mut self, name: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).model_name = name.into();
        self
    }

    /// Set simulated latency for every call.
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        Arc::make_mut(&mut self.config).latency_ms = latency_ms;
        self
    }

    /// Make every call fail with an inference error.
    pub fn with_failure(mut self) -> Self {
        Arc::make_mut(&mut self.config).fail = true;
        self
    }

    /// Get all logged requests for assertion.
    pub fn get_calls(&self) -> Vec<GenerationRequest> {
        self.call_log.lock().unwrap().clone()
    }

    /// Get number of generation calls.
    pub fn generate_call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.call_log.lock().unwrap().clear()
    }

    fn respond(&self, request: &GenerationRequest) -> String {
        if let Some((_, output)) = self
            .config
            .mappings
            .iter()
            .find(|(needle, _)| request.system.contains(needle.as_str()))
        {
            return output.clone();
        }
        if request.json_response {
            if let Some(ref json) = self.config.json_response {
                return json.clone();
            }
        }
        self.config.default_response.clone()
    }
}

impl Default for MockGenerationBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.call_log.lock().unwrap().push(request.clone());

        if self.config.latency_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.config.latency_ms)).await;
        }

        if self.config.fail {
            return Err(Error::Inference("Simulated failure for testing".to_string()));
        }

        Ok(self.respond(request))
    }

    fn model_name(&self) -> &str {
        &self.config.model_name
    }
}
