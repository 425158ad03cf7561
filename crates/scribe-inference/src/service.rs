//! Model-backed [`AiService`]: the brainstorm and web-search flows.
//!
//! Brainstorming is one completion parsed by [`parse_model_output`]. Web
//! search is two completions: the note is first condensed into a short
//! query, then the model is asked for JSON results about that query.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, info, instrument, Span};

use scribe_core::defaults::{
    BRAINSTORM_MAX_TOKENS, BRAINSTORM_TEMPERATURE, SEARCH_QUERY_MAX_TOKENS,
    SEARCH_QUERY_TEMPERATURE, WEB_RESULTS_MAX_TOKENS, WEB_RESULTS_TEMPERATURE,
};
use scribe_core::{
    logging, AiService, BrainstormRequest, BrainstormResponse, Error, GenerationBackend,
    GenerationRequest, Result, WebSearchRequest, WebSearchResponse,
};

use crate::config::PromptStyle;
use crate::parser::{parse_model_output, parse_web_results};
use crate::prompts::{
    build_brainstorm_prompt, build_search_query_prompt, build_structured_brainstorm_prompt,
    build_web_results_prompt,
};

/// Error message for requests without note content.
pub const NOTE_CONTENT_REQUIRED: &str = "Note content is required";

/// Error message for a completion with no text.
pub const EMPTY_RESPONSE: &str = "Empty response from AI service";

/// [`AiService`] that talks to a language model directly.
#[derive(Clone)]
pub struct ModelAiService {
    backend: Arc<dyn GenerationBackend>,
    prompt_style: PromptStyle,
}

impl ModelAiService {
    pub fn new(backend: impl GenerationBackend + 'static) -> Self {
        Self::from_arc(Arc::new(backend))
    }

    pub fn from_arc(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            backend,
            prompt_style: PromptStyle::default(),
        }
    }

    /// Select which brainstorm prompt is sent.
    pub fn with_prompt_style(mut self, prompt_style: PromptStyle) -> Self {
        self.prompt_style = prompt_style;
        self
    }

    pub fn prompt_style(&self) -> PromptStyle {
        self.prompt_style
    }

    fn brainstorm_request(&self, request: &BrainstormRequest) -> GenerationRequest {
        let prompt = match self.prompt_style {
            PromptStyle::FreeText => build_brainstorm_prompt(
                &request.document_context,
                &request.document_goal,
                &request.note_content,
            ),
            PromptStyle::Structured => build_structured_brainstorm_prompt(
                &request.document_context,
                &request.document_goal,
                &request.note_content,
            ),
        };

        let generation = GenerationRequest::system(prompt)
            .with_temperature(BRAINSTORM_TEMPERATURE)
            .with_max_tokens(BRAINSTORM_MAX_TOKENS);
        match self.prompt_style {
            PromptStyle::FreeText => generation,
            PromptStyle::Structured => generation.json(),
        }
    }

    /// Condense the note into a search query, falling back to the note text.
    async fn search_query(&self, request: &WebSearchRequest) -> Result<String> {
        let prompt = build_search_query_prompt(
            &request.document_context,
            &request.document_goal,
            &request.note_content,
        );
        let generation = GenerationRequest::system(prompt)
            .with_temperature(SEARCH_QUERY_TEMPERATURE)
            .with_max_tokens(SEARCH_QUERY_MAX_TOKENS);

        let raw = self.backend.generate(&generation).await?;
        let query = raw.trim().trim_matches('"').trim();
        if query.is_empty() {
            debug!("Empty search query from model, using note content");
            Ok(request.note_content.clone())
        } else {
            Ok(query.to_string())
        }
    }
}

fn require_note_content(note_content: &str) -> Result<()> {
    if note_content.trim().is_empty() {
        return Err(Error::InvalidInput(NOTE_CONTENT_REQUIRED.to_string()));
    }
    Ok(())
}

#[async_trait]
impl AiService for ModelAiService {
    #[instrument(
        skip(self, request),
        fields(
            subsystem = "inference",
            component = "model_service",
            op = "brainstorm",
            model = %self.backend.model_name(),
            prompt_len = tracing::field::Empty,
            result_count = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
        )
    )]
    async fn brainstorm(&self, request: &BrainstormRequest) -> Result<BrainstormResponse> {
        require_note_content(&request.note_content)?;

        let start = Instant::now();
        let generation = self.brainstorm_request(request);
        Span::current().record(logging::PROMPT_LEN, generation.system.len());

        let raw = self.backend.generate(&generation).await?;
        if raw.trim().is_empty() {
            return Err(Error::Inference(EMPTY_RESPONSE.to_string()));
        }

        let response = parse_model_output(&raw);
        let span = Span::current();
        span.record(logging::RESULT_COUNT, response.bullet_points.len());
        span.record(logging::DURATION_MS, start.elapsed().as_millis() as u64);
        info!("Brainstorm completed");
        Ok(response)
    }

    #[instrument(
        skip(self, request),
        fields(
            subsystem = "inference",
            component = "model_service",
            op = "web_search",
            model = %self.backend.model_name(),
            result_count = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
        )
    )]
    async fn web_search(&self, request: &WebSearchRequest) -> Result<WebSearchResponse> {
        require_note_content(&request.note_content)?;

        let start = Instant::now();
        let query = self.search_query(request).await?;
        debug!(query = %query, "Generated search query");

        let generation = GenerationRequest::system(build_web_results_prompt(
            &query,
            &request.document_context,
        ))
        .with_temperature(WEB_RESULTS_TEMPERATURE)
        .with_max_tokens(WEB_RESULTS_MAX_TOKENS)
        .json();

        let raw = self.backend.generate(&generation).await?;
        let web_results = parse_web_results(&raw);

        let span = Span::current();
        span.record(logging::RESULT_COUNT, web_results.len());
        span.record(logging::DURATION_MS, start.elapsed().as_millis() as u64);
        info!("Web search completed");
        Ok(WebSearchResponse { web_results })
    }
}
