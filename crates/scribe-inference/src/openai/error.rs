//! Classifying failed chat completion calls.
//!
//! The composer only needs to know whether a failure is a setup problem the
//! user has to fix (credentials, model name, an endpoint without JSON mode)
//! or a transient one. Setup problems become [`Error::Config`], the rest
//! [`Error::Inference`].

use scribe_core::Error;

use super::types::OpenAIError;

/// Why a chat completion call was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionFailure {
    /// Missing or rejected API key.
    Credentials,
    /// `OPENAI_GEN_MODEL` names a model the endpoint does not serve.
    UnknownModel,
    /// The endpoint rejected `response_format` (structured prompts, web results).
    JsonModeUnsupported,
    /// Note and document context exceed the model context window.
    PromptTooLong,
    /// Rate limit or exhausted quota.
    Throttled,
    /// 5xx or a gateway in front of the model.
    Unavailable,
    /// Anything else the endpoint refused.
    Rejected,
}

impl CompletionFailure {
    /// Classify from the HTTP status and the error body, when one was sent.
    pub fn classify(status: u16, error: Option<&OpenAIError>) -> Self {
        let mentions = |needle: &str| {
            error.is_some_and(|e| {
                e.message.contains(needle)
                    || e.code.as_deref().is_some_and(|c| c.contains(needle))
                    || e.error_type.as_deref().is_some_and(|t| t.contains(needle))
            })
        };

        match status {
            401 | 403 if !mentions("insufficient_quota") => Self::Credentials,
            429 | 402 | 403 => Self::Throttled,
            404 => Self::UnknownModel,
            _ if mentions("model_not_found") => Self::UnknownModel,
            _ if mentions("insufficient_quota") => Self::Throttled,
            400 | 422 if mentions("response_format") => Self::JsonModeUnsupported,
            400 if mentions("context_length") || mentions("maximum context") => {
                Self::PromptTooLong
            }
            500..=599 => Self::Unavailable,
            _ => Self::Rejected,
        }
    }

    /// Whether the user has to change configuration to recover.
    pub fn is_setup_problem(&self) -> bool {
        matches!(
            self,
            Self::Credentials | Self::UnknownModel | Self::JsonModeUnsupported
        )
    }

    /// Build the error surfaced by the backend.
    pub fn into_error(self, status: u16, message: &str) -> Error {
        let detail = match self {
            Self::Credentials => format!("Authentication failed ({}): {}", status, message),
            Self::UnknownModel => format!("Model not found ({}): {}", status, message),
            Self::JsonModeUnsupported => format!(
                "Endpoint does not support JSON responses; set SCRIBE_PROMPT_STYLE=free_text ({}): {}",
                status, message
            ),
            Self::PromptTooLong => format!("Note and context too long ({}): {}", status, message),
            Self::Throttled => format!("Rate limited ({}): {}", status, message),
            Self::Unavailable => format!("Model service unavailable ({}): {}", status, message),
            Self::Rejected => format!("Completion rejected ({}): {}", status, message),
        };

        if self.is_setup_problem() {
            Error::Config(detail)
        } else {
            Error::Inference(detail)
        }
    }
}
