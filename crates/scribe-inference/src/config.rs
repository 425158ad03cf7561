//! Inference configuration.
//!
//! Selects how the composer reaches the AI boundary: directly through a
//! language model (`model`) or through a remote brainstorm/search service
//! (`http`), optionally wrapped in the sample-data fallback.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `SCRIBE_AI_MODE` | `model` | `model` or `http` |
//! | `SCRIBE_SERVICE_URL` | unset | Base URL for `http` mode |
//! | `SCRIBE_PROMPT_STYLE` | `free_text` | `free_text` or `structured` |
//! | `SCRIBE_SAMPLE_FALLBACK` | `false` | Substitute sample data on failure |
//! | `OPENAI_*` | see [`crate::openai::OpenAIConfig::from_env`] | Model backend |
//!
//! # Example
//!
//! ```rust,no_run
//! use scribe_inference::config::InferenceConfig;
//!
//! let config = InferenceConfig::from_env().expect("invalid inference config");
//! config.validate().expect("invalid inference config");
//! let service = config.build_service().expect("failed to build AI service");
//! ```

use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use scribe_core::AiService;

use crate::fallback::SampleFallbackAiService;
use crate::http_service::{HttpAiService, DEFAULT_TIMEOUT_SECS};

#[cfg(feature = "openai")]
use crate::openai::{OpenAIBackend, OpenAIConfig};
#[cfg(feature = "openai")]
use crate::service::ModelAiService;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid AI mode: {0} (expected `model` or `http`)")]
    InvalidMode(String),

    #[error("Invalid prompt style: {0} (expected `free_text` or `structured`)")]
    InvalidPromptStyle(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Failed to build AI service: {0}")]
    Build(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Where AI calls go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AiMode {
    /// Call a language model directly.
    #[default]
    Model,
    /// Call a remote brainstorm/search service.
    Http,
}

impl FromStr for AiMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "model" => Ok(Self::Model),
            "http" => Ok(Self::Http),
            _ => Err(ConfigError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for AiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model => write!(f, "model"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Which brainstorm prompt is sent to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptStyle {
    /// Labeled bullet sections in free text.
    #[default]
    FreeText,
    /// A JSON object of labeled ideas.
    Structured,
}

impl FromStr for PromptStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "free_text" | "freetext" | "text" => Ok(Self::FreeText),
            "structured" | "json" => Ok(Self::Structured),
            _ => Err(ConfigError::InvalidPromptStyle(s.to_string())),
        }
    }
}

impl fmt::Display for PromptStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FreeText => write!(f, "free_text"),
            Self::Structured => write!(f, "structured"),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn check_url(name: &str, url: &str) -> ConfigResult<()> {
    if url.is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{} must start with http:// or https://, got: {}",
            name, url
        )));
    }
    Ok(())
}

/// Inference configuration.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    pub mode: AiMode,
    /// Base URL of the brainstorm/search service (`http` mode).
    pub service_url: Option<String>,
    pub prompt_style: PromptStyle,
    /// Wrap the service in [`SampleFallbackAiService`].
    pub sample_fallback: bool,
    /// Request timeout for the service client.
    pub timeout_seconds: u64,
    #[cfg(feature = "openai")]
    pub openai: OpenAIConfig,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            mode: AiMode::default(),
            service_url: None,
            prompt_style: PromptStyle::default(),
            sample_fallback: false,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            #[cfg(feature = "openai")]
            openai: OpenAIConfig::default(),
        }
    }
}

impl InferenceConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset variables take their defaults; malformed enum values are errors.
    pub fn from_env() -> ConfigResult<Self> {
        let mode = match env::var("SCRIBE_AI_MODE") {
            Ok(value) => value.parse()?,
            Err(_) => AiMode::default(),
        };
        let prompt_style = match env::var("SCRIBE_PROMPT_STYLE") {
            Ok(value) => value.parse()?,
            Err(_) => PromptStyle::default(),
        };

        Ok(Self {
            mode,
            service_url: env::var("SCRIBE_SERVICE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            prompt_style,
            sample_fallback: env::var("SCRIBE_SAMPLE_FALLBACK")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            timeout_seconds: env::var("OPENAI_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            #[cfg(feature = "openai")]
            openai: OpenAIConfig::from_env(),
        })
    }

    /// Validate the configuration for the selected mode.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "timeout must be greater than zero".to_string(),
            ));
        }

        match self.mode {
            AiMode::Http => match self.service_url {
                Some(ref url) => check_url("SCRIBE_SERVICE_URL", url),
                None => Err(ConfigError::Validation(
                    "SCRIBE_SERVICE_URL is required in http mode".to_string(),
                )),
            },
            AiMode::Model => self.validate_model(),
        }
    }

    #[cfg(feature = "openai")]
    fn validate_model(&self) -> ConfigResult<()> {
        check_url("OPENAI_BASE_URL", &self.openai.base_url)?;
        if self.openai.gen_model.trim().is_empty() {
            return Err(ConfigError::Validation(
                "OPENAI_GEN_MODEL cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    #[cfg(not(feature = "openai"))]
    fn validate_model(&self) -> ConfigResult<()> {
        Err(ConfigError::Validation(
            "model mode requires the `openai` feature".to_string(),
        ))
    }

    /// Build the configured [`AiService`].
    pub fn build_service(&self) -> ConfigResult<Arc<dyn AiService>> {
        let service: Arc<dyn AiService> = match self.mode {
            AiMode::Http => {
                let url = self.service_url.clone().ok_or_else(|| {
                    ConfigError::Validation("SCRIBE_SERVICE_URL is required in http mode".to_string())
                })?;
                let client = HttpAiService::new(url, self.timeout_seconds)
                    .map_err(|e| ConfigError::Build(e.to_string()))?;
                Arc::new(client)
            }
            AiMode::Model => self.build_model_service()?,
        };

        info!(
            subsystem = "inference",
            component = "config",
            mode = %self.mode,
            prompt_style = %self.prompt_style,
            sample_fallback = self.sample_fallback,
            "AI service configured"
        );

        if self.sample_fallback {
            Ok(Arc::new(SampleFallbackAiService::new(service)))
        } else {
            Ok(service)
        }
    }

    #[cfg(feature = "openai")]
    fn build_model_service(&self) -> ConfigResult<Arc<dyn AiService>> {
        let backend =
            OpenAIBackend::new(self.openai.clone()).map_err(|e| ConfigError::Build(e.to_string()))?;
        Ok(Arc::new(
            ModelAiService::new(backend).with_prompt_style(self.prompt_style),
        ))
    }

    #[cfg(not(feature = "openai"))]
    fn build_model_service(&self) -> ConfigResult<Arc<dyn AiService>> {
        Err(ConfigError::Build(
            "model mode requires the `openai` feature".to_string(),
        ))
    }
}
