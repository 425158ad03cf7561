//! [`AiService`] client for a remote brainstorm/search service.
//!
//! The service exposes `POST /api/brainstorm` and `POST /api/search`, both
//! taking a camelCase [`BrainstormRequest`] body. A non-2xx status or a body
//! carrying an `error` field is a failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::{debug, instrument, warn};

use scribe_core::{
    AiService, BrainstormRequest, BrainstormResponse, Error, Result, ServiceErrorBody,
    WebSearchRequest, WebSearchResponse,
};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const BRAINSTORM_PATH: &str = "/api/brainstorm";
const SEARCH_PATH: &str = "/api/search";

/// HTTP implementation of [`AiService`].
#[derive(Debug, Clone)]
pub struct HttpAiService {
    client: Client,
    base_url: String,
}

impl HttpAiService {
    /// Create a client for the service rooted at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, request: &BrainstormRequest) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Calling AI service");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ServiceErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_default();
            warn!(status = status.as_u16(), error = %detail, "AI service request failed");
            return Err(Error::Request(format!(
                "API request failed with status {}{}",
                status.as_u16(),
                if detail.is_empty() {
                    String::new()
                } else {
                    format!(": {}", detail)
                }
            )));
        }

        let body: JsonValue = response.json().await?;
        if let Some(message) = body.get("error").filter(|e| !e.is_null()) {
            let message = message
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| message.to_string());
            warn!(error = %message, "AI service returned an error body");
            return Err(Error::Inference(message));
        }

        Ok(serde_json::from_value(body)?)
    }
}

#[async_trait]
impl AiService for HttpAiService {
    #[instrument(skip(self, request), fields(subsystem = "inference", component = "http_service", op = "brainstorm"))]
    async fn brainstorm(&self, request: &BrainstormRequest) -> Result<BrainstormResponse> {
        self.post(BRAINSTORM_PATH, request).await
    }

    #[instrument(skip(self, request), fields(subsystem = "inference", component = "http_service", op = "web_search"))]
    async fn web_search(&self, request: &WebSearchRequest) -> Result<WebSearchResponse> {
        self.post(SEARCH_PATH, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let service = HttpAiService::new("http://localhost:3000/", 5).unwrap();
        assert_eq!(service.base_url(), "http://localhost:3000");
    }
}
