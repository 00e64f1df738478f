//! HTTP client implementation
//!
//! This module provides the client for the Ollama HTTP API. A generation is a
//! single POST with no retries; its result is classified into an
//! [`InferenceOutcome`] so callers never see an error.

use async_trait::async_trait;
use codebot_core::{
    GenerateResponse, InferenceBackend, InferenceOutcome, InferencePayload, TaskRequest,
};
use reqwest::{header, Client, Method};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::config::OllamaConfig;
use crate::error::{SdkError, SdkResult};

/// Path of the non-streaming generation endpoint
pub const GENERATE_PATH: &str = "/api/generate";

/// Path listing locally available models
pub const TAGS_PATH: &str = "/api/tags";

const PROMPT_PREVIEW_CHARS: usize = 200;
const RESPONSE_PREVIEW_CHARS: usize = 500;

/// Client for a local Ollama server
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    config: Arc<OllamaConfig>,
}

impl OllamaClient {
    /// Create a new client with the given configuration
    pub fn new(config: OllamaConfig) -> SdkResult<Self> {
        config.validate()?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(SdkError::NetworkError)?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    /// Build the full URL for an endpoint
    pub fn url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Build the generation payload for a task
    pub fn payload(&self, request: &TaskRequest) -> InferencePayload {
        InferencePayload::from_request(request, self.config.model.as_str(), self.config.num_predict)
    }

    /// Run one generation and classify the result. Never fails.
    #[instrument(skip(self, request), fields(model = %self.config.model, temperature = request.temperature))]
    pub async fn generate(&self, request: &TaskRequest) -> InferenceOutcome {
        match self.try_generate(request).await {
            Ok(text) => InferenceOutcome::Success(text),
            Err(e) => {
                warn!(
                    "Ollama request failed: {}. Make sure Ollama is running and model '{}' is pulled",
                    e, self.config.model
                );
                e.into()
            }
        }
    }

    async fn try_generate(&self, request: &TaskRequest) -> SdkResult<String> {
        let payload = self.payload(request);
        debug!(
            "Sending request to Ollama, prompt preview: {}",
            preview(&payload.prompt, PROMPT_PREVIEW_CHARS)
        );

        let response: GenerateResponse = self.post(GENERATE_PATH, &payload).await?;

        debug!(
            "Received response from Ollama ({} chars): {}",
            response.response.chars().count(),
            preview(&response.response, RESPONSE_PREVIEW_CHARS)
        );
        Ok(response.response)
    }

    /// Names of the models the server has pulled
    pub async fn list_models(&self) -> SdkResult<Vec<String>> {
        let tags: TagsResponse = self.get(TAGS_PATH).await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Whether the configured model is available. `codellama` matches `codellama:latest`.
    pub async fn has_model(&self) -> SdkResult<bool> {
        let wanted = self.config.model.as_str();
        let latest = format!("{}:latest", wanted);
        let models = self.list_models().await?;
        let found = models.iter().any(|name| name == wanted || *name == latest);
        info!("Model '{}' available: {}", wanted, found);
        Ok(found)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> SdkResult<T> {
        self.request(Method::GET, path, Option::<&()>::None).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> SdkResult<T> {
        self.request(Method::POST, path, Some(body)).await
    }

    async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> SdkResult<T> {
        let url = self.url(path);
        let mut request = self.client.request(method.clone(), &url);

        if let Some(body) = body {
            request = request.json(body);
        }

        if self.config.enable_logging {
            debug!("Request: {} {}", method, url);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        if self.config.enable_logging {
            debug!("Response {}: {}", status, text);
        }

        if status.is_success() {
            serde_json::from_str(&text).map_err(SdkError::SerializationError)
        } else {
            Err(SdkError::ApiError {
                status: status.as_u16(),
                body: text,
            })
        }
    }

    fn classify_transport_error(&self, e: reqwest::Error) -> SdkError {
        if e.is_timeout() {
            SdkError::Timeout(self.config.timeout.as_secs())
        } else if e.is_connect() || e.is_request() || e.is_body() {
            SdkError::NetworkError(e)
        } else {
            SdkError::Unknown(e.to_string())
        }
    }
}

#[async_trait]
impl InferenceBackend for OllamaClient {
    async fn infer(&self, request: TaskRequest) -> String {
        self.generate(&request)
            .await
            .render(&self.config.model, &self.config.fence_label)
    }
}

/// Response of `GET /api/tags`
#[derive(Debug, Clone, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<ModelTag>,
}

/// One locally available model
#[derive(Debug, Clone, Deserialize)]
pub struct ModelTag {
    pub name: String,
}

fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let client = OllamaClient::new(OllamaConfig::new("http://localhost:11434/")).unwrap();

        assert_eq!(
            client.url("/api/generate"),
            "http://localhost:11434/api/generate"
        );
        assert_eq!(client.url("api/tags"), "http://localhost:11434/api/tags");
    }

    #[test]
    fn test_payload_uses_config() {
        let config = OllamaConfig::default().with_model("qwen2.5-coder").with_num_predict(64);
        let client = OllamaClient::new(config).unwrap();
        let request = TaskRequest::new("Fix it.", "x=", 0.3).unwrap();

        let payload = client.payload(&request);
        assert_eq!(payload.model, "qwen2.5-coder");
        assert_eq!(payload.options.num_predict, 64);
        assert!(!payload.stream);
    }

    #[test]
    fn test_preview_is_char_safe() {
        assert_eq!(preview("привіт", 3), "при...");
        assert_eq!(preview("short", 10), "short");
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert!(OllamaClient::new(OllamaConfig::new("")).is_err());
    }
}
