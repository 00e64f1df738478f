//! SDK configuration
//!
//! This module provides configuration options for the Ollama client.

use codebot_core::{FenceLabel, DEFAULT_NUM_PREDICT};
use std::time::Duration;

use crate::error::{SdkError, SdkResult};

/// Default address of a local Ollama server
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default model name
pub const DEFAULT_MODEL: &str = "codellama";

/// Configuration for the Ollama client
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base URL of the Ollama server
    pub base_url: String,

    /// Model used for every generation
    pub model: String,

    /// Cap on generated tokens (`options.num_predict`)
    pub num_predict: u32,

    /// Request timeout. Local generation is slow, so this is measured in minutes.
    pub timeout: Duration,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// User agent string
    pub user_agent: String,

    /// Enable request/response logging
    pub enable_logging: bool,

    /// Labelling of code blocks in rendered replies
    pub fence_label: FenceLabel,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            num_predict: DEFAULT_NUM_PREDICT,
            timeout: Duration::from_secs(300),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("codebot-sdk/{}", env!("CARGO_PKG_VERSION")),
            enable_logging: false,
            fence_label: FenceLabel::default(),
        }
    }
}

impl OllamaConfig {
    /// Create a new configuration with the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the generation cap
    pub fn with_num_predict(mut self, num_predict: u32) -> Self {
        self.num_predict = num_predict;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Enable request/response logging
    pub fn with_logging(mut self, enable: bool) -> Self {
        self.enable_logging = enable;
        self
    }

    /// Set how code blocks are labelled
    pub fn with_fence_label(mut self, label: FenceLabel) -> Self {
        self.fence_label = label;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> SdkResult<()> {
        if self.base_url.is_empty() {
            return Err(SdkError::ConfigurationError(
                "Base URL cannot be empty".to_string(),
            ));
        }

        url::Url::parse(&self.base_url)?;

        if self.model.trim().is_empty() {
            return Err(SdkError::ConfigurationError(
                "Model name cannot be empty".to_string(),
            ));
        }

        if self.timeout.is_zero() {
            return Err(SdkError::ConfigurationError(
                "Timeout cannot be zero".to_string(),
            ));
        }

        if self.num_predict == 0 {
            return Err(SdkError::ConfigurationError(
                "num_predict must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
