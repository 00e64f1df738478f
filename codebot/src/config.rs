use anyhow::{bail, Context as _, Result};
use codebot_core::FenceLabel;
use codebot_sdk::{OllamaConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
use config::{builder::DefaultState, Config as ConfigLoader, ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Environment variable the bot token has traditionally been read from.
pub const TOKEN_ENV_VAR: &str = "TELEGRAM_BOT_TOKEN";

/// Prefix for all other environment overrides, e.g. `CODEBOT_OLLAMA__MODEL`.
pub const ENV_PREFIX: &str = "CODEBOT";

pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub telegram: TelegramSettings,
    pub ollama: OllamaSettings,
    pub log_level: String,
}

#[derive(Clone, Deserialize)]
pub struct TelegramSettings {
    #[serde(default)]
    pub token: String,
    pub api_url: String,
    /// Long-poll timeout passed to `getUpdates`.
    pub poll_timeout_secs: u64,
}

impl fmt::Debug for TelegramSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramSettings")
            .field("token", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OllamaSettings {
    pub base_url: String,
    pub model: String,
    pub num_predict: u32,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// A fixed language tag for code blocks, or `preserve`.
    pub fence_label: String,
    pub enable_logging: bool,
}

impl Config {
    /// Load configuration from `.env`, config files and the environment.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));

        Self::finish(builder)
    }

    /// Load configuration from defaults and the environment only.
    pub fn from_env() -> Result<Self> {
        Self::finish(Self::defaults()?)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        let builder = ConfigLoader::builder()
            .set_default("log_level", "info")?
            .set_default("telegram.token", "")?
            .set_default("telegram.api_url", DEFAULT_TELEGRAM_API_URL)?
            .set_default("telegram.poll_timeout_secs", 30)?
            .set_default("ollama.base_url", DEFAULT_BASE_URL)?
            .set_default("ollama.model", DEFAULT_MODEL)?
            .set_default("ollama.num_predict", 1500)?
            .set_default("ollama.timeout_secs", 300)?
            .set_default("ollama.connect_timeout_secs", 10)?
            .set_default("ollama.fence_label", "python")?
            .set_default("ollama.enable_logging", false)?;

        Ok(builder)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("telegram.token", std::env::var(TOKEN_ENV_VAR).ok())?
            .build()
            .context("Failed to build configuration")?;

        let config: Config = config
            .try_deserialize()
            .context("Failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.telegram.token.trim().is_empty() {
            bail!(
                "Telegram bot token is missing: set {} in the environment or a .env file",
                TOKEN_ENV_VAR
            );
        }

        url::Url::parse(&self.telegram.api_url)
            .with_context(|| format!("Invalid Telegram API URL: {}", self.telegram.api_url))?;

        self.ollama_config()
            .validate()
            .context("Invalid Ollama configuration")?;

        Ok(())
    }

    /// Client configuration for the inference server.
    pub fn ollama_config(&self) -> OllamaConfig {
        OllamaConfig::new(self.ollama.base_url.as_str())
            .with_model(self.ollama.model.as_str())
            .with_num_predict(self.ollama.num_predict)
            .with_timeout(Duration::from_secs(self.ollama.timeout_secs))
            .with_connect_timeout(Duration::from_secs(self.ollama.connect_timeout_secs))
            .with_fence_label(FenceLabel::from(self.ollama.fence_label.as_str()))
            .with_logging(self.ollama.enable_logging)
    }
}
