//! Minimal Telegram Bot API client: long polling and plain message sending.

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::TelegramSettings;
use crate::reply::{ParseMode, Replier};

/// Slack added to the long-poll timeout before the HTTP request is abandoned.
const POLL_GRACE: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("Telegram API error: {description}")]
    Api { description: String },

    /// The wrapped error never carries the request URL.
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    #[error("Unexpected response from Telegram API: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type TelegramResult<T> = std::result::Result<T, TelegramError>;

impl TelegramError {
    /// Every request URL contains the bot token, so it is stripped here.
    fn http(error: reqwest::Error) -> Self {
        TelegramError::Http(error.without_url())
    }
}

/// Envelope wrapping every Bot API response.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
struct GetUpdatesRequest<'a> {
    offset: i64,
    timeout: u64,
    allowed_updates: &'a [&'a str],
}

#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<&'static str>,
}

#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    /// `{api_url}/bot{token}`. Holds the token, so it is never logged.
    base_url: String,
    poll_timeout: Duration,
}

impl TelegramClient {
    pub fn new(settings: &TelegramSettings) -> TelegramResult<Self> {
        let poll_timeout = Duration::from_secs(settings.poll_timeout_secs);
        let client = Client::builder()
            .timeout(poll_timeout + POLL_GRACE)
            .user_agent(concat!("codebot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(TelegramError::http)?;

        Ok(Self {
            client,
            base_url: format!(
                "{}/bot{}",
                settings.api_url.trim_end_matches('/'),
                settings.token
            ),
            poll_timeout,
        })
    }

    /// The bot's own account.
    pub async fn get_me(&self) -> TelegramResult<User> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Long-polls for updates with an id of at least `offset`.
    pub async fn get_updates(&self, offset: i64) -> TelegramResult<Vec<Update>> {
        let request = GetUpdatesRequest {
            offset,
            timeout: self.poll_timeout.as_secs(),
            allowed_updates: &["message"],
        };
        self.call("getUpdates", &request).await
    }

    pub async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        mode: ParseMode,
    ) -> TelegramResult<Message> {
        let request = SendMessageRequest {
            chat_id,
            text,
            parse_mode: mode.as_api_str(),
        };
        self.call("sendMessage", &request).await
    }

    async fn call<T, B>(&self, method: &str, body: &B) -> TelegramResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        debug!("Telegram API call: {}", method);

        let response = self
            .client
            .post(format!("{}/{}", self.base_url, method))
            .json(body)
            .send()
            .await
            .map_err(TelegramError::http)?;

        // The Bot API reports failures in the body, with a non-2xx status.
        let text = response.text().await.map_err(TelegramError::http)?;
        let envelope: ApiResponse<T> = serde_json::from_str(&text)?;

        match (envelope.ok, envelope.result) {
            (true, Some(result)) => Ok(result),
            (_, _) => Err(TelegramError::Api {
                description: envelope
                    .description
                    .unwrap_or_else(|| format!("{} failed without description", method)),
            }),
        }
    }
}

#[async_trait]
impl Replier for TelegramClient {
    async fn send_message(&self, chat_id: i64, text: &str, mode: ParseMode) -> AnyResult<()> {
        self.send_text(chat_id, text, mode).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_message_request_omits_plain_mode() {
        let request = SendMessageRequest {
            chat_id: 42,
            text: "hi",
            parse_mode: ParseMode::Plain.as_api_str(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"chat_id": 42, "text": "hi"}));
    }

    #[test]
    fn test_update_without_message() {
        let update: Update = serde_json::from_str(r#"{"update_id": 7}"#).unwrap();
        assert_eq!(update.update_id, 7);
        assert!(update.message.is_none());
    }
}
