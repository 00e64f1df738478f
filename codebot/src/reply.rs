use anyhow::Result;
use async_trait::async_trait;

/// Markup dialect of an outgoing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// No markup; the text is shown as is.
    Plain,
    /// Tag-based markup, used for the static help texts.
    Html,
    /// Escape-based markup, used for model replies.
    MarkdownV2,
}

impl ParseMode {
    /// Value of the `parse_mode` field in the Bot API, `None` for plain text.
    pub fn as_api_str(&self) -> Option<&'static str> {
        match self {
            ParseMode::Plain => None,
            ParseMode::Html => Some("HTML"),
            ParseMode::MarkdownV2 => Some("MarkdownV2"),
        }
    }
}

/// Sends messages back to a chat.
#[async_trait]
pub trait Replier: Send + Sync {
    async fn send_message(&self, chat_id: i64, text: &str, mode: ParseMode) -> Result<()>;
}
