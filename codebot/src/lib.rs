//! Telegram bot that analyzes, fixes and writes code with a local Ollama model.

pub mod bot;
pub mod command;
pub mod config;
pub mod dispatcher;
pub mod reply;
pub mod telegram;

pub use bot::Bot;
pub use command::{Command, Invocation};
pub use config::Config;
pub use dispatcher::Dispatcher;
pub use reply::{ParseMode, Replier};
pub use telegram::{TelegramClient, TelegramError};
