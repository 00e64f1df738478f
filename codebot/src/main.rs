use anyhow::{Context, Result};
use codebot::{Bot, Config, Dispatcher, TelegramClient};
use codebot_sdk::OllamaClient;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    // Initialize tracing
    let level = config.log_level.as_str();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("codebot={level},codebot_sdk={level},codebot_core={level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Configuration loaded");

    let ollama = OllamaClient::new(config.ollama_config())
        .context("Failed to create Ollama client")?;
    info!(
        "Using Ollama model '{}' at {}",
        config.ollama.model, config.ollama.base_url
    );

    match ollama.has_model().await {
        Ok(true) => {}
        Ok(false) => warn!(
            "Model '{}' is not pulled on the Ollama server, requests will fail until it is",
            config.ollama.model
        ),
        Err(e) => warn!("Could not check Ollama models: {}", e),
    }

    let telegram = Arc::new(
        TelegramClient::new(&config.telegram).context("Failed to create Telegram client")?,
    );
    let me = telegram
        .get_me()
        .await
        .context("Failed to reach the Telegram Bot API, check the bot token")?;
    info!("Authorized as @{}", me.username.as_deref().unwrap_or("unknown"));

    let dispatcher = Dispatcher::new(Arc::new(ollama));
    let mut bot = Bot::new(telegram, dispatcher);
    if let Some(username) = me.username {
        bot = bot.with_username(username);
    }

    bot.run(shutdown_signal()).await;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}
