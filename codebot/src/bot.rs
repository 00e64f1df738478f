//! Long-polling loop that turns Telegram updates into dispatched commands.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::command::Invocation;
use crate::dispatcher::Dispatcher;
use crate::telegram::{TelegramClient, Update};

/// Pause after a failed `getUpdates` call.
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// How long in-flight commands may keep running once polling has stopped.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

pub struct Bot {
    telegram: Arc<TelegramClient>,
    dispatcher: Dispatcher,
    username: Option<String>,
    error_backoff: Duration,
    drain_timeout: Duration,
}

impl Bot {
    pub fn new(telegram: Arc<TelegramClient>, dispatcher: Dispatcher) -> Self {
        Self {
            telegram,
            dispatcher,
            username: None,
            error_backoff: POLL_ERROR_BACKOFF,
            drain_timeout: DRAIN_TIMEOUT,
        }
    }

    /// Only commands addressed to this username (or to nobody) are handled.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_error_backoff(mut self, backoff: Duration) -> Self {
        self.error_backoff = backoff;
        self
    }

    pub fn with_drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = timeout;
        self
    }

    /// Polls until `shutdown` resolves. Commands run concurrently in their own tasks;
    /// after shutdown they get up to the drain timeout to deliver their replies.
    pub async fn run<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut offset = 0;
        let mut tasks = JoinSet::new();

        info!("Bot started, waiting for commands");

        loop {
            let updates = tokio::select! {
                _ = &mut shutdown => break,
                result = self.telegram.get_updates(offset) => result,
            };

            // Reap finished commands so the set only holds running ones.
            while tasks.try_join_next().is_some() {}

            match updates {
                Ok(updates) => {
                    for update in updates {
                        offset = offset.max(update.update_id + 1);
                        self.handle(&update, &mut tasks);
                    }
                }
                Err(e) => {
                    warn!("Failed to fetch updates: {}", e);
                    tokio::select! {
                        _ = &mut shutdown => break,
                        _ = tokio::time::sleep(self.error_backoff) => {}
                    }
                }
            }
        }

        info!("Bot stopped polling");
        self.drain(tasks).await;
    }

    async fn drain(&self, mut tasks: JoinSet<()>) {
        if tasks.is_empty() {
            return;
        }

        info!("Waiting for {} in-flight commands", tasks.len());
        let finished = tokio::time::timeout(self.drain_timeout, async {
            while let Some(result) = tasks.join_next().await {
                if let Err(e) = result {
                    warn!("Command task failed: {}", e);
                }
            }
        })
        .await;

        match finished {
            Ok(()) => info!("All in-flight commands finished"),
            Err(_) => {
                warn!(
                    "Drain timed out after {:?}, abandoning {} commands",
                    self.drain_timeout,
                    tasks.len()
                );
                tasks.abort_all();
            }
        }
    }

    fn handle(&self, update: &Update, tasks: &mut JoinSet<()>) {
        let Some((chat_id, invocation)) = route(update, self.username.as_deref()) else {
            debug!("Ignoring update {}", update.update_id);
            return;
        };

        let span = info_span!(
            "command",
            request_id = %Uuid::new_v4(),
            command = invocation.command.name(),
            chat_id
        );
        let dispatcher = self.dispatcher.clone();
        let telegram = Arc::clone(&self.telegram);

        tasks.spawn(
            async move {
                if let Err(e) = dispatcher
                    .dispatch(chat_id, &invocation, telegram.as_ref())
                    .await
                {
                    error!("Failed to deliver reply: {:#}", e);
                }
            }
            .instrument(span),
        );
    }
}

/// Extracts the chat and command from an update, if it carries one.
pub fn route(update: &Update, bot_username: Option<&str>) -> Option<(i64, Invocation)> {
    let message = update.message.as_ref()?;
    let text = message.text.as_deref()?;
    let invocation = Invocation::parse(text, bot_username)?;
    Some((message.chat.id, invocation))
}
