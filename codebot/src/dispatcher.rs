//! Routes parsed commands to the inference backend and sends the replies.

use anyhow::Result;
use codebot_core::{escape_markdown_v2, InferenceBackend, TaskKind};
use std::sync::Arc;
use tracing::info;

use crate::command::{Command, Invocation};
use crate::reply::{ParseMode, Replier};

pub const START_MESSAGE: &str = "Hi! I am your Python coding assistant, powered by a local Ollama model. \
You can ask me to analyze, fix or write code.\n\n\
Use:\n\
<code>/analyze &lt;code&gt;</code> - analyze code\n\
<code>/fix &lt;code&gt;</code> - fix code\n\
<code>/write &lt;task description&gt;</code> - generate code";

pub const HELP_MESSAGE: &str = "I can help you with Python code:\n\
<code>/analyze &lt;code&gt;</code> - analyze the given Python code.\n\
<code>/fix &lt;code&gt;</code> - try to fix bugs in the given Python code.\n\
<code>/write &lt;task description&gt;</code> - generate Python code from a description.\n\n\
Example: <code>/analyze print(\"Hello World!\")</code>\n\
Example: <code>/fix def foo(x): print(x / 0)</code>\n\
Example: <code>/write a function that computes the factorial of a number</code>";

/// MarkdownV2 reply for a task command given without arguments.
pub fn usage_reply(kind: TaskKind) -> String {
    escape_markdown_v2(kind.usage_message())
}

/// MarkdownV2 reply carrying the rendered model output under the operation label.
pub fn final_reply(kind: TaskKind, rendered: &str) -> String {
    format!("{}\n{}", escape_markdown_v2(kind.reply_label()), rendered)
}

#[derive(Clone)]
pub struct Dispatcher {
    backend: Arc<dyn InferenceBackend>,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn InferenceBackend>) -> Self {
        Self { backend }
    }

    /// Handles one command end to end. Errors only come from sending replies.
    pub async fn dispatch(
        &self,
        chat_id: i64,
        invocation: &Invocation,
        replier: &dyn Replier,
    ) -> Result<()> {
        match invocation.command {
            Command::Start => {
                replier
                    .send_message(chat_id, START_MESSAGE, ParseMode::Html)
                    .await
            }
            Command::Help => {
                replier
                    .send_message(chat_id, HELP_MESSAGE, ParseMode::Html)
                    .await
            }
            Command::Task(kind) => self.run_task(chat_id, kind, &invocation.args, replier).await,
        }
    }

    async fn run_task(
        &self,
        chat_id: i64,
        kind: TaskKind,
        args: &str,
        replier: &dyn Replier,
    ) -> Result<()> {
        if args.trim().is_empty() {
            return replier
                .send_message(chat_id, &usage_reply(kind), ParseMode::MarkdownV2)
                .await;
        }

        replier
            .send_message(chat_id, kind.progress_message(), ParseMode::Plain)
            .await?;

        info!("Running {} task ({} chars of input)", kind, args.chars().count());
        let rendered = self.backend.infer(kind.request(args)).await;

        replier
            .send_message(chat_id, &final_reply(kind, &rendered), ParseMode::MarkdownV2)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_reply_is_escaped() {
        assert_eq!(
            usage_reply(TaskKind::Analyze),
            "Please provide code to analyze\\. Example: /analyze print\\('Hello'\\)"
        );
    }

    #[test]
    fn test_final_reply_layout() {
        let reply = final_reply(TaskKind::Fix, "```python\nx = 1\n```");
        assert_eq!(reply, "Fixed code:\n```python\nx = 1\n```");
    }

    #[test]
    fn test_static_messages_use_html_entities() {
        for text in [START_MESSAGE, HELP_MESSAGE] {
            assert!(text.contains("&lt;code&gt;"));
            assert!(!text.contains("<code>/analyze <"));
        }
    }
}
