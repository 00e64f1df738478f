use anyhow::Result;
use async_trait::async_trait;
use codebot::dispatcher::{HELP_MESSAGE, START_MESSAGE};
use codebot::{Command, Dispatcher, Invocation, ParseMode, Replier};
use codebot_core::{InferenceBackend, TaskKind, TaskRequest};
use codebot_sdk::{OllamaClient, OllamaConfig};
use mockall::mock;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ===== Test Helpers =====

mock! {
    pub Backend {}

    #[async_trait]
    impl InferenceBackend for Backend {
        async fn infer(&self, request: TaskRequest) -> String;
    }
}

#[derive(Default)]
struct RecordingReplier {
    sent: Mutex<Vec<(i64, String, ParseMode)>>,
}

impl RecordingReplier {
    fn sent(&self) -> Vec<(i64, String, ParseMode)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Replier for RecordingReplier {
    async fn send_message(&self, chat_id: i64, text: &str, mode: ParseMode) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((chat_id, text.to_string(), mode));
        Ok(())
    }
}

struct FailingReplier;

#[async_trait]
impl Replier for FailingReplier {
    async fn send_message(&self, _chat_id: i64, _text: &str, _mode: ParseMode) -> Result<()> {
        anyhow::bail!("chat not found")
    }
}

fn task(kind: TaskKind, args: &str) -> Invocation {
    Invocation {
        command: Command::Task(kind),
        args: args.to_string(),
    }
}

// ===== Static Commands =====

#[rstest]
#[case(Command::Start, START_MESSAGE)]
#[case(Command::Help, HELP_MESSAGE)]
#[tokio::test]
async fn test_static_commands_reply_in_html(#[case] command: Command, #[case] expected: &str) {
    let mut backend = MockBackend::new();
    backend.expect_infer().never();
    let dispatcher = Dispatcher::new(Arc::new(backend));
    let replier = RecordingReplier::default();

    let invocation = Invocation {
        command,
        args: String::new(),
    };
    dispatcher.dispatch(7, &invocation, &replier).await.unwrap();

    assert_eq!(replier.sent(), vec![(7, expected.to_string(), ParseMode::Html)]);
}

// ===== Task Commands =====

#[rstest]
#[case(TaskKind::Analyze)]
#[case(TaskKind::Fix)]
#[case(TaskKind::Write)]
#[tokio::test]
async fn test_empty_arguments_send_usage_without_backend_call(#[case] kind: TaskKind) {
    let mut backend = MockBackend::new();
    backend.expect_infer().never();
    let dispatcher = Dispatcher::new(Arc::new(backend));
    let replier = RecordingReplier::default();

    dispatcher.dispatch(1, &task(kind, ""), &replier).await.unwrap();

    let sent = replier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1, codebot::dispatcher::usage_reply(kind));
    assert_eq!(sent[0].2, ParseMode::MarkdownV2);
}

#[rstest]
#[case(TaskKind::Analyze, 0.7)]
#[case(TaskKind::Fix, 0.3)]
#[case(TaskKind::Write, 0.8)]
#[tokio::test]
async fn test_task_uses_kind_temperature(#[case] kind: TaskKind, #[case] temperature: f64) {
    let mut backend = MockBackend::new();
    backend
        .expect_infer()
        .withf(move |request: &TaskRequest| {
            request.temperature == temperature && request.user_content.contains("x = 1")
        })
        .times(1)
        .returning(|_| "```python\nx = 1\n```".to_string());
    let dispatcher = Dispatcher::new(Arc::new(backend));
    let replier = RecordingReplier::default();

    dispatcher
        .dispatch(5, &task(kind, "x = 1"), &replier)
        .await
        .unwrap();

    let sent = replier.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(
        sent[0],
        (5, kind.progress_message().to_string(), ParseMode::Plain)
    );
    assert_eq!(
        sent[1],
        (
            5,
            format!("{}\n```python\nx = 1\n```", kind.reply_label()),
            ParseMode::MarkdownV2
        )
    );
}

#[tokio::test]
async fn test_delivery_failure_is_reported() {
    let mut backend = MockBackend::new();
    backend.expect_infer().never();
    let dispatcher = Dispatcher::new(Arc::new(backend));

    let result = dispatcher
        .dispatch(1, &task(TaskKind::Fix, "x = 1"), &FailingReplier)
        .await;
    assert!(result.is_err());
}

// ===== End to End With Ollama =====

#[tokio::test]
async fn test_analyze_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Looks fine.\n```python\nprint(1)\n```\nNothing to add.",
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OllamaClient::new(OllamaConfig::new(server.uri())).unwrap();
    let dispatcher = Dispatcher::new(Arc::new(client));
    let replier = RecordingReplier::default();

    let invocation = Invocation::parse("/analyze print(1)", None).unwrap();
    dispatcher.dispatch(42, &invocation, &replier).await.unwrap();

    let sent = replier.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].1, "Analysis result:\n```python\nprint(1)\n```");
    assert_eq!(sent[1].1.matches("```").count(), 2);
}

#[tokio::test]
async fn test_backend_failure_is_sent_as_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(404).set_body_string("model not found"))
        .mount(&server)
        .await;

    let client = OllamaClient::new(OllamaConfig::new(server.uri())).unwrap();
    let dispatcher = Dispatcher::new(Arc::new(client));
    let replier = RecordingReplier::default();

    dispatcher
        .dispatch(42, &task(TaskKind::Write, "a sorting function"), &replier)
        .await
        .unwrap();

    let reply = &replier.sent()[1].1;
    assert!(reply.starts_with("Generated code:\n"));
    assert!(reply.contains("404"));
    assert!(reply.contains("model not found"));
}
