use async_trait::async_trait;

use crate::domain::TaskRequest;

/// Something that turns a task into reply text.
///
/// Implementations never fail: every error is folded into the returned text,
/// already escaped for MarkdownV2.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    async fn infer(&self, request: TaskRequest) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskKind;
    use std::sync::Arc;

    struct Canned(&'static str);

    #[async_trait]
    impl InferenceBackend for Canned {
        async fn infer(&self, _request: TaskRequest) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn test_backend_as_trait_object() {
        let backend: Arc<dyn InferenceBackend> = Arc::new(Canned("done"));
        let reply = tokio_test::block_on(backend.infer(TaskKind::Fix.request("x = 1")));
        assert_eq!(reply, "done");
    }
}
