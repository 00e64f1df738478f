use crate::format::{escape_markdown_v2, extract_code_blocks, FenceLabel};

/// Result of one call to the inference backend. Exactly one variant per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferenceOutcome {
    /// The backend answered; holds the generated text.
    Success(String),
    /// The backend could not be reached or the connection failed mid-call.
    NetworkFailure(String),
    /// The backend answered with a non-success status.
    StatusFailure { code: u16, body: String },
    /// Anything else, including a response that could not be parsed.
    UnknownFailure(String),
}

impl InferenceOutcome {
    /// Human-readable, unescaped description of a failure. `None` on success.
    pub fn failure_message(&self, model: &str) -> Option<String> {
        match self {
            InferenceOutcome::Success(_) => None,
            InferenceOutcome::NetworkFailure(detail) => Some(format!(
                "A network error occurred while contacting Ollama: {}. \
                 Please check that Ollama is running and the model '{}' is available.",
                detail, model
            )),
            InferenceOutcome::StatusFailure { code, body } => Some(format!(
                "Ollama returned an error: {}: {}. \
                 The model '{}' may not be pulled or its name may be wrong.",
                code, body, model
            )),
            InferenceOutcome::UnknownFailure(detail) => Some(format!(
                "An unknown error occurred while contacting the Ollama API: {}. \
                 Please try again later or contact the developer.",
                detail
            )),
        }
    }

    /// Renders the outcome as MarkdownV2 text ready for delivery.
    ///
    /// Successful output goes through code-block extraction; failures are escaped
    /// diagnostics. Never fails.
    pub fn render(&self, model: &str, label: &FenceLabel) -> String {
        match self {
            InferenceOutcome::Success(text) => extract_code_blocks(text, label),
            failure => escape_markdown_v2(&failure.failure_message(model).unwrap_or_default()),
        }
    }
}
