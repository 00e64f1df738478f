use serde::{Deserialize, Serialize};

use super::task::TaskRequest;

/// Generation cap used when none is configured.
pub const DEFAULT_NUM_PREDICT: u32 = 1500;

/// Body of a non-streaming `POST /api/generate` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferencePayload {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    pub options: GenerationOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub temperature: f64,
    /// Upper bound on generated tokens.
    pub num_predict: u32,
}

impl InferencePayload {
    pub fn from_request(request: &TaskRequest, model: impl Into<String>, num_predict: u32) -> Self {
        Self {
            model: model.into(),
            prompt: request.prompt(),
            stream: false,
            options: GenerationOptions {
                temperature: request.temperature,
                num_predict,
            },
        }
    }
}

/// The part of the generate response we read. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub done: bool,
}
