//! Codebot SDK
//!
//! This crate provides the client codebot uses to talk to a locally hosted
//! [Ollama](https://ollama.com) server.
//!
//! # Features
//!
//! - **One call shape**: non-streaming `POST /api/generate` with temperature and a
//!   generation cap
//! - **No failures past the boundary**: every result is an [`InferenceOutcome`],
//!   rendered into MarkdownV2-safe text by [`InferenceBackend::infer`]
//! - **Model check**: `GET /api/tags` to verify the configured model is pulled
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use codebot_core::{InferenceBackend, TaskKind};
//! use codebot_sdk::{OllamaClient, OllamaConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = OllamaConfig::new("http://localhost:11434").with_model("codellama");
//!     let client = OllamaClient::new(config)?;
//!
//!     let reply = client.infer(TaskKind::Write.request("a factorial function")).await;
//!     println!("{}", reply);
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! [`OllamaClient::generate`] classifies failures instead of returning them:
//!
//! ```rust,no_run
//! use codebot_core::{InferenceOutcome, TaskKind};
//! use codebot_sdk::OllamaClient;
//!
//! async fn report(client: &OllamaClient) {
//!     match client.generate(&TaskKind::Fix.request("print(x")).await {
//!         InferenceOutcome::Success(text) => println!("{}", text),
//!         InferenceOutcome::NetworkFailure(detail) => eprintln!("Unreachable: {}", detail),
//!         InferenceOutcome::StatusFailure { code, body } => eprintln!("{}: {}", code, body),
//!         InferenceOutcome::UnknownFailure(detail) => eprintln!("Other error: {}", detail),
//!     }
//! }
//! ```

#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;

pub use client::{ModelTag, OllamaClient, TagsResponse, GENERATE_PATH, TAGS_PATH};
pub use config::{OllamaConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use error::{SdkError, SdkResult};

pub use codebot_core::{InferenceBackend, InferenceOutcome};
