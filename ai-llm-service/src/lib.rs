//! Text generation against the Hugging Face Inference API.
//!
//! The crate exposes one client, [`HuggingFaceService`], plus the env-driven
//! loader [`config_hugging_face`]. A missing credential is not an error: the
//! loader yields `Ok(None)` and callers fall back to canned text.

pub mod config;
pub mod error_handler;
pub mod services;
pub mod telemetry;

pub use config::default_config::config_hugging_face;
pub use config::llm_model_config::{LlmModelConfig, SamplingConfig};
pub use error_handler::{AiLlmError, Result};
pub use services::hugging_face_service::HuggingFaceService;
