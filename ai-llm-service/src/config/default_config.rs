//! Default generation config loaded from environment variables.
//!
//! Generation is optional: without `HUGGINGFACE_API_KEY` the loader returns
//! `Ok(None)` and callers answer every event with a canned response.
//!
//! # Environment variables
//!
//! - `HUGGINGFACE_API_KEY`  = bearer credential (optional, gates generation)
//! - `HUGGINGFACE_API_BASE` = inference API base (default [`DEFAULT_ENDPOINT`])
//! - `HUGGINGFACE_MODEL`    = model identifier (default [`DEFAULT_MODEL`])
//! - `LLM_MAX_TOKENS`       = optional `max_new_tokens` override (u32)
//! - `LLM_TIMEOUT_SECS`     = optional request timeout override (u64)

use crate::{
    config::llm_model_config::{LlmModelConfig, SamplingConfig},
    error_handler::{
        AiLlmError, ConfigError, env_opt, parse_opt_u32, parse_opt_u64, validate_http_endpoint,
    },
};

/// Hosted inference API base.
pub const DEFAULT_ENDPOINT: &str = "https://api-inference.huggingface.co/models";

/// Instruction-tuned model the prompts are written for.
pub const DEFAULT_MODEL: &str = "mistralai/Mixtral-8x7B-Instruct-v0.1";

/// Upper bound for a single generation round-trip.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Builds the generation config from the process environment.
///
/// # Errors
/// - [`ConfigError::InvalidFormat`] if `HUGGINGFACE_API_BASE` is not http(s)
/// - [`ConfigError::InvalidNumber`] if a numeric override does not parse
pub fn config_hugging_face() -> Result<Option<LlmModelConfig>, AiLlmError> {
    config_hugging_face_from(env_opt)
}

/// Same as [`config_hugging_face`], reading variables through `lookup`.
///
/// `lookup` must return `None` for unset or blank variables.
pub fn config_hugging_face_from<F>(lookup: F) -> Result<Option<LlmModelConfig>, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(api_key) = lookup("HUGGINGFACE_API_KEY") else {
        return Ok(None);
    };

    let endpoint = lookup("HUGGINGFACE_API_BASE").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
    validate_http_endpoint("HUGGINGFACE_API_BASE", &endpoint)?;

    let model = lookup("HUGGINGFACE_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
    if model.trim().is_empty() {
        return Err(ConfigError::EmptyModel.into());
    }

    let mut sampling = SamplingConfig::default();
    if let Some(max) = parse_opt_u32("LLM_MAX_TOKENS", lookup("LLM_MAX_TOKENS").as_deref())? {
        sampling.max_new_tokens = max;
    }

    let timeout_secs = parse_opt_u64("LLM_TIMEOUT_SECS", lookup("LLM_TIMEOUT_SECS").as_deref())?
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    Ok(Some(LlmModelConfig {
        model: model.trim().to_string(),
        endpoint: endpoint.trim().to_string(),
        api_key,
        sampling,
        timeout_secs,
    }))
}
