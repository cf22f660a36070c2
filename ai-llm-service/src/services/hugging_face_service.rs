//! Hugging Face Inference API client for text generation.
//!
//! Minimal, non-streaming client. The endpoint is derived from
//! `LlmModelConfig`:
//! - POST {endpoint}/{model}: text generation
//!
//! The prompt is wrapped in the Mixtral instruction format before it is sent,
//! and leftover delimiters are stripped from the generated text before it is
//! returned. Callers still run their own output sanitizer on the result.
//!
//! # Examples
//!
//! ```no_run
//! use ai_llm_service::config::llm_model_config::{LlmModelConfig, SamplingConfig};
//! use ai_llm_service::services::hugging_face_service::HuggingFaceService;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = HuggingFaceService::new(LlmModelConfig {
//!     model: "mistralai/Mixtral-8x7B-Instruct-v0.1".into(),
//!     endpoint: "https://api-inference.huggingface.co/models".into(),
//!     api_key: "hf_...".into(),
//!     sampling: SamplingConfig::default(),
//!     timeout_secs: 30,
//! })?;
//!
//! let text = svc.generate("Review this haiku about Rust.").await?;
//! println!("{text}");
//! # Ok(()) }
//! ```

use std::{
    sync::OnceLock,
    time::{Duration, Instant},
};

use regex::Regex;
use reqwest::header;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, instrument};

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{
        AiLlmError, ConfigError, EndpointError, ParseError, Result, make_snippet,
        validate_http_endpoint,
    },
};

/// Delimiter patterns the model may echo back.
struct Markers {
    /// A whole echoed instruction block, `<s>[INST] ... [/INST]`.
    instruction_block: Regex,
    /// `[INST]` / `[/INST]` left behind anywhere.
    inst_tag: Regex,
    /// `<s>` / `</s>` at the very start or end only; inside the text they may
    /// be an HTML tag the reply talks about.
    edge_sentence: Regex,
    /// Tool-ish backtick prefix some models emit, e.g. "`ksp ".
    backtick_prefix: Regex,
}

static MARKERS_CELL: OnceLock<Markers> = OnceLock::new();

fn markers() -> &'static Markers {
    MARKERS_CELL.get_or_init(|| Markers {
        instruction_block: Regex::new(r"(?s)<s>\s*\[INST\].*?\[/INST\]")
            .expect("valid instruction block regex"),
        inst_tag: Regex::new(r"\[/?INST\]").expect("valid inst tag regex"),
        edge_sentence: Regex::new(r"^\s*(?:</?s>\s*)+|(?:\s*</?s>)+\s*$")
            .expect("valid sentence marker regex"),
        backtick_prefix: Regex::new(r"^`[a-z]+\s+").expect("valid prefix regex"),
    })
}

/// Thin client for the Hugging Face Inference API.
///
/// Constructed from a complete [`LlmModelConfig`]. Internally keeps a
/// preconfigured `reqwest::Client` (with timeout and default headers), so a
/// single instance can be shared behind an `Arc`.
#[derive(Debug)]
pub struct HuggingFaceService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_generate: String,
    timeout: Duration,
}

impl HuggingFaceService {
    /// Creates a new [`HuggingFaceService`] from the given config.
    ///
    /// # Errors
    /// - [`ConfigError::InvalidFormat`] if the endpoint is not http(s) or the
    ///   key is not a valid header value
    /// - [`ConfigError::EmptyModel`] if the model identifier is empty
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self> {
        validate_http_endpoint("HUGGINGFACE_API_BASE", &cfg.endpoint)?;
        let endpoint = cfg.endpoint.trim();

        let model = cfg.model.trim().trim_matches('/');
        if model.is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }

        let timeout = Duration::from_secs(cfg.timeout_secs.max(1));

        let mut headers = header::HeaderMap::new();
        let mut auth = header::HeaderValue::from_str(&format!("Bearer {}", cfg.api_key))
            .map_err(|_| ConfigError::InvalidFormat {
                var: "HUGGINGFACE_API_KEY",
                reason: "not a valid header value",
            })?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let url_generate = format!("{}/{}", endpoint.trim_end_matches('/'), model);

        info!(
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = timeout.as_secs(),
            "HuggingFaceService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_generate,
            timeout,
        })
    }

    /// Model identifier this client talks to.
    pub fn model(&self) -> &str {
        &self.cfg.model
    }

    /// Performs one **non-streaming** generation request.
    ///
    /// Exactly one network round-trip; no retries.
    ///
    /// # Errors
    /// - [`AiLlmError::Endpoint`] for non-2xx responses
    /// - [`AiLlmError::Timeout`] when the configured timeout elapses
    /// - [`AiLlmError::HttpTransport`] for other client/network failures
    /// - [`AiLlmError::Parse`] if the body has no recognizable generated text
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let started = Instant::now();
        let inputs = wrap_instruction(prompt);
        let body = GenerationRequest::from_cfg(&self.cfg, &inputs);

        debug!(prompt_len = prompt.len(), "POST {}", self.url_generate);

        let resp = self
            .client
            .post(&self.url_generate)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let snippet = make_snippet(&text);
            error!(
                %status,
                url = %self.url_generate,
                %snippet,
                latency_ms = started.elapsed().as_millis(),
                "inference endpoint returned non-success status"
            );
            return Err(EndpointError::HttpStatus {
                status,
                url: self.url_generate.clone(),
                snippet,
            }
            .into());
        }

        let generated = extract_generated_text(&text)?;
        let cleaned = strip_instruction_markers(&generated);
        if cleaned.is_empty() {
            return Err(ParseError::EmptyText.into());
        }

        info!(
            latency_ms = started.elapsed().as_millis(),
            output_len = cleaned.len(),
            "text generation completed"
        );

        Ok(cleaned)
    }

    fn transport_error(&self, e: reqwest::Error) -> AiLlmError {
        if e.is_timeout() {
            AiLlmError::Timeout(self.timeout)
        } else {
            AiLlmError::HttpTransport(e)
        }
    }
}

/// Wraps a prompt in the Mixtral instruction delimiters.
pub fn wrap_instruction(prompt: &str) -> String {
    format!("<s>[INST] {prompt} [/INST]</s>")
}

/// Removes echoed instruction blocks and stray delimiters, then trims.
pub fn strip_instruction_markers(text: &str) -> String {
    let m = markers();
    let without_block = m.instruction_block.replace_all(text, "");
    let without_inst = m.inst_tag.replace_all(&without_block, "");
    let without_markers = m.edge_sentence.replace_all(&without_inst, "");
    m.backtick_prefix
        .replace(without_markers.trim(), "")
        .trim()
        .to_string()
}

/// Decodes a raw response body into the generated text.
///
/// # Errors
/// - [`ParseError::Decode`] if the body is not JSON
/// - [`ParseError::UnrecognizedShape`] if no known shape matches
/// - [`ParseError::EmptyText`] if the extracted text is blank
pub fn extract_generated_text(body: &str) -> Result<String> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ParseError::Decode(format!("serde error: {e}")))?;

    let shape = InferenceResponse::deserialize(value)
        .map_err(|_| ParseError::UnrecognizedShape(make_snippet(body)))?;

    let text = shape
        .into_text()
        .ok_or_else(|| ParseError::UnrecognizedShape(make_snippet(body)))?;

    if text.trim().is_empty() {
        return Err(ParseError::EmptyText.into());
    }
    Ok(text)
}

/* ===========================================================================
HTTP payloads
======================================================================== */

/// Request body for text generation.
#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

impl<'a> GenerationRequest<'a> {
    /// Builds the request from config and the already wrapped prompt.
    fn from_cfg(cfg: &LlmModelConfig, inputs: &'a str) -> Self {
        Self {
            inputs,
            parameters: GenerationParameters {
                max_new_tokens: cfg.sampling.max_new_tokens,
                temperature: cfg.sampling.temperature,
                top_p: cfg.sampling.top_p,
                do_sample: cfg.sampling.do_sample,
                return_full_text: false,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    max_new_tokens: u32,
    temperature: f32,
    top_p: f32,
    do_sample: bool,
    /// Generation-only output; the prompt is not echoed back.
    return_full_text: bool,
}

/// The closed set of response shapes this client understands.
///
/// Variant order matters: an object carrying both `generated_text` and
/// `choices` is read as [`InferenceResponse::Generated`].
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    /// `[ {"generated_text": "..."} ]` or `[ "..." ]`
    Sequence(Vec<Value>),
    /// `{"generated_text": "..."}`
    Generated { generated_text: String },
    /// `{"choices": [ {"text": "..."} ]}`
    Choices { choices: Vec<Value> },
}

/// First element of a [`InferenceResponse::Sequence`].
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SequenceItem {
    Generated { generated_text: String },
    Text(String),
}

#[derive(Debug, Deserialize)]
struct ChoiceItem {
    text: String,
}

impl InferenceResponse {
    fn into_text(self) -> Option<String> {
        match self {
            Self::Sequence(items) => {
                let first = items.into_iter().next()?;
                match serde_json::from_value::<SequenceItem>(first).ok()? {
                    SequenceItem::Generated { generated_text } => Some(generated_text),
                    SequenceItem::Text(text) => Some(text),
                }
            }
            Self::Generated { generated_text } => Some(generated_text),
            Self::Choices { choices } => {
                let first = choices.into_iter().next()?;
                serde_json::from_value::<ChoiceItem>(first)
                    .ok()
                    .map(|c| c.text)
            }
        }
    }
}
