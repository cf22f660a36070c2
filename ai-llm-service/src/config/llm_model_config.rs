use std::fmt;

/// Sampling knobs sent with every generation request.
///
/// The values are fixed per process; there is no per-call override.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingConfig {
    /// Upper bound on generated tokens (`max_new_tokens`).
    pub max_new_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling cutoff.
    pub top_p: f32,
    /// Whether sampling is enabled at all (`false` = greedy).
    pub do_sample: bool,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            max_new_tokens: 256,
            temperature: 0.7,
            top_p: 0.95,
            do_sample: true,
        }
    }
}

/// Configuration for the text-generation endpoint.
///
/// A value of this type only exists when a credential is configured; the
/// absence of a credential is represented by `Option::None` one level up.
///
/// # Fields
///
/// - `model`: model identifier appended to the endpoint
///   (e.g. `"mistralai/Mixtral-8x7B-Instruct-v0.1"`).
/// - `endpoint`: inference API base URL.
/// - `api_key`: bearer credential.
/// - `sampling`: fixed sampling configuration.
/// - `timeout_secs`: request timeout in seconds.
#[derive(Clone, PartialEq)]
pub struct LlmModelConfig {
    /// Model identifier string.
    pub model: String,

    /// Inference API base URL.
    pub endpoint: String,

    /// Bearer credential for the inference API.
    pub api_key: String,

    /// Fixed sampling parameters.
    pub sampling: SamplingConfig,

    /// Request timeout (in seconds).
    pub timeout_secs: u64,
}

impl fmt::Debug for LlmModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmModelConfig")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("sampling", &self.sampling)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_the_key() {
        let cfg = LlmModelConfig {
            model: "m".into(),
            endpoint: "http://localhost".into(),
            api_key: "hf_secret".into(),
            sampling: SamplingConfig::default(),
            timeout_secs: 30,
        };
        let out = format!("{cfg:?}");
        assert!(!out.contains("hf_secret"));
        assert!(out.contains("<redacted>"));
    }
}
