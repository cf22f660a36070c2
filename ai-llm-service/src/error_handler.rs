//! Unified error handling for `ai-llm-service`.
//!
//! This module exposes a single top-level error type [`AiLlmError`] for the whole
//! library, and groups domain-specific errors in nested enums ([`ConfigError`],
//! [`EndpointError`], [`ParseError`]). Small helpers for reading/validating
//! environment variables are provided and return the unified [`Result<T>`] alias.
//!
//! All messages include the suffix `[AI LLM Service]` to simplify attribution in logs.

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, AiLlmError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `ai-llm-service` crate.
///
/// Callers usually do not branch on the variant: every generation failure is
/// answered with a canned response. The split exists for logs and tests.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AiLlmError {
    /// Configuration/validation errors (startup).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The endpoint answered, but not with a success status.
    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    /// The endpoint answered 2xx, but the body could not be interpreted.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Underlying HTTP transport error (DNS, connect, reset).
    #[error("[AI LLM Service] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),

    /// Operation exceeded the configured timeout.
    #[error("[AI LLM Service] operation timed out after {0:?}")]
    Timeout(Duration),
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A number failed to parse (like limits, timeouts).
    #[error("[AI LLM Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `LLM_MAX_TOKENS`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u32`).
        reason: &'static str,
    },

    /// Value had the wrong format (e.g., invalid URL).
    #[error("[AI LLM Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable name (e.g., `HUGGINGFACE_API_BASE`).
        var: &'static str,
        /// Explanation (e.g., `must start with http:// or https://`).
        reason: &'static str,
    },

    /// Model name was empty or invalid.
    #[error("[AI LLM Service] model name must not be empty")]
    EmptyModel,
}

/* ------------------------------------------------------------------------- */
/* Endpoint errors                                                           */
/* ------------------------------------------------------------------------- */

/// Non-success answer from the inference endpoint.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EndpointError {
    /// Upstream returned a non-successful HTTP status.
    #[error("[AI LLM Service] HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        /// Numeric HTTP status code.
        status: StatusCode,
        /// Request URL.
        url: String,
        /// Short snippet of the response body (trimmed).
        snippet: String,
    },
}

/* ------------------------------------------------------------------------- */
/* Parse errors                                                              */
/* ------------------------------------------------------------------------- */

/// The response body did not carry usable generated text.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ParseError {
    /// Body is not valid JSON.
    #[error("[AI LLM Service] decode error: {0}")]
    Decode(String),

    /// Body is JSON, but none of the known response shapes.
    #[error("[AI LLM Service] unrecognized response shape: {0}")]
    UnrecognizedShape(String),

    /// A known shape was found but the extracted text is empty.
    #[error("[AI LLM Service] generated text is empty")]
    EmptyText,
}

/// Cuts a response body down to something that fits into a log line.
pub fn make_snippet(text: &str) -> String {
    const MAX: usize = 240;
    let trimmed = text.trim();
    if trimmed.chars().count() <= MAX {
        return trimmed.to_string();
    }
    let mut s: String = trimmed.chars().take(MAX).collect();
    s.push('…');
    s
}

/* ------------------------------------------------------------------------- */
/* Env helpers (return unified `Result<T>`)                                  */
/* ------------------------------------------------------------------------- */

/// Returns the value of an environment variable if it is set and non-empty.
pub fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Parses an optional `u32` (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the value is set but not a valid `u32`.
pub fn parse_opt_u32(var: &'static str, value: Option<&str>) -> Result<Option<u32>> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.parse::<u32>().map(Some).map_err(|_| {
            AiLlmError::from(ConfigError::InvalidNumber {
                var,
                reason: "expected u32",
            })
        }),
        _ => Ok(None),
    }
}

/// Parses an optional `u64` (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the value is set but not a valid `u64`.
pub fn parse_opt_u64(var: &'static str, value: Option<&str>) -> Result<Option<u64>> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.parse::<u64>().map(Some).map_err(|_| {
            AiLlmError::from(ConfigError::InvalidNumber {
                var,
                reason: "expected u64",
            })
        }),
        _ => Ok(None),
    }
}

/* ------------------------------------------------------------------------- */
/* Validation helpers (return unified `Result<T>`)                           */
/* ------------------------------------------------------------------------- */

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`AiLlmError::Config`] with [`ConfigError::InvalidFormat`] when
/// the string does not start with a valid HTTP scheme.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    let value = value.trim();
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_optional_numbers() {
        assert_eq!(parse_opt_u32("X", None).unwrap(), None);
        assert_eq!(parse_opt_u32("X", Some("  ")).unwrap(), None);
        assert_eq!(parse_opt_u32("X", Some("512")).unwrap(), Some(512));
        assert_eq!(parse_opt_u64("X", Some(" 30 ")).unwrap(), Some(30));
        assert!(matches!(
            parse_opt_u32("LLM_MAX_TOKENS", Some("lots")),
            Err(AiLlmError::Config(ConfigError::InvalidNumber {
                var: "LLM_MAX_TOKENS",
                ..
            }))
        ));
    }

    #[test]
    fn endpoint_scheme_is_checked() {
        assert!(validate_http_endpoint("E", "https://api-inference.huggingface.co").is_ok());
        assert!(validate_http_endpoint("E", "http://127.0.0.1:8080").is_ok());
        assert!(validate_http_endpoint("E", "ftp://example.com").is_err());
    }

    #[test]
    fn snippet_is_bounded() {
        let long = "x".repeat(1000);
        let s = make_snippet(&long);
        assert_eq!(s.chars().count(), 241);
        assert_eq!(make_snippet("  short  "), "short");
    }
}
