//! Crate-wide error hierarchy for git-context-engine.

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type GitContextEngineResult<T> = Result<T, GitContextEngineError>;

/// Root error type for the git-context-engine crate.
#[derive(Debug, Error)]
pub enum GitContextEngineError {
    /// GitHub API failure.
    #[error(transparent)]
    Provider(#[from] GitContextEngineProviderError),

    /// Configuration problems (missing token, base URL, etc.).
    #[error(transparent)]
    Config(#[from] GitContextEngineConfigError),

    /// Input validation errors (bad repository names, etc.).
    #[error("validation error: {0}")]
    Validation(String),
}

/// Provider-specific error used inside the provider layer.
#[derive(Debug, Error)]
pub enum GitContextEngineProviderError {
    /// Unauthorized (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,

    /// Forbidden (HTTP 403).
    #[error("forbidden")]
    Forbidden,

    /// Not found (HTTP 404).
    #[error("not found")]
    NotFound,

    /// Unprocessable entity (HTTP 422), e.g. a comment anchor GitHub rejects.
    #[error("unprocessable entity")]
    Unprocessable,

    /// Rate limited (HTTP 429).
    #[error("rate limited")]
    RateLimited,

    /// Gateway / server error (HTTP 5xx).
    #[error("server error: status {0}")]
    Server(u16),

    /// Other HTTP status (non-2xx) not covered by specific variants.
    #[error("http status error: status {0}")]
    HttpStatus(u16),

    /// Timeout at transport level.
    #[error("timeout")]
    Timeout,

    /// Network/transport failure without HTTP status (DNS/connect/reset).
    #[error("network error: {0}")]
    Network(String),

    /// Unexpected/invalid shape of provider response.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

/// Configuration and setup errors (base API URL, missing token, etc.).
#[derive(Debug, Error)]
pub enum GitContextEngineConfigError {
    /// Missing required provider access token.
    #[error("missing provider token (GITHUB_TOKEN)")]
    MissingToken,

    /// Invalid base API URL.
    #[error("invalid base api url: {0}")]
    InvalidBaseUrl(String),
}

impl GitContextEngineError {
    /// HTTP status carried by a provider failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Provider(p) => match p {
                GitContextEngineProviderError::Unauthorized => Some(401),
                GitContextEngineProviderError::Forbidden => Some(403),
                GitContextEngineProviderError::NotFound => Some(404),
                GitContextEngineProviderError::Unprocessable => Some(422),
                GitContextEngineProviderError::RateLimited => Some(429),
                GitContextEngineProviderError::Server(c)
                | GitContextEngineProviderError::HttpStatus(c) => Some(*c),
                _ => None,
            },
            _ => None,
        }
    }
}

// ===== Conversions for `?` ergonomics at the crate root =====

impl From<reqwest::Error> for GitContextEngineError {
    fn from(e: reqwest::Error) -> Self {
        GitContextEngineError::Provider(GitContextEngineProviderError::from(e))
    }
}

// ===== Mapping from reqwest::Error into GitContextEngineProviderError =====

impl From<reqwest::Error> for GitContextEngineProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return GitContextEngineProviderError::Timeout;
        }

        if let Some(status) = e.status() {
            let code = status.as_u16();
            return match code {
                401 => GitContextEngineProviderError::Unauthorized,
                403 => GitContextEngineProviderError::Forbidden,
                404 => GitContextEngineProviderError::NotFound,
                422 => GitContextEngineProviderError::Unprocessable,
                429 => GitContextEngineProviderError::RateLimited,
                500..=599 => GitContextEngineProviderError::Server(code),
                _ => GitContextEngineProviderError::HttpStatus(code),
            };
        }

        if e.is_decode() {
            return GitContextEngineProviderError::InvalidResponse(e.to_string());
        }

        GitContextEngineProviderError::Network(e.to_string())
    }
}
