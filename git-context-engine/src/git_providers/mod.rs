//! GitHub access: configuration, records and the REST client.

pub mod types;
pub use types::*;

pub mod github;

use crate::errors::{GitContextEngineConfigError, GitContextEngineResult};

/// Public GitHub REST API base.
pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";

/// Runtime configuration for the provider client.
///
/// Usually injected from the environment via [`ProviderConfig::from_env`].
#[derive(Clone)]
pub struct ProviderConfig {
    /// API base, e.g. "https://api.github.com".
    pub base_api: String,
    /// Access token (PAT or installation token).
    pub token: String,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_api", &self.base_api)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl ProviderConfig {
    /// Validates and normalizes the configuration.
    ///
    /// # Errors
    /// - [`GitContextEngineConfigError::MissingToken`] for a blank token
    /// - [`GitContextEngineConfigError::InvalidBaseUrl`] for a non-http(s) base
    pub fn new(
        base_api: impl Into<String>,
        token: impl Into<String>,
    ) -> GitContextEngineResult<Self> {
        let base_api = base_api.into().trim().trim_end_matches('/').to_string();
        let token = token.into().trim().to_string();

        if token.is_empty() {
            return Err(GitContextEngineConfigError::MissingToken.into());
        }
        if !(base_api.starts_with("http://") || base_api.starts_with("https://")) {
            return Err(GitContextEngineConfigError::InvalidBaseUrl(base_api).into());
        }

        Ok(Self { base_api, token })
    }

    /// Reads `GITHUB_API_BASE` (optional) and `GITHUB_TOKEN` (required).
    pub fn from_env() -> GitContextEngineResult<Self> {
        let base_api = std::env::var("GITHUB_API_BASE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GITHUB_API.to_string());
        let token = std::env::var("GITHUB_TOKEN").unwrap_or_default();
        Self::new(base_api, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GitContextEngineError;

    #[test]
    fn config_is_validated_and_normalized() {
        let cfg = ProviderConfig::new("https://api.github.com/", " ghp_x ").unwrap();
        assert_eq!(cfg.base_api, "https://api.github.com");
        assert_eq!(cfg.token, "ghp_x");
        assert!(!format!("{cfg:?}").contains("ghp_x"));

        assert!(matches!(
            ProviderConfig::new("https://api.github.com", "  "),
            Err(GitContextEngineError::Config(GitContextEngineConfigError::MissingToken))
        ));
        assert!(matches!(
            ProviderConfig::new("api.github.com", "t"),
            Err(GitContextEngineError::Config(GitContextEngineConfigError::InvalidBaseUrl(_)))
        ));
    }

    #[test]
    fn repo_ref_parsing() {
        let r = RepoRef::parse("octo/hello").unwrap();
        assert_eq!(r.owner, "octo");
        assert_eq!(r.name, "hello");
        assert_eq!(r.to_string(), "octo/hello");
        assert!(RepoRef::parse("octo").is_err());
        assert!(RepoRef::parse("a/b/c").is_err());
        assert!(RepoRef::parse("/b").is_err());
    }
}
