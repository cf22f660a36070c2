use git_context_engine::{GitHubClient, ProviderConfig};
use snark_reviewer::Composer;
use tracing::{info, warn};

use crate::error_handler::AppResult;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Secret for `X-Hub-Signature-256`; `None` disables verification.
    pub webhook_secret: Option<String>,
    /// GitHub REST client used to read files and post comments.
    pub github: GitHubClient,
    /// Prompt-to-comment pipeline (generation with canned fallback).
    pub composer: Composer,
}

impl AppState {
    pub fn new(webhook_secret: Option<String>, github: GitHubClient, composer: Composer) -> Self {
        Self {
            webhook_secret: webhook_secret.filter(|s| !s.trim().is_empty()),
            github,
            composer,
        }
    }

    /// Load shared state from environment variables.
    pub fn from_env() -> AppResult<Self> {
        let webhook_secret = std::env::var("WEBHOOK_SECRET").ok();
        let github = GitHubClient::from_config(ProviderConfig::from_env()?)?;
        let composer = Composer::from_env()?;

        let state = Self::new(webhook_secret, github, composer);
        if state.webhook_secret.is_none() {
            warn!("WEBHOOK_SECRET not set; webhook signatures are not verified");
        }
        info!(
            generation = state.composer.generation_enabled(),
            "application state ready"
        );
        Ok(state)
    }
}
