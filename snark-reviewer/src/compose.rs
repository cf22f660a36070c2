//! Best-effort generation with a guaranteed canned answer.
//!
//! The policy, per comment:
//! 1. no credential configured: canned response of the category;
//! 2. otherwise generate; sanitized non-empty output wins;
//! 3. any generation error (or output that sanitizes to nothing): canned
//!    response;
//! 4. the generation task dying: the category's last-resort apology.
//!
//! Every body leaving this module went through [`sanitize`] exactly once.

use std::{future::Future, sync::Arc};

use ai_llm_service::{AiLlmError, HuggingFaceService, config_hugging_face};
use tracing::{debug, error, info, warn};

use crate::{
    fallback::{self, FallbackCategory},
    sanitize::sanitize,
};

/// Where a composed body came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentSource {
    Generated,
    Fallback,
    LastResort,
    /// Fixed text chosen by the caller (e.g. the no-changes notice).
    Literal,
}

/// A finished, sanitized comment body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composed {
    pub body: String,
    pub source: CommentSource,
}

impl Composed {
    /// Canned response of `category`.
    pub fn fallback(category: FallbackCategory) -> Self {
        Self {
            body: sanitize(fallback::select(category)),
            source: CommentSource::Fallback,
        }
    }

    /// Last-resort apology of `category`.
    pub fn last_resort(category: FallbackCategory) -> Self {
        Self {
            body: sanitize(category.last_resort()),
            source: CommentSource::LastResort,
        }
    }

    /// Caller-provided fixed text.
    pub fn literal(text: &str) -> Self {
        Self {
            body: sanitize(text),
            source: CommentSource::Literal,
        }
    }
}

/// Turns prompts into comment bodies.
///
/// Cheap to clone; the generation client is shared.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    llm: Option<Arc<HuggingFaceService>>,
}

impl Composer {
    pub fn new(llm: Option<HuggingFaceService>) -> Self {
        Self {
            llm: llm.map(Arc::new),
        }
    }

    /// Composer that never calls the model.
    pub fn canned_only() -> Self {
        Self::default()
    }

    /// Builds the composer from the environment.
    ///
    /// A missing `HUGGINGFACE_API_KEY` is not an error: the composer then
    /// answers with canned responses only.
    ///
    /// # Errors
    /// Returns [`AiLlmError::Config`] when a generation variable is set but
    /// invalid.
    pub fn from_env() -> Result<Self, AiLlmError> {
        match config_hugging_face()? {
            Some(cfg) => Ok(Self::new(Some(HuggingFaceService::new(cfg)?))),
            None => {
                info!("HUGGINGFACE_API_KEY not set; answering with canned responses only");
                Ok(Self::canned_only())
            }
        }
    }

    /// `true` when a generation client is configured.
    pub fn generation_enabled(&self) -> bool {
        self.llm.is_some()
    }

    /// Produces a comment body for `prompt`. Never fails.
    pub async fn compose(&self, category: FallbackCategory, prompt: String) -> Composed {
        let Some(llm) = self.llm.clone() else {
            debug!(?category, "generation disabled, using canned response");
            return Composed::fallback(category);
        };
        guarded(category, async move { llm.generate(&prompt).await }).await
    }
}

/// Runs one generation attempt in its own task and applies the fallback
/// tiers to whatever comes out of it.
async fn guarded<F>(category: FallbackCategory, generation: F) -> Composed
where
    F: Future<Output = ai_llm_service::Result<String>> + Send + 'static,
{
    match tokio::spawn(generation).await {
        Ok(Ok(text)) => {
            let body = sanitize(&text);
            if body.is_empty() {
                warn!(?category, "generated text was empty after cleanup, using canned response");
                return Composed::fallback(category);
            }
            debug!(?category, len = body.len(), "using generated comment");
            Composed {
                body,
                source: CommentSource::Generated,
            }
        }
        Ok(Err(e)) => {
            warn!(?category, error = %e, "generation failed, using canned response");
            Composed::fallback(category)
        }
        Err(e) => {
            error!(?category, error = %e, "generation task aborted, using last-resort reply");
            Composed::last_resort(category)
        }
    }
}
