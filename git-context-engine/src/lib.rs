//! GitHub REST plumbing for the bot: reading changed files and posting
//! comments.
//!
//! The crate has no opinion about comment content. Callers hand it a
//! [`CommentTarget`](git_providers::CommentTarget) and a finished body.

pub mod errors;
pub mod filters;
pub mod git_providers;

pub use errors::{GitContextEngineError, GitContextEngineResult};
pub use filters::{filter_lock_files, is_lock_file};
pub use git_providers::github::GitHubClient;
pub use git_providers::{ChangedFile, CommentTarget, CommitDetails, ProviderConfig, RepoRef};
