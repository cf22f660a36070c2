//! Event dispatch: one [`Reply`] per event, one delivery pipeline for all.
//!
//! ```text
//! BotEvent ─► resolve ─► Reply { target, category, content, mention }
//!                           └► deliver: compose ─► @mention ─► post
//! ```

pub mod events;

use std::sync::Arc;

use git_context_engine::{
    ChangedFile, CommentTarget, GitContextEngineResult, RepoRef, filter_lock_files,
};
use snark_reviewer::{
    CodeChange, CommentSource, Composed, FallbackCategory, NO_CODE_CHANGES, ReviewSubject,
    annotate, annotate_all, prompt,
};
use tracing::{debug, error, info, instrument, warn};

pub use events::BotEvent;

use crate::core::app_state::AppState;

/// What the comment is made of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Generate from this prompt (with canned fallback).
    Prompt(String),
    /// Post this fixed text.
    Literal(&'static str),
}

/// A fully resolved answer to one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub target: CommentTarget,
    pub category: FallbackCategory,
    pub content: Content,
    /// Login to address with `@login ` in front of the body.
    pub mention: Option<String>,
}

/// Outcome of handling one event, for logs and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivered {
    pub body: String,
    pub source: CommentSource,
}

/// Handles one event end to end. Failures are logged, never returned.
#[instrument(skip_all, fields(event = event.kind(), repo = %event.repo()))]
pub async fn handle(state: Arc<AppState>, event: BotEvent) -> Option<Delivered> {
    let repo = match RepoRef::parse(event.repo()) {
        Ok(r) => r,
        Err(e) => {
            error!(error = %e, "cannot address repository");
            return None;
        }
    };

    let reply = match resolve(&state, &repo, event).await {
        Ok(Some(reply)) => reply,
        Ok(None) => {
            debug!("nothing to comment on");
            return None;
        }
        Err(e) => {
            error!(error = %e, "failed to gather event context");
            return None;
        }
    };

    deliver(&state, &repo, reply).await
}

/// Turns an event into a [`Reply`], fetching changed files where needed.
///
/// `Ok(None)` when there is nothing to answer (a commit without file data).
pub async fn resolve(
    state: &AppState,
    repo: &RepoRef,
    event: BotEvent,
) -> GitContextEngineResult<Option<Reply>> {
    let reply = match event {
        BotEvent::IssueOpened {
            number,
            title,
            body,
            ..
        } => Reply {
            target: CommentTarget::Issue(number),
            category: FallbackCategory::Issues,
            content: Content::Prompt(prompt::new_issue(&title, &body)),
            mention: None,
        },

        BotEvent::PullRequestOpened { number, .. } => {
            let files = state.github.list_pull_request_files(repo, number).await?;
            Reply {
                target: CommentTarget::Issue(number),
                category: FallbackCategory::CodeReview,
                content: review_content(ReviewSubject::PullRequest, files),
                mention: None,
            }
        }

        BotEvent::Push { git_ref, .. } => {
            let commit = state.github.get_commit(repo, &git_ref).await?;
            if commit.files.is_empty() {
                info!(sha = %commit.sha, "commit carries no file data, skipping");
                return Ok(None);
            }
            Reply {
                target: CommentTarget::Commit {
                    sha: commit.sha,
                    path: None,
                    position: None,
                },
                category: FallbackCategory::CodeReview,
                content: review_content(ReviewSubject::Push, commit.files),
                mention: None,
            }
        }

        BotEvent::ReviewCommentCreated {
            pull_number,
            comment_id,
            path,
            diff_hunk,
            comment,
            ..
        } => {
            let hunk = annotate(&CodeChange::new(path, diff_hunk));
            Reply {
                target: CommentTarget::ReviewReply {
                    pull_number,
                    comment_id,
                },
                category: FallbackCategory::Issues,
                content: Content::Prompt(prompt::review_comment_reply(&hunk, &comment)),
                mention: None,
            }
        }

        BotEvent::CommitCommentCreated {
            sha,
            path,
            position,
            comment,
            author,
            ..
        } => {
            let files = match state.github.get_commit(repo, &sha).await {
                Ok(commit) => commit.files,
                Err(e) => {
                    warn!(error = %e, %sha, "could not fetch commit files, replying without code");
                    Vec::new()
                }
            };
            let patches = annotate_all(&to_code_changes(filter_lock_files(files)));
            Reply {
                target: CommentTarget::Commit {
                    sha,
                    path,
                    position,
                },
                category: FallbackCategory::Issues,
                content: Content::Prompt(prompt::commit_comment_reply(&comment, &patches)),
                mention: Some(author),
            }
        }

        BotEvent::IssueCommentCreated {
            number,
            on_pull_request,
            title,
            body,
            comment,
            author,
            ..
        } => {
            let text = if on_pull_request {
                let patches = match state.github.list_pull_request_files(repo, number).await {
                    Ok(files) => annotate_all(&to_code_changes(filter_lock_files(files))),
                    Err(e) => {
                        warn!(
                            error = %e,
                            number,
                            "could not fetch pull request files, replying without code"
                        );
                        Vec::new()
                    }
                };
                prompt::pull_request_comment_reply(&comment, &patches)
            } else {
                prompt::issue_comment_reply(&title, &body, &comment)
            };
            Reply {
                target: CommentTarget::Issue(number),
                category: FallbackCategory::Issues,
                content: Content::Prompt(text),
                mention: Some(author),
            }
        }
    };

    Ok(Some(reply))
}

/// Composes the body and posts it. Posting failures are logged.
pub async fn deliver(state: &AppState, repo: &RepoRef, reply: Reply) -> Option<Delivered> {
    let Composed { body, source } = match reply.content {
        Content::Prompt(text) => state.composer.compose(reply.category, text).await,
        Content::Literal(text) => Composed::literal(text),
    };

    let body = match &reply.mention {
        Some(login) => format!("@{login} {body}"),
        None => body,
    };

    info!(?source, target = ?reply.target, "posting comment");

    match state.github.post_comment(repo, &reply.target, &body).await {
        Ok(_) => Some(Delivered { body, source }),
        Err(e) => {
            error!(error = %e, target = ?reply.target, "failed to post comment");
            None
        }
    }
}

/// Review prompt over the non-lock files, or the no-changes notice.
fn review_content(subject: ReviewSubject, files: Vec<ChangedFile>) -> Content {
    let changes = to_code_changes(filter_lock_files(files));
    if changes.is_empty() {
        info!(?subject, "no reviewable files left after lock-file filtering");
        return Content::Literal(NO_CODE_CHANGES);
    }
    Content::Prompt(prompt::code_review(subject, &annotate_all(&changes)))
}

fn to_code_changes(files: Vec<ChangedFile>) -> Vec<CodeChange> {
    files
        .into_iter()
        .map(|f| CodeChange::new(f.filename, f.patch.unwrap_or_default()))
        .collect()
}
