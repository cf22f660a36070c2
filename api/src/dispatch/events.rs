//! Webhook deliveries narrowed down to the events the bot answers.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::routes::github_webhook::webhook_payload::*;

/// A comment-worthy event, already stripped of everything the bot ignores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotEvent {
    IssueOpened {
        repo: String,
        number: u64,
        title: String,
        body: String,
    },
    /// `pull_request.opened` or `pull_request_review.submitted`.
    PullRequestOpened { repo: String, number: u64 },
    /// `push` (ref = head SHA) or branch `create` (ref = `heads/<branch>`).
    Push { repo: String, git_ref: String },
    ReviewCommentCreated {
        repo: String,
        pull_number: u64,
        comment_id: u64,
        path: String,
        diff_hunk: String,
        comment: String,
    },
    CommitCommentCreated {
        repo: String,
        sha: String,
        path: Option<String>,
        position: Option<u64>,
        comment: String,
        author: String,
    },
    IssueCommentCreated {
        repo: String,
        number: u64,
        on_pull_request: bool,
        title: String,
        body: String,
        comment: String,
        author: String,
    },
}

impl BotEvent {
    /// Decodes the delivery of `event_name`.
    ///
    /// `Ok(None)` means the delivery is valid but not answered: unknown
    /// event, uninteresting action, branch deletion, non-branch `create`,
    /// or a comment written by a bot.
    pub fn parse(event_name: &str, body: &[u8]) -> Result<Option<Self>, serde_json::Error> {
        let event = match event_name {
            "issues" => {
                let p: IssuesPayload = decode(body)?;
                (p.action == "opened").then(|| Self::IssueOpened {
                    repo: p.repository.full_name,
                    number: p.issue.number,
                    title: p.issue.title,
                    body: p.issue.body.unwrap_or_default(),
                })
            }
            "pull_request" | "pull_request_review" => {
                let p: PullRequestPayload = decode(body)?;
                let wanted = if event_name == "pull_request" {
                    "opened"
                } else {
                    "submitted"
                };
                (p.action == wanted).then(|| Self::PullRequestOpened {
                    repo: p.repository.full_name,
                    number: p.pull_request.number,
                })
            }
            "push" => {
                let p: PushPayload = decode(body)?;
                let deleted = p.deleted || p.after.chars().all(|c| c == '0');
                (!deleted).then(|| Self::Push {
                    repo: p.repository.full_name,
                    git_ref: p.after,
                })
            }
            "create" => {
                let p: CreatePayload = decode(body)?;
                (p.ref_type == "branch").then(|| Self::Push {
                    repo: p.repository.full_name,
                    git_ref: format!("heads/{}", p.git_ref),
                })
            }
            "pull_request_review_comment" => {
                let p: ReviewCommentPayload = decode(body)?;
                (p.action == "created" && !p.comment.user.is_bot()).then(|| {
                    Self::ReviewCommentCreated {
                        repo: p.repository.full_name,
                        pull_number: p.pull_request.number,
                        comment_id: p.comment.id,
                        path: p.comment.path.unwrap_or_default(),
                        diff_hunk: p.comment.diff_hunk.unwrap_or_default(),
                        comment: p.comment.body.unwrap_or_default(),
                    }
                })
            }
            "commit_comment" => {
                let p: CommitCommentPayload = decode(body)?;
                match p.comment.commit_id {
                    Some(sha) if p.action == "created" && !p.comment.user.is_bot() => {
                        Some(Self::CommitCommentCreated {
                            repo: p.repository.full_name,
                            sha,
                            path: p.comment.path,
                            position: p.comment.position,
                            comment: p.comment.body.unwrap_or_default(),
                            author: p.comment.user.login,
                        })
                    }
                    _ => None,
                }
            }
            "issue_comment" => {
                let p: IssueCommentPayload = decode(body)?;
                (p.action == "created" && !p.comment.user.is_bot()).then(|| {
                    Self::IssueCommentCreated {
                        repo: p.repository.full_name,
                        number: p.issue.number,
                        on_pull_request: p.issue.pull_request.is_some(),
                        title: p.issue.title,
                        body: p.issue.body.unwrap_or_default(),
                        comment: p.comment.body.unwrap_or_default(),
                        author: p.comment.user.login,
                    }
                })
            }
            other => {
                debug!(event = other, "event not handled");
                None
            }
        };

        Ok(event)
    }

    /// Repository `owner/name` the event belongs to.
    pub fn repo(&self) -> &str {
        match self {
            Self::IssueOpened { repo, .. }
            | Self::PullRequestOpened { repo, .. }
            | Self::Push { repo, .. }
            | Self::ReviewCommentCreated { repo, .. }
            | Self::CommitCommentCreated { repo, .. }
            | Self::IssueCommentCreated { repo, .. } => repo,
        }
    }

    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::IssueOpened { .. } => "issue_opened",
            Self::PullRequestOpened { .. } => "pull_request_opened",
            Self::Push { .. } => "push",
            Self::ReviewCommentCreated { .. } => "review_comment_created",
            Self::CommitCommentCreated { .. } => "commit_comment_created",
            Self::IssueCommentCreated { .. } => "issue_comment_created",
        }
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, serde_json::Error> {
    serde_json::from_slice(body)
}
