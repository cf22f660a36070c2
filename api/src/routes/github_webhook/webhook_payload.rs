//! GitHub webhook payloads (subsets of the fields the bot reads).

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub full_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub login: String,
    /// "User", "Bot" or "Organization".
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl User {
    pub fn is_bot(&self) -> bool {
        self.kind == "Bot"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    /// Present when the issue is a pull request conversation.
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub id: u64,
    #[serde(default)]
    pub body: Option<String>,
    pub user: User,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub position: Option<u64>,
    #[serde(default)]
    pub commit_id: Option<String>,
    #[serde(default)]
    pub diff_hunk: Option<String>,
}

/// `issues`
#[derive(Debug, Deserialize)]
pub struct IssuesPayload {
    pub action: String,
    pub issue: Issue,
    pub repository: Repository,
}

/// `pull_request` and `pull_request_review`
#[derive(Debug, Deserialize)]
pub struct PullRequestPayload {
    pub action: String,
    pub pull_request: PullRequest,
    pub repository: Repository,
}

/// `push`
#[derive(Debug, Deserialize)]
pub struct PushPayload {
    pub after: String,
    #[serde(default)]
    pub deleted: bool,
    pub repository: Repository,
}

/// `create`
#[derive(Debug, Deserialize)]
pub struct CreatePayload {
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub ref_type: String,
    pub repository: Repository,
}

/// `pull_request_review_comment`
#[derive(Debug, Deserialize)]
pub struct ReviewCommentPayload {
    pub action: String,
    pub comment: Comment,
    pub pull_request: PullRequest,
    pub repository: Repository,
}

/// `commit_comment`
#[derive(Debug, Deserialize)]
pub struct CommitCommentPayload {
    pub action: String,
    pub comment: Comment,
    pub repository: Repository,
}

/// `issue_comment`
#[derive(Debug, Deserialize)]
pub struct IssueCommentPayload {
    pub action: String,
    pub issue: Issue,
    pub comment: Comment,
    pub repository: Repository,
}
