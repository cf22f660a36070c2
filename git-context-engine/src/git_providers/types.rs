//! Provider-agnostic records exchanged with the rest of the workspace.

use serde::{Deserialize, Serialize};

use crate::errors::{GitContextEngineError, GitContextEngineResult};

/// Repository coordinates, parsed from `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    /// Splits "owner/repo" into components or returns a validation error.
    pub fn parse(full_name: &str) -> GitContextEngineResult<Self> {
        let mut parts = full_name.split('/');
        let owner = parts.next().unwrap_or("").trim();
        let name = parts.next().unwrap_or("").trim();

        if owner.is_empty() || name.is_empty() || parts.next().is_some() {
            return Err(GitContextEngineError::Validation(format!(
                "invalid GitHub repository '{}', expected 'owner/repo'",
                full_name
            )));
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// One file of a pull request or commit.
///
/// `patch` is absent for binary files and for diffs GitHub considers too
/// large to inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFile {
    pub filename: String,
    #[serde(default)]
    pub patch: Option<String>,
}

/// A commit with its changed files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitDetails {
    pub sha: String,
    #[serde(default)]
    pub files: Vec<ChangedFile>,
}

/// Where a comment is posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentTarget {
    /// Conversation of an issue or pull request.
    Issue(u64),
    /// A commit, optionally anchored to a diff position.
    Commit {
        sha: String,
        path: Option<String>,
        position: Option<u64>,
    },
    /// Thread reply to a pull request review comment.
    ReviewReply { pull_number: u64, comment_id: u64 },
}

/// Comment as returned by GitHub after creation (subset).
#[derive(Debug, Clone, Deserialize)]
pub struct PostedComment {
    pub id: u64,
    #[serde(default)]
    pub html_url: Option<String>,
}
