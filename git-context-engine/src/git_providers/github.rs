//! GitHub provider (REST v3) for changed files and comment posting.
//!
//! Endpoints used (as of 2025):
//!   * GET  /repos/{owner}/{repo}/pulls/{number}/files
//!   * GET  /repos/{owner}/{repo}/commits/{ref}
//!   * POST /repos/{owner}/{repo}/issues/{number}/comments
//!   * POST /repos/{owner}/{repo}/commits/{sha}/comments
//!   * POST /repos/{owner}/{repo}/pulls/{number}/comments/{id}/replies

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::errors::GitContextEngineResult;
use crate::git_providers::{ProviderConfig, types::*};

const USER_AGENT: &str = "senior-dev-bot/0.1";
const API_VERSION: &str = "2022-11-28";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// GitHub HTTP client wrapper.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    base_api: String, // "https://api.github.com"
    auth: String,     // "Bearer <token>"
}

impl GitHubClient {
    /// Constructs a GitHub client with a shared HTTP instance and auth token.
    pub fn new(http: Client, base_api: String, token: String) -> Self {
        debug!("Creating GitHubClient with base_api={}", base_api);
        Self {
            http,
            base_api: base_api.trim_end_matches('/').to_string(),
            auth: format!("Bearer {token}"),
        }
    }

    /// Builds the HTTP client (user agent, timeout) and wraps it.
    pub fn from_config(cfg: ProviderConfig) -> GitContextEngineResult<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self::new(http, cfg.base_api, cfg.token))
    }

    /// Files changed by a pull request (first 100).
    #[instrument(skip_all, fields(repo = %repo, pull = number))]
    pub async fn list_pull_request_files(
        &self,
        repo: &RepoRef,
        number: u64,
    ) -> GitContextEngineResult<Vec<ChangedFile>> {
        let url = format!(
            "{}/repos/{}/{}/pulls/{}/files?per_page=100",
            self.base_api, repo.owner, repo.name, number
        );
        debug!("GitHub list_pull_request_files: {}", url);

        // NOTE: This ignores pagination beyond 100 files.
        let files: Vec<ChangedFile> = self
            .authed(self.http.get(url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!(count = files.len(), "pull request files fetched");
        Ok(files)
    }

    /// A single commit with its files. `git_ref` may be a SHA or `heads/<branch>`.
    #[instrument(skip_all, fields(repo = %repo, git_ref = %git_ref))]
    pub async fn get_commit(
        &self,
        repo: &RepoRef,
        git_ref: &str,
    ) -> GitContextEngineResult<CommitDetails> {
        let url = format!(
            "{}/repos/{}/{}/commits/{}",
            self.base_api,
            repo.owner,
            repo.name,
            encode_ref(git_ref)
        );
        debug!("GitHub get_commit: {}", url);

        let commit: CommitDetails = self
            .authed(self.http.get(url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!(sha = %commit.sha, files = commit.files.len(), "commit fetched");
        Ok(commit)
    }

    /// Comment on the conversation of an issue or pull request.
    pub async fn create_issue_comment(
        &self,
        repo: &RepoRef,
        number: u64,
        body: &str,
    ) -> GitContextEngineResult<PostedComment> {
        let url = format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.base_api, repo.owner, repo.name, number
        );
        self.post_json(url, &CommentCreate { body }).await
    }

    /// Comment on a commit.
    ///
    /// When `path`/`position` are given and GitHub rejects the anchored
    /// comment, posts once more without them.
    pub async fn create_commit_comment(
        &self,
        repo: &RepoRef,
        sha: &str,
        path: Option<&str>,
        position: Option<u64>,
        body: &str,
    ) -> GitContextEngineResult<PostedComment> {
        let url = format!(
            "{}/repos/{}/{}/commits/{}/comments",
            self.base_api,
            repo.owner,
            repo.name,
            urlencoding::encode(sha)
        );

        let anchored = path.is_some() || position.is_some();
        let payload = CommitCommentCreate {
            body,
            path,
            position,
        };

        match self.post_json(url.clone(), &payload).await {
            Ok(c) => Ok(c),
            Err(err) if anchored => {
                warn!(
                    error = %err,
                    sha,
                    "anchored commit comment failed, retrying without path/position"
                );
                self.post_json(
                    url,
                    &CommitCommentCreate {
                        body,
                        path: None,
                        position: None,
                    },
                )
                .await
            }
            Err(err) => Err(err),
        }
    }

    /// Reply in the thread of a pull request review comment.
    pub async fn reply_to_review_comment(
        &self,
        repo: &RepoRef,
        pull_number: u64,
        comment_id: u64,
        body: &str,
    ) -> GitContextEngineResult<PostedComment> {
        let url = format!(
            "{}/repos/{}/{}/pulls/{}/comments/{}/replies",
            self.base_api, repo.owner, repo.name, pull_number, comment_id
        );
        self.post_json(url, &CommentCreate { body }).await
    }

    /// Posts `body` wherever `target` points.
    #[instrument(skip_all, fields(repo = %repo, target = ?target))]
    pub async fn post_comment(
        &self,
        repo: &RepoRef,
        target: &CommentTarget,
        body: &str,
    ) -> GitContextEngineResult<PostedComment> {
        let posted = match target {
            CommentTarget::Issue(number) => self.create_issue_comment(repo, *number, body).await?,
            CommentTarget::Commit {
                sha,
                path,
                position,
            } => {
                self.create_commit_comment(repo, sha, path.as_deref(), *position, body)
                    .await?
            }
            CommentTarget::ReviewReply {
                pull_number,
                comment_id,
            } => {
                self.reply_to_review_comment(repo, *pull_number, *comment_id, body)
                    .await?
            }
        };

        info!(
            comment_id = posted.id,
            url = posted.html_url.as_deref().unwrap_or("-"),
            body_len = body.len(),
            "comment posted"
        );
        Ok(posted)
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("Authorization", &self.auth)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: String,
        payload: &T,
    ) -> GitContextEngineResult<PostedComment> {
        debug!("GitHub POST {}", url);
        let posted = self
            .authed(self.http.post(url))
            .json(payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(posted)
    }
}

/// Percent-encodes each segment of a ref, keeping `/` between segments
/// (`heads/fix#12` -> `heads/fix%2312`).
fn encode_ref(git_ref: &str) -> String {
    git_ref
        .split('/')
        .map(|seg| urlencoding::encode(seg).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[derive(Debug, Serialize)]
struct CommentCreate<'a> {
    body: &'a str,
}

#[derive(Debug, Serialize)]
struct CommitCommentCreate<'a> {
    body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<u64>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, method, path, query_param},
    };

    use super::*;
    use crate::errors::{GitContextEngineError, GitContextEngineProviderError};

    fn client_for(server: &MockServer) -> GitHubClient {
        GitHubClient::from_config(ProviderConfig::new(server.uri(), "ghp_test").unwrap()).unwrap()
    }

    fn repo() -> RepoRef {
        RepoRef::parse("octo/hello").unwrap()
    }

    #[tokio::test]
    async fn lists_pull_request_files() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/hello/pulls/7/files"))
            .and(query_param("per_page", "100"))
            .and(header("authorization", "Bearer ghp_test"))
            .and(header("x-github-api-version", API_VERSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "filename": "src/main.rs", "status": "modified", "patch": "@@ -1 +1 @@\n-a\n+b" },
                { "filename": "logo.png", "status": "added" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let files = client_for(&server)
            .list_pull_request_files(&repo(), 7)
            .await
            .unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].patch.as_deref(), Some("@@ -1 +1 @@\n-a\n+b"));
        assert_eq!(files[1].patch, None);
    }

    #[tokio::test]
    async fn fetches_commit_by_branch_ref() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/hello/commits/heads/feature"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sha": "abc123",
                "files": [{ "filename": "a.rs", "patch": "+x" }]
            })))
            .mount(&server)
            .await;

        let commit = client_for(&server)
            .get_commit(&repo(), "heads/feature")
            .await
            .unwrap();
        assert_eq!(commit.sha, "abc123");
        assert_eq!(commit.files[0].filename, "a.rs");
    }

    #[tokio::test]
    async fn branch_ref_segments_are_percent_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/hello/commits/heads/fix%2312"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sha": "f12" })))
            .expect(1)
            .mount(&server)
            .await;

        let commit = client_for(&server)
            .get_commit(&repo(), "heads/fix#12")
            .await
            .unwrap();
        assert_eq!(commit.sha, "f12");
    }

    #[test]
    fn encode_ref_keeps_separators() {
        assert_eq!(encode_ref("heads/feature/x"), "heads/feature/x");
        assert_eq!(encode_ref("heads/a?b%c"), "heads/a%3Fb%25c");
        assert_eq!(encode_ref("abc123"), "abc123");
    }

    #[tokio::test]
    async fn commit_without_files_field_has_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/hello/commits/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sha": "abc" })))
            .mount(&server)
            .await;

        let commit = client_for(&server).get_commit(&repo(), "abc").await.unwrap();
        assert!(commit.files.is_empty());
    }

    #[tokio::test]
    async fn posts_to_each_target() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/octo/hello/issues/3/comments"))
            .and(body_json(json!({ "body": "hi" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 1 })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/repos/octo/hello/pulls/4/comments/99/replies"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 2 })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/repos/octo/hello/commits/abc/comments"))
            .and(body_json(json!({ "body": "hi" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 3 })))
            .expect(1)
            .mount(&server)
            .await;

        let c = client_for(&server);
        let ids = [
            c.post_comment(&repo(), &CommentTarget::Issue(3), "hi").await.unwrap().id,
            c.post_comment(
                &repo(),
                &CommentTarget::ReviewReply {
                    pull_number: 4,
                    comment_id: 99,
                },
                "hi",
            )
            .await
            .unwrap()
            .id,
            c.post_comment(
                &repo(),
                &CommentTarget::Commit {
                    sha: "abc".into(),
                    path: None,
                    position: None,
                },
                "hi",
            )
            .await
            .unwrap()
            .id,
        ];
        assert_eq!(ids, [1, 2, 3]);
    }

    #[tokio::test]
    async fn anchored_commit_comment_retries_without_anchor() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/octo/hello/commits/abc/comments"))
            .and(body_json(json!({ "body": "hi", "path": "a.rs", "position": 5 })))
            .respond_with(ResponseTemplate::new(422))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/repos/octo/hello/commits/abc/comments"))
            .and(body_json(json!({ "body": "hi" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 8 })))
            .expect(1)
            .mount(&server)
            .await;

        let posted = client_for(&server)
            .create_commit_comment(&repo(), "abc", Some("a.rs"), Some(5), "hi")
            .await
            .unwrap();
        assert_eq!(posted.id, 8);
    }

    #[tokio::test]
    async fn http_status_maps_to_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/hello/pulls/1/files"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .list_pull_request_files(&repo(), 1)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GitContextEngineError::Provider(GitContextEngineProviderError::NotFound)
        ));
        assert_eq!(err.status(), Some(404));
    }
}
