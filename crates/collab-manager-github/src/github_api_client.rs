use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use collab_manager_core::{
    CollaborationPlatform, IssueRef, PlatformError, PlatformResult, RemoteCollaborator,
    RemoteInvitation, RemoteRepository,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::github_transport_helpers::{github_page_number, platform_error_for_status};

#[derive(Debug, Clone, Deserialize)]
struct GithubAccount {
    login: String,
}

#[derive(Debug, Clone, Deserialize)]
struct GithubRepository {
    id: u64,
    name: String,
    owner: GithubAccount,
}

#[derive(Debug, Clone, Deserialize)]
struct GithubCollaborator {
    id: u64,
    login: String,
}

#[derive(Debug, Clone, Deserialize)]
struct GithubInvitation {
    id: u64,
    invitee: Option<GithubAccount>,
}

#[derive(Debug, Clone, Deserialize)]
/// Issue fields needed to recover a command body.
pub struct GithubIssue {
    pub number: u64,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

impl GithubIssue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

#[derive(Clone)]
/// Authenticated GitHub REST client.
pub struct GithubApiClient {
    http: reqwest::Client,
    api_base: reqwest::Url,
}

impl GithubApiClient {
    pub fn new(api_base: &str, token: &str, request_timeout_ms: u64) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("collaborators-manager-action"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            reqwest::header::HeaderValue::from_static("2022-11-28"),
        );
        let auth_header = format!("Bearer {}", token.trim());
        headers.insert(
            reqwest::header::AUTHORIZATION,
            reqwest::header::HeaderValue::from_str(&auth_header)
                .context("invalid github authorization header")?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(request_timeout_ms.max(1)))
            .build()
            .context("failed to create github api client")?;
        let api_base = reqwest::Url::parse(api_base.trim())
            .with_context(|| format!("invalid github api base '{api_base}'"))?;
        if api_base.cannot_be_a_base() {
            bail!("invalid github api base '{api_base}'");
        }
        Ok(Self {
            http: client,
            api_base,
        })
    }

    pub async fn get_issue(&self, owner: &str, repo: &str, number: u64) -> PlatformResult<GithubIssue> {
        let number = number.to_string();
        let url = self.endpoint(&["repos", owner, repo, "issues", &number])?;
        self.request_json("get issue", self.http.get(url)).await
    }

    /// Append `segments` to the API base, percent-encoding each one so names
    /// taken from issue text stay inside their own path segment.
    fn endpoint(&self, segments: &[&str]) -> PlatformResult<reqwest::Url> {
        // No GitHub login or repository can be empty or a dot segment.
        if segments
            .iter()
            .any(|segment| segment.is_empty() || *segment == "." || *segment == "..")
        {
            return Err(PlatformError::NotFound);
        }
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| PlatformError::Transport("github api base cannot hold a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        operation: &str,
        request: reqwest::RequestBuilder,
    ) -> PlatformResult<reqwest::Response> {
        let response = request.send().await.map_err(|error| {
            PlatformError::Transport(format!("github api {operation} request failed: {error}"))
        })?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(
            operation,
            status = status.as_u16(),
            "github api request returned non-success status"
        );
        Err(platform_error_for_status(status.as_u16(), &body))
    }

    async fn request_json<T>(&self, operation: &str, request: reqwest::RequestBuilder) -> PlatformResult<T>
    where
        T: DeserializeOwned,
    {
        self.send(operation, request)
            .await?
            .json::<T>()
            .await
            .map_err(|error| PlatformError::Decode(format!("failed to decode github {operation}: {error}")))
    }

    async fn request_empty(&self, operation: &str, request: reqwest::RequestBuilder) -> PlatformResult<()> {
        self.send(operation, request).await.map(|_| ())
    }

    fn paged(
        &self,
        request: reqwest::RequestBuilder,
        page: u32,
        per_page: usize,
    ) -> reqwest::RequestBuilder {
        request.query(&[
            ("per_page", per_page.to_string()),
            ("page", github_page_number(page)),
        ])
    }
}

#[async_trait]
impl CollaborationPlatform for GithubApiClient {
    async fn get_user(&self, username: &str) -> PlatformResult<()> {
        let url = self.endpoint(&["users", username])?;
        self.request_empty("get user", self.http.get(url)).await
    }

    async fn get_repository(&self, owner: &str, repo: &str) -> PlatformResult<()> {
        let url = self.endpoint(&["repos", owner, repo])?;
        self.request_empty("get repository", self.http.get(url)).await
    }

    async fn list_owned_repositories(
        &self,
        page: u32,
        per_page: usize,
    ) -> PlatformResult<Vec<RemoteRepository>> {
        let request = self
            .http
            .get(self.endpoint(&["user", "repos"])?)
            .query(&[("visibility", "all"), ("affiliation", "owner")]);
        let chunk: Vec<GithubRepository> = self
            .request_json("list repositories", self.paged(request, page, per_page))
            .await?;
        Ok(chunk
            .into_iter()
            .map(|repository| RemoteRepository {
                id: repository.id,
                owner: repository.owner.login,
                name: repository.name,
            })
            .collect())
    }

    async fn list_collaborators(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
        per_page: usize,
    ) -> PlatformResult<Vec<RemoteCollaborator>> {
        let request = self
            .http
            .get(self.endpoint(&["repos", owner, repo, "collaborators"])?);
        let chunk: Vec<GithubCollaborator> = self
            .request_json("list collaborators", self.paged(request, page, per_page))
            .await?;
        Ok(chunk
            .into_iter()
            .map(|collaborator| RemoteCollaborator {
                id: collaborator.id,
                login: collaborator.login,
            })
            .collect())
    }

    async fn list_invitations(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
        per_page: usize,
    ) -> PlatformResult<Vec<RemoteInvitation>> {
        let request = self
            .http
            .get(self.endpoint(&["repos", owner, repo, "invitations"])?);
        let chunk: Vec<GithubInvitation> = self
            .request_json("list invitations", self.paged(request, page, per_page))
            .await?;
        Ok(chunk
            .into_iter()
            .map(|invitation| RemoteInvitation {
                id: invitation.id,
                invitee: invitation.invitee.map(|account| account.login),
            })
            .collect())
    }

    async fn add_collaborator(&self, owner: &str, repo: &str, username: &str) -> PlatformResult<()> {
        let url = self.endpoint(&["repos", owner, repo, "collaborators", username])?;
        self.request_empty("add collaborator", self.http.put(url)).await
    }

    async fn remove_collaborator(
        &self,
        owner: &str,
        repo: &str,
        username: &str,
    ) -> PlatformResult<()> {
        let url = self.endpoint(&["repos", owner, repo, "collaborators", username])?;
        self.request_empty("remove collaborator", self.http.delete(url)).await
    }

    async fn delete_invitation(
        &self,
        owner: &str,
        repo: &str,
        invitation_id: u64,
    ) -> PlatformResult<()> {
        let invitation_id = invitation_id.to_string();
        let url = self.endpoint(&["repos", owner, repo, "invitations", &invitation_id])?;
        self.request_empty("delete invitation", self.http.delete(url)).await
    }

    async fn create_issue_comment(&self, issue: &IssueRef, body: &str) -> PlatformResult<()> {
        let payload = json!({ "body": body });
        let number = issue.number.to_string();
        let url = self.endpoint(&["repos", &issue.owner, &issue.repo, "issues", &number, "comments"])?;
        self.request_empty("create issue comment", self.http.post(url).json(&payload))
            .await
    }
}
