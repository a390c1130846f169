use async_trait::async_trait;
use thiserror::Error;

use crate::command_parser::IssueRef;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Enumerates supported `PlatformError` values.
pub enum PlatformError {
    #[error("not found")]
    NotFound,
    #[error("github api returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid response: {0}")]
    Decode(String),
}

pub type PlatformResult<T> = std::result::Result<T, PlatformError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepository {
    pub id: u64,
    pub owner: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCollaborator {
    pub id: u64,
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteInvitation {
    pub id: u64,
    /// Absent for invitations addressed to an email instead of an account.
    pub invitee: Option<String>,
}

#[async_trait]
/// Remote operations the collaborators manager depends on.
///
/// Listing operations take a zero-based page index. Every operation may fail
/// independently; callers decide which failures are fatal.
pub trait CollaborationPlatform: Send + Sync {
    async fn get_user(&self, username: &str) -> PlatformResult<()>;

    async fn get_repository(&self, owner: &str, repo: &str) -> PlatformResult<()>;

    async fn list_owned_repositories(
        &self,
        page: u32,
        per_page: usize,
    ) -> PlatformResult<Vec<RemoteRepository>>;

    async fn list_collaborators(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
        per_page: usize,
    ) -> PlatformResult<Vec<RemoteCollaborator>>;

    async fn list_invitations(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
        per_page: usize,
    ) -> PlatformResult<Vec<RemoteInvitation>>;

    async fn add_collaborator(&self, owner: &str, repo: &str, username: &str)
        -> PlatformResult<()>;

    async fn remove_collaborator(
        &self,
        owner: &str,
        repo: &str,
        username: &str,
    ) -> PlatformResult<()>;

    async fn delete_invitation(
        &self,
        owner: &str,
        repo: &str,
        invitation_id: u64,
    ) -> PlatformResult<()>;

    async fn create_issue_comment(&self, issue: &IssueRef, body: &str) -> PlatformResult<()>;
}
