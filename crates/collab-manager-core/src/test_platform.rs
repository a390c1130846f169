//! Scripted in-memory platform used by resolver and engine tests.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex as AsyncMutex;

use crate::command_parser::IssueRef;
use crate::platform::{
    CollaborationPlatform, PlatformError, PlatformResult, RemoteCollaborator, RemoteInvitation,
    RemoteRepository,
};

#[derive(Debug, Default, Clone)]
pub(crate) struct ScriptedRepository {
    pub(crate) collaborators: Vec<String>,
    pub(crate) invitations: Vec<(u64, String)>,
    pub(crate) deny_listing: bool,
}

#[derive(Default)]
pub(crate) struct ScriptedPlatform {
    pub(crate) users: HashSet<String>,
    pub(crate) owner: String,
    pub(crate) repositories: Vec<(String, String, ScriptedRepository)>,
    pub(crate) failing_mutations: HashSet<(String, String)>,
    pub(crate) calls: AsyncMutex<Vec<String>>,
    pub(crate) comments: AsyncMutex<Vec<(IssueRef, String)>>,
    state: AsyncMutex<HashMap<String, ScriptedRepository>>,
}

impl ScriptedPlatform {
    pub(crate) fn new(owner: &str) -> Self {
        Self {
            owner: owner.to_string(),
            ..Self::default()
        }
    }

    pub(crate) fn with_users(mut self, users: &[&str]) -> Self {
        self.users
            .extend(users.iter().map(|user| user.to_string()));
        self
    }

    pub(crate) fn with_repository(mut self, full_name: &str, repository: ScriptedRepository) -> Self {
        let (owner, name) = full_name.split_once('/').expect("owner/name");
        self.repositories
            .push((owner.to_string(), name.to_string(), repository));
        self
    }

    /// Make mutations for `user` on `repo` (full name) fail.
    pub(crate) fn failing(mut self, full_name: &str, user: &str) -> Self {
        self.failing_mutations
            .insert((full_name.to_string(), user.to_string()));
        self
    }

    pub(crate) async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    pub(crate) async fn mutation_calls(&self) -> Vec<String> {
        self.calls()
            .await
            .into_iter()
            .filter(|call| {
                call.starts_with("add ") || call.starts_with("remove ") || call.starts_with("delete ")
            })
            .collect()
    }

    async fn record(&self, call: String) {
        self.calls.lock().await.push(call);
    }

    fn repository(&self, owner: &str, repo: &str) -> Option<&ScriptedRepository> {
        self.repositories
            .iter()
            .find(|(o, n, _)| o == owner && n == repo)
            .map(|(_, _, repository)| repository)
    }

    fn page<T: Clone>(items: &[T], page: u32, per_page: usize) -> Vec<T> {
        items
            .iter()
            .skip(page as usize * per_page)
            .take(per_page)
            .cloned()
            .collect()
    }

    fn check_mutation(&self, owner: &str, repo: &str, user: &str) -> PlatformResult<()> {
        if self
            .failing_mutations
            .contains(&(format!("{owner}/{repo}"), user.to_string()))
        {
            return Err(PlatformError::Status {
                status: 422,
                body: "Validation Failed".to_string(),
            });
        }
        Ok(())
    }

    async fn state_for(&self, owner: &str, repo: &str) -> PlatformResult<ScriptedRepository> {
        let repository = self.repository(owner, repo).ok_or(PlatformError::NotFound)?;
        let mut state = self.state.lock().await;
        Ok(state
            .entry(format!("{owner}/{repo}"))
            .or_insert_with(|| repository.clone())
            .clone())
    }
}

#[async_trait]
impl CollaborationPlatform for ScriptedPlatform {
    async fn get_user(&self, username: &str) -> PlatformResult<()> {
        self.record(format!("get_user {username}")).await;
        if self.users.contains(username) {
            Ok(())
        } else {
            Err(PlatformError::NotFound)
        }
    }

    async fn get_repository(&self, owner: &str, repo: &str) -> PlatformResult<()> {
        self.record(format!("get_repository {owner}/{repo}")).await;
        self.repository(owner, repo)
            .map(|_| ())
            .ok_or(PlatformError::NotFound)
    }

    async fn list_owned_repositories(
        &self,
        page: u32,
        per_page: usize,
    ) -> PlatformResult<Vec<RemoteRepository>> {
        self.record(format!("list_owned_repositories {page}")).await;
        let owned = self
            .repositories
            .iter()
            .enumerate()
            .filter(|(_, (owner, _, _))| *owner == self.owner)
            .map(|(index, (owner, name, _))| RemoteRepository {
                id: index as u64 + 1,
                owner: owner.clone(),
                name: name.clone(),
            })
            .collect::<Vec<_>>();
        Ok(Self::page(&owned, page, per_page))
    }

    async fn list_collaborators(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
        per_page: usize,
    ) -> PlatformResult<Vec<RemoteCollaborator>> {
        self.record(format!("list_collaborators {owner}/{repo} {page}"))
            .await;
        let state = self.state_for(owner, repo).await?;
        if state.deny_listing {
            return Err(PlatformError::Status {
                status: 403,
                body: "Must have push access".to_string(),
            });
        }
        let collaborators = state
            .collaborators
            .iter()
            .enumerate()
            .map(|(index, login)| RemoteCollaborator {
                id: index as u64 + 1,
                login: login.clone(),
            })
            .collect::<Vec<_>>();
        Ok(Self::page(&collaborators, page, per_page))
    }

    async fn list_invitations(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
        per_page: usize,
    ) -> PlatformResult<Vec<RemoteInvitation>> {
        self.record(format!("list_invitations {owner}/{repo} {page}"))
            .await;
        let state = self.state_for(owner, repo).await?;
        if state.deny_listing {
            return Err(PlatformError::Status {
                status: 403,
                body: "Must have admin access".to_string(),
            });
        }
        let invitations = state
            .invitations
            .iter()
            .map(|(id, invitee)| RemoteInvitation {
                id: *id,
                invitee: Some(invitee.clone()),
            })
            .collect::<Vec<_>>();
        Ok(Self::page(&invitations, page, per_page))
    }

    async fn add_collaborator(&self, owner: &str, repo: &str, username: &str) -> PlatformResult<()> {
        self.record(format!("add {owner}/{repo} {username}")).await;
        self.check_mutation(owner, repo, username)?;
        let mut state = self.state.lock().await;
        if let Some(entry) = state.get_mut(&format!("{owner}/{repo}")) {
            let next_id = entry.invitations.len() as u64 + 100;
            entry.invitations.push((next_id, username.to_string()));
        }
        Ok(())
    }

    async fn remove_collaborator(
        &self,
        owner: &str,
        repo: &str,
        username: &str,
    ) -> PlatformResult<()> {
        self.record(format!("remove {owner}/{repo} {username}"))
            .await;
        self.check_mutation(owner, repo, username)
    }

    async fn delete_invitation(
        &self,
        owner: &str,
        repo: &str,
        invitation_id: u64,
    ) -> PlatformResult<()> {
        self.record(format!("delete {owner}/{repo} {invitation_id}"))
            .await;
        let invitee = self
            .repository(owner, repo)
            .and_then(|repository| {
                repository
                    .invitations
                    .iter()
                    .find(|(id, _)| *id == invitation_id)
                    .map(|(_, invitee)| invitee.clone())
            })
            .unwrap_or_default();
        self.check_mutation(owner, repo, &invitee)
    }

    async fn create_issue_comment(&self, issue: &IssueRef, body: &str) -> PlatformResult<()> {
        self.comments
            .lock()
            .await
            .push((issue.clone(), body.to_string()));
        Ok(())
    }
}
