use crate::error::{CollaboratorsManagerError, Result};
use crate::paginated_fetch::{fetch_all_pages, DEFAULT_PAGE_SIZE};
use crate::platform::{CollaborationPlatform, PlatformResult};
use crate::repository::{Invitation, RepositoryExistence, RepositoryRef};

/// Resolves remote repository and user state through a platform.
pub struct RemoteStateResolver<'a> {
    platform: &'a dyn CollaborationPlatform,
    page_size: usize,
}

impl<'a> RemoteStateResolver<'a> {
    pub fn new(platform: &'a dyn CollaborationPlatform) -> Self {
        Self::with_page_size(platform, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(platform: &'a dyn CollaborationPlatform, page_size: usize) -> Self {
        Self {
            platform,
            page_size: page_size.max(1),
        }
    }

    pub fn platform(&self) -> &'a dyn CollaborationPlatform {
        self.platform
    }

    /// Fill in collaborators, invitations and existence for each reference.
    ///
    /// A failed listing leaves the reference untouched; existence is then
    /// settled by a direct repository lookup.
    pub async fn resolve(
        &self,
        repos: &mut [RepositoryRef],
        want_collaborators: bool,
        want_invitations: bool,
    ) {
        for repo in repos.iter_mut() {
            if want_collaborators {
                match self.collaborators(&repo.owner, &repo.name).await {
                    Ok(collaborators) => {
                        repo.collaborators = Some(collaborators);
                        repo.existence = RepositoryExistence::Exists;
                    }
                    Err(error) => {
                        tracing::debug!(
                            repository = repo.full_name(),
                            error = %error,
                            "collaborator listing unavailable"
                        );
                    }
                }
            }

            if want_invitations {
                match self.invitations(&repo.owner, &repo.name).await {
                    Ok(invitations) => {
                        repo.invitations = Some(invitations);
                        repo.existence = RepositoryExistence::Exists;
                    }
                    Err(error) => {
                        tracing::debug!(
                            repository = repo.full_name(),
                            error = %error,
                            "invitation listing unavailable"
                        );
                    }
                }
            }

            if !repo.exists() {
                repo.existence = match self.platform.get_repository(&repo.owner, &repo.name).await
                {
                    Ok(()) => RepositoryExistence::Exists,
                    Err(_) => RepositoryExistence::Missing,
                };
            }
        }
    }

    /// Every repository owned by the authenticated user, marked as existing.
    pub async fn owned_repositories(&self) -> Result<Vec<RepositoryRef>> {
        let repositories = fetch_all_pages(self.page_size, |page| {
            self.platform.list_owned_repositories(page, self.page_size)
        })
        .await?;
        tracing::debug!(count = repositories.len(), "owned repositories listed");
        Ok(repositories
            .into_iter()
            .map(|repository| RepositoryRef::existing(repository.owner, repository.name))
            .collect())
    }

    /// Fail with every unknown username when any lookup fails.
    pub async fn validate_users(&self, users: &[String]) -> Result<()> {
        let mut invalid = Vec::new();
        for user in users {
            if self.platform.get_user(user).await.is_err() {
                invalid.push(user.as_str());
            }
        }
        match invalid.as_slice() {
            [] => Ok(()),
            [user] => Err(CollaboratorsManagerError::Validation(format!(
                "User `{user}` does not exist!"
            ))),
            users => Err(CollaboratorsManagerError::Validation(format!(
                "Users `{}` does not exist!",
                users.join(", ")
            ))),
        }
    }

    async fn collaborators(&self, owner: &str, repo: &str) -> PlatformResult<Vec<String>> {
        let collaborators = fetch_all_pages(self.page_size, |page| {
            self.platform
                .list_collaborators(owner, repo, page, self.page_size)
        })
        .await?;
        Ok(collaborators
            .into_iter()
            .map(|collaborator| collaborator.login)
            .collect())
    }

    async fn invitations(&self, owner: &str, repo: &str) -> PlatformResult<Vec<Invitation>> {
        let invitations = fetch_all_pages(self.page_size, |page| {
            self.platform
                .list_invitations(owner, repo, page, self.page_size)
        })
        .await?;
        Ok(invitations
            .into_iter()
            .filter_map(|invitation| {
                invitation
                    .invitee
                    .map(|login| Invitation::new(invitation.id, login))
            })
            .collect())
    }
}
