//! Reconciliation of a parsed command against remote collaborator state.

use std::collections::HashMap;

use crate::command_parser::{Command, CommandKind};
use crate::error::{CollaboratorsManagerError, Result};
use crate::report::{
    invitations_url, repository_link, user_link, user_possessive_link, ReportTable,
};
use crate::repository::RepositoryRef;
use crate::state_resolver::RemoteStateResolver;


const STATUS_COLUMNS: [&str; 2] = ["Repository", "Status"];
const CELL_LINE_BREAK: &str = "<br>";
const LIST_JOIN: &str = ", ";

/// Executes one validated command and produces the report lines.
pub struct ReconciliationEngine<'a> {
    command: Command,
    resolver: RemoteStateResolver<'a>,
}

impl<'a> ReconciliationEngine<'a> {
    /// Validate `command` up front so nothing remote runs for a bad command.
    pub fn new(command: Command, resolver: RemoteStateResolver<'a>) -> Result<Self> {
        command.validate()?;
        Ok(Self { command, resolver })
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    pub async fn execute(&self) -> Result<Vec<String>> {
        tracing::info!(
            command = self.command.kind().as_str(),
            users = self.command.collaborators().len(),
            repositories = self.command.repository_specs().len(),
            "executing collaborators manager command"
        );
        match self.command.kind() {
            CommandKind::None => Err(CollaboratorsManagerError::NotApplicable),
            CommandKind::AddCollaborator => {
                if self.command.targets_all_repositories() {
                    return Err(CollaboratorsManagerError::Unsupported(
                        "Add a collaborator to all repositories is unsupported!".to_string(),
                    ));
                }
                self.add_collaborators().await
            }
            CommandKind::RemoveCollaborator => self.remove_collaborators().await,
            CommandKind::ListRepositories => self.list_repositories().await,
            CommandKind::ListCollaborators => self.list_collaborators().await,
        }
    }

    async fn add_collaborators(&self) -> Result<Vec<String>> {
        let users = self.command.collaborators();
        self.resolver.validate_users(users).await?;

        let mut repos = self.command.repositories().to_vec();
        self.resolver.resolve(&mut repos, true, false).await;
        ensure_repositories_exist(&repos, |repo| repo.name.as_str())?;

        let platform = self.resolver.platform();
        let mut table = ReportTable::new("Invitation collaborators status", &STATUS_COLUMNS);
        for repo in &repos {
            let mut statuses = Vec::with_capacity(users.len());
            for user in users {
                if repo.has_collaborator(user) {
                    statuses.push(format!("User `{user}` already a collaborator"));
                    continue;
                }

                match platform.add_collaborator(&repo.owner, &repo.name, user).await {
                    Ok(()) => {
                        tracing::info!(repository = repo.full_name(), user = %user, "invitation sent");
                        statuses.push(format!(
                            "[Invite sent]({}), awaiting {} response",
                            invitations_url(repo.full_name()),
                            user_possessive_link(user)
                        ));
                    }
                    Err(error) => {
                        tracing::warn!(
                            repository = repo.full_name(),
                            user = %user,
                            error = %error,
                            "invite collaborator failed"
                        );
                        statuses.push(format!(
                            "Invite user {} failed. Error: {error}",
                            user_link(user)
                        ));
                    }
                }
            }
            table.push_row(&[
                repository_link(&repo.name, repo.full_name()),
                statuses.join(CELL_LINE_BREAK),
            ]);
        }
        Ok(table.into_lines())
    }

    async fn remove_collaborators(&self) -> Result<Vec<String>> {
        let users = self.command.collaborators();
        self.resolver.validate_users(users).await?;

        let mut repos = self.target_repositories().await?;
        self.resolver.resolve(&mut repos, true, true).await;
        ensure_repositories_exist(&repos, |repo| repo.name.as_str())?;

        let platform = self.resolver.platform();
        let mut table = ReportTable::new("Remove collaborators status", &STATUS_COLUMNS);
        for repo in &repos {
            let mut statuses = Vec::new();
            for user in users {
                if repo.has_collaborator(user) {
                    match platform
                        .remove_collaborator(&repo.owner, &repo.name, user)
                        .await
                    {
                        Ok(()) => {
                            tracing::info!(repository = repo.full_name(), user = %user, "collaborator removed");
                            statuses.push(format!("Removed user {}", user_link(user)));
                        }
                        Err(error) => {
                            tracing::warn!(
                                repository = repo.full_name(),
                                user = %user,
                                error = %error,
                                "remove collaborator failed"
                            );
                            statuses.push(format!(
                                "Remove user {} failed. Error: {error}",
                                user_link(user)
                            ));
                        }
                    }
                } else if let Some(invitation_id) = repo.invitation_id(user) {
                    match platform
                        .delete_invitation(&repo.owner, &repo.name, invitation_id)
                        .await
                    {
                        Ok(()) => {
                            tracing::info!(repository = repo.full_name(), user = %user, invitation_id, "invitation deleted");
                            statuses.push(format!("Deleted {} invitation", user_possessive_link(user)));
                        }
                        Err(error) => {
                            tracing::warn!(
                                repository = repo.full_name(),
                                user = %user,
                                invitation_id,
                                error = %error,
                                "delete invitation failed"
                            );
                            statuses.push(format!(
                                "Delete {} invitation failed. Error: {error}",
                                user_possessive_link(user)
                            ));
                        }
                    }
                }
            }

            if !statuses.is_empty() {
                table.push_row(&[
                    repository_link(&repo.name, repo.full_name()),
                    statuses.join(CELL_LINE_BREAK),
                ]);
            }
        }

        if table.row_count() == 0 {
            return Ok(vec![format!(
                "User `{}` is not a collaborator!",
                users.join(LIST_JOIN)
            )]);
        }
        Ok(table.into_lines())
    }

    async fn list_repositories(&self) -> Result<Vec<String>> {
        let users = self.command.collaborators();
        let all_users = self.command.targets_all_collaborators();
        if !all_users {
            self.resolver.validate_users(users).await?;
        }

        let mut repos = self.resolver.owned_repositories().await?;
        if repos.is_empty() {
            return Err(CollaboratorsManagerError::Validation(format!(
                "User `{}` don't have any repository!",
                self.command.owner()
            )));
        }
        self.resolver.resolve(&mut repos, true, true).await;

        let index = UserRepositoryIndex::build(&repos);
        let mut table = ReportTable::new(
            "Here is list of repositories for each collaborator",
            &["Username", "Repositories"],
        );
        if all_users {
            for (user, entries) in index.iter() {
                if user == self.command.owner() {
                    continue;
                }
                table.push_row(&[user_link(user), entries.join(LIST_JOIN)]);
            }
        } else {
            for user in users {
                let entries = index.entries(user).unwrap_or_default();
                table.push_row(&[user_link(user), entries.join(LIST_JOIN)]);
            }
        }
        Ok(table.into_lines())
    }

    async fn list_collaborators(&self) -> Result<Vec<String>> {
        let mut repos = self.target_repositories().await?;
        self.resolver.resolve(&mut repos, true, true).await;
        ensure_repositories_exist(&repos, RepositoryRef::full_name)?;

        let owner = self.command.owner();
        let mut table = ReportTable::new(
            "Here is list of collaborators for each repository",
            &["Repository", "Collaborators", "Invitations"],
        );
        for repo in &repos {
            let collaborators = repo.collaborators.as_deref().unwrap_or_default();
            let skip_owner = collaborators.len() > 1;
            let collaborator_links = collaborators
                .iter()
                .filter(|user| !(skip_owner && user.as_str() == owner))
                .map(|user| user_link(user))
                .collect::<Vec<_>>();
            let invitation_links = repo
                .invitations
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(|invitation| user_link(&invitation.username))
                .collect::<Vec<_>>();
            table.push_row(&[
                repository_link(&repo.name, repo.full_name()),
                collaborator_links.join(LIST_JOIN),
                invitation_links.join(LIST_JOIN),
            ]);
        }
        Ok(table.into_lines())
    }

    /// Explicit repositories, or every owned repository for the `*` spec.
    async fn target_repositories(&self) -> Result<Vec<RepositoryRef>> {
        if self.command.targets_all_repositories() {
            self.resolver.owned_repositories().await
        } else {
            Ok(self.command.repositories().to_vec())
        }
    }
}

fn ensure_repositories_exist<F>(repos: &[RepositoryRef], display: F) -> Result<()>
where
    F: Fn(&RepositoryRef) -> &str,
{
    let missing = repos
        .iter()
        .filter(|repo| !repo.exists())
        .map(display)
        .collect::<Vec<_>>();
    if missing.is_empty() {
        return Ok(());
    }
    Err(CollaboratorsManagerError::Validation(format!(
        "Repository `{}` does not exist!",
        missing.join(LIST_JOIN)
    )))
}

/// Repositories per user, in first-seen user order.
struct UserRepositoryIndex {
    order: Vec<String>,
    entries: HashMap<String, Vec<String>>,
}

impl UserRepositoryIndex {
    fn build(repos: &[RepositoryRef]) -> Self {
        let mut index = Self {
            order: Vec::new(),
            entries: HashMap::new(),
        };
        for repo in repos {
            let link = repository_link(&repo.name, repo.full_name());
            for user in repo.collaborators.as_deref().unwrap_or_default() {
                index.push(user, link.clone());
            }
            for invitation in repo.invitations.as_deref().unwrap_or_default() {
                index.push(&invitation.username, format!("{link} _(invitation)_"));
            }
        }
        index
    }

    fn push(&mut self, user: &str, entry: String) {
        if !self.entries.contains_key(user) {
            self.order.push(user.to_string());
        }
        self.entries.entry(user.to_string()).or_default().push(entry);
    }

    fn entries(&self, user: &str) -> Option<&[String]> {
        self.entries.get(user).map(Vec::as_slice)
    }

    fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.order.iter().filter_map(|user| {
            self.entries
                .get(user)
                .map(|entries| (user.as_str(), entries.as_slice()))
        })
    }
}
