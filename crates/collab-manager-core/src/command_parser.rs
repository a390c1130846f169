use std::collections::HashSet;

use crate::error::{CollaboratorsManagerError, Result};
use crate::repository::RepositoryRef;

pub const LINE_TERMINATOR: &str = "\r\n";
pub const ACTION_HEADER_KEY: &str = "## collaborators-manager-action";
pub const ADD_COLLABORATORS_KEY: &str = "### add collaborators";
pub const REMOVE_COLLABORATORS_KEY: &str = "### remove collaborators";
pub const LIST_REPOSITORIES_KEY: &str = "### list repositories";
pub const LIST_COLLABORATORS_KEY: &str = "### list collaborators";
pub const USERS_KEY: &str = "- users:";
pub const REPOS_KEY: &str = "- repos:";
pub const LIST_SEPARATOR: &str = ",";
pub const WILDCARD: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Enumerates supported `CommandKind` values.
pub enum CommandKind {
    None,
    AddCollaborator,
    RemoveCollaborator,
    ListRepositories,
    ListCollaborators,
}

impl CommandKind {
    fn from_sub_header(line: &str) -> Option<Self> {
        [
            (ADD_COLLABORATORS_KEY, Self::AddCollaborator),
            (REMOVE_COLLABORATORS_KEY, Self::RemoveCollaborator),
            (LIST_REPOSITORIES_KEY, Self::ListRepositories),
            (LIST_COLLABORATORS_KEY, Self::ListCollaborators),
        ]
        .into_iter()
        .find(|(key, _)| line.starts_with(key))
        .map(|(_, kind)| kind)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::AddCollaborator => "add_collaborator",
            Self::RemoveCollaborator => "remove_collaborator",
            Self::ListRepositories => "list_repositories",
            Self::ListCollaborators => "list_collaborators",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Issue the command was read from and where the report is posted.
pub struct IssueRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Trigger coordinates passed in by the hosting layer.
pub struct InvocationContext {
    /// Login that owns the repository the issue was opened in.
    pub owner: String,
    pub issue: IssueRef,
}

impl InvocationContext {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, number: u64) -> Self {
        let owner = owner.into();
        Self {
            issue: IssueRef {
                owner: owner.clone(),
                repo: repo.into(),
                number,
            },
            owner,
        }
    }
}

#[derive(Debug, Clone)]
/// Typed command extracted from an issue body.
pub struct Command {
    context: InvocationContext,
    kind: CommandKind,
    collaborators: Vec<String>,
    repository_specs: Vec<String>,
    repositories: Vec<RepositoryRef>,
}

impl Command {
    /// Parse the first action block found in `body`.
    ///
    /// Text without the action header yields a `CommandKind::None` command;
    /// a header followed by anything but the expected lines is a format error.
    pub fn parse(context: InvocationContext, body: &str) -> Result<Self> {
        let lines = body.split(LINE_TERMINATOR).collect::<Vec<_>>();
        let Some(header_index) = lines
            .iter()
            .position(|line| line.starts_with(ACTION_HEADER_KEY))
        else {
            return Ok(Self::new(context, CommandKind::None, Vec::new(), Vec::new()));
        };

        let mut remaining = lines[header_index + 1..].iter().copied();
        let mut next_line = || remaining.next().ok_or(CollaboratorsManagerError::Format);

        let kind = CommandKind::from_sub_header(next_line()?)
            .ok_or(CollaboratorsManagerError::Format)?;
        let (collaborators, repository_specs) = match kind {
            CommandKind::AddCollaborator | CommandKind::RemoveCollaborator => {
                let collaborators = parse_list_line(next_line()?, USERS_KEY)?;
                let repository_specs = parse_list_line(next_line()?, REPOS_KEY)?;
                (collaborators, repository_specs)
            }
            CommandKind::ListRepositories => (parse_list_line(next_line()?, USERS_KEY)?, Vec::new()),
            CommandKind::ListCollaborators => (Vec::new(), parse_list_line(next_line()?, REPOS_KEY)?),
            CommandKind::None => return Err(CollaboratorsManagerError::Format),
        };

        Ok(Self::new(context, kind, collaborators, repository_specs))
    }

    pub fn new(
        context: InvocationContext,
        kind: CommandKind,
        collaborators: Vec<String>,
        repository_specs: Vec<String>,
    ) -> Self {
        let repositories = repository_specs
            .iter()
            .map(|spec| RepositoryRef::from_spec(spec, &context.owner))
            .collect();
        Self {
            context,
            kind,
            collaborators,
            repository_specs,
            repositories,
        }
    }

    /// Check the per-kind list requirements before any remote call is made.
    pub fn validate(&self) -> Result<()> {
        let require_collaborators = || {
            if self.collaborators.is_empty() {
                return Err(CollaboratorsManagerError::Validation(
                    "Empty collaborators parameter!".to_string(),
                ));
            }
            Ok(())
        };
        let require_repositories = || {
            if self.repository_specs.is_empty() {
                return Err(CollaboratorsManagerError::Validation(
                    "Empty repositories parameter!".to_string(),
                ));
            }
            Ok(())
        };

        match self.kind {
            CommandKind::None => Ok(()),
            CommandKind::AddCollaborator | CommandKind::RemoveCollaborator => {
                require_collaborators()?;
                require_repositories()
            }
            CommandKind::ListRepositories => require_collaborators(),
            CommandKind::ListCollaborators => require_repositories(),
        }
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn context(&self) -> &InvocationContext {
        &self.context
    }

    pub fn owner(&self) -> &str {
        &self.context.owner
    }

    pub fn issue(&self) -> &IssueRef {
        &self.context.issue
    }

    pub fn collaborators(&self) -> &[String] {
        &self.collaborators
    }

    pub fn repository_specs(&self) -> &[String] {
        &self.repository_specs
    }

    /// Repository references resolved from the raw specs against the owner.
    pub fn repositories(&self) -> &[RepositoryRef] {
        &self.repositories
    }

    pub fn targets_all_repositories(&self) -> bool {
        self.repository_specs.iter().any(|spec| spec == WILDCARD)
    }

    pub fn targets_all_collaborators(&self) -> bool {
        self.collaborators.iter().any(|name| name == WILDCARD)
    }
}

fn parse_list_line(line: &str, key: &str) -> Result<Vec<String>> {
    line.strip_prefix(key)
        .map(|remainder| flat_split(remainder, LIST_SEPARATOR))
        .ok_or(CollaboratorsManagerError::Format)
}

/// Split `raw` on `separator`, trimming entries and dropping blanks and
/// repeats while keeping first-seen order.
pub fn flat_split(raw: &str, separator: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.split(separator)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .filter(|value| seen.insert(*value))
        .map(ToOwned::to_owned)
        .collect()
}
