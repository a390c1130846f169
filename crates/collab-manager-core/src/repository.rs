#[derive(Debug, Clone, PartialEq, Eq)]
/// A pending collaborator invitation on a repository.
pub struct Invitation {
    pub id: u64,
    pub username: String,
}

impl Invitation {
    pub fn new(id: u64, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Enumerates supported `RepositoryExistence` values.
pub enum RepositoryExistence {
    #[default]
    Unknown,
    Exists,
    Missing,
}

#[derive(Debug, Clone)]
/// Repository reference whose remote state is filled in by the resolver.
///
/// Identity is the `owner/name` pair; fetched state is ignored by equality.
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
    full_name: String,
    pub existence: RepositoryExistence,
    pub collaborators: Option<Vec<String>>,
    pub invitations: Option<Vec<Invitation>>,
}

impl RepositoryRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        let owner = owner.into();
        let name = name.into();
        let full_name = format!("{owner}/{name}");
        Self {
            owner,
            name,
            full_name,
            existence: RepositoryExistence::Unknown,
            collaborators: None,
            invitations: None,
        }
    }

    /// Build a reference already known to exist, e.g. from an owner listing.
    pub fn existing(owner: impl Into<String>, name: impl Into<String>) -> Self {
        let mut repo = Self::new(owner, name);
        repo.existence = RepositoryExistence::Exists;
        repo
    }

    /// Resolve a raw spec: `owner/name` when both halves are non-empty,
    /// otherwise a bare name under `default_owner`.
    pub fn from_spec(spec: &str, default_owner: &str) -> Self {
        let parts = spec.split('/').collect::<Vec<_>>();
        match parts.as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => Self::new(*owner, *name),
            _ => Self::new(default_owner, spec),
        }
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn exists(&self) -> bool {
        self.existence == RepositoryExistence::Exists
    }

    pub fn has_collaborator(&self, username: &str) -> bool {
        self.collaborators
            .as_ref()
            .is_some_and(|collaborators| collaborators.iter().any(|login| login == username))
    }

    pub fn invitation_id(&self, username: &str) -> Option<u64> {
        self.invitations.as_ref().and_then(|invitations| {
            invitations
                .iter()
                .find(|invitation| invitation.username == username)
                .map(|invitation| invitation.id)
        })
    }
}

impl PartialEq for RepositoryRef {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner && self.name == other.name
    }
}

impl Eq for RepositoryRef {}
