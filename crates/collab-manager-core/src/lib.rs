//! Core of the collaborators manager issue action.
//!
//! Parses the structured command embedded in an issue body, resolves the
//! remote repository state through a [`CollaborationPlatform`], applies the
//! requested collaborator changes and renders the markdown status report.

pub mod command_parser;
pub mod engine;
pub mod error;
pub mod paginated_fetch;
pub mod platform;
pub mod report;
pub mod repository;
pub mod state_resolver;

#[cfg(test)]
pub(crate) mod test_platform;

pub use command_parser::{flat_split, Command, CommandKind, InvocationContext, IssueRef};
pub use engine::ReconciliationEngine;
pub use error::{CollaboratorsManagerError, Result};
pub use paginated_fetch::{fetch_all_pages, PageItem, DEFAULT_PAGE_SIZE};
pub use platform::{
    CollaborationPlatform, PlatformError, PlatformResult, RemoteCollaborator, RemoteInvitation,
    RemoteRepository,
};
pub use report::{render_error_comment, render_report_comment, REPORT_FOOTER};
pub use repository::{Invitation, RepositoryExistence, RepositoryRef};
pub use state_resolver::RemoteStateResolver;
