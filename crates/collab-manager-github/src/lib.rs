//! GitHub REST adapter for the collaborators manager.
//!
//! Implements [`collab_manager_core::CollaborationPlatform`] on top of
//! `reqwest` and exposes the issue lookup used by the action entrypoint.

pub mod github_api_client;
pub mod github_transport_helpers;

pub use github_api_client::{GithubApiClient, GithubIssue};
