//! Decoding of the workflow trigger: event payload and repository slug.

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;

pub const SUPPORTED_EVENT_NAME: &str = "issues";
pub const SUPPORTED_EVENT_ACTION: &str = "opened";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySlug {
    pub owner: String,
    pub name: String,
}

impl RepositorySlug {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let (owner, name) = trimmed
            .split_once('/')
            .ok_or_else(|| anyhow!("invalid --repository '{raw}', expected owner/repo"))?;
        let owner = owner.trim();
        let name = name.trim();
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            bail!("invalid --repository '{raw}', expected owner/repo");
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EventIssue {
    #[serde(default)]
    number: Option<u64>,
    #[serde(default)]
    body: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EventPayload {
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    issue: Option<EventIssue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// An `issues.opened` trigger with the fields the action needs.
pub struct IssueOpenedEvent {
    pub issue_number: u64,
    /// Body shipped with the payload; empty bodies are treated as absent.
    pub body: Option<String>,
}

impl IssueOpenedEvent {
    pub fn load(event_name: &str, event_path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(event_path)
            .with_context(|| format!("failed to read event payload {}", event_path.display()))?;
        Self::from_payload(event_name, &raw)
    }

    pub fn from_payload(event_name: &str, raw: &str) -> Result<Self> {
        let payload = serde_json::from_str::<EventPayload>(raw)
            .context("failed to decode event payload")?;
        if event_name != SUPPORTED_EVENT_NAME
            || payload.action.as_deref() != Some(SUPPORTED_EVENT_ACTION)
        {
            bail!("`collaborators-manager-action` only support issue opened event");
        }
        let issue = payload.issue.unwrap_or_default();
        let issue_number = issue
            .number
            .filter(|number| *number > 0)
            .ok_or_else(|| anyhow!("Issue number not found!"))?;
        Ok(Self {
            issue_number,
            body: issue.body.filter(|body| !body.is_empty()),
        })
    }
}
