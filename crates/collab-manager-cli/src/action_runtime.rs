//! Entry flow of the action: trigger event to posted issue comment.

use anyhow::{bail, Context, Result};
use collab_manager_core::{
    render_error_comment, render_report_comment, CollaborationPlatform,
    CollaboratorsManagerError, Command, InvocationContext, IssueRef, PlatformResult,
    ReconciliationEngine, RemoteStateResolver,
};
use collab_manager_github::GithubApiClient;

use crate::cli_args::Cli;
use crate::trigger_event::{IssueOpenedEvent, RepositorySlug};

#[derive(Debug, Clone, PartialEq, Eq)]
enum IssueBody {
    Text(String),
    PullRequest,
    Empty,
}

pub async fn run_cli(cli: Cli) -> Result<()> {
    let event = IssueOpenedEvent::load(&cli.event_name, &cli.event_path)?;
    let repository = RepositorySlug::parse(&cli.repository)?;
    let client = GithubApiClient::new(&cli.api_base, &cli.token, cli.request_timeout_ms)?;
    let context = InvocationContext::new(&repository.owner, &repository.name, event.issue_number);

    let body = match resolve_issue_body(&client, &context.issue, event.body).await {
        Ok(IssueBody::Text(body)) => body,
        Ok(IssueBody::PullRequest) => bail!("Issue is pull request!"),
        Ok(IssueBody::Empty) => bail!("Issue body null or empty!"),
        Err(error) => {
            post_error_comment(&client, &context.issue, &error.to_string()).await;
            return Err(error).context("failed to fetch issue body");
        }
    };
    execute_and_report(&client, context, &body, cli.page_size).await
}

/// Run the command in `body` and post its report, or post the error that
/// aborted it. Text without an action block posts nothing.
pub async fn execute_and_report(
    platform: &dyn CollaborationPlatform,
    context: InvocationContext,
    body: &str,
    page_size: usize,
) -> Result<()> {
    let issue = context.issue.clone();
    match run_command(platform, context, body, page_size).await {
        Ok(()) => Ok(()),
        Err(CollaboratorsManagerError::NotApplicable) => {
            tracing::warn!(issue = issue.number, "issue does not contain a collaborators manager command");
            Err(CollaboratorsManagerError::NotApplicable.into())
        }
        Err(error) => {
            tracing::error!(issue = issue.number, error = %error, "collaborators manager run failed");
            post_error_comment(platform, &issue, &error.to_string()).await;
            Err(error.into())
        }
    }
}

async fn resolve_issue_body(
    client: &GithubApiClient,
    issue: &IssueRef,
    payload_body: Option<String>,
) -> PlatformResult<IssueBody> {
    if let Some(body) = payload_body.filter(|body| !body.is_empty()) {
        return Ok(IssueBody::Text(body));
    }
    let fetched = client
        .get_issue(&issue.owner, &issue.repo, issue.number)
        .await?;
    if fetched.is_pull_request() {
        return Ok(IssueBody::PullRequest);
    }
    Ok(fetched
        .body
        .filter(|body| !body.is_empty())
        .map(IssueBody::Text)
        .unwrap_or(IssueBody::Empty))
}

async fn run_command(
    platform: &dyn CollaborationPlatform,
    context: InvocationContext,
    body: &str,
    page_size: usize,
) -> collab_manager_core::Result<()> {
    let command = Command::parse(context, body)?;
    let resolver = RemoteStateResolver::with_page_size(platform, page_size);
    let engine = ReconciliationEngine::new(command, resolver)?;
    let lines = engine.execute().await?;
    let issue = engine.command().issue();
    platform
        .create_issue_comment(issue, &render_report_comment(&lines))
        .await?;
    tracing::info!(issue = issue.number, lines = lines.len(), "report posted");
    Ok(())
}

async fn post_error_comment(platform: &dyn CollaborationPlatform, issue: &IssueRef, message: &str) {
    if let Err(error) = platform
        .create_issue_comment(issue, &render_error_comment(message))
        .await
    {
        tracing::error!(issue = issue.number, error = %error, "failed to post error comment");
    }
}
