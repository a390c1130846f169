use std::path::PathBuf;

use clap::Parser;

fn parse_positive_usize(value: &str) -> Result<usize, String> {
    let parsed = value
        .parse::<usize>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

#[derive(Debug, Clone, Parser)]
#[command(
    name = "collaborators-manager-action",
    about = "Manage repository collaborators from structured issue commands",
    version
)]
/// Action configuration, read from flags or the GitHub Actions environment.
pub struct Cli {
    #[arg(
        long,
        env = "INPUT_TOKEN",
        hide_env_values = true,
        help = "GitHub token with admin access to the managed repositories"
    )]
    pub token: String,

    #[arg(
        long = "api-base",
        env = "GITHUB_API_URL",
        default_value = "https://api.github.com",
        help = "Base URL of the GitHub REST API"
    )]
    pub api_base: String,

    #[arg(
        long = "event-name",
        env = "GITHUB_EVENT_NAME",
        help = "Name of the workflow trigger event"
    )]
    pub event_name: String,

    #[arg(
        long = "event-path",
        env = "GITHUB_EVENT_PATH",
        help = "Path to the JSON payload of the trigger event"
    )]
    pub event_path: PathBuf,

    #[arg(
        long,
        env = "GITHUB_REPOSITORY",
        help = "Repository the issue was opened in, in owner/repo format"
    )]
    pub repository: String,

    #[arg(
        long = "page-size",
        env = "COLLAB_MANAGER_PAGE_SIZE",
        default_value_t = collab_manager_core::DEFAULT_PAGE_SIZE,
        value_parser = parse_positive_usize,
        help = "Items requested per page when listing repositories, collaborators and invitations"
    )]
    pub page_size: usize,

    #[arg(
        long = "request-timeout-ms",
        env = "COLLAB_MANAGER_REQUEST_TIMEOUT_MS",
        default_value_t = 30_000,
        value_parser = parse_positive_u64,
        help = "Timeout for a single GitHub API request"
    )]
    pub request_timeout_ms: u64,
}
