//! Hosting-trigger glue for the collaborators manager action.
//!
//! Reads the workflow configuration and trigger payload, resolves the issue
//! body, runs the command and posts the resulting report back to the issue.

pub mod action_runtime;
pub mod bootstrap_helpers;
pub mod cli_args;
pub mod trigger_event;

pub use action_runtime::{execute_and_report, run_cli};
pub use bootstrap_helpers::init_tracing;
pub use cli_args::Cli;
