use thiserror::Error;

use crate::platform::PlatformError;

#[derive(Debug, Error)]
/// Fatal failures that abort a collaborators manager run.
pub enum CollaboratorsManagerError {
    #[error("Invalid collaborators manager issue format!")]
    Format,
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unsupported(String),
    #[error("This is not a issue for collaborators manager action!")]
    NotApplicable,
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

pub type Result<T> = std::result::Result<T, CollaboratorsManagerError>;
