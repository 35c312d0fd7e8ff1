use interchange::InterchangeError;
use tagging::WorkspaceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error(transparent)]
    Interchange(#[from] InterchangeError),

    #[error("group {group:?} has no shape at index {index}")]
    NoSuchMember { group: String, index: usize },
}
