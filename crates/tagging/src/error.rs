use crate::Bucket;
use node::ShapeId;
use thiserror::Error;

/// Errors raised by workspace operations.
///
/// Lookup failures mean the caller and the surface disagree about what
/// exists; they are surfaced, never absorbed. Races such as removing an
/// already removed shape are not errors and do not appear here.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("vector layer group {0:?} not found")]
    GroupNotFound(String),

    #[error("vector layer group {0:?} already exists")]
    DuplicateGroup(String),

    #[error("edit tool is already active")]
    DuplicateActivation,

    #[error("shape {0} is not on the surface")]
    ShapeNotFound(ShapeId),

    #[error("shape {id} is not a member of group {group:?}")]
    NotInGroup { id: ShapeId, group: String },

    #[error("no classification session is open")]
    NoClassificationSession,

    #[error("a classification session is already open")]
    ClassificationInProgress,

    #[error("option {0:?} is not in the classification vocabulary")]
    UnknownOption(String),

    #[error("no classification row for bucket {0}")]
    UnknownBucket(Bucket),

    #[error("invalid workspace config: {0}")]
    Config(#[from] serde_json::Error),
}
