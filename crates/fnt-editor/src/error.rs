use crate::backend::BackendError;
use fnt_core::{NodeId, ValidationError};
use thiserror::Error;

/// Errors surfaced to the user by the controller.
///
/// Every variant is terminal for the attempt that produced it; nothing is
/// retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("node `{0}` is not in the current tree")]
    UnknownNode(NodeId),

    #[error("node `{0}` has no incoming edge")]
    NoEdge(NodeId),

    #[error("tree has not been loaded")]
    NotLoaded,
}
