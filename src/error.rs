//! Error types for tree operations

use thiserror::Error;

/// Error types for tree operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Duplicate key found")]
    DuplicateKey,

    #[error("Key not found in tree")]
    KeyNotFound,

    #[error("Tree is empty")]
    EmptyTree,

    /// A post-condition of the balancing engine failed. This is always an engine bug.
    #[error("Tree invariant violated: {0}")]
    InvariantViolation(String),
}

impl TreeError {
    pub(crate) fn invariant(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::error!(%msg, "tree invariant violated");
        TreeError::InvariantViolation(msg)
    }
}
