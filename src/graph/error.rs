//! Error types for graph construction.

use thiserror::Error;

/// Errors raised while building a symbol/reference graph.
///
/// Every variant is fatal for the current output target: the builder's
/// transaction is rolled back and nothing becomes visible.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A precondition was violated: empty name, non-positive id.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The graph store reported a failure.
    #[error("Graph store error: {0}")]
    Store(String),

    /// A symbol name could not be serialized for the store.
    #[error("Name serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GraphError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }
}
