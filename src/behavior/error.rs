//! Error types for behavior extraction.

use smol_str::SmolStr;
use thiserror::Error;

use crate::graph::GraphError;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// The document root is not a map, so it cannot be a behavior node.
    #[error("behavior document root must be a map, found {found}")]
    NotANode { found: &'static str },

    /// Neither identity key is present.
    #[error("behavior node at line {line} has neither `{id_key}` nor `{name_key}`")]
    MissingIdentity {
        id_key: SmolStr,
        name_key: SmolStr,
        line: u32,
    },

    /// A required field is absent.
    #[error("behavior `{node}` has no `{key}` field")]
    MissingField { node: String, key: SmolStr },

    /// A field holds a value of the wrong shape.
    #[error("field `{key}` of `{node}` at line {line} must be {expected}, found {found}")]
    InvalidField {
        node: String,
        key: String,
        line: u32,
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Graph(#[from] GraphError),
}
