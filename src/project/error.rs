//! Error types for loading and indexing.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::behavior::ExtractError;
use crate::graph::GraphError;
use crate::parser::SyntaxError;

/// Failure to load one document. Never fatal for a run: the document is
/// skipped.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{}: path does not exist", .path.display())]
    NotFound { path: PathBuf },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}:{line}:{column}: {source}", .path.display())]
    Syntax {
        path: PathBuf,
        line: u32,
        column: u32,
        #[source]
        source: SyntaxError,
    },
}

/// Failure of a whole indexing run. Nothing is committed.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("no input paths given")]
    NoInputs,

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("{}: {source}", .path.display())]
    Extract {
        path: PathBuf,
        #[source]
        source: ExtractError,
    },

    #[error(transparent)]
    Graph(#[from] GraphError),
}
