use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::trace;

use crate::base::LineIndex;
use crate::parser::{Document, parse_document};
use crate::project::LoadError;

/// Read and parse one document
pub fn load_document(path: &Path) -> Result<Document, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&text).map_err(|source| {
        let position = LineIndex::new(&text).position(source.range.start());
        LoadError::Syntax {
            path: path.to_path_buf(),
            line: position.line,
            column: position.column,
            source,
        }
    })
}

/// Load and parse every path in parallel. Results keep the input order.
pub fn parse_files(paths: &[PathBuf]) -> Vec<(PathBuf, Result<Document, LoadError>)> {
    paths
        .par_iter()
        .map(|path| {
            trace!(path = %path.display(), "parsing");
            (path.clone(), load_document(path))
        })
        .collect()
}
