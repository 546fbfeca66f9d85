//! Project pipeline: find documents, parse them in parallel, and build the
//! graph from the results.

mod error;
pub mod file_loader;
mod indexer;

pub use error::{IndexError, LoadError};
pub use file_loader::{collect_file_paths, load_document, parse_files};
pub use indexer::{IndexOptions, IndexSummary, Indexer};
