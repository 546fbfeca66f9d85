//! Whole-run driver: collect, parse in parallel, then build the graph on
//! the calling thread.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::behavior::{BehaviorSchema, BehaviorWalker};
use crate::graph::{GraphBuilder, GraphStore};
use crate::parser::Document;
use crate::project::{IndexError, collect_file_paths, parse_files};

/// Options for one indexing run
#[derive(Debug, Clone)]
pub struct IndexOptions {
    /// Extension of the files collected from directory inputs, without the dot
    pub extension: String,
    pub schema: BehaviorSchema,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            extension: "json".to_string(),
            schema: BehaviorSchema::default(),
        }
    }
}

/// Counts reported by a committed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexSummary {
    pub documents_indexed: usize,
    pub documents_skipped: usize,
    pub symbols: usize,
    pub files: usize,
    pub references: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Indexer {
    options: IndexOptions,
}

impl Indexer {
    pub fn new(options: IndexOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &IndexOptions {
        &self.options
    }

    /// Index every document reachable from `inputs` into `target` on `store`.
    ///
    /// Documents that fail to load, fail to parse, or whose root is not a
    /// map are skipped with a warning. Any failure while building rolls the
    /// whole run back; nothing is committed.
    pub fn index<S: GraphStore>(
        &self,
        store: S,
        target: &str,
        inputs: &[PathBuf],
    ) -> Result<(S, IndexSummary), IndexError> {
        if inputs.is_empty() {
            return Err(IndexError::NoInputs);
        }

        let mut paths = Vec::new();
        for input in inputs {
            paths.extend(collect_file_paths(input, &self.options.extension)?);
        }
        paths.sort();
        paths.dedup();
        info!(files = paths.len(), "collected documents");

        let mut summary = IndexSummary::default();
        let mut documents: Vec<(PathBuf, Document)> = Vec::with_capacity(paths.len());
        for (path, result) in parse_files(&paths) {
            match result {
                Ok(document) if document.root_map().is_some() => documents.push((path, document)),
                Ok(document) => {
                    warn!(
                        path = %path.display(),
                        found = document.root.value.kind_name(),
                        "skipping document whose root is not a map"
                    );
                    summary.documents_skipped += 1;
                }
                Err(err) => {
                    warn!(%err, "skipping document");
                    summary.documents_skipped += 1;
                }
            }
        }
        info!(
            parsed = documents.len(),
            skipped = summary.documents_skipped,
            "parse phase finished"
        );

        let mut builder = GraphBuilder::open(store, target)?;
        if let Err(err) = self.build(&mut builder, &documents) {
            builder.abort()?;
            return Err(err);
        }

        summary.documents_indexed = documents.len();
        summary.symbols = builder.symbol_count();
        summary.files = builder.file_count();
        summary.references = builder.reference_count();
        let store = builder.commit()?;

        info!(
            documents = summary.documents_indexed,
            symbols = summary.symbols,
            references = summary.references,
            "indexed"
        );
        Ok((store, summary))
    }

    fn build<S: GraphStore>(
        &self,
        builder: &mut GraphBuilder<S>,
        documents: &[(PathBuf, Document)],
    ) -> Result<(), IndexError> {
        let mut walker = BehaviorWalker::new(builder, &self.options.schema);
        for (path, document) in documents {
            let path_str = path.to_string_lossy();
            let behavior = walker
                .walk_document(&path_str, document)
                .map_err(|source| IndexError::Extract {
                    path: path.clone(),
                    source,
                })?;
            debug!(path = %path_str, %behavior, "indexed document");
        }
        Ok(())
    }
}
