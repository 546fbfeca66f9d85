//! Transactional symbol/reference graph builder.
//!
//! One [`GraphBuilder`] owns the store for one output target. Interning is
//! a read-then-write cache operation, so all calls for a target must come
//! from a single owner.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace, warn};

use crate::base::Span;

use super::error::GraphError;
use super::name::NameHierarchy;
use super::store::GraphStore;
use super::types::{
    DefinitionKind, ElementId, FileId, ReferenceId, ReferenceKind, SymbolId, SymbolKind,
};

pub struct GraphBuilder<S: GraphStore> {
    store: Option<S>,
    symbols: FxHashMap<String, SymbolId>,
    files: FxHashMap<String, FileId>,
    references: FxHashSet<ReferenceId>,
}

impl<S: GraphStore> GraphBuilder<S> {
    /// Open `target` on `store` and begin the build transaction.
    pub fn open(mut store: S, target: &str) -> Result<Self, GraphError> {
        if target.trim().is_empty() {
            return Err(GraphError::invalid_argument(
                "a target name is required for the graph store",
            ));
        }
        store.open(target)?;
        if let Err(err) = store.begin_transaction() {
            let _ = store.close();
            return Err(err);
        }
        debug!(graph_target = target, "opened graph target");
        Ok(Self {
            store: Some(store),
            symbols: FxHashMap::default(),
            files: FxHashMap::default(),
            references: FxHashSet::default(),
        })
    }

    /// The underlying store, for read access while building
    pub fn store(&self) -> Option<&S> {
        self.store.as_ref()
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Distinct references recorded so far
    pub fn reference_count(&self) -> usize {
        self.references.len()
    }

    fn store_mut(&mut self) -> Result<&mut S, GraphError> {
        self.store
            .as_mut()
            .ok_or_else(|| GraphError::store("graph builder is already finished"))
    }

    /// Id of `qualified_name`, recording the symbol on first use.
    pub fn intern_symbol(&mut self, qualified_name: &str, kind: SymbolKind) -> Result<SymbolId, GraphError> {
        self.intern_decorated_symbol(qualified_name, kind, "", "")
    }

    /// Like [`GraphBuilder::intern_symbol`], with a prefix/postfix on the
    /// last name element. Names are cached by their full serialized hierarchy,
    /// so a decorated name never shares an id with a plain one.
    pub fn intern_decorated_symbol(
        &mut self,
        qualified_name: &str,
        kind: SymbolKind,
        prefix: &str,
        postfix: &str,
    ) -> Result<SymbolId, GraphError> {
        if qualified_name.trim().is_empty() {
            return Err(GraphError::invalid_argument(
                "symbol name may not be empty or whitespace",
            ));
        }

        let serialized = NameHierarchy::decorated(qualified_name, prefix, postfix).to_json()?;
        if let Some(&id) = self.symbols.get(&serialized) {
            return Ok(id);
        }

        let store = self.store_mut()?;
        let id = store.record_symbol(&serialized)?;
        if !id.is_valid() {
            return Err(GraphError::store(store.last_error()));
        }
        store.record_symbol_definition_kind(id, DefinitionKind::Explicit)?;
        store.record_symbol_kind(id, kind)?;

        trace!(name = qualified_name, kind = kind.display(), %id, "interned symbol");
        self.symbols.insert(serialized, id);
        Ok(id)
    }

    /// Id of the file at `path`, recording it with `language` on first use.
    pub fn intern_file(&mut self, path: &str, language: &str) -> Result<FileId, GraphError> {
        if path.trim().is_empty() {
            return Err(GraphError::invalid_argument("file path may not be empty"));
        }
        if let Some(&id) = self.files.get(path) {
            return Ok(id);
        }

        let store = self.store_mut()?;
        let id = store.record_file(path)?;
        if !id.is_valid() {
            return Err(GraphError::store(store.last_error()));
        }
        store.record_file_language(id, language)?;

        trace!(path, language, %id, "interned file");
        self.files.insert(path.to_string(), id);
        Ok(id)
    }

    pub fn add_reference(
        &mut self,
        source: SymbolId,
        target: SymbolId,
        kind: ReferenceKind,
    ) -> Result<ReferenceId, GraphError> {
        if !source.is_valid() || !target.is_valid() {
            return Err(GraphError::invalid_argument(format!(
                "a symbol id must be greater than zero (source {source}, target {target})"
            )));
        }
        let store = self.store_mut()?;
        let id = store.record_reference(source, target, kind)?;
        if !id.is_valid() {
            return Err(GraphError::store(store.last_error()));
        }
        self.references.insert(id);
        Ok(id)
    }

    /// Attach a location in `file` to a symbol or reference.
    pub fn attach_location(&mut self, element: ElementId, file: FileId, span: Span) -> Result<(), GraphError> {
        if !element.is_valid() {
            return Err(GraphError::invalid_argument(format!(
                "reference id must be greater than zero, got {element}"
            )));
        }
        if !file.is_valid() {
            return Err(GraphError::invalid_argument(format!(
                "file id must be greater than zero, got {file}"
            )));
        }
        self.store_mut()?.record_reference_location(element, file, span)
    }

    /// Commit the transaction, close the target and hand back the store.
    pub fn commit(mut self) -> Result<S, GraphError> {
        let mut store = self.store.take().ok_or_else(|| GraphError::store("graph builder is already finished"))?;
        store.commit_transaction()?;
        store.close()?;
        debug!(symbols = self.symbols.len(), files = self.files.len(), "committed graph");
        Ok(store)
    }

    /// Roll back everything recorded through this builder.
    pub fn abort(mut self) -> Result<S, GraphError> {
        let mut store = self.store.take().ok_or_else(|| GraphError::store("graph builder is already finished"))?;
        store.rollback_transaction()?;
        store.close()?;
        debug!("aborted graph transaction");
        Ok(store)
    }
}

impl<S: GraphStore> Drop for GraphBuilder<S> {
    fn drop(&mut self) {
        if let Some(store) = self.store.as_mut() {
            warn!("graph builder dropped without commit; rolling back");
            if let Err(err) = store.rollback_transaction().and_then(|()| store.close()) {
                warn!(%err, "rollback failed");
            }
        }
    }
}
