//! In-memory graph store with staged transactions.
//!
//! Records made after `begin_transaction` go to a staged copy of the graph
//! and only replace the committed graph on `commit_transaction`. All lookup
//! helpers read the committed graph, so a half-built target is never
//! observable.

use std::io::Write;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::base::Span;

use super::error::GraphError;
use super::name::NameHierarchy;
use super::store::GraphStore;
use super::types::{
    DefinitionKind, ElementId, FileId, ReferenceId, ReferenceKind, SymbolId, SymbolKind,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolRecord {
    pub id: SymbolId,
    pub name: NameHierarchy,
    pub kind: Option<SymbolKind>,
    pub definition_kind: Option<DefinitionKind>,
}

impl SymbolRecord {
    pub fn qualified_name(&self) -> String {
        self.name.qualified_name()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: FileId,
    pub path: String,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceRecord {
    pub id: ReferenceId,
    pub source: SymbolId,
    pub target: SymbolId,
    pub kind: ReferenceKind,
}

/// A location attached to a symbol or reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationRecord {
    pub element: ElementId,
    pub file: FileId,
    pub span: Span,
}

/// Flat, serializable copy of a committed graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub target: Option<String>,
    pub symbols: Vec<SymbolRecord>,
    pub files: Vec<FileRecord>,
    pub references: Vec<ReferenceRecord>,
    pub locations: Vec<LocationRecord>,
}

#[derive(Debug, Clone, Default)]
struct Graph {
    last_id: i32,
    symbols: IndexMap<SymbolId, SymbolRecord>,
    symbol_names: FxHashMap<String, SymbolId>,
    files: IndexMap<FileId, FileRecord>,
    file_paths: FxHashMap<String, FileId>,
    references: IndexMap<ReferenceId, ReferenceRecord>,
    reference_keys: FxHashMap<(SymbolId, SymbolId, ReferenceKind), ReferenceId>,
    locations: IndexSet<LocationRecord>,
}

impl Graph {
    fn next_id(&mut self) -> ElementId {
        self.last_id += 1;
        ElementId(self.last_id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    target: Option<String>,
    open: bool,
    committed: Graph,
    staged: Option<Graph>,
    last_error: String,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn in_transaction(&self) -> bool {
        self.staged.is_some()
    }

    // =========================================================================
    // Committed-graph lookups
    // =========================================================================

    pub fn symbols(&self) -> impl Iterator<Item = &SymbolRecord> {
        self.committed.symbols.values()
    }

    pub fn symbol(&self, id: SymbolId) -> Option<&SymbolRecord> {
        self.committed.symbols.get(&id)
    }

    /// First symbol whose undecorated qualified name is `qualified_name`
    pub fn find_symbol<'a>(&'a self, qualified_name: &'a str) -> Option<&'a SymbolRecord> {
        self.symbols_named(qualified_name).next()
    }

    pub fn symbols_named<'a>(
        &'a self,
        qualified_name: &'a str,
    ) -> impl Iterator<Item = &'a SymbolRecord> + 'a {
        self.symbols()
            .filter(move |s| s.qualified_name() == qualified_name)
    }

    pub fn files(&self) -> impl Iterator<Item = &FileRecord> {
        self.committed.files.values()
    }

    pub fn file(&self, path: &str) -> Option<&FileRecord> {
        let id = self.committed.file_paths.get(path)?;
        self.committed.files.get(id)
    }

    pub fn references(&self) -> impl Iterator<Item = &ReferenceRecord> {
        self.committed.references.values()
    }

    pub fn references_from(&self, source: SymbolId) -> impl Iterator<Item = &ReferenceRecord> {
        self.references().filter(move |r| r.source == source)
    }

    pub fn find_reference(
        &self,
        source: SymbolId,
        target: SymbolId,
        kind: ReferenceKind,
    ) -> Option<&ReferenceRecord> {
        let id = self.committed.reference_keys.get(&(source, target, kind))?;
        self.committed.references.get(id)
    }

    pub fn locations_of(&self, element: ElementId) -> impl Iterator<Item = &LocationRecord> {
        self.committed
            .locations
            .iter()
            .filter(move |l| l.element == element)
    }

    pub fn symbol_count(&self) -> usize {
        self.committed.symbols.len()
    }

    pub fn file_count(&self) -> usize {
        self.committed.files.len()
    }

    pub fn reference_count(&self) -> usize {
        self.committed.references.len()
    }

    pub fn location_count(&self) -> usize {
        self.committed.locations.len()
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            target: self.target.clone(),
            symbols: self.committed.symbols.values().cloned().collect(),
            files: self.committed.files.values().cloned().collect(),
            references: self.committed.references.values().copied().collect(),
            locations: self.committed.locations.iter().copied().collect(),
        }
    }

    /// Write the committed graph as pretty-printed JSON
    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), serde_json::Error> {
        serde_json::to_writer_pretty(writer, &self.snapshot())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn fail(&mut self, message: impl Into<String>) -> GraphError {
        let message = message.into();
        self.last_error.clone_from(&message);
        GraphError::store(message)
    }

    /// The graph records go to: staged if a transaction is open
    fn working(&mut self) -> Result<&mut Graph, GraphError> {
        if !self.open {
            return Err(self.fail("store is not open"));
        }
        Ok(self.staged.as_mut().unwrap_or(&mut self.committed))
    }
}

impl GraphStore for MemoryStore {
    fn open(&mut self, target: &str) -> Result<(), GraphError> {
        if self.open {
            return Err(self.fail(format!(
                "store is already open for {}",
                self.target.as_deref().unwrap_or_default()
            )));
        }
        self.target = Some(target.to_string());
        self.open = true;
        Ok(())
    }

    fn close(&mut self) -> Result<(), GraphError> {
        if self.staged.take().is_some() {
            tracing::warn!("closing store with an open transaction; staged records discarded");
        }
        self.open = false;
        Ok(())
    }

    fn begin_transaction(&mut self) -> Result<(), GraphError> {
        if !self.open {
            return Err(self.fail("store is not open"));
        }
        if self.staged.is_some() {
            return Err(self.fail("transaction already in progress"));
        }
        self.staged = Some(self.committed.clone());
        Ok(())
    }

    fn commit_transaction(&mut self) -> Result<(), GraphError> {
        match self.staged.take() {
            Some(graph) => {
                self.committed = graph;
                Ok(())
            }
            None => Err(self.fail("no transaction to commit")),
        }
    }

    fn rollback_transaction(&mut self) -> Result<(), GraphError> {
        match self.staged.take() {
            Some(_) => Ok(()),
            None => Err(self.fail("no transaction to roll back")),
        }
    }

    fn record_symbol(&mut self, serialized_name: &str) -> Result<SymbolId, GraphError> {
        let name = match NameHierarchy::from_json(serialized_name) {
            Ok(name) => name,
            Err(err) => return Err(self.fail(format!("malformed symbol name: {err}"))),
        };
        let graph = self.working()?;
        if let Some(&id) = graph.symbol_names.get(serialized_name) {
            return Ok(id);
        }
        let id = graph.next_id();
        graph.symbols.insert(
            id,
            SymbolRecord {
                id,
                name,
                kind: None,
                definition_kind: None,
            },
        );
        graph.symbol_names.insert(serialized_name.to_string(), id);
        Ok(id)
    }

    fn record_symbol_kind(&mut self, id: SymbolId, kind: SymbolKind) -> Result<(), GraphError> {
        let graph = self.working()?;
        match graph.symbols.get_mut(&id) {
            Some(symbol) => {
                symbol.kind = Some(kind);
                Ok(())
            }
            None => Err(self.fail(format!("unknown symbol {id}"))),
        }
    }

    fn record_symbol_definition_kind(
        &mut self,
        id: SymbolId,
        kind: DefinitionKind,
    ) -> Result<(), GraphError> {
        let graph = self.working()?;
        match graph.symbols.get_mut(&id) {
            Some(symbol) => {
                symbol.definition_kind = Some(kind);
                Ok(())
            }
            None => Err(self.fail(format!("unknown symbol {id}"))),
        }
    }

    fn record_file(&mut self, path: &str) -> Result<FileId, GraphError> {
        let graph = self.working()?;
        if let Some(&id) = graph.file_paths.get(path) {
            return Ok(id);
        }
        let id = graph.next_id();
        graph.files.insert(
            id,
            FileRecord {
                id,
                path: path.to_string(),
                language: None,
            },
        );
        graph.file_paths.insert(path.to_string(), id);
        Ok(id)
    }

    fn record_file_language(&mut self, id: FileId, language: &str) -> Result<(), GraphError> {
        let graph = self.working()?;
        match graph.files.get_mut(&id) {
            Some(file) => {
                file.language = Some(language.to_string());
                Ok(())
            }
            None => Err(self.fail(format!("unknown file {id}"))),
        }
    }

    fn record_reference(
        &mut self,
        source: SymbolId,
        target: SymbolId,
        kind: ReferenceKind,
    ) -> Result<ReferenceId, GraphError> {
        let graph = self.working()?;
        let missing = [source, target]
            .into_iter()
            .find(|id| !graph.symbols.contains_key(id));
        if let Some(id) = missing {
            return Err(self.fail(format!("unknown symbol {id}")));
        }
        if let Some(&id) = graph.reference_keys.get(&(source, target, kind)) {
            return Ok(id);
        }
        let id = graph.next_id();
        graph.references.insert(
            id,
            ReferenceRecord {
                id,
                source,
                target,
                kind,
            },
        );
        graph.reference_keys.insert((source, target, kind), id);
        Ok(id)
    }

    fn record_reference_location(
        &mut self,
        element: ElementId,
        file: FileId,
        span: Span,
    ) -> Result<(), GraphError> {
        let graph = self.working()?;
        let known = graph.symbols.contains_key(&element) || graph.references.contains_key(&element);
        if !known {
            return Err(self.fail(format!("unknown symbol or reference {element}")));
        }
        if !graph.files.contains_key(&file) {
            return Err(self.fail(format!("unknown file {file}")));
        }
        graph.locations.insert(LocationRecord {
            element,
            file,
            span,
        });
        Ok(())
    }

    fn last_error(&self) -> String {
        self.last_error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.open("graph.db").unwrap();
        store
    }

    fn name(qualified: &str) -> String {
        NameHierarchy::new(qualified).to_json().unwrap()
    }

    #[test]
    fn test_records_without_transaction_are_visible() {
        let mut store = open_store();
        let id = store.record_symbol(&name("A")).unwrap();
        assert!(id.is_valid());
        assert_eq!(store.find_symbol("A").map(|s| s.id), Some(id));
    }

    #[test]
    fn test_staged_records_hidden_until_commit() {
        let mut store = open_store();
        store.begin_transaction().unwrap();
        store.record_symbol(&name("A")).unwrap();
        assert_eq!(store.symbol_count(), 0);
        store.commit_transaction().unwrap();
        assert_eq!(store.symbol_count(), 1);
    }

    #[test]
    fn test_rollback_discards_and_resets_ids() {
        let mut store = open_store();
        store.begin_transaction().unwrap();
        let first = store.record_symbol(&name("A")).unwrap();
        store.rollback_transaction().unwrap();
        assert_eq!(store.symbol_count(), 0);

        store.begin_transaction().unwrap();
        let again = store.record_symbol(&name("B")).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn test_same_name_same_id() {
        let mut store = open_store();
        let a = store.record_symbol(&name("A")).unwrap();
        let b = store.record_symbol(&name("A")).unwrap();
        assert_eq!(a, b);
        assert_eq!(store.symbol_count(), 1);
    }

    #[test]
    fn test_duplicate_reference_and_location_deduplicated() {
        let mut store = open_store();
        let a = store.record_symbol(&name("A")).unwrap();
        let b = store.record_symbol(&name("B")).unwrap();
        let file = store.record_file("a.json").unwrap();
        let r1 = store.record_reference(a, b, ReferenceKind::Usage).unwrap();
        let r2 = store.record_reference(a, b, ReferenceKind::Usage).unwrap();
        let r3 = store.record_reference(a, b, ReferenceKind::Call).unwrap();
        assert_eq!(r1, r2);
        assert_ne!(r1, r3);

        let span = Span::from_coords(1, 1, 1, 3);
        store.record_reference_location(r1, file, span).unwrap();
        store.record_reference_location(r1, file, span).unwrap();
        assert_eq!(store.locations_of(r1).count(), 1);
    }

    #[test]
    fn test_unknown_ids_fail_with_last_error() {
        let mut store = open_store();
        let a = store.record_symbol(&name("A")).unwrap();
        let err = store
            .record_reference(a, ElementId(99), ReferenceKind::Usage)
            .unwrap_err();
        assert!(matches!(err, GraphError::Store(_)));
        assert_eq!(store.last_error(), "unknown symbol #99");
    }

    #[test]
    fn test_closed_store_rejects_records() {
        let mut store = MemoryStore::new();
        assert!(store.record_file("a.json").is_err());
        assert_eq!(store.last_error(), "store is not open");
    }

    #[test]
    fn test_malformed_name_rejected() {
        let mut store = open_store();
        assert!(store.record_symbol("not json").is_err());
        assert!(store.last_error().starts_with("malformed symbol name"));
    }

    #[test]
    fn test_snapshot_json() {
        let mut store = open_store();
        let a = store.record_symbol(&name("A")).unwrap();
        store.record_symbol_kind(a, SymbolKind::Class).unwrap();
        let file = store.record_file("a.json").unwrap();
        store.record_file_language(file, "JSON").unwrap();

        let mut out = Vec::new();
        store.write_json(&mut out).unwrap();
        let snapshot: GraphSnapshot = serde_json::from_slice(&out).unwrap();
        assert_eq!(snapshot, store.snapshot());
        assert_eq!(snapshot.target.as_deref(), Some("graph.db"));
        assert_eq!(snapshot.symbols[0].kind, Some(SymbolKind::Class));
        assert_eq!(snapshot.files[0].language.as_deref(), Some("JSON"));
    }
}
