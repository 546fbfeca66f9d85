//! Boundary to the external graph store.

use crate::base::Span;

use super::error::GraphError;
use super::types::{DefinitionKind, ElementId, FileId, ReferenceId, ReferenceKind, SymbolId, SymbolKind};

/// Record/commit interface of a persistent symbol graph.
///
/// Ids returned by `record_*` must be strictly positive; a store that
/// cannot create a record may return a non-positive id and describe the
/// problem through [`GraphStore::last_error`].
pub trait GraphStore {
    fn open(&mut self, target: &str) -> Result<(), GraphError>;
    fn close(&mut self) -> Result<(), GraphError>;

    fn begin_transaction(&mut self) -> Result<(), GraphError>;
    fn commit_transaction(&mut self) -> Result<(), GraphError>;
    fn rollback_transaction(&mut self) -> Result<(), GraphError>;

    /// Record a symbol by its serialized name hierarchy. Recording the same
    /// name twice returns the same id.
    fn record_symbol(&mut self, serialized_name: &str) -> Result<SymbolId, GraphError>;
    fn record_symbol_kind(&mut self, id: SymbolId, kind: SymbolKind) -> Result<(), GraphError>;
    fn record_symbol_definition_kind(
        &mut self,
        id: SymbolId,
        kind: DefinitionKind,
    ) -> Result<(), GraphError>;

    fn record_file(&mut self, path: &str) -> Result<FileId, GraphError>;
    fn record_file_language(&mut self, id: FileId, language: &str) -> Result<(), GraphError>;

    fn record_reference(
        &mut self,
        source: SymbolId,
        target: SymbolId,
        kind: ReferenceKind,
    ) -> Result<ReferenceId, GraphError>;

    /// Attach a source location to a symbol or a reference.
    fn record_reference_location(
        &mut self,
        element: ElementId,
        file: FileId,
        span: Span,
    ) -> Result<(), GraphError>;

    fn last_error(&self) -> String;
}

/// A borrowed store, so a caller keeps ownership across a failed build.
impl<S: GraphStore + ?Sized> GraphStore for &mut S {
    fn open(&mut self, target: &str) -> Result<(), GraphError> {
        (**self).open(target)
    }

    fn close(&mut self) -> Result<(), GraphError> {
        (**self).close()
    }

    fn begin_transaction(&mut self) -> Result<(), GraphError> {
        (**self).begin_transaction()
    }

    fn commit_transaction(&mut self) -> Result<(), GraphError> {
        (**self).commit_transaction()
    }

    fn rollback_transaction(&mut self) -> Result<(), GraphError> {
        (**self).rollback_transaction()
    }

    fn record_symbol(&mut self, serialized_name: &str) -> Result<SymbolId, GraphError> {
        (**self).record_symbol(serialized_name)
    }

    fn record_symbol_kind(&mut self, id: SymbolId, kind: SymbolKind) -> Result<(), GraphError> {
        (**self).record_symbol_kind(id, kind)
    }

    fn record_symbol_definition_kind(
        &mut self,
        id: SymbolId,
        kind: DefinitionKind,
    ) -> Result<(), GraphError> {
        (**self).record_symbol_definition_kind(id, kind)
    }

    fn record_file(&mut self, path: &str) -> Result<FileId, GraphError> {
        (**self).record_file(path)
    }

    fn record_file_language(&mut self, id: FileId, language: &str) -> Result<(), GraphError> {
        (**self).record_file_language(id, language)
    }

    fn record_reference(
        &mut self,
        source: SymbolId,
        target: SymbolId,
        kind: ReferenceKind,
    ) -> Result<ReferenceId, GraphError> {
        (**self).record_reference(source, target, kind)
    }

    fn record_reference_location(
        &mut self,
        element: ElementId,
        file: FileId,
        span: Span,
    ) -> Result<(), GraphError> {
        (**self).record_reference_location(element, file, span)
    }

    fn last_error(&self) -> String {
        (**self).last_error()
    }
}
