//! Upload of pre-extracted source scan tables.
//!
//! A source scanner outside this crate produces, per file, a table of
//! declared names with their parents and a table of referenced names with
//! every location they occur at. These uploads feed them through the same
//! builder the behavior walker uses.

use indexmap::IndexMap;

use crate::base::Span;

use super::GraphBuilder;
use super::error::GraphError;
use super::store::GraphStore;
use super::types::{FileId, ReferenceKind, SymbolKind};

/// A declared name and the parent it derives from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub kind: SymbolKind,
    pub parent: String,
    pub parent_kind: SymbolKind,
    /// Location of the declared name
    pub span: Span,
    /// Location of the whole declaration clause linking it to its parent
    pub relation_span: Span,
}

/// Declared name → declaration, in scan order
pub type DeclarationTable = IndexMap<String, Declaration>;

/// Referenced name → every location it occurs at
pub type ReferenceTable = IndexMap<String, Vec<Span>>;

pub fn upload_declarations<S: GraphStore>(
    builder: &mut GraphBuilder<S>,
    file: &str,
    language: &str,
    table: &DeclarationTable,
) -> Result<FileId, GraphError> {
    let file_id = builder.intern_file(file, language)?;
    for (name, declaration) in table {
        let id = builder.intern_symbol(name, declaration.kind)?;
        builder.attach_location(id, file_id, declaration.span)?;

        let parent = builder.intern_symbol(&declaration.parent, declaration.parent_kind)?;
        let reference = builder.add_reference(id, parent, ReferenceKind::Inheritance)?;
        builder.attach_location(reference, file_id, declaration.relation_span)?;
    }
    Ok(file_id)
}

pub fn upload_references<S: GraphStore>(
    builder: &mut GraphBuilder<S>,
    file: &str,
    language: &str,
    table: &ReferenceTable,
    kind: SymbolKind,
) -> Result<FileId, GraphError> {
    let file_id = builder.intern_file(file, language)?;
    for (name, spans) in table {
        let id = builder.intern_symbol(name, kind)?;
        for span in spans {
            builder.attach_location(id, file_id, *span)?;
        }
    }
    Ok(file_id)
}
