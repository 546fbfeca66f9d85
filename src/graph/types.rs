//! Identifiers and kind tags shared by the builder and the store.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Store-assigned id of a symbol, file or reference.
///
/// Ids are strictly positive. Zero and negative values mean "not created"
/// and are rejected by every operation that takes an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub i32);

impl ElementId {
    pub const NONE: Self = Self(0);

    pub fn is_valid(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub type SymbolId = ElementId;
pub type FileId = ElementId;
pub type ReferenceId = ElementId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Class,
    Field,
    Method,
    GlobalVariable,
    Enum,
    EnumConstant,
    Function,
}

impl SymbolKind {
    pub fn display(&self) -> &'static str {
        match self {
            SymbolKind::Class => "class",
            SymbolKind::Field => "field",
            SymbolKind::Method => "method",
            SymbolKind::GlobalVariable => "global variable",
            SymbolKind::Enum => "enum",
            SymbolKind::EnumConstant => "enum constant",
            SymbolKind::Function => "function",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Usage,
    Call,
    TypeUsage,
    Inheritance,
}

impl ReferenceKind {
    pub fn display(&self) -> &'static str {
        match self {
            ReferenceKind::Usage => "usage",
            ReferenceKind::Call => "call",
            ReferenceKind::TypeUsage => "type usage",
            ReferenceKind::Inheritance => "inheritance",
        }
    }
}

/// Whether a symbol was defined in the indexed sources or only inferred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionKind {
    Explicit,
    Implicit,
}
