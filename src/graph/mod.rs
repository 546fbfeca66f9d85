//! Symbol/reference graph construction
//!
//! - [`GraphStore`]: record/commit boundary of the persistent graph
//! - [`MemoryStore`]: complete in-memory store with staged transactions
//! - [`GraphBuilder`]: idempotent interning of symbols and files, typed
//!   references and locations, all inside one transaction per target
//! - [`scan`]: upload of pre-extracted declaration/reference tables

mod builder;
mod error;
mod memory;
mod name;
pub mod scan;
mod store;
mod types;

pub use builder::GraphBuilder;
pub use error::GraphError;
pub use memory::{FileRecord, GraphSnapshot, LocationRecord, MemoryStore, ReferenceRecord, SymbolRecord};
pub use name::{NAME_DELIMITER, NameElement, NameHierarchy};
pub use store::GraphStore;
pub use types::{
    DefinitionKind, ElementId, FileId, ReferenceId, ReferenceKind, SymbolId, SymbolKind,
};
