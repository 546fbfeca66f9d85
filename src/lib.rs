//! # behavior-index
//!
//! Indexes behavior-tree configuration documents into a symbol/reference
//! graph.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project   → File collection, parallel parse phase, graph build phase
//!   ↓
//! behavior  → Behavior-tree walker and key schema
//!   ↓
//! graph     → Symbol/reference graph builder, store boundary, in-memory store
//!   ↓
//! parser    → Lexer, precedence engine, document grammar
//!   ↓
//! base      → Primitives (LineIndex, Position, Span)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → graph → behavior → project)
// ============================================================================

/// Foundation types: LineIndex, Position, Span
pub mod base;

/// Parser: lexer, Pratt-style engine, located document values
pub mod parser;

/// Graph: symbols, files, references and their source locations
pub mod graph;

/// Behavior-tree extraction over parsed documents
pub mod behavior;

/// Project pipeline: file collection and whole-run indexing
pub mod project;

// Re-export foundation types
pub use base::{LineIndex, Position, Span, TextRange, TextSize};

// Re-export the common entry points
pub use behavior::{BehaviorSchema, BehaviorWalker, ExtractError};
pub use graph::{GraphBuilder, GraphError, GraphStore, MemoryStore};
pub use parser::{Document, SyntaxError, parse_document};
pub use project::{IndexError, IndexOptions, IndexSummary, Indexer};
