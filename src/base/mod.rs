//! Foundation types shared by the parser and the graph builder.
//!
//! - [`LineIndex`] - byte offset → line/character-column conversion
//! - [`Position`], [`Span`] - 1-based source locations attached to graph records
//!
//! This module has NO dependencies on other crate modules.

mod line_index;
mod position;

pub use line_index::LineIndex;
pub use position::{Position, Span};

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
