//! Syntax error type

use text_size::{TextRange, TextSize};
use thiserror::Error;

use super::codes::ErrorCode;

/// A syntax error with its code and location
///
/// Parsing is all-or-nothing per document, so a document produces at most
/// one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct SyntaxError {
    /// Human-readable error message
    pub message: String,
    /// Source location
    pub range: TextRange,
    /// Categorized error code
    pub code: ErrorCode,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            range,
            code,
        }
    }

    /// Create an error at a specific offset with zero-width range
    pub fn at_offset(message: impl Into<String>, offset: TextSize, code: ErrorCode) -> Self {
        Self::new(message, TextRange::empty(offset), code)
    }

    /// Error at `offset` carrying the code's default message
    pub fn from_code(code: ErrorCode, offset: TextSize) -> Self {
        Self::at_offset(code.default_message(), offset, code)
    }
}
