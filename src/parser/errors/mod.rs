//! Parser error handling module
//!
//! - Categorized error codes for filtering and documentation
//! - A single [`SyntaxError`] type carrying code, message and range

mod codes;
mod error;

pub use codes::ErrorCode;
pub use error::SyntaxError;

/// Result of a parse step. `Ok(None)` means "no match here"; the caller
/// backtracks and may try another alternative. `Err` is a grammar violation
/// and aborts the document.
pub type ParseResult<T> = Result<Option<T>, SyntaxError>;
