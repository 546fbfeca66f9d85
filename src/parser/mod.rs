//! Backtracking Pratt parser for configuration documents
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer → on-demand primitives (number, symbol, string, keyword) with save/restore
//!     ↓
//! Tokenizer → (Token, TokenRule) pairs from a RuleTable
//!     ↓
//! Engine → parse_expression (Pratt loop with binding powers)
//!     ↓
//! Document grammar → located Token tree (lists, ordered maps with key tokens)
//! ```
//!
//! A parse step that does not match returns `Ok(None)` and leaves the lexer
//! untouched, so alternatives can be tried freely. Grammar violations such
//! as duplicate keys are `Err(SyntaxError)` and fail the whole document.

mod document;
mod engine;
mod errors;
mod lexer;
mod rules;
mod token;

pub use document::{Document, DocumentParser, DocumentState, parse_document};
pub use engine::{
    BindingPower, InfixHandler, PrefixHandler, TokenRule, Tokenizer, identity,
    parse_comma_separated, parse_expression, reject,
};
pub use errors::{ErrorCode, ParseResult, SyntaxError};
pub use lexer::{LexPosition, Lexer};
pub use rules::{LITERAL, RuleTable};
pub use token::{KeyedToken, Token, TokenMap, Value};
