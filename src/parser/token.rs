//! Located value model produced by the parser
//!
//! Every node in a parsed document is a [`Token`]: a [`Value`] plus the
//! position it started at and the offset just past its end. Map entries
//! additionally keep the token of their key, so both sides of `"key": value`
//! can be located.

use indexmap::IndexMap;
use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

use super::lexer::LexPosition;

/// Map entries in insertion order, keyed by the key string
pub type TokenMap = IndexMap<SmolStr, KeyedToken>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    String(SmolStr),
    Bool(bool),
    Null,
    List(Vec<Token>),
    Map(TokenMap),
    /// Punctuation or operator text matched by a keyword rule
    Keyword(SmolStr),
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
            Value::Null => "null",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Keyword(_) => "keyword",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub value: Value,
    /// Position of the first character (after leading trivia)
    pub start: LexPosition,
    /// Offset one past the last character
    pub end: TextSize,
}

impl Token {
    pub fn new(value: Value, start: LexPosition, end: TextSize) -> Self {
        Self { value, start, end }
    }

    pub fn range(&self) -> TextRange {
        TextRange::new(self.start.offset, self.end)
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.value {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Token]> {
        match &self.value {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&TokenMap> {
        match &self.value {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_keyword(&self, text: &str) -> bool {
        matches!(&self.value, Value::Keyword(k) if k == text)
    }
}

/// A map value together with the token that produced its key
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedToken {
    pub key: Token,
    pub token: Token,
}

impl KeyedToken {
    pub fn value(&self) -> &Value {
        &self.token.value
    }
}
