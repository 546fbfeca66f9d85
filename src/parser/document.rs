//! Document grammar: JSON-like configuration with comments
//!
//! Values are numbers, strings (either quote style), `true`/`false`/`null`,
//! lists `[a, b]` and maps `{"k": v}`. Comments (`//`, `/* */`) may appear
//! anywhere whitespace can. Map keys must be strings and unique within
//! their map; key order is preserved.
//!
//! Containers are built through an explicit context stack: `[` and `{`
//! push a frame, the `,` and `:` infix handlers add to the innermost frame,
//! and the closing bracket pops it.

use smol_str::SmolStr;
use text_size::TextSize;
use tracing::trace;

use super::engine::{
    BindingPower, TokenRule, Tokenizer, identity, parse_expression, reject,
};
use super::errors::{ErrorCode, ParseResult, SyntaxError};
use super::lexer::{LexPosition, Lexer};
use super::rules::{LITERAL, RuleTable};
use super::token::{KeyedToken, Token, TokenMap, Value};
use crate::base::{LineIndex, Span};

/// A parsed document: its root value plus the line table of its text.
#[derive(Debug, Clone)]
pub struct Document {
    pub root: Token,
    pub line_index: LineIndex,
}

impl Document {
    /// The root map, when the document is a map
    pub fn root_map(&self) -> Option<&TokenMap> {
        self.root.as_map()
    }

    /// 1-based location of `token` in this document
    pub fn span(&self, token: &Token) -> Span {
        self.line_index.span(token.range())
    }
}

/// Parse a complete document with the default rules.
pub fn parse_document(text: &str) -> Result<Document, SyntaxError> {
    DocumentParser::new().parse(text)
}

#[derive(Debug)]
enum Frame {
    List(Vec<Token>),
    Map(TokenMap),
}

/// Containers currently being built, innermost last
#[derive(Debug, Default)]
pub struct DocumentState {
    frames: Vec<Frame>,
    /// Furthest structural failure seen, reported if the parse fails
    failure: Option<SyntaxError>,
}

impl DocumentState {
    fn pop_list(&mut self) -> Vec<Token> {
        match self.frames.pop() {
            Some(Frame::List(items)) => items,
            _ => Vec::new(),
        }
    }

    fn pop_map(&mut self) -> TokenMap {
        match self.frames.pop() {
            Some(Frame::Map(map)) => map,
            _ => TokenMap::new(),
        }
    }

    fn note_failure(&mut self, code: ErrorCode, offset: TextSize) {
        let further = self
            .failure
            .as_ref()
            .is_none_or(|f| f.range.start() <= offset);
        if further {
            self.failure = Some(SyntaxError::from_code(code, offset));
        }
    }
}

/// Tokenizer trying a string first, then the scalar rules
#[derive(Debug, Clone)]
struct DocumentTokenizer {
    rules: RuleTable<DocumentState>,
}

impl Tokenizer<DocumentState> for DocumentTokenizer {
    fn next_token(&self, lexer: &mut Lexer<'_>) -> Option<(Token, &TokenRule<DocumentState>)> {
        if let Some(token) = lexer.scan_string() {
            return Some((token, self.rules.literal_rule()));
        }
        self.rules.next_token(lexer)
    }
}

/// Parser for configuration documents.
///
/// Cloning a parser copies its rule and constant tables.
#[derive(Debug, Clone)]
pub struct DocumentParser {
    tokenizer: DocumentTokenizer,
}

impl DocumentParser {
    pub fn new() -> Self {
        Self {
            tokenizer: DocumentTokenizer {
                rules: document_rules(),
            },
        }
    }

    pub fn rules(&self) -> &RuleTable<DocumentState> {
        &self.tokenizer.rules
    }

    /// Add a named constant, e.g. `NaN`
    pub fn define_constant(&mut self, name: impl Into<SmolStr>, value: Value) -> &mut Self {
        self.tokenizer.rules.define_constant(name, value);
        self
    }

    /// Parse `text` as one document. Trailing trivia is allowed; any other
    /// trailing content is an error.
    pub fn parse(&self, text: &str) -> Result<Document, SyntaxError> {
        let mut lexer = Lexer::new(text);
        let mut state = DocumentState::default();

        let root = parse_expression(
            &self.tokenizer,
            &mut lexer,
            &mut state,
            BindingPower::NON_BINDING,
        )?;
        let Some(root) = root else {
            lexer.preprocess();
            return Err(state
                .failure
                .unwrap_or_else(|| SyntaxError::from_code(ErrorCode::E0401, lexer.offset())));
        };

        lexer.preprocess();
        if !lexer.is_eof() {
            return Err(state
                .failure
                .filter(|f| f.range.start() >= lexer.offset())
                .unwrap_or_else(|| SyntaxError::from_code(ErrorCode::E0207, lexer.offset())));
        }

        trace!(kind = root.value.kind_name(), "parsed document");
        Ok(Document {
            root,
            line_index: LineIndex::new(text),
        })
    }
}

impl Default for DocumentParser {
    fn default() -> Self {
        Self::new()
    }
}

fn document_rules() -> RuleTable<DocumentState> {
    let mut rules = RuleTable::new();
    rules
        .define(TokenRule::prefix(LITERAL, BindingPower::GROUPING, identity))
        .define(TokenRule::prefix("[", BindingPower::GROUPING, open_list))
        .define(TokenRule::prefix("]", BindingPower::NON_BINDING, reject))
        .define(TokenRule::prefix("{", BindingPower::GROUPING, open_map))
        .define(TokenRule::prefix("}", BindingPower::NON_BINDING, reject))
        .define(TokenRule::infix(":", BindingPower::ADDITIVE, bind_key))
        .define(TokenRule::infix(",", BindingPower::DISJUNCTIVE, separate))
        .define_constant("true", Value::Bool(true))
        .define_constant("false", Value::Bool(false))
        .define_constant("null", Value::Null);
    rules
}

/// Consume `close` if it is the next token.
fn expect_close(tokenizer: &dyn Tokenizer<DocumentState>, lexer: &mut Lexer<'_>, close: &str) -> bool {
    let before = lexer.save();
    match tokenizer.next_token(lexer) {
        Some((_, rule)) if rule.text == close => true,
        _ => {
            lexer.restore(before);
            false
        }
    }
}

fn container(value: Value, start: LexPosition, lexer: &Lexer<'_>) -> Token {
    Token::new(value, start, lexer.offset())
}

fn open_list(
    tokenizer: &dyn Tokenizer<DocumentState>,
    lexer: &mut Lexer<'_>,
    state: &mut DocumentState,
    open: Token,
) -> ParseResult<Token> {
    if expect_close(tokenizer, lexer, "]") {
        return Ok(Some(container(Value::List(Vec::new()), open.start, lexer)));
    }

    state.frames.push(Frame::List(Vec::new()));
    let last = parse_expression(tokenizer, lexer, state, BindingPower::NON_BINDING);
    let mut items = state.pop_list();
    let Some(last) = last? else {
        state.note_failure(ErrorCode::E0201, lexer.offset());
        return Ok(None);
    };
    items.push(last);

    if !expect_close(tokenizer, lexer, "]") {
        lexer.preprocess();
        state.note_failure(ErrorCode::E0201, lexer.offset());
        return Ok(None);
    }
    Ok(Some(container(Value::List(items), open.start, lexer)))
}

fn open_map(
    tokenizer: &dyn Tokenizer<DocumentState>,
    lexer: &mut Lexer<'_>,
    state: &mut DocumentState,
    open: Token,
) -> ParseResult<Token> {
    if expect_close(tokenizer, lexer, "}") {
        return Ok(Some(container(Value::Map(TokenMap::new()), open.start, lexer)));
    }

    state.frames.push(Frame::Map(TokenMap::new()));
    // Entries land in the frame through `:`; the expression value itself
    // is not used.
    let inner = parse_expression(tokenizer, lexer, state, BindingPower::NON_BINDING);
    let map = state.pop_map();
    inner?;

    if !expect_close(tokenizer, lexer, "}") {
        lexer.preprocess();
        state.note_failure(ErrorCode::E0202, lexer.offset());
        return Ok(None);
    }
    Ok(Some(container(Value::Map(map), open.start, lexer)))
}

/// `key : value` inside the innermost map
fn bind_key(
    state: &mut DocumentState,
    op: Token,
    left: Token,
    right: Token,
) -> Result<Token, SyntaxError> {
    let Some(Frame::Map(map)) = state.frames.last_mut() else {
        return Err(SyntaxError::new(
            ErrorCode::E0203.default_message(),
            op.range(),
            ErrorCode::E0203,
        ));
    };
    let Value::String(key) = &left.value else {
        return Err(SyntaxError::new(
            format!("map key must be a string, found {}", left.value.kind_name()),
            left.range(),
            ErrorCode::E0204,
        ));
    };
    if map.contains_key(key) {
        return Err(SyntaxError::new(
            format!("duplicate map key \"{key}\""),
            left.range(),
            ErrorCode::E0205,
        ));
    }

    let key = key.clone();
    let marker = Token::new(op.value, left.start, right.end);
    map.insert(key, KeyedToken { key: left, token: right });
    Ok(marker)
}

/// `,` appends to the innermost list; inside a map entries are already
/// stored by `:`.
fn separate(
    state: &mut DocumentState,
    op: Token,
    left: Token,
    right: Token,
) -> Result<Token, SyntaxError> {
    match state.frames.last_mut() {
        Some(Frame::List(items)) => items.push(left),
        Some(Frame::Map(_)) => {}
        None => {
            return Err(SyntaxError::new(
                ErrorCode::E0206.default_message(),
                op.range(),
                ErrorCode::E0206,
            ));
        }
    }
    Ok(right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn root(text: &str) -> Token {
        parse_document(text).unwrap().root
    }

    fn keys(token: &Token) -> Vec<&str> {
        token.as_map().unwrap().keys().map(|k| k.as_str()).collect()
    }

    #[rstest]
    #[case("1", Value::Number(1.0))]
    #[case("true", Value::Bool(true))]
    #[case("false", Value::Bool(false))]
    #[case("null", Value::Null)]
    #[case("'x'", Value::String("x".into()))]
    #[case("[]", Value::List(Vec::new()))]
    #[case("{}", Value::Map(TokenMap::new()))]
    #[case("[ /* nothing */ ]", Value::List(Vec::new()))]
    fn test_scalars_and_empty_containers(#[case] text: &str, #[case] expected: Value) {
        assert_eq!(root(text).value, expected);
    }

    #[test]
    fn test_list_items_in_order() {
        let token = root("[1, 'two', [3], {}]");
        let items = token.as_list().unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].as_number(), Some(1.0));
        assert_eq!(items[1].as_str(), Some("two"));
        assert_eq!(items[2].as_list().map(<[Token]>::len), Some(1));
        assert!(items[3].as_map().unwrap().is_empty());
    }

    #[test]
    fn test_map_preserves_key_order() {
        let token = root(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#);
        assert_eq!(keys(&token), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_nested_containers() {
        let token = root(r#"{"a": {"b": [1, {"c": null}]}, "d": []}"#);
        let a = &token.as_map().unwrap()["a"].token;
        let b = &a.as_map().unwrap()["b"].token;
        let inner = &b.as_list().unwrap()[1];
        assert_eq!(inner.as_map().unwrap()["c"].token.value, Value::Null);
    }

    #[test]
    fn test_keyed_token_locates_key_and_value() {
        let text = "{\n  \"getIn\": \"anim\"\n}";
        let document = parse_document(text).unwrap();
        let entry = &document.root_map().unwrap()["getIn"];
        let key = document.span(&entry.key);
        let value = document.span(&entry.token);
        assert_eq!((key.start.line, key.start.column, key.end.column), (2, 3, 9));
        assert_eq!((value.start.line, value.start.column, value.end.column), (2, 12, 17));
    }

    #[test]
    fn test_container_spans_cover_brackets() {
        let document = parse_document("  [1,\n 2 ]  ").unwrap();
        let span = document.span(&document.root);
        assert_eq!((span.start.line, span.start.column), (1, 3));
        assert_eq!((span.end.line, span.end.column), (2, 4));
    }

    #[test]
    fn test_comments_and_quotes() {
        let token = root(
            "// header\n{ 'single': \"double\", /* inline */ \"n\": -2.5 // tail\n}",
        );
        let map = token.as_map().unwrap();
        assert_eq!(map["single"].token.as_str(), Some("double"));
        assert_eq!(map["n"].token.as_number(), Some(-2.5));
    }

    #[rstest]
    #[case(r#"{"a": 1, "a": 2}"#, ErrorCode::E0205)]
    #[case(r#"{1: 2}"#, ErrorCode::E0204)]
    #[case(r#"["a": 1]"#, ErrorCode::E0203)]
    #[case(r#""a": 1"#, ErrorCode::E0203)]
    #[case("1, 2", ErrorCode::E0206)]
    #[case("[1, 2", ErrorCode::E0201)]
    #[case(r#"{"a": 1"#, ErrorCode::E0202)]
    #[case("[1] 2", ErrorCode::E0207)]
    #[case("", ErrorCode::E0401)]
    #[case("// only a comment", ErrorCode::E0401)]
    #[case("]", ErrorCode::E0401)]
    fn test_errors(#[case] text: &str, #[case] code: ErrorCode) {
        let err = parse_document(text).unwrap_err();
        assert_eq!(err.code, code, "{text}: {err}");
    }

    #[test]
    fn test_duplicate_key_points_at_second_key() {
        let err = parse_document(r#"{"a": 1, "a": 2}"#).unwrap_err();
        assert_eq!(u32::from(err.range.start()), 9);
    }

    #[rstest]
    #[case("[1, 2 }")]
    #[case(r#"{"a": [1, {"b": 2}"#)]
    #[case(r#"[{"a": 1}, {"b": [2"#)]
    #[case(r#"  {"a": {"b": 1}"#)]
    fn test_failed_container_restores_lexer_and_frames(#[case] text: &str) {
        let parser = DocumentParser::new();
        let mut lexer = Lexer::new(text);
        let mut state = DocumentState::default();

        let result = parse_expression(&parser.tokenizer, &mut lexer, &mut state, BindingPower::NON_BINDING);

        assert_eq!(result, Ok(None));
        assert_eq!(lexer.offset(), TextSize::new(0));
        assert!(state.frames.is_empty());
        assert!(state.failure.is_some());
    }

    #[test]
    fn test_trailing_trivia_allowed() {
        assert!(parse_document("{} // done\n/* really */\n").is_ok());
    }

    #[test]
    fn test_trailing_comma_rejected() {
        assert!(parse_document("[1, 2,]").is_err());
    }

    #[test]
    fn test_custom_constant_on_clone_only() {
        let base = DocumentParser::new();
        let mut custom = base.clone();
        custom.define_constant("yes", Value::Bool(true));
        assert_eq!(custom.parse("[yes]").unwrap().root.as_list().unwrap()[0].value, Value::Bool(true));
        assert!(base.parse("[yes]").is_err());
    }
}
