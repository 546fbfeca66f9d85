//! Backtracking Pratt expression engine
//!
//! The engine is grammar-agnostic: a grammar supplies a [`Tokenizer`] that
//! turns input into `(token, rule)` pairs and a set of [`TokenRule`]s whose
//! handlers build values. Handlers thread a caller-owned state `S` (for
//! example the stack of open containers in a document).
//!
//! Parsing never throws on "no match". Every parse function either returns
//! `Ok(Some(_))` and advances, or returns `Ok(None)` with the lexer exactly
//! where it was. `Err` is reserved for grammar violations raised by
//! handlers and aborts the whole parse.

use smol_str::SmolStr;

use super::errors::{ParseResult, SyntaxError};
use super::lexer::Lexer;
use super::token::Token;

/// How strongly an operator binds to its left operand.
///
/// Higher binds tighter. The named levels are conventional tiers a grammar
/// can pick from; any `u8` works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BindingPower(pub u8);

impl BindingPower {
    pub const NON_BINDING: Self = Self(0);
    pub const ASSIGNMENT: Self = Self(10);
    pub const DISJUNCTIVE: Self = Self(20);
    pub const LOGICAL: Self = Self(30);
    pub const RELATIONAL: Self = Self(40);
    pub const ADDITIVE: Self = Self(50);
    pub const MULTIPLICATIVE: Self = Self(60);
    pub const UNARY: Self = Self(70);
    pub const GROUPING: Self = Self(80);
}

/// Called when a token starts an expression. Returning `Ok(None)` rejects
/// the token in prefix position.
pub type PrefixHandler<S> =
    fn(&dyn Tokenizer<S>, &mut Lexer<'_>, &mut S, Token) -> ParseResult<Token>;

/// Combines `left` and `right` around the operator token.
pub type InfixHandler<S> = fn(&mut S, Token, Token, Token) -> Result<Token, SyntaxError>;

/// Parsing behavior attached to a token text.
pub struct TokenRule<S> {
    pub text: SmolStr,
    pub binding_power: BindingPower,
    pub prefix: PrefixHandler<S>,
    /// A rule without an infix handler terminates the expression to its left.
    pub infix: Option<InfixHandler<S>>,
}

impl<S> TokenRule<S> {
    /// A rule that only starts expressions
    pub fn prefix(
        text: impl Into<SmolStr>,
        binding_power: BindingPower,
        prefix: PrefixHandler<S>,
    ) -> Self {
        Self {
            text: text.into(),
            binding_power,
            prefix,
            infix: None,
        }
    }

    /// An operator rule. Its prefix position is rejected.
    pub fn infix(
        text: impl Into<SmolStr>,
        binding_power: BindingPower,
        infix: InfixHandler<S>,
    ) -> Self {
        Self {
            text: text.into(),
            binding_power,
            prefix: reject,
            infix: Some(infix),
        }
    }
}

impl<S> Clone for TokenRule<S> {
    fn clone(&self) -> Self {
        Self {
            text: self.text.clone(),
            binding_power: self.binding_power,
            prefix: self.prefix,
            infix: self.infix,
        }
    }
}

impl<S> std::fmt::Debug for TokenRule<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRule")
            .field("text", &self.text)
            .field("binding_power", &self.binding_power)
            .field("infix", &self.infix.is_some())
            .finish()
    }
}

/// Prefix handler returning the token unchanged
pub fn identity<S>(
    _tokenizer: &dyn Tokenizer<S>,
    _lexer: &mut Lexer<'_>,
    _state: &mut S,
    token: Token,
) -> ParseResult<Token> {
    Ok(Some(token))
}

/// Prefix handler that never starts an expression
pub fn reject<S>(
    _tokenizer: &dyn Tokenizer<S>,
    _lexer: &mut Lexer<'_>,
    _state: &mut S,
    _token: Token,
) -> ParseResult<Token> {
    Ok(None)
}

/// Source of `(token, rule)` pairs for the engine.
///
/// On `None` the engine restores the lexer itself, so implementations may
/// leave the position anywhere when they fail.
pub trait Tokenizer<S> {
    fn next_token(&self, lexer: &mut Lexer<'_>) -> Option<(Token, &TokenRule<S>)>;
}

/// Parse one expression whose operators bind tighter than `min_bp`.
pub fn parse_expression<S>(
    tokenizer: &dyn Tokenizer<S>,
    lexer: &mut Lexer<'_>,
    state: &mut S,
    min_bp: BindingPower,
) -> ParseResult<Token> {
    let start = lexer.save();

    let Some((token, rule)) = tokenizer.next_token(lexer) else {
        lexer.restore(start);
        return Ok(None);
    };
    let Some(mut left) = (rule.prefix)(tokenizer, lexer, state, token)? else {
        lexer.restore(start);
        return Ok(None);
    };

    loop {
        let before_op = lexer.save();
        let Some((op, rule)) = tokenizer.next_token(lexer) else {
            lexer.restore(before_op);
            break;
        };
        let infix = match rule.infix {
            Some(infix) if rule.binding_power > min_bp => infix,
            _ => {
                lexer.restore(before_op);
                break;
            }
        };
        // A missing right operand leaves the operator for the caller.
        let Some(right) = parse_expression(tokenizer, lexer, state, rule.binding_power)? else {
            lexer.restore(before_op);
            break;
        };
        left = infix(state, op, left, right)?;
    }

    Ok(Some(left))
}

/// Parse `item (, item)*`. All-or-nothing: if any item fails the lexer is
/// restored and `Ok(None)` is returned. The result is never empty.
pub fn parse_comma_separated<F>(
    lexer: &mut Lexer<'_>,
    mut sub_parse: F,
) -> Result<Option<Vec<Token>>, SyntaxError>
where
    F: FnMut(&mut Lexer<'_>) -> ParseResult<Token>,
{
    let start = lexer.save();
    let mut items = Vec::new();
    loop {
        match sub_parse(lexer)? {
            Some(item) => items.push(item),
            None => {
                lexer.restore(start);
                return Ok(None);
            }
        }
        if !lexer.try_match_keyword(",") {
            break;
        }
    }
    Ok(Some(items))
}
