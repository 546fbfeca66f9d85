//! Rule tables and the scalar tokenizer
//!
//! A [`RuleTable`] maps token text to its [`TokenRule`] in definition
//! order, plus a table of named constants (`true`, `false`, `null` for
//! documents). Grammars are composed by layering: [`RuleTable::derive`]
//! copies a base table and applies overrides. An override keeps the
//! overridden rule's slot, so keyword matching order is stable.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::engine::{BindingPower, TokenRule, Tokenizer, identity};
use super::lexer::Lexer;
use super::token::{Token, Value};

/// Pseudo rule text for literal values (numbers, constants, strings)
pub const LITERAL: &str = "(literal)";

pub struct RuleTable<S> {
    rules: IndexMap<SmolStr, TokenRule<S>>,
    literal: TokenRule<S>,
    constants: FxHashMap<SmolStr, Value>,
}

impl<S> RuleTable<S> {
    /// An empty table whose literal rule returns the literal unchanged and
    /// terminates any expression it follows.
    pub fn new() -> Self {
        Self {
            rules: IndexMap::new(),
            literal: TokenRule::prefix(LITERAL, BindingPower::GROUPING, identity),
            constants: FxHashMap::default(),
        }
    }

    /// Add a rule, or replace the rule with the same text in place.
    /// A rule named [`LITERAL`] replaces the literal rule.
    pub fn define(&mut self, rule: TokenRule<S>) -> &mut Self {
        if rule.text == LITERAL {
            self.literal = rule;
        } else {
            self.rules.insert(rule.text.clone(), rule);
        }
        self
    }

    /// Copy this table and apply `overrides` to the copy.
    pub fn derive(&self, overrides: impl IntoIterator<Item = TokenRule<S>>) -> Self {
        let mut table = self.clone();
        for rule in overrides {
            table.define(rule);
        }
        table
    }

    pub fn rule(&self, text: &str) -> Option<&TokenRule<S>> {
        if text == LITERAL {
            return Some(&self.literal);
        }
        self.rules.get(text)
    }

    pub fn literal_rule(&self) -> &TokenRule<S> {
        &self.literal
    }

    /// Keyword rules in matching order
    pub fn rules(&self) -> impl Iterator<Item = &TokenRule<S>> {
        self.rules.values()
    }

    /// Bind a symbol to a constant value. Symbols scanned by the tokenizer
    /// that name a constant become literals.
    pub fn define_constant(&mut self, name: impl Into<SmolStr>, value: Value) -> &mut Self {
        self.constants.insert(name.into(), value);
        self
    }

    pub fn constant(&self, name: &str) -> Option<&Value> {
        self.constants.get(name)
    }
}

impl<S> Default for RuleTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for RuleTable<S> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
            literal: self.literal.clone(),
            constants: self.constants.clone(),
        }
    }
}

impl<S> std::fmt::Debug for RuleTable<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleTable")
            .field("rules", &self.rules.keys().collect::<Vec<_>>())
            .field("constants", &self.constants.len())
            .finish()
    }
}

/// Scalar tokenizer: number, then constant symbol, then keyword rules in
/// definition order.
impl<S> Tokenizer<S> for RuleTable<S> {
    fn next_token(&self, lexer: &mut Lexer<'_>) -> Option<(Token, &TokenRule<S>)> {
        let saved = lexer.save();
        lexer.preprocess();
        let start = lexer.save();

        if let Some(number) = lexer.scan_number() {
            let token = Token::new(Value::Number(number), start, lexer.offset());
            return Some((token, &self.literal));
        }

        if let Some(symbol) = lexer.scan_symbol() {
            if let Some(value) = self.constants.get(symbol) {
                let token = Token::new(value.clone(), start, lexer.offset());
                return Some((token, &self.literal));
            }
            lexer.restore(start);
        }

        for rule in self.rules.values() {
            if lexer.try_match_keyword(&rule.text) {
                let token = Token::new(Value::Keyword(rule.text.clone()), start, lexer.offset());
                return Some((token, rule));
            }
        }

        lexer.restore(saved);
        None
    }
}
