//! Backtracking scanner for configuration documents
//!
//! The lexer does not produce a token stream up front. Instead, the parser
//! asks it to try one primitive at a time (number, symbol, string, keyword)
//! and rolls back with [`Lexer::restore`] whenever an alternative does not
//! pan out. Every `scan_*` method is non-throwing: on "no match" it leaves
//! the position exactly where it found it.

use smol_str::SmolStr;
use text_size::TextSize;

use super::token::{Token, Value};

/// An immutable snapshot of scanning progress, used for save/restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LexPosition {
    /// Byte offset of the next unread character
    pub offset: TextSize,
    /// 1-based line number
    pub line: u32,
    /// Byte offset where the current line starts
    pub line_start: TextSize,
}

/// Scanner over a single document's text
pub struct Lexer<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: u32,
    line_start: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            line: 1,
            line_start: 0,
        }
    }

    // =========================================================================
    // Position tracking
    // =========================================================================

    pub fn save(&self) -> LexPosition {
        LexPosition {
            offset: TextSize::new(self.pos as u32),
            line: self.line,
            line_start: TextSize::new(self.line_start as u32),
        }
    }

    pub fn restore(&mut self, position: LexPosition) {
        self.pos = usize::from(position.offset);
        self.line = position.line;
        self.line_start = usize::from(position.line_start);
    }

    pub fn offset(&self) -> TextSize {
        TextSize::new(self.pos as u32)
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// The unread remainder of the text
    pub fn remaining(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn newline(&mut self) {
        self.line += 1;
        self.line_start = self.pos;
    }

    // =========================================================================
    // Trivia
    // =========================================================================

    /// Skip whitespace, `//` line comments and `/* */` block comments,
    /// keeping the line counters current.
    pub fn preprocess(&mut self) {
        while let Some(byte) = self.peek() {
            match byte {
                b'\n' => {
                    self.pos += 1;
                    self.newline();
                }
                b'\r' => {
                    self.pos += 1;
                    self.line_start = self.pos;
                }
                b if b.is_ascii_whitespace() => self.pos += 1,
                b'/' => match self.peek_at(1) {
                    Some(b'/') => self.skip_line_comment(),
                    Some(b'*') => self.skip_block_comment(),
                    _ => break,
                },
                _ => break,
            }
        }
    }

    fn skip_line_comment(&mut self) {
        self.pos += 2;
        while matches!(self.peek(), Some(b) if b != b'\n') {
            self.pos += 1;
        }
    }

    /// An unterminated block comment runs to the end of the input.
    fn skip_block_comment(&mut self) {
        self.pos += 2;
        while let Some(byte) = self.peek() {
            match byte {
                b'*' if self.peek_at(1) == Some(b'/') => {
                    self.pos += 2;
                    return;
                }
                b'\n' => {
                    self.pos += 1;
                    self.newline();
                }
                _ => self.pos += 1,
            }
        }
    }

    // =========================================================================
    // Primitives
    // =========================================================================

    /// Scan `[A-Za-z_][A-Za-z0-9_]*`
    pub fn scan_symbol(&mut self) -> Option<&'a str> {
        let saved = self.save();
        self.preprocess();
        if !self.peek().is_some_and(is_ident_start) {
            self.restore(saved);
            return None;
        }
        let start = self.pos;
        self.pos += 1;
        while self.peek().is_some_and(is_ident_continue) {
            self.pos += 1;
        }
        Some(&self.text[start..self.pos])
    }

    /// Scan a numeric literal.
    ///
    /// Accepts an optional leading `-`, an integer part, an optional
    /// fraction, an optional exponent (`e`/`E`, optional `+` or `-`) and a
    /// trailing unit suffix (`u`, `f`, `l`, any case) which is dropped.
    /// Integers with a leading `0` use the legacy radix scanner, see
    /// [`Lexer::scan_leading_zero`].
    pub fn scan_number(&mut self) -> Option<f64> {
        let saved = self.save();
        self.preprocess();
        let negative = self.peek() == Some(b'-');
        let Some(integer) = self.scan_integer(true) else {
            self.restore(saved);
            return None;
        };
        let mut magnitude = integer.abs();

        if self.peek() == Some(b'.') {
            // The dot is consumed even when no digits follow it.
            self.pos += 1;
            if let Some(fraction) = self.scan_fraction() {
                magnitude += fraction;
            }
        }

        if matches!(self.peek(), Some(b'e' | b'E')) {
            let before_exponent = self.pos;
            self.pos += 1;
            if self.peek() == Some(b'+') {
                self.pos += 1;
            }
            match self.scan_integer(true) {
                Some(exponent) => magnitude *= 10f64.powf(exponent),
                None => self.pos = before_exponent,
            }
        }

        Some(if negative { -magnitude } else { magnitude })
    }

    fn scan_integer(&mut self, leading_zero_radix: bool) -> Option<f64> {
        let start = self.pos;
        let sign = if self.peek() == Some(b'-') {
            self.pos += 1;
            -1.0
        } else {
            1.0
        };
        if !self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos = start;
            return None;
        }
        if leading_zero_radix && self.peek() == Some(b'0') {
            return Some(sign * self.scan_leading_zero());
        }

        let mut value = 0.0;
        while let Some(digit) = self.peek().filter(u8::is_ascii_digit) {
            value = value * 10.0 + f64::from(digit - b'0');
            self.pos += 1;
        }
        self.skip_unit_suffix();
        Some(sign * value)
    }

    /// Digits after a decimal point, as a value below one.
    fn scan_fraction(&mut self) -> Option<f64> {
        let start = self.pos;
        let mut value = 0.0;
        while let Some(digit) = self.peek().filter(u8::is_ascii_digit) {
            value = value * 10.0 + f64::from(digit - b'0');
            self.pos += 1;
        }
        let digits = self.pos - start;
        if digits == 0 {
            return None;
        }
        self.skip_unit_suffix();
        Some(value / 10f64.powi(digits as i32))
    }

    /// Legacy scanner for integers starting with `0`.
    ///
    /// `0x` introduces hex digits. Otherwise octal digits `0-7` are
    /// accumulated with a multiplier of 16, not 8, matching the data this
    /// indexer was built against. When the digit run stops at a character
    /// that is neither a digit nor (for a bare `0`) whitespace, the value
    /// collapses to zero; a run that stops at `8` or `9` keeps its value and
    /// leaves that digit unread.
    fn scan_leading_zero(&mut self) -> f64 {
        let origin = self.pos;
        self.pos += 1;
        let mut value = 0.0;

        if matches!(self.peek(), Some(b'x' | b'X')) {
            self.pos += 1;
            while let Some(digit) = self.peek().and_then(hex_digit) {
                value = value * 16.0 + f64::from(digit);
                self.pos += 1;
            }
            return value;
        }

        while let Some(digit @ b'0'..=b'7') = self.peek() {
            value = value * 16.0 + f64::from(digit - b'0');
            self.pos += 1;
        }

        let next = self.peek();
        if self.pos - origin == 1 && next.is_none_or(|b| b.is_ascii_whitespace()) {
            return value;
        }
        match next {
            Some(b) if !b.is_ascii_digit() => 0.0,
            _ => value,
        }
    }

    fn skip_unit_suffix(&mut self) {
        if matches!(
            self.peek(),
            Some(b'u' | b'U' | b'f' | b'F' | b'l' | b'L')
        ) {
            self.pos += 1;
        }
    }

    /// Scan a string delimited by `"` or `'`.
    ///
    /// The closing delimiter must match the opening one; a delimiter
    /// preceded by `\` does not close the string. No other escape processing
    /// happens. An unterminated string is "no match".
    pub fn scan_string(&mut self) -> Option<Token> {
        let saved = self.save();
        self.preprocess();
        let start = self.save();
        let quote = match self.peek() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => {
                self.restore(saved);
                return None;
            }
        };
        self.pos += 1;
        let content_start = self.pos;

        loop {
            match self.peek() {
                None => {
                    self.restore(saved);
                    return None;
                }
                Some(b'\n') => {
                    self.pos += 1;
                    self.newline();
                }
                Some(b) if b == quote && self.bytes[self.pos - 1] != b'\\' => break,
                Some(_) => self.pos += 1,
            }
        }

        let content = SmolStr::new(&self.text[content_start..self.pos]);
        self.pos += 1;
        Some(Token::new(Value::String(content), start, self.offset()))
    }

    /// Match `keyword` literally at the next non-trivia position.
    ///
    /// A keyword ending in an identifier character does not match when the
    /// input continues with another identifier character (`truex` is not
    /// `true`). Restores the position on failure.
    pub fn try_match_keyword(&mut self, keyword: &str) -> bool {
        let saved = self.save();
        self.preprocess();
        let keyword = keyword.as_bytes();
        let Some(&last) = keyword.last() else {
            self.restore(saved);
            return false;
        };
        if !self.bytes[self.pos..].starts_with(keyword) {
            self.restore(saved);
            return false;
        }
        let end = self.pos + keyword.len();
        if is_ident_continue(last) && self.bytes.get(end).copied().is_some_and(is_ident_continue) {
            self.restore(saved);
            return false;
        }
        self.pos = end;
        true
    }
}

fn is_ident_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_'
}

fn is_ident_continue(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

fn hex_digit(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
