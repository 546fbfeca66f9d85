//! Offset → line/column conversion.

use rustc_hash::FxHashMap;
use text_size::{TextRange, TextSize};

use super::position::{Position, Span};

/// A non-ASCII character, relative to the start of its line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WideChar {
    start: TextSize,
    len: TextSize,
}

impl WideChar {
    fn end(&self) -> TextSize {
        self.start + self.len
    }
}

/// Start offsets of every line in a text, for converting byte offsets
/// into 1-based line/column positions. Columns count characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
    /// Multi-byte characters per 0-based line, in order
    wide_chars: FxHashMap<u32, Vec<WideChar>>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        let mut wide_chars: FxHashMap<u32, Vec<WideChar>> = FxHashMap::default();
        for (offset, c) in text.char_indices() {
            let offset = TextSize::new(offset as u32);
            if c == '\n' {
                line_starts.push(offset + TextSize::of(c));
            } else if !c.is_ascii() {
                let line = line_starts.len() as u32 - 1;
                let line_start = line_starts[line_starts.len() - 1];
                wide_chars.entry(line).or_default().push(WideChar {
                    start: offset - line_start,
                    len: TextSize::of(c),
                });
            }
        }
        Self {
            line_starts,
            wide_chars,
            len: TextSize::of(text),
        }
    }

    /// Number of lines in the indexed text (an empty text has one line).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Position of the character at `offset`: 1-based line, 1-based column.
    /// An offset inside a multi-byte character resolves to that character.
    pub fn position(&self, offset: TextSize) -> Position {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let within = offset - self.line_starts[line];
        let mut column = u32::from(within);
        if let Some(wide) = self.wide_chars.get(&(line as u32)) {
            for c in wide {
                if c.start >= within {
                    break;
                }
                if within < c.end() {
                    column -= u32::from(within - c.start);
                    break;
                }
                column -= u32::from(c.len) - 1;
            }
        }
        Position::new(line as u32 + 1, column + 1)
    }

    /// Span covering `range`, with an inclusive end column.
    ///
    /// The end is reported as the position of the last character in the
    /// range; an empty range yields a span whose end column precedes its
    /// start column by one.
    pub fn span(&self, range: TextRange) -> Span {
        let start = self.position(range.start());
        let end = if range.is_empty() {
            Position::new(start.line, start.column - 1)
        } else {
            self.position(range.end() - TextSize::new(1))
        };
        Span::new(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: u32, end: u32) -> TextRange {
        TextRange::new(TextSize::new(start), TextSize::new(end))
    }

    #[test]
    fn test_position_first_line() {
        let index = LineIndex::new("abc\ndef");
        assert_eq!(index.position(TextSize::new(0)), Position::new(1, 1));
        assert_eq!(index.position(TextSize::new(2)), Position::new(1, 3));
    }

    #[test]
    fn test_position_after_newline() {
        let index = LineIndex::new("abc\ndef");
        assert_eq!(index.line_count(), 2);
        assert_eq!(index.position(TextSize::new(4)), Position::new(2, 1));
        assert_eq!(index.position(TextSize::new(6)), Position::new(2, 3));
    }

    #[test]
    fn test_span_inclusive_end() {
        let index = LineIndex::new("  \"getIn\": 1");
        let span = index.span(range(2, 9));
        assert_eq!(span, Span::from_coords(1, 3, 1, 9));
    }

    #[test]
    fn test_span_across_lines() {
        let index = LineIndex::new("{\n  \"a\": 1\n}");
        let span = index.span(range(0, 12));
        assert_eq!(span, Span::from_coords(1, 1, 3, 1));
    }

    #[test]
    fn test_columns_count_characters() {
        // "é" is two bytes
        let text = "{\"id\": \"Café\", \"getIn\": 1}";
        let index = LineIndex::new(text);
        let key = text.find("\"getIn\"").unwrap() as u32;
        assert_eq!(index.position(TextSize::new(key)), Position::new(1, 16));
        let span = index.span(range(key, key + 7));
        assert_eq!(span, Span::from_coords(1, 16, 1, 22));
    }

    #[test]
    fn test_span_ending_in_wide_character() {
        let text = "x\n\"日本\" y";
        let index = LineIndex::new(text);
        // The string token runs from byte 2 through the closing quote at byte 9
        assert_eq!(index.span(range(2, 10)), Span::from_coords(2, 1, 2, 4));
        assert_eq!(index.span(range(3, 9)), Span::from_coords(2, 2, 2, 3));
        assert_eq!(index.position(TextSize::new(4)), Position::new(2, 2));
        assert_eq!(index.position(TextSize::new(11)), Position::new(2, 6));
    }

    #[test]
    fn test_wide_characters_do_not_shift_other_lines() {
        let index = LineIndex::new("ü\nab");
        assert_eq!(index.position(TextSize::new(4)), Position::new(2, 2));
    }

    #[test]
    fn test_offset_past_end_clamps() {
        let index = LineIndex::new("ab");
        assert_eq!(index.position(TextSize::new(10)), Position::new(1, 3));
    }
}
