//! Mapping between line/column positions and offsets in a cell's text.

use crate::geometry::{Position, Range};

/// Byte offsets of every line start, computed once per text.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            line_starts: compute_line_starts(text),
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Byte offset for `pos`.
    ///
    /// A column past the end of its line lands on the next line's start (the
    /// tokenizer reports a newline token ending one column past the line), and
    /// a line past the end of the text lands on the text's end.
    pub fn offset(&self, pos: Position) -> usize {
        let Some(&line_start) = self.line_starts.get(pos.line) else {
            return self.text.len();
        };
        let line_limit = self
            .line_starts
            .get(pos.line + 1)
            .copied()
            .unwrap_or(self.text.len());

        let line_text = &self.text[line_start..line_limit];
        let within = line_text
            .char_indices()
            .nth(pos.column)
            .map(|(i, _)| i)
            .unwrap_or(line_text.len());
        line_start + within
    }

    /// Position of byte `offset`, clamped to the text's end.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.text.len());
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = self.line_starts[line];
        Position::new(line, char_len(&self.text[line_start..offset]))
    }

    /// Text covered by `range`, clamped to the text.
    pub fn slice(&self, range: Range) -> &'a str {
        let start = self.offset(range.start);
        let end = self.offset(range.end).max(start);
        &self.text[start..end]
    }

    /// Text between two positions, empty when `to` is not after `from`.
    pub fn between(&self, from: Position, to: Position) -> &'a str {
        if to <= from {
            return "";
        }
        self.slice(Range::new(from, to))
    }
}

/// Byte offset of the start of every line. Always contains at least one entry.
pub fn compute_line_starts(text: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(text.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}

/// Number of chars in `s`, the unit columns are measured in.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}
