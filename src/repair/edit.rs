use crate::geometry::{Position, Range};
use crate::text::{char_len, LineIndex};
use serde::{Deserialize, Serialize};

/// One text edit as reported by the host editor.
///
/// `from`/`to` are in pre-edit coordinates. `removed` and `inserted` are the
/// edit's text split on line breaks, so a single-line edit has exactly one
/// entry in each and inserting a line break yields two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditDescriptor {
    pub from: Position,
    pub to: Position,
    #[serde(default)]
    pub removed: Vec<String>,
    #[serde(rename = "text", default)]
    pub inserted: Vec<String>,
}

impl EditDescriptor {
    pub fn new(from: Position, to: Position, removed: Vec<String>, inserted: Vec<String>) -> Self {
        Self {
            from,
            to,
            removed,
            inserted,
        }
    }

    /// Describe replacing `range` of `text` with `replacement`.
    pub fn replace(text: &str, range: Range, replacement: &str) -> Self {
        let removed = LineIndex::new(text).slice(range);
        Self::new(
            range.start,
            range.end,
            split_lines(removed),
            split_lines(replacement),
        )
    }

    pub fn insert(text: &str, at: Position, insertion: &str) -> Self {
        Self::replace(text, Range::point(at), insertion)
    }

    /// The replaced span, pre-edit.
    pub fn before_range(&self) -> Range {
        Range::new(self.from, self.to)
    }

    pub fn inserted_line_count(&self) -> usize {
        self.inserted.len().max(1)
    }

    pub fn removed_line_count(&self) -> usize {
        self.removed.len().max(1)
    }

    pub fn delta_line(&self) -> isize {
        self.inserted_line_count() as isize - self.removed_line_count() as isize
    }

    /// Length change of the last line touched, in chars.
    pub fn delta_column(&self) -> isize {
        let last = |lines: &[String]| lines.last().map_or(0, |line| char_len(line)) as isize;
        last(&self.inserted) - last(&self.removed)
    }

    /// Line the edited text ends on, post-edit.
    pub fn end_line(&self) -> usize {
        self.from.line + self.inserted_line_count() - 1
    }

    /// Apply the edit to `text`.
    pub fn apply(&self, text: &str) -> String {
        let index = LineIndex::new(text);
        let start = index.offset(self.from);
        let end = index.offset(self.to).max(start);
        let replaced = &text[start..end];
        if replaced != self.removed.join("\n") {
            log::debug!(
                "edit at {} expected {:?} but text has {:?}",
                self.from,
                self.removed.join("\n"),
                replaced
            );
        }

        let mut out = String::with_capacity(text.len() + self.inserted.iter().map(String::len).sum::<usize>());
        out.push_str(&text[..start]);
        out.push_str(&self.inserted.join("\n"));
        out.push_str(&text[end..]);
        out
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_string).collect()
}
