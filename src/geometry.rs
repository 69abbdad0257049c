//! Line/column geometry shared by the zipper, the locator and the propagator.
//!
//! Positions are zero-based. Columns count chars within a line, which is how
//! the external tokenizer reports offsets for non-ASCII source.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A point in a cell's source text, ordered line first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    #[serde(alias = "ch", alias = "col")]
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Move this position by signed line/column deltas, saturating at zero.
    pub fn shifted(self, delta_line: isize, delta_column: isize) -> Self {
        Self {
            line: self.line.saturating_add_signed(delta_line),
            column: self.column.saturating_add_signed(delta_column),
        }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then(self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A `[start, end]` span of source text. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Build a range, swapping the endpoints if they arrive inverted.
    pub fn new(start: Position, end: Position) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    pub fn point(at: Position) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }

    pub fn contains_range(&self, other: &Range) -> bool {
        classify(self, other) == RangeRelation::Contains
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Where an edit range sits relative to a node's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeRelation {
    /// The node covers the whole edit (touching boundaries included).
    Contains,
    /// The edit starts before the node; look at earlier siblings.
    Before,
    /// The edit ends after the node; look at later siblings.
    After,
    /// The edit starts before and ends after the node.
    Spans,
}

/// Classify `edit` against `node`.
pub fn classify(node: &Range, edit: &Range) -> RangeRelation {
    let before = edit.start < node.start;
    let after = edit.end > node.end;
    match (before, after) {
        (true, true) => RangeRelation::Spans,
        (true, false) => RangeRelation::Before,
        (false, true) => RangeRelation::After,
        (false, false) => RangeRelation::Contains,
    }
}
