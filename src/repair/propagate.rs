use super::edit::EditDescriptor;
use super::locator::Located;
use crate::geometry::{Position, Range};
use crate::tree::{NodeId, SyntaxTree};

/// Line and column shift carried across the tree after an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delta {
    pub line: isize,
    pub column: isize,
    /// Line the edited text ends on, post-edit
    pub end_line: usize,
}

impl Delta {
    pub fn of(edit: &EditDescriptor) -> Self {
        Self {
            line: edit.delta_line(),
            column: edit.delta_column(),
            end_line: edit.end_line(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.line == 0 && self.column == 0
    }
}

/// Correct node ranges after an edit inside `located`, in place. Returns
/// the located node's corrected range.
///
/// The located node and each of its ancestors get their end moved. Every
/// node after it in source order moves rigidly with its subtree; the column
/// part of the shift only applies to nodes still on the edit's last line.
pub fn propagate(tree: &mut SyntaxTree, located: Located, delta: Delta) -> Range {
    let node = located.node;
    if delta.is_zero() {
        return tree.range(node);
    }
    let enclosing: Vec<NodeId> = std::iter::once(node).chain(tree.ancestors(node)).collect();
    for id in enclosing {
        let range = &mut tree.node_mut(id).range;
        *range = adjust_end(*range, delta);
    }
    let corrected = tree.range(node);
    log::debug!(
        "repairing {} (sibling {}) by {:+}:{:+}, now {}",
        tree.node(node).kind,
        located.index,
        delta.line,
        delta.column,
        corrected
    );

    shift_following(tree, node, delta);
    corrected
}

/// A same-line edit moves the end column; otherwise the end line.
fn adjust_end(range: Range, delta: Delta) -> Range {
    let end = if delta.end_line == range.end.line {
        range.end.shifted(0, delta.column)
    } else {
        range.end.shifted(delta.line, 0)
    };
    Range::new(range.start, end)
}

fn shift_following(tree: &mut SyntaxTree, node: NodeId, delta: Delta) {
    let mut column = delta.column;
    let mut line_of_previous = delta.end_line;
    let mut next = tree.right_sibling(node);
    let mut shifted = 0;

    while let Some(sibling) = next {
        let start_line = tree
            .range(sibling)
            .start
            .line
            .saturating_add_signed(delta.line);
        if start_line != line_of_previous {
            column = 0;
        }
        if delta.line == 0 && column == 0 {
            break;
        }
        shift_subtree(tree, sibling, delta.line, column);
        shifted += 1;
        line_of_previous = start_line;
        next = tree.right_sibling(sibling);
    }
    log::trace!("shifted {shifted} following subtree(s)");
}

/// Move a node and all its descendants by the same amount.
fn shift_subtree(tree: &mut SyntaxTree, id: NodeId, line: isize, column: isize) {
    let subtree: Vec<NodeId> = tree.descendants(id).collect();
    for id in subtree {
        let range = &mut tree.node_mut(id).range;
        *range = shift_range(*range, line, column);
    }
}

/// Start moves fully. The end always moves by `line`, and by `column` only
/// when the range sits on one line.
fn shift_range(range: Range, line: isize, column: isize) -> Range {
    let end_column = if range.is_single_line() {
        range.end.column.saturating_add_signed(column)
    } else {
        range.end.column
    };
    Range::new(
        range.start.shifted(line, column),
        Position::new(range.end.line.saturating_add_signed(line), end_column),
    )
}
