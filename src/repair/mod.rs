//! Keeping node ranges in step with text edits without re-parsing.
//!
//! An edit is first located (the narrowest node containing it), then its
//! line/column delta is pushed through the tree. The result is approximate
//! by nature: the located node's new text is handed back so the caller can
//! have it re-parsed.

pub mod edit;
pub mod locator;
pub mod propagate;

pub use edit::EditDescriptor;
pub use locator::{locate, Located};
pub use propagate::{propagate, Delta};

use crate::geometry::Range;
use crate::text::LineIndex;
use crate::tree::{NodeId, SyntaxTree};
use serde::Serialize;

/// Outcome of repairing a tree after one edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repair {
    #[serde(skip)]
    pub node: NodeId,
    #[serde(rename = "type")]
    pub kind: String,
    /// The affected node's corrected range
    pub range: Range,
    /// Post-edit text under `range`
    pub text: String,
}

/// Locate and propagate `edit` in `tree`. `new_text` is the cell's text
/// after the edit.
pub fn repair(tree: &mut SyntaxTree, edit: &EditDescriptor, new_text: &str) -> Repair {
    let located = locate(tree, &edit.before_range());
    let range = propagate(tree, located, Delta::of(edit));
    let text = LineIndex::new(new_text).slice(range).to_string();
    Repair {
        node: located.node,
        kind: tree.node(located.node).kind.clone(),
        range,
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TokenConfig;
    use crate::geometry::Position;
    use crate::tree::{CellTree, Token};
    use crate::zip::{zip_source, AstNode};

    fn pos(line: usize, column: usize) -> Position {
        Position::new(line, column)
    }

    fn range(sl: usize, sc: usize, el: usize, ec: usize) -> Range {
        Range::new(pos(sl, sc), pos(el, ec))
    }

    /// Lines `v0 = 0` .. `v4 = 4`, one assignment per line.
    fn five_assignments() -> (String, SyntaxTree) {
        let mut source = String::new();
        let mut tokens = Vec::new();
        let mut module = AstNode::new("Module");
        for line in 0..5 {
            let name = format!("v{line}");
            let value = line.to_string();
            source.push_str(&format!("{name} = {value}\n"));
            tokens.push(Token::new("NAME", range(line, 0, line, 2), name));
            tokens.push(Token::new("OP", range(line, 3, line, 4), "="));
            tokens.push(Token::new("NUMBER", range(line, 5, line, 6), value));
            tokens.push(Token::new("NEWLINE", range(line, 6, line, 7), "\n"));
            module = module.child(
                AstNode::new("Assign")
                    .at(line, 0)
                    .child(AstNode::new("Name").at(line, 0))
                    .child(AstNode::new("Constant").at(line, 5)),
            );
        }
        let tree = match zip_source(&source, tokens, &module, &TokenConfig::default()).unwrap() {
            CellTree::Tree(tree) => tree,
            CellTree::Empty => unreachable!(),
        };
        (source, tree)
    }

    fn ranges(tree: &SyntaxTree) -> Vec<Range> {
        tree.descendants(tree.root()).map(|id| tree.range(id)).collect()
    }

    #[test]
    fn test_zero_delta_edit_changes_nothing() {
        let (source, mut tree) = five_assignments();
        let before = ranges(&tree);
        let edit = EditDescriptor::replace(&source, range(2, 5, 2, 6), "9");
        let new_text = edit.apply(&source);

        let repaired = repair(&mut tree, &edit, &new_text);
        assert_eq!(ranges(&tree), before);
        assert_eq!(repaired.kind, "Constant");
        assert_eq!(repaired.text, "9\n");
    }

    #[test]
    fn test_line_insert_shifts_following_statements() {
        let (source, mut tree) = five_assignments();
        let stmts: Vec<NodeId> = tree.children(tree.root()).to_vec();
        let value = tree.children(stmts[1])[1];
        let before: Vec<Range> = stmts.iter().map(|&s| tree.range(s)).collect();

        // two new lines inside the second statement's value
        let edit = EditDescriptor::insert(&source, pos(1, 6), "\n  + 2\n  + 3");
        assert_eq!(edit.delta_line(), 2);
        let new_text = edit.apply(&source);
        let repaired = repair(&mut tree, &edit, &new_text);

        assert_eq!(repaired.node, value);
        // the value's end moved down two lines without a column change
        assert_eq!(repaired.range, range(1, 5, 3, 7));
        assert_eq!(tree.range(stmts[1]), range(1, 0, 3, 7));
        assert_eq!(tree.range(stmts[0]), before[0]);
        for i in 2..5 {
            let moved = tree.range(stmts[i]);
            assert_eq!(moved.start, pos(before[i].start.line + 2, 0));
            assert_eq!(moved.end, pos(before[i].end.line + 2, before[i].end.column));
            for &child in tree.children(stmts[i]) {
                assert_eq!(tree.range(child).start.line, i + 2);
            }
        }
        assert_eq!(tree.range(tree.root()).end, pos(6, 7));
        assert_eq!(repaired.text, "1\n  + 2\n  + 3\n");
    }

    #[test]
    fn test_same_line_edit_moves_columns_until_the_line_changes() {
        let source = "a = 1; b = 2\nc = 3\n";
        let module = AstNode::new("Module")
            .child(
                AstNode::new("Assign")
                    .at(0, 0)
                    .child(AstNode::new("Name").at(0, 0))
                    .child(AstNode::new("Constant").at(0, 4)),
            )
            .child(
                AstNode::new("Assign")
                    .at(0, 7)
                    .child(AstNode::new("Name").at(0, 7))
                    .child(AstNode::new("Constant").at(0, 11)),
            )
            .child(
                AstNode::new("Assign")
                    .at(1, 0)
                    .child(AstNode::new("Name").at(1, 0))
                    .child(AstNode::new("Constant").at(1, 4)),
            );
        let tokens = vec![
            Token::new("NAME", range(0, 0, 0, 1), "a"),
            Token::new("OP", range(0, 2, 0, 3), "="),
            Token::new("NUMBER", range(0, 4, 0, 5), "1"),
            Token::new("OP", range(0, 5, 0, 6), ";"),
            Token::new("NAME", range(0, 7, 0, 8), "b"),
            Token::new("OP", range(0, 9, 0, 10), "="),
            Token::new("NUMBER", range(0, 11, 0, 12), "2"),
            Token::new("NEWLINE", range(0, 12, 0, 13), "\n"),
            Token::new("NAME", range(1, 0, 1, 1), "c"),
            Token::new("OP", range(1, 2, 1, 3), "="),
            Token::new("NUMBER", range(1, 4, 1, 5), "3"),
            Token::new("NEWLINE", range(1, 5, 1, 6), "\n"),
        ];
        let mut tree = zip_source(source, tokens, &module, &TokenConfig::default())
            .unwrap()
            .as_tree()
            .cloned()
            .unwrap();
        let stmts: Vec<NodeId> = tree.children(tree.root()).to_vec();

        let edit = EditDescriptor::replace(source, range(0, 4, 0, 5), "100");
        let repaired = repair(&mut tree, &edit, &edit.apply(source));

        assert_eq!(repaired.range, range(0, 4, 0, 9));
        assert_eq!(repaired.text, "100; ");
        assert_eq!(tree.range(stmts[1]), range(0, 9, 0, 15));
        assert_eq!(tree.range(tree.children(stmts[1])[1]), range(0, 13, 0, 15));
        // next line: no shift at all
        assert_eq!(tree.range(stmts[2]), range(1, 0, 1, 6));
    }
}
