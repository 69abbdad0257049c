//! Property tests over generated bracket structures.

use cell_cst::config::TokenConfig;
use cell_cst::geometry::{Position, Range};
use cell_cst::tree::{CellTree, Token};
use cell_cst::zip::{zip_source, AstNode, ZipError};
use proptest::prelude::*;

const PAIRS: [(char, char); 3] = [('(', ')'), ('[', ']'), ('{', '}')];

#[derive(Debug, Clone)]
enum Item {
    Word(String),
    Break,
    Group(usize, Vec<Item>),
}

fn item() -> impl Strategy<Value = Item> {
    let leaf = prop_oneof![
        4 => "[a-z]{1,3}".prop_map(Item::Word),
        1 => Just(Item::Break),
    ];
    leaf.prop_recursive(4, 48, 5, |inner| {
        (0..PAIRS.len(), prop::collection::vec(inner, 0..5))
            .prop_map(|(pair, items)| Item::Group(pair, items))
    })
}

/// Renders items as source, tokens and an AST in which every word is a
/// `Name` and every bracket group a `Group` anchored at its opener.
#[derive(Default)]
struct Writer {
    source: String,
    tokens: Vec<Token>,
    line: usize,
    column: usize,
}

impl Writer {
    fn push(&mut self, kind: &str, literal: &str) -> Position {
        let start = Position::new(self.line, self.column);
        let end = Position::new(self.line, self.column + literal.chars().count());
        if literal == "\n" {
            self.line += 1;
            self.column = 0;
        } else {
            self.column = end.column;
        }
        self.tokens.push(Token::new(kind, Range::new(start, end), literal));
        self.source.push_str(literal);
        start
    }

    fn space(&mut self) {
        self.source.push(' ');
        self.column += 1;
    }

    fn write(&mut self, item: &Item) -> Option<AstNode> {
        match item {
            Item::Word(word) => {
                let at = self.push("NAME", word);
                Some(AstNode::new("Name").at(at.line, at.column))
            }
            Item::Break => {
                self.push("NL", "\n");
                None
            }
            Item::Group(pair, items) => {
                let (open, close) = PAIRS[*pair];
                let at = self.push("OP", &open.to_string());
                let mut node = AstNode::new("Group").at(at.line, at.column);
                for item in items {
                    self.space();
                    if let Some(child) = self.write(item) {
                        node = node.child(child);
                    }
                }
                self.push("OP", &close.to_string());
                Some(node)
            }
        }
    }
}

fn render(items: &[Item]) -> (Writer, AstNode) {
    let mut writer = Writer::default();
    let mut module = AstNode::new("Module");
    for item in items {
        if let Some(child) = writer.write(item) {
            module = module.child(child);
        }
        writer.space();
    }
    (writer, module)
}

proptest! {
    #[test]
    fn prop_well_nested_input_zips_with_full_coverage(
        items in prop::collection::vec(item(), 0..8)
    ) {
        let (writer, module) = render(&items);
        let cell = zip_source(&writer.source, writer.tokens, &module, &TokenConfig::default());
        let cell = cell.unwrap();

        let Some(tree) = cell.as_tree() else {
            prop_assert!(writer.source.trim().is_empty());
            return Ok(());
        };
        prop_assert_eq!(tree.source(), writer.source.clone());

        let owned: Vec<u32> = tree.subtree_tokens(tree.root()).into_iter().map(|t| t.0).collect();
        let expected: Vec<u32> = (0..tree.tokens().len() as u32).collect();
        prop_assert_eq!(owned, expected);

        for id in tree.descendants(tree.root()) {
            let node = tree.node(id);
            prop_assert!(node.range.start <= node.range.end);
            for pair in node.children.windows(2) {
                prop_assert!(tree.range(pair[0]).end <= tree.range(pair[1]).start);
            }
        }
    }

    #[test]
    fn prop_stray_closer_is_rejected(
        items in prop::collection::vec(item(), 0..8),
        pair in 0..PAIRS.len(),
    ) {
        let (mut writer, module) = render(&items);
        let closer = PAIRS[pair].1;
        writer.push("OP", &closer.to_string());

        let err = zip_source(&writer.source, writer.tokens, &module, &TokenConfig::default())
            .unwrap_err();
        let ZipError::StructuralMismatch { found, expected, .. } = err;
        prop_assert_eq!(found, closer);
        prop_assert_eq!(expected, None);
    }
}

#[test]
fn test_group_owns_its_delimiters_across_lines() {
    let items = vec![Item::Group(
        1,
        vec![Item::Word("a".into()), Item::Break, Item::Word("b".into())],
    )];
    let (writer, module) = render(&items);
    let cell = zip_source(&writer.source, writer.tokens, &module, &TokenConfig::default()).unwrap();
    let tree = cell.as_tree().unwrap();

    let group = tree.children(tree.root())[0];
    assert_eq!(tree.text(group), "[ a \n b] ");
    assert!(matches!(cell, CellTree::Tree(_)));
}
