//! Serializable nested view of a tree, the shape handed to the versioning layer.

use super::node::{Element, NodeId, SyntaxTree, Token};
use crate::geometry::Position;
use serde::Serialize;

/// A node with its content inlined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView<'a> {
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub start: Position,
    pub end: Position,
    pub content: Vec<ContentView<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContentView<'a> {
    Node(NodeView<'a>),
    Token(&'a Token),
}

impl SyntaxTree {
    pub fn view(&self, id: NodeId) -> NodeView<'_> {
        let node = self.node(id);
        NodeView {
            kind: &node.kind,
            start: node.range.start,
            end: node.range.end,
            content: node
                .content
                .iter()
                .map(|element| match *element {
                    Element::Node(n) => ContentView::Node(self.view(n)),
                    Element::Token(t) => ContentView::Token(self.token(t)),
                })
                .collect(),
        }
    }

    pub fn to_view(&self) -> NodeView<'_> {
        self.view(self.root())
    }
}
