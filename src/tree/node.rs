use crate::geometry::Range;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle of a node inside one [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Stable handle of a token inside one [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(pub u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl TokenId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A lexical token as reported by the external tokenizer. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub range: Range,
    pub literal: String,
}

impl Token {
    pub fn new(kind: impl Into<String>, range: Range, literal: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            range,
            literal: literal.into(),
        }
    }
}

/// One item of a node's content, in source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Node(NodeId),
    Token(TokenId),
}

/// A node of the concrete syntax tree.
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    /// AST type name (`Assign`, `Call`, ...)
    pub kind: String,
    pub range: Range,
    /// Child nodes and directly owned tokens, in source order
    pub content: Vec<Element>,
    /// Child nodes only, in source order
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    /// Position of this node within its parent's `children`
    pub index: usize,
}

impl SyntaxNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-backed concrete syntax tree of one cell.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    tokens: Vec<Token>,
    nodes: Vec<SyntaxNode>,
    root: NodeId,
}

impl SyntaxTree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut SyntaxNode {
        &mut self.nodes[id.index()]
    }

    pub fn token(&self, id: TokenId) -> &Token {
        &self.tokens[id.index()]
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn range(&self, id: NodeId) -> Range {
        self.node(id).range
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Ancestors from the parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// Next node to the right of `id`, climbing through ancestors when `id`
    /// is the last child of its parent.
    pub fn right_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            let node = self.node(current);
            let parent = node.parent?;
            if let Some(&next) = self.children(parent).get(node.index + 1) {
                return Some(next);
            }
            current = parent;
        }
    }

    /// Nodes of the subtree rooted at `id` in preorder, `id` included.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![id],
        }
    }

    /// Tokens of the subtree rooted at `id`, in source order.
    pub fn subtree_tokens(&self, id: NodeId) -> Vec<TokenId> {
        let mut out = Vec::new();
        self.collect_tokens(id, &mut out);
        out
    }

    fn collect_tokens(&self, id: NodeId, out: &mut Vec<TokenId>) {
        for element in &self.node(id).content {
            match *element {
                Element::Token(t) => out.push(t),
                Element::Node(n) => self.collect_tokens(n, out),
            }
        }
    }
}

/// Preorder iterator over a subtree.
pub struct Descendants<'a> {
    tree: &'a SyntaxTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

/// Bottom-up constructor used by the zipper: children are allocated before
/// their parent, and the parent links are filled in when the parent lands.
#[derive(Debug, Default)]
pub(crate) struct TreeBuilder {
    tokens: Vec<Token>,
    nodes: Vec<SyntaxNode>,
}

impl TreeBuilder {
    pub(crate) fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            nodes: Vec::new(),
        }
    }

    pub(crate) fn token(&self, index: usize) -> &Token {
        &self.tokens[index]
    }

    pub(crate) fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub(crate) fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub(crate) fn node_range(&self, id: NodeId) -> Range {
        self.nodes[id.index()].range
    }

    pub(crate) fn element_range(&self, element: Element) -> Range {
        match element {
            Element::Node(n) => self.node_range(n),
            Element::Token(t) => self.tokens[t.index()].range,
        }
    }

    /// Allocate a node over non-empty `content`. Its range spans the first
    /// item's start to the last item's end.
    pub(crate) fn alloc(&mut self, kind: impl Into<String>, content: Vec<Element>) -> NodeId {
        debug_assert!(!content.is_empty(), "nodes own at least one token");
        let range = match (content.first(), content.last()) {
            (Some(&first), Some(&last)) => {
                Range::new(self.element_range(first).start, self.element_range(last).end)
            }
            _ => Range::default(),
        };

        let id = NodeId(self.nodes.len() as u32);
        let children: Vec<NodeId> = content
            .iter()
            .filter_map(|e| match *e {
                Element::Node(n) => Some(n),
                Element::Token(_) => None,
            })
            .collect();
        for (index, &child) in children.iter().enumerate() {
            let node = &mut self.nodes[child.index()];
            node.parent = Some(id);
            node.index = index;
        }

        self.nodes.push(SyntaxNode {
            kind: kind.into(),
            range,
            content,
            children,
            parent: None,
            index: 0,
        });
        id
    }

    pub(crate) fn finish(self, root: NodeId) -> SyntaxTree {
        SyntaxTree {
            tokens: self.tokens,
            nodes: self.nodes,
            root,
        }
    }
}

/// Result of zipping one cell: a tree, or the sentinel for a blank cell.
#[derive(Debug, Clone)]
pub enum CellTree {
    Empty,
    Tree(SyntaxTree),
}

impl CellTree {
    /// A single root of kind `kind` owning every token directly. Used when
    /// the structured zip is not possible.
    pub fn flat(kind: &str, tokens: Vec<Token>) -> Self {
        if tokens.is_empty() {
            return CellTree::Empty;
        }
        let content = (0..tokens.len())
            .map(|i| Element::Token(TokenId(i as u32)))
            .collect();
        let mut builder = TreeBuilder::new(tokens);
        let root = builder.alloc(kind, content);
        CellTree::Tree(builder.finish(root))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellTree::Empty)
    }

    pub fn as_tree(&self) -> Option<&SyntaxTree> {
        match self {
            CellTree::Tree(tree) => Some(tree),
            CellTree::Empty => None,
        }
    }

    pub fn as_tree_mut(&mut self) -> Option<&mut SyntaxTree> {
        match self {
            CellTree::Tree(tree) => Some(tree),
            CellTree::Empty => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Position;

    fn tok(line: usize, col: usize, text: &str) -> Token {
        Token::new(
            "NAME",
            Range::new(
                Position::new(line, col),
                Position::new(line, col + text.chars().count()),
            ),
            text,
        )
    }

    /// root(a(x), b(y), z)
    fn small_tree() -> (SyntaxTree, NodeId, NodeId) {
        let mut builder = TreeBuilder::new(vec![tok(0, 0, "x"), tok(1, 0, "y"), tok(2, 0, "z")]);
        let a = builder.alloc("A", vec![Element::Token(TokenId(0))]);
        let b = builder.alloc("B", vec![Element::Token(TokenId(1))]);
        let root = builder.alloc(
            "Module",
            vec![Element::Node(a), Element::Node(b), Element::Token(TokenId(2))],
        );
        (builder.finish(root), a, b)
    }

    #[test]
    fn test_alloc_links_parents_and_indices() {
        let (tree, a, b) = small_tree();
        let root = tree.root();
        assert_eq!(tree.parent(a), Some(root));
        assert_eq!(tree.node(b).index, 1);
        assert_eq!(tree.children(root), &[a, b]);
        assert_eq!(tree.range(root).end, Position::new(2, 1));
    }

    #[test]
    fn test_right_sibling_climbs_to_parent() {
        let (tree, a, b) = small_tree();
        assert_eq!(tree.right_sibling(a), Some(b));
        assert_eq!(tree.right_sibling(b), None);
        assert_eq!(tree.right_sibling(tree.root()), None);
    }

    #[test]
    fn test_descendants_preorder() {
        let (tree, a, b) = small_tree();
        let order: Vec<_> = tree.descendants(tree.root()).collect();
        assert_eq!(order, vec![tree.root(), a, b]);
    }

    #[test]
    fn test_flat_owns_every_token() {
        let tree = CellTree::flat("Module", vec![tok(0, 0, "x"), tok(0, 2, "y")]);
        let tree = tree.as_tree().unwrap();
        assert!(tree.node(tree.root()).is_leaf());
        assert_eq!(tree.subtree_tokens(tree.root()).len(), 2);
        assert!(CellTree::flat("Module", Vec::new()).is_empty());
    }
}
