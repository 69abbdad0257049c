//! Reading text back out of a tree: full text, summary lines, text search.

use super::node::{Element, NodeId, SyntaxTree};
use xxhash_rust::xxh3::xxh3_64;

impl SyntaxTree {
    /// Concatenated token literals of the subtree rooted at `id`.
    pub fn text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_text(id, &mut out);
        out
    }

    fn write_text(&self, id: NodeId, out: &mut String) {
        for element in &self.node(id).content {
            match *element {
                Element::Token(t) => out.push_str(&self.token(t).literal),
                Element::Node(n) => self.write_text(n, out),
            }
        }
    }

    /// Text of the whole cell.
    pub fn source(&self) -> String {
        self.text(self.root())
    }

    /// First line of a node's text, without the line terminator.
    pub fn first_line(&self, id: NodeId) -> String {
        let text = self.text(id);
        text.lines().next().unwrap_or_default().to_string()
    }

    /// Deepest node whose text contains `needle`, searching children before
    /// their parent and earlier children first.
    pub fn find_by_text(&self, needle: &str) -> Option<NodeId> {
        self.find_in(self.root(), needle)
    }

    fn find_in(&self, id: NodeId, needle: &str) -> Option<NodeId> {
        if let Some(found) = self
            .children(id)
            .iter()
            .find_map(|&child| self.find_in(child, needle))
        {
            return Some(found);
        }
        self.text(id).contains(needle).then_some(id)
    }

    /// xxh3 hash of a node's text.
    pub fn fingerprint(&self, id: NodeId) -> u64 {
        xxh3_64(self.text(id).as_bytes())
    }
}
