use crate::geometry::{classify, Range, RangeRelation};
use crate::tree::{NodeId, SyntaxTree};

/// Node affected by an edit, with its index among its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Located {
    pub node: NodeId,
    pub index: usize,
}

/// Narrowest node whose range contains `edit`, or the root when no child
/// does.
pub fn locate(tree: &SyntaxTree, edit: &Range) -> Located {
    let root = tree.root();
    match find_affected(tree, tree.children(root), edit) {
        Some(located) => located,
        None => Located {
            node: root,
            index: 0,
        },
    }
}

/// Binary search over `siblings`, descending into the first child that
/// contains the edit.
fn find_affected(tree: &SyntaxTree, siblings: &[NodeId], edit: &Range) -> Option<Located> {
    let (mut lo, mut hi) = (0, siblings.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let node = siblings[mid];
        match classify(&tree.range(node), edit) {
            RangeRelation::Contains => {
                let here = Located { node, index: mid };
                return Some(find_affected(tree, tree.children(node), edit).unwrap_or(here));
            }
            RangeRelation::Spans => return None,
            RangeRelation::Before => hi = mid,
            RangeRelation::After => lo = mid + 1,
        }
    }
    None
}

impl SyntaxTree {
    /// Narrowest node covering `range`.
    pub fn node_at(&self, range: Range) -> NodeId {
        locate(self, &range).node
    }
}
