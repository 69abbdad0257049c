use super::bounty::{Bounty, BracketRole, BracketTable};
use super::errors::ZipError;
use super::input::AstNode;
use crate::geometry::Position;
use crate::tree::{Element, NodeId, SyntaxTree, Token, TokenId, TreeBuilder};

/// AST node reduced to what the zipper walks: anchored children only, in
/// source order.
#[derive(Debug)]
struct Shape<'a> {
    kind: &'a str,
    anchor: Option<Position>,
    /// Earliest anchor in the subtree
    lead: Position,
    children: Vec<Shape<'a>>,
}

impl<'a> Shape<'a> {
    fn prepare(node: &'a AstNode) -> Option<Self> {
        let children = Self::prepare_all(&node.children);
        let lead = node
            .anchor
            .into_iter()
            .chain(children.first().map(|child| child.lead))
            .min()?;
        Some(Shape {
            kind: &node.kind,
            anchor: node.anchor,
            lead,
            children,
        })
    }

    fn prepare_all(nodes: &'a [AstNode]) -> Vec<Self> {
        let mut shapes: Vec<Shape<'a>> = nodes.iter().filter_map(Shape::prepare).collect();
        shapes.sort_by_key(|shape| shape.lead);
        shapes
    }
}

/// One zip run over a token sequence.
///
/// Tokens are consumed strictly left to right through a single cursor, so
/// the bracket bounty observes delimiters in source order no matter which
/// node ends up owning them. Every node visit gets a frame number; frames
/// inside a subtree are never smaller than the subtree root's frame.
pub(crate) struct Zipper<'t> {
    builder: TreeBuilder,
    brackets: &'t BracketTable,
    bounty: Bounty,
    frames: usize,
}

impl<'t> Zipper<'t> {
    pub(crate) fn new(tokens: Vec<Token>, brackets: &'t BracketTable) -> Self {
        Self {
            builder: TreeBuilder::new(tokens),
            brackets,
            bounty: Bounty::default(),
            frames: 0,
        }
    }

    /// Zip against the module-level node. The root owns whatever its
    /// children leave behind. Requires at least one token.
    pub(crate) fn zip(mut self, module: &AstNode) -> Result<SyntaxTree, ZipError> {
        let frame = self.enter();
        let children = Shape::prepare_all(&module.children);
        let end = self.builder.token_count();

        let mut content = Vec::new();
        let mut cursor = self.zip_children(&children, 0, end, frame, &mut content)?;
        while cursor < end {
            self.take(cursor, frame, &mut content)?;
            cursor += 1;
        }

        if self.bounty.depth() > 0 {
            log::warn!("{} bracket(s) left open at end of cell", self.bounty.depth());
        }

        let root = self.builder.alloc(module.kind.as_str(), content);
        Ok(self.builder.finish(root))
    }

    fn enter(&mut self) -> usize {
        let frame = self.frames;
        self.frames += 1;
        frame
    }

    /// Zip one node over tokens `[lo, hi)`. Returns the node, if it claimed
    /// anything, and the cursor after its last token.
    fn zip_node(
        &mut self,
        shape: &Shape<'_>,
        lo: usize,
        hi: usize,
    ) -> Result<(Option<NodeId>, usize), ZipError> {
        let frame = self.enter();
        let mut content = Vec::new();
        let mut cursor = lo;

        if shape.children.is_empty() {
            if cursor < hi && Some(self.builder.token(cursor).range.start) == shape.anchor {
                self.take(cursor, frame, &mut content)?;
                cursor += 1;
            }
        } else {
            cursor = self.zip_children(&shape.children, lo, hi, frame, &mut content)?;
        }

        if content.is_empty() {
            log::warn!("dropping {} at {}: no tokens to claim", shape.kind, shape.lead);
            return Ok((None, lo));
        }

        cursor = self.fold_trailing(cursor, hi, frame, &mut content)?;
        let id = self.builder.alloc(shape.kind, content);
        log::debug!(
            "zipped {} {} over tokens {}..{}",
            shape.kind,
            self.builder.node_range(id),
            lo,
            cursor
        );
        Ok((Some(id), cursor))
    }

    /// Walk `children` left to right. Tokens before a child's lead belong to
    /// the parent; each child sees the tokens up to the next child's lead.
    fn zip_children(
        &mut self,
        children: &[Shape<'_>],
        lo: usize,
        hi: usize,
        frame: usize,
        content: &mut Vec<Element>,
    ) -> Result<usize, ZipError> {
        let mut cursor = lo;
        for (i, child) in children.iter().enumerate() {
            let start = self.boundary(cursor, hi, child.lead);
            while cursor < start {
                self.take(cursor, frame, content)?;
                cursor += 1;
            }

            let window_end = match children.get(i + 1) {
                Some(next) => self.boundary(cursor, hi, next.lead),
                None => hi,
            };
            let (node, next) = self.zip_node(child, cursor, window_end)?;
            if let Some(node) = node {
                content.push(Element::Node(node));
            }
            cursor = next;
        }
        Ok(cursor)
    }

    /// Fold tokens following the node's content into it.
    ///
    /// While a bracket opened inside this subtree is still open, every
    /// token is taken regardless of line. Otherwise only tokens starting on
    /// the line the content ends on are taken, and no delimiter: an opener
    /// starts something the parent owns, and a closer belongs to whoever took
    /// its opener.
    fn fold_trailing(
        &mut self,
        mut cursor: usize,
        hi: usize,
        frame: usize,
        content: &mut Vec<Element>,
    ) -> Result<usize, ZipError> {
        let Some(&last) = content.last() else {
            return Ok(cursor);
        };
        let mut line = self.builder.element_range(last).end.line;

        while cursor < hi {
            let token = self.builder.token(cursor);
            let owes_closer = self.bounty.top_owner().is_some_and(|owner| owner >= frame);
            if !owes_closer
                && (token.range.start.line != line || self.brackets.role(&token.literal).is_some())
            {
                break;
            }
            line = token.range.end.line;
            self.take(cursor, frame, content)?;
            cursor += 1;
        }
        Ok(cursor)
    }

    /// First index in `[lo, hi)` whose token starts at or after `at`.
    fn boundary(&self, lo: usize, hi: usize, at: Position) -> usize {
        lo + self.builder.tokens()[lo..hi].partition_point(|token| token.range.start < at)
    }

    fn take(&mut self, index: usize, frame: usize, content: &mut Vec<Element>) -> Result<(), ZipError> {
        let token = self.builder.token(index);
        match self.brackets.role(&token.literal) {
            Some(BracketRole::Open(closer)) => self.bounty.open(closer, frame),
            Some(BracketRole::Close(found)) => self.bounty.close(found, token.range.start)?,
            None => {}
        }
        log::trace!("token {index} {:?} -> frame {frame}", token.literal);
        content.push(Element::Token(TokenId(index as u32)));
        Ok(())
    }
}
