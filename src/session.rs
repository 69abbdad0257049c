//! Per-cell state: the current text, its tree, and re-parse bookkeeping.

use crate::backend::{BackendError, ParserProcess};
use crate::repair::{repair, EditDescriptor, Repair};
use crate::tree::CellTree;

/// Handle for one outstanding re-parse request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveTicket {
    pub id: u64,
    /// Text the parser should see
    pub source: String,
}

/// One cell's text and tree. Edits go through [`CellSession::apply_edit`]
/// one at a time.
#[derive(Debug, Clone)]
pub struct CellSession {
    text: String,
    tree: CellTree,
    generation: u64,
}

impl CellSession {
    pub fn new(text: impl Into<String>, tree: CellTree) -> Self {
        Self {
            text: text.into(),
            tree,
            generation: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tree(&self) -> &CellTree {
        &self.tree
    }

    /// Apply `edit` to the text and repair the tree. Returns `None` for a
    /// cell with no tree yet. Outstanding tickets become stale.
    pub fn apply_edit(&mut self, edit: &EditDescriptor) -> Option<Repair> {
        self.text = edit.apply(&self.text);
        self.generation += 1;
        let tree = self.tree.as_tree_mut()?;
        Some(repair(tree, edit, &self.text))
    }

    /// Start a re-parse of the current text.
    pub fn begin_resolve(&mut self) -> ResolveTicket {
        self.generation += 1;
        ResolveTicket {
            id: self.generation,
            source: self.text.clone(),
        }
    }

    /// Install the tree parsed for `ticket`. Answers for anything but the
    /// latest ticket are dropped; returns whether the tree was installed.
    pub fn finish_resolve(&mut self, ticket: &ResolveTicket, tree: CellTree) -> bool {
        if ticket.id != self.generation {
            log::debug!(
                "dropping stale parse {} (latest is {})",
                ticket.id,
                self.generation
            );
            return false;
        }
        self.tree = tree;
        true
    }

    /// Re-parse the current text through `backend` and install the result.
    pub async fn resolve(&mut self, backend: &ParserProcess) -> Result<bool, BackendError> {
        let ticket = self.begin_resolve();
        let tree = backend.zip(&ticket.source).await?;
        Ok(self.finish_resolve(&ticket, tree))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TokenConfig;
    use crate::geometry::{Position, Range};
    use crate::tree::Token;
    use crate::zip::{zip_source, AstNode};

    fn session() -> CellSession {
        let source = "x = 1\n";
        let tokens = vec![
            Token::new("NAME", Range::new(Position::new(0, 0), Position::new(0, 1)), "x"),
            Token::new("OP", Range::new(Position::new(0, 2), Position::new(0, 3)), "="),
            Token::new("NUMBER", Range::new(Position::new(0, 4), Position::new(0, 5)), "1"),
            Token::new("NEWLINE", Range::new(Position::new(0, 5), Position::new(0, 6)), "\n"),
        ];
        let module = AstNode::new("Module").child(
            AstNode::new("Assign")
                .at(0, 0)
                .child(AstNode::new("Name").at(0, 0))
                .child(AstNode::new("Constant").at(0, 4)),
        );
        let tree = zip_source(source, tokens, &module, &TokenConfig::default()).unwrap();
        CellSession::new(source, tree)
    }

    #[test]
    fn test_apply_edit_updates_text_and_tree() {
        let mut session = session();
        let edit = EditDescriptor::replace(
            session.text(),
            Range::new(Position::new(0, 4), Position::new(0, 5)),
            "42",
        );
        let repaired = session.apply_edit(&edit).unwrap();
        assert_eq!(session.text(), "x = 42\n");
        assert_eq!(repaired.text, "42\n");
        let tree = session.tree().as_tree().unwrap();
        assert_eq!(tree.range(tree.root()).end, Position::new(0, 7));
    }

    #[test]
    fn test_apply_edit_on_empty_cell() {
        let mut session = CellSession::new("", CellTree::Empty);
        let edit = EditDescriptor::insert("", Position::new(0, 0), "y");
        assert!(session.apply_edit(&edit).is_none());
        assert_eq!(session.text(), "y");
    }

    #[test]
    fn test_only_latest_ticket_is_installed() {
        let mut session = CellSession::new("", CellTree::Empty);
        let first = session.begin_resolve();
        let second = session.begin_resolve();
        assert!(second.id > first.id);

        let tree = CellTree::flat("Module", vec![Token::new("NAME", Range::default(), "z")]);
        assert!(!session.finish_resolve(&first, tree.clone()));
        assert!(session.tree().is_empty());
        assert!(session.finish_resolve(&second, tree));
        assert!(!session.tree().is_empty());
    }

    #[test]
    fn test_edit_invalidates_outstanding_ticket() {
        let mut session = session();
        let ticket = session.begin_resolve();
        let edit = EditDescriptor::insert(session.text(), Position::new(0, 0), "#");
        session.apply_edit(&edit);
        assert!(!session.finish_resolve(&ticket, CellTree::Empty));
    }
}
