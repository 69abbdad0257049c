//! cell-cst: range-accurate concrete syntax trees for notebook cells
//!
//! Builds a syntax tree for one cell's source from the output of an external
//! tokenizer and parser, and keeps node ranges usable while the user types,
//! without re-parsing after every keystroke.
//!
//! # Architecture
//!
//! - [`zip`] merges the token stream with the parser's AST so that every
//!   token is owned by exactly one node ([`SyntaxTree`]).
//! - [`repair`] locates the narrowest node an edit falls in and shifts the
//!   ranges of that node, its ancestors and everything after it.
//! - [`session`] ties a cell's text, tree and re-parse requests together;
//!   [`backend`] runs the external parser.
//!
//! # Example
//!
//! ```
//! use cell_cst::config::TokenConfig;
//! use cell_cst::geometry::{Position, Range};
//! use cell_cst::repair::{repair, EditDescriptor};
//! use cell_cst::tree::Token;
//! use cell_cst::zip::{zip_source, AstNode};
//!
//! let source = "x = 1\n";
//! let at = |l, a, b| Range::new(Position::new(l, a), Position::new(l, b));
//! let tokens = vec![
//!     Token::new("NAME", at(0, 0, 1), "x"),
//!     Token::new("OP", at(0, 2, 3), "="),
//!     Token::new("NUMBER", at(0, 4, 5), "1"),
//!     Token::new("NEWLINE", at(0, 5, 6), "\n"),
//! ];
//! let module = AstNode::new("Module").child(
//!     AstNode::new("Assign")
//!         .at(0, 0)
//!         .child(AstNode::new("Name").at(0, 0))
//!         .child(AstNode::new("Constant").at(0, 4)),
//! );
//!
//! let mut cell = zip_source(source, tokens, &module, &TokenConfig::default()).unwrap();
//! let tree = cell.as_tree_mut().unwrap();
//! assert_eq!(tree.source(), source);
//!
//! let edit = EditDescriptor::replace(source, at(0, 4, 5), "10");
//! let repaired = repair(tree, &edit, &edit.apply(source));
//! assert_eq!(repaired.text, "10\n");
//! ```

pub mod backend;
pub mod config;
pub mod geometry;
pub mod repair;
pub mod session;
pub mod text;
pub mod tree;
pub mod zip;

// Re-exports
pub use backend::{BackendError, ParserProcess};
pub use config::{load_from_path, load_from_str, Config, ConfigError};
pub use geometry::{classify, Position, Range, RangeRelation};
pub use repair::{locate, repair, EditDescriptor, Located, Repair};
pub use session::{CellSession, ResolveTicket};
pub use tree::{CellTree, NodeId, SyntaxNode, SyntaxTree, Token};
pub use zip::{zip_output, zip_source, zip_tokens, AstNode, ParseOutput, ZipError};
