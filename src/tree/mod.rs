//! Arena-backed concrete syntax tree.
//!
//! Every node owns a contiguous run of tokens and knows its parent and its
//! index among its siblings, so the repair pass can climb and walk right in
//! constant time without reference cycles.

mod node;
mod render;
mod view;

pub use node::{CellTree, Descendants, Element, NodeId, SyntaxNode, SyntaxTree, Token, TokenId};
pub(crate) use node::TreeBuilder;
pub use view::{ContentView, NodeView};
