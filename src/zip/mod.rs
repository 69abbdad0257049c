//! Token-AST zipper.
//!
//! Merges the tokenizer's flat token stream with the parser's nested AST so
//! that every token is owned by exactly one tree node and every node's range
//! is the exact span of the tokens it owns.

pub mod bounty;
pub mod errors;
pub mod input;
pub mod trivia;
mod zipper;

pub use bounty::{BracketRole, BracketTable};
pub use errors::ZipError;
pub use input::{AstNode, ParseOutput};
pub use trivia::fill_gaps;

use crate::config::TokenConfig;
use crate::tree::{CellTree, Token};
use zipper::Zipper;

/// Zip a raw token stream against the module-level AST node.
///
/// The leading encoding marker and trailing end markers are stripped first.
/// A stream with nothing but blank tokens yields [`CellTree::Empty`].
pub fn zip_tokens(
    tokens: Vec<Token>,
    module: &AstNode,
    config: &TokenConfig,
) -> Result<CellTree, ZipError> {
    zip_stripped(strip_markers(tokens, config), module, config)
}

/// Like [`zip_tokens`], but fills the gaps between tokens with trivia taken
/// from `source` so the tree's text reproduces it exactly.
pub fn zip_source(
    source: &str,
    tokens: Vec<Token>,
    module: &AstNode,
    config: &TokenConfig,
) -> Result<CellTree, ZipError> {
    if source.trim().is_empty() {
        return Ok(CellTree::Empty);
    }
    let tokens = fill_gaps(source, strip_markers(tokens, config), &config.trivia_kind);
    zip_stripped(tokens, module, config)
}

/// Zip a decoded parser response. A response without an AST becomes a flat
/// tree owning every token directly.
pub fn zip_output(output: ParseOutput, config: &TokenConfig) -> Result<CellTree, ZipError> {
    match (output.ast, output.source) {
        (Some(module), Some(source)) => zip_source(&source, output.tokens, &module, config),
        (Some(module), None) => zip_tokens(output.tokens, &module, config),
        (None, source) => {
            let mut tokens = strip_markers(output.tokens, config);
            if let Some(source) = source {
                if source.trim().is_empty() {
                    return Ok(CellTree::Empty);
                }
                tokens = fill_gaps(&source, tokens, &config.trivia_kind);
            }
            log::warn!("parser sent no AST, building a flat tree");
            Ok(CellTree::flat(&config.root_kind, tokens))
        }
    }
}

fn zip_stripped(
    tokens: Vec<Token>,
    module: &AstNode,
    config: &TokenConfig,
) -> Result<CellTree, ZipError> {
    if tokens.iter().all(|token| token.literal.trim().is_empty()) {
        log::debug!("blank cell, {} token(s)", tokens.len());
        return Ok(CellTree::Empty);
    }
    let brackets = BracketTable::from_config(config);
    let tree = Zipper::new(tokens, &brackets).zip(module)?;
    log::debug!(
        "zipped {} node(s) over {} token(s)",
        tree.node_count(),
        tree.tokens().len()
    );
    Ok(CellTree::Tree(tree))
}

fn strip_markers(mut tokens: Vec<Token>, config: &TokenConfig) -> Vec<Token> {
    while tokens
        .last()
        .is_some_and(|token| token.kind == config.end_marker)
    {
        tokens.pop();
    }
    if tokens
        .first()
        .is_some_and(|token| token.kind == config.encoding_marker)
    {
        tokens.remove(0);
    }
    tokens
}
