//! Bracket bookkeeping threaded through a zip run.

use super::errors::ZipError;
use crate::config::TokenConfig;
use crate::geometry::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketRole {
    /// Opens a bracket closed by the carried char
    Open(char),
    Close(char),
}

/// Delimiter pairs recognized by the zipper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketTable {
    pairs: Vec<(char, char)>,
}

impl Default for BracketTable {
    fn default() -> Self {
        Self::new(vec![('(', ')'), ('[', ']'), ('{', '}')])
    }
}

impl BracketTable {
    pub fn new(pairs: Vec<(char, char)>) -> Self {
        Self { pairs }
    }

    pub fn from_config(config: &TokenConfig) -> Self {
        Self::new(config.bracket_pairs())
    }

    /// Role of a token literal; only single-char literals are delimiters.
    pub fn role(&self, literal: &str) -> Option<BracketRole> {
        let mut chars = literal.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return None;
        };
        self.pairs.iter().find_map(|&(open, close)| {
            if c == open {
                Some(BracketRole::Open(close))
            } else if c == close {
                Some(BracketRole::Close(close))
            } else {
                None
            }
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct Claim {
    closer: char,
    /// Zip frame that took the opener
    owner: usize,
}

/// Stack of open brackets, each tagged with the frame that took its opener.
#[derive(Debug, Default)]
pub(crate) struct Bounty {
    stack: Vec<Claim>,
}

impl Bounty {
    pub(crate) fn open(&mut self, closer: char, owner: usize) {
        self.stack.push(Claim { closer, owner });
    }

    pub(crate) fn close(&mut self, found: char, at: Position) -> Result<(), ZipError> {
        match self.stack.last() {
            Some(claim) if claim.closer == found => {
                self.stack.pop();
                Ok(())
            }
            top => Err(ZipError::StructuralMismatch {
                at,
                found,
                expected: top.map(|claim| claim.closer),
            }),
        }
    }

    /// Frame owning the innermost open bracket.
    pub(crate) fn top_owner(&self) -> Option<usize> {
        self.stack.last().map(|claim| claim.owner)
    }

    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }
}
