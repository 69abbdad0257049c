//! Synthesizing tokens for source text the tokenizer skips.

use crate::geometry::Range;
use crate::text::LineIndex;
use crate::tree::Token;

/// Insert a `kind` token for every stretch of `source` not covered by
/// `tokens`, so the literals concatenate back to `source`.
pub fn fill_gaps(source: &str, tokens: Vec<Token>, kind: &str) -> Vec<Token> {
    let index = LineIndex::new(source);
    let mut out = Vec::with_capacity(tokens.len() * 2);
    let mut covered = 0;

    for token in tokens {
        let start = index.offset(token.range.start);
        if start > covered {
            out.push(gap(&index, covered, start, kind));
        }
        covered = covered.max(index.offset(token.range.end));
        out.push(token);
    }
    if covered < source.len() {
        out.push(gap(&index, covered, source.len(), kind));
    }
    out
}

fn gap(index: &LineIndex<'_>, from: usize, to: usize, kind: &str) -> Token {
    log::trace!("trivia {from}..{to}");
    Token::new(
        kind,
        Range::new(index.position(from), index.position(to)),
        &index.text()[from..to],
    )
}
