//! Shapes of the external parser's output.

use crate::geometry::Position;
use crate::tree::Token;
use serde::{Deserialize, Serialize};

/// A node of the parser's abstract syntax tree.
///
/// `anchor` is the position the parser reports for the node (its first
/// token, for most node kinds). Nodes without one, such as operator or
/// context markers, own no tokens of their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AstNode {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Position>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<AstNode>,
}

impl AstNode {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            anchor: None,
            children: Vec::new(),
        }
    }

    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.anchor = Some(Position::new(line, column));
        self
    }

    pub fn child(mut self, child: AstNode) -> Self {
        self.children.push(child);
        self
    }

    fn rebase(&mut self, line_base: usize) {
        if let Some(anchor) = &mut self.anchor {
            anchor.line = anchor.line.saturating_sub(line_base);
        }
        for child in &mut self.children {
            child.rebase(line_base);
        }
    }
}

/// Everything the parser reports for one cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOutput {
    /// Source text the parser saw; enables trivia filling when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub tokens: Vec<Token>,
    #[serde(default)]
    pub ast: Option<AstNode>,
}

impl ParseOutput {
    /// Decode a parser response. `null` and `[]` stand for a blank cell.
    pub fn from_json(input: &str) -> Result<Option<Self>, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(input)?;
        match &value {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::Array(items) if items.is_empty() => Ok(None),
            _ => serde_json::from_value(value).map(Some),
        }
    }

    /// Shift every line number so the first line is zero.
    pub fn rebase_lines(&mut self, line_base: usize) {
        if line_base == 0 {
            return;
        }
        for token in &mut self.tokens {
            token.range.start.line = token.range.start.line.saturating_sub(line_base);
            token.range.end.line = token.range.end.line.saturating_sub(line_base);
        }
        if let Some(ast) = &mut self.ast {
            ast.rebase(line_base);
        }
    }
}
