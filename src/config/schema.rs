use serde::Deserialize;
use std::fmt;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub tokens: TokenConfig,
    #[serde(default)]
    pub parser: ParserConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        for (field, value) in [
            ("tokens.encoding_marker", &self.tokens.encoding_marker),
            ("tokens.end_marker", &self.tokens.end_marker),
            ("tokens.trivia_kind", &self.tokens.trivia_kind),
            ("tokens.root_kind", &self.tokens.root_kind),
        ] {
            if value.trim().is_empty() {
                issues.push(ValidationIssue::MissingField { field });
            }
        }

        let mut seen = Vec::new();
        for pair in &self.tokens.brackets {
            let chars: Vec<char> = pair.chars().collect();
            match chars.as_slice() {
                [open, close] if open != close => {
                    for c in [*open, *close] {
                        if seen.contains(&c) {
                            issues.push(ValidationIssue::InvalidValue {
                                field: "tokens.brackets",
                                message: format!("'{c}' appears in more than one bracket pair"),
                            });
                        }
                        seen.push(c);
                    }
                }
                _ => issues.push(ValidationIssue::InvalidValue {
                    field: "tokens.brackets",
                    message: format!(
                        "bracket pair '{pair}' must be two distinct characters, opener first"
                    ),
                }),
            }
        }

        if self.parser.program.trim().is_empty() {
            issues.push(ValidationIssue::MissingField {
                field: "parser.program",
            });
        }
        if self.parser.line_base > 1 {
            issues.push(ValidationIssue::InvalidValue {
                field: "parser.line_base",
                message: format!("expected 0 or 1, got {}", self.parser.line_base),
            });
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

/// How the external tokenizer labels its tokens.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TokenConfig {
    /// Kind of the leading encoding-marker token stripped before zipping
    pub encoding_marker: String,
    /// Kind of the trailing end-of-stream token stripped before zipping
    pub end_marker: String,
    /// Kind given to tokens synthesized for untokenized source text
    pub trivia_kind: String,
    /// Root kind used by the flat fallback tree
    pub root_kind: String,
    /// Delimiter pairs tracked by the bracket bounty, opener first
    pub brackets: Vec<String>,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            encoding_marker: "ENCODING".to_string(),
            end_marker: "ENDMARKER".to_string(),
            trivia_kind: "WHITESPACE".to_string(),
            root_kind: "Module".to_string(),
            brackets: vec!["()".to_string(), "[]".to_string(), "{}".to_string()],
        }
    }
}

impl TokenConfig {
    /// Bracket pairs as `(opener, closer)`. Malformed entries are skipped;
    /// [`Config::validate`] reports them.
    pub fn bracket_pairs(&self) -> Vec<(char, char)> {
        self.brackets
            .iter()
            .filter_map(|pair| {
                let mut chars = pair.chars();
                match (chars.next(), chars.next(), chars.next()) {
                    (Some(open), Some(close), None) if open != close => Some((open, close)),
                    _ => None,
                }
            })
            .collect()
    }
}

/// External parser process settings.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ParserConfig {
    pub program: String,
    pub args: Vec<String>,
    /// Number the parser gives the first line (1 for Python's tokenize)
    pub line_base: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            program: "python3".to_string(),
            args: vec!["scripts/py_cell_parse.py".to_string()],
            line_base: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone)]
pub enum ValidationIssue {
    MissingField {
        field: &'static str,
    },
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::MissingField { field } => {
                write!(f, "missing required field '{field}'")
            }
            ValidationIssue::InvalidValue { field, message } => {
                write!(f, "invalid value for '{field}': {message}")
            }
        }
    }
}
