use crate::geometry::Position;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ZipError {
    /// A closing delimiter with no open bracket, or one that does not match
    /// the innermost open bracket. The whole zip is abandoned.
    #[error("unmatched '{found}' at {at}{}", describe_expected(.expected))]
    StructuralMismatch {
        at: Position,
        found: char,
        expected: Option<char>,
    },
}

fn describe_expected(expected: &Option<char>) -> String {
    match expected {
        Some(closer) => format!(", expected '{closer}'"),
        None => " with no open bracket".to_string(),
    }
}
