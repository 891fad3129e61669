//! Error types for stylesheet parsing.

use crate::node::Position;
use thiserror::Error;

/// Errors that can occur while parsing a stylesheet.
///
/// Every variant carries the position of the offending item and displays as
/// `line:column: message`.
///
/// # Examples
///
/// ```rust
/// use sheet::{parse_stylesheet, SheetError};
///
/// let err = parse_stylesheet("a { color: red;").unwrap_err();
/// assert!(matches!(err, SheetError::Unclosed { what: "block", .. }));
/// assert_eq!(err.to_string(), "1:1: Unclosed block");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SheetError {
    /// A block, string or comment was never terminated.
    #[error("{position}: Unclosed {what}")]
    Unclosed {
        what: &'static str,
        position: Position,
    },

    /// A declaration without a `:` separator.
    #[error("{position}: Unknown word {word}")]
    UnknownWord { word: String, position: Position },

    /// A `}` with no open block.
    #[error("{position}: Unexpected }}")]
    UnexpectedBrace { position: Position },
}

impl SheetError {
    pub fn position(&self) -> Position {
        match self {
            SheetError::Unclosed { position, .. }
            | SheetError::UnknownWord { position, .. }
            | SheetError::UnexpectedBrace { position } => *position,
        }
    }
}
