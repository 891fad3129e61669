//! Error types for nested rule resolution.
//!
//! Every error is fatal for the transform that raised it: the tree is either
//! fully rewritten or the caller gets one of these.

use std::fmt;

use sheet::Position;
use thiserror::Error;

use crate::selector::SelectorError;

/// Optional source position, displayed as a `line:column: ` prefix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Location(pub Option<Position>);

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(position) => write!(f, "{position}: "),
            None => Ok(()),
        }
    }
}

/// Errors that can occur while resolving nested rules.
///
/// # Examples
///
/// ```rust
/// use nesting::{Nesting, NestingError, NestingOptions};
///
/// let mut root = sheet::parse_stylesheet("a{\n  color: black\n  @mixin b { }\n}").unwrap();
/// let err = Nesting::new(&NestingOptions::default())
///     .process(&mut root)
///     .unwrap_err();
///
/// assert!(matches!(err, NestingError::MissedSemicolon { .. }));
/// assert_eq!(err.to_string(), "2:3: Missed semicolon");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NestingError {
    /// A selector failed to parse and contains a colon, which almost always
    /// means a declaration lost its `;` and swallowed the next block's
    /// prelude.
    #[error("{location}Missed semicolon")]
    MissedSemicolon { location: Location, selector: String },

    /// A selector failed to parse for any other reason.
    #[error("{location}{source}")]
    SelectorParse {
        location: Location,
        selector: String,
        source: SelectorError,
    },

    /// The escape directive's parameter matched no known form.
    #[error("{location}Unknown @{name} parameter {params:?}")]
    UnknownEscapeParameter {
        location: Location,
        name: String,
        params: String,
    },

    /// The tree was left in a state the transform never produces.
    #[error("internal invariant violated: {0}")]
    Internal(String),
}

impl NestingError {
    /// Builds the user-facing error for a selector that failed to parse.
    pub fn selector(selector: &str, source: SelectorError, position: Option<Position>) -> Self {
        let location = Location(position);
        if selector.contains(':') {
            NestingError::MissedSemicolon {
                location,
                selector: selector.to_string(),
            }
        } else {
            NestingError::SelectorParse {
                location,
                selector: selector.to_string(),
                source,
            }
        }
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        NestingError::Internal(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colon_means_missed_semicolon() {
        let err = NestingError::selector(
            "color: black @mixin b",
            SelectorError::Unexpected {
                found: ':',
                offset: 5,
            },
            Some(Position::new(2, 3)),
        );
        assert_eq!(err.to_string(), "2:3: Missed semicolon");
    }

    #[test]
    fn test_other_errors_keep_parser_message() {
        let err = NestingError::selector(
            "-Option/root",
            SelectorError::Unexpected {
                found: '/',
                offset: 7,
            },
            Some(Position::new(2, 3)),
        );
        assert!(err.to_string().starts_with("2:3: Unexpected '/'"));
    }

    #[test]
    fn test_location_is_optional() {
        let err = NestingError::selector("a/b", SelectorError::UnexpectedEnd, None);
        assert_eq!(err.to_string(), "Unexpected end of selector");
    }
}
