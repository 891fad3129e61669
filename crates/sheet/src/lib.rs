//! # Sheet - Stylesheet Tree
//!
//! The tree, parser and printer that the nesting transform operates on.
//!
//! - **Tree**: [`Root`] and the closed [`Node`] union ([`Rule`], [`AtRule`],
//!   [`Declaration`], [`Comment`]), each node owned by exactly one container
//! - **Parsing**: [`parse_stylesheet`] accepts nested rules and records the
//!   [`Position`] of every node for error reporting
//! - **Printing**: `Display` renders a compact single-line stylesheet
//!
//! ## Quick Start
//!
//! ```rust
//! use sheet::parse_stylesheet;
//!
//! let root = parse_stylesheet("a { color: red; }  b{}").unwrap();
//! assert_eq!(root.nodes.len(), 2);
//! assert_eq!(root.to_css(), "a { color: red; } b {}");
//! ```

pub mod error;
pub mod node;
pub mod parser;
pub mod printer;

pub use error::SheetError;
pub use node::{AtRule, Comment, Declaration, Node, Position, Root, Rule};
pub use parser::parse_stylesheet;
pub use parser::scan::split_selectors;
