//! # Nesting - Nested Rule Resolution
//!
//! Flattens SCSS-style nested rules in a [`sheet`] tree into plain CSS rules,
//! in place:
//!
//! - **Selector merging**: child selectors are combined with their parent's,
//!   substituting `&` anywhere in the child (including inside `:not(...)` and
//!   friends) or joining with a descendant combinator otherwise
//! - **Bubbling**: `@media`, `@supports` and other grouping at-rules move out
//!   of rules, taking the rule's selector inside with them
//! - **Unwrapping**: `@keyframes`, `@font-face` and similar at-rules move to
//!   the top level as they are
//! - **`@at-root`**: hoists content out of its rule, optionally past chosen
//!   ancestor at-rules with `(with: ...)` or `(without: ...)`
//!
//! Declarations keep their order relative to nested blocks: those written
//! after a nested rule end up in a copy of the parent rule placed after it.
//!
//! ## Quick Start
//!
//! ```rust
//! use nesting::{Nesting, NestingOptions};
//!
//! let mut root = sheet::parse_stylesheet(
//!     "a { color: white; b { c: 1 } @media print { top: 0 } }",
//! ).unwrap();
//!
//! Nesting::new(&NestingOptions::default()).process(&mut root).unwrap();
//!
//! assert_eq!(
//!     root.to_css(),
//!     "a { color: white; } a b { c: 1; } @media print { a { top: 0; } }"
//! );
//! ```
//!
//! ## Modules
//!
//! - [`selector`]: selector model and parser
//! - [`merge`]: parent/child selector merging
//! - [`options`]: configuration
//! - [`error`]: error types

mod at_root;
mod bubble;
pub mod error;
pub mod merge;
pub mod options;
mod processor;
mod rewrite;
pub mod selector;

pub use at_root::{EscapeDirective, EscapeRule};
pub use error::{Location, NestingError};
pub use merge::{MergeError, merge_rule_selectors, merge_selectors};
pub use options::{AtRuleNames, NestingOptions};
pub use processor::Nesting;
pub use selector::{Component, Selector, SelectorError};
