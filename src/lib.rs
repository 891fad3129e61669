//! # nestcss
//!
//! Resolves SCSS-style nested rules into flat CSS.
//!
//! This crate ties together [`sheet`] (stylesheet tree, parser and printer)
//! and [`nesting`] (the transform). Use [`process_css`] for text in, text
//! out, or the two crates directly to work on a tree.
//!
//! ```rust
//! use nestcss::{NestingOptions, process_css};
//!
//! let css = process_css(
//!     ".card { color: red; &:hover { color: blue } @media print { color: black } }",
//!     &NestingOptions::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(
//!     css,
//!     ".card { color: red; } .card:hover { color: blue; } @media print { .card { color: black; } }"
//! );
//! ```
//!
//! ## Logging
//!
//! The transform reports what it moves through the `log` facade. Install
//! any logger, or [`log_init::init_logger`] to append records to a file.

pub mod error;
pub mod log_init;

pub use error::{NestcssError, Result};
pub use nesting::{Nesting, NestingError, NestingOptions};
pub use sheet::{Root, SheetError, parse_stylesheet};

/// Parses `source`, flattens its nested rules and prints the result.
pub fn process_css(source: &str, options: &NestingOptions) -> Result<String> {
    let mut root = parse_stylesheet(source)?;
    log::debug!("parsed {} top-level node(s)", root.nodes.len());

    Nesting::new(options).process(&mut root)?;
    Ok(root.to_css())
}
