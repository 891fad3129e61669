//! Selector merging.
//!
//! Combines a parent selector list with a child selector list the way SCSS
//! does. Every `&` in the child is replaced by the parent selector; a child
//! without any `&` is appended to the parent as a descendant.
//!
//! | Parent      | Child          | Result              |
//! |-------------|----------------|---------------------|
//! | `a`         | `b`            | `a b`               |
//! | `a`         | `&:hover`      | `a:hover`           |
//! | `.block`    | `&_elem`       | `.block_elem`       |
//! | `.a`        | `&:not(&.no)`  | `.a:not(.a.no)`     |
//! | `a`         | `> b`          | `a > b`             |
//! | `a, b`      | `.x, .y`       | `a .x, a .y, b .x, b .y` |

use sheet::Rule;
use thiserror::Error;

use crate::error::NestingError;
use crate::selector::{
    Combinator, Component, NESTING_TOKEN, Selector, SelectorError, parse_selector,
};

/// A selector that failed to parse during merging, tagged with the side it
/// came from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    #[error("parent selector {selector:?}: {source}")]
    Parent {
        selector: String,
        source: SelectorError,
    },
    #[error("child selector {selector:?}: {source}")]
    Child {
        selector: String,
        source: SelectorError,
    },
}

/// Merges every parent selector with every child selector.
///
/// The result is ordered parent-major: all children merged with the first
/// parent, then all children merged with the second, and so on. Empty entries
/// (from a trailing comma) are skipped on both sides.
///
/// ```rust
/// use nesting::merge_selectors;
///
/// let parents = vec!["a".to_string(), "b".to_string()];
/// let children = vec![".one".to_string(), "&:hover".to_string()];
///
/// assert_eq!(
///     merge_selectors(&parents, &children).unwrap(),
///     vec!["a .one", "a:hover", "b .one", "b:hover"]
/// );
/// ```
pub fn merge_selectors(parents: &[String], children: &[String]) -> Result<Vec<String>, MergeError> {
    let mut merged = Vec::with_capacity(parents.len() * children.len());

    for raw_parent in parents.iter().filter(|s| !s.is_empty()) {
        let parent = parse_selector(raw_parent).map_err(|source| MergeError::Parent {
            selector: raw_parent.clone(),
            source,
        })?;

        for raw_child in children.iter().filter(|s| !s.is_empty()) {
            let child_error = |source| MergeError::Child {
                selector: raw_child.clone(),
                source,
            };
            let mut child = parse_selector(raw_child).map_err(child_error)?;

            if !interpolate(&mut child, &parent).map_err(child_error)? {
                let mut components = parent.components.clone();
                if !child.starts_with_combinator() {
                    components.push(Component::Combinator(Combinator::Descendant));
                }
                components.append(&mut child.components);
                child.components = components;
            }

            let result = child.to_string();
            log::trace!("merged {raw_parent:?} with {raw_child:?} into {result:?}");
            merged.push(result);
        }
    }

    Ok(merged)
}

/// Replaces every nesting placeholder in `child` with `parent`.
///
/// A bare `&` takes the parent's components as they are. A placeholder with
/// attached text (`&_elem`) is substituted textually and the result is parsed
/// again, so `.block` + `&_elem` becomes the single class `.block_elem`.
///
/// Returns whether anything was replaced.
fn interpolate(child: &mut Selector, parent: &Selector) -> Result<bool, SelectorError> {
    let mut replaced = false;
    let parent_text = parent.to_string();

    child.try_replace(&mut |component| {
        let Component::Nesting(raw) = component else {
            return Ok(None);
        };
        replaced = true;
        if raw.len() == NESTING_TOKEN.len_utf8() {
            return Ok(Some(parent.components.clone()));
        }
        let text = raw.replacen(NESTING_TOKEN, &parent_text, 1);
        parse_selector(&text).map(|selector| Some(selector.components))
    })?;

    Ok(replaced)
}

/// Merges the selectors of a nested rule with those of its parent.
///
/// Parse failures are reported at the position of whichever rule holds the
/// broken selector.
pub fn merge_rule_selectors(parent: &Rule, child: &Rule) -> Result<Vec<String>, NestingError> {
    merge_selectors(&parent.selectors, &child.selectors).map_err(|err| match err {
        MergeError::Parent { selector, source } => {
            NestingError::selector(&selector, source, parent.source)
        }
        MergeError::Child { selector, source } => {
            NestingError::selector(&selector, source, child.source)
        }
    })
}
