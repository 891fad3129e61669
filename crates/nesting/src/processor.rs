//! Tree driver.
//!
//! [`Nesting::process`] visits every rule in the tree in document order and
//! rewrites it. Nodes a rewrite moves out land right after the rule in the
//! same container, so the walk reaches them next and nested rules get
//! unwrapped level by level. When the walk is done, any escape directives
//! still in the tree are resolved in one more pass.

use sheet::{Node, Root};

use crate::at_root::normalize_directive;
use crate::error::NestingError;
use crate::options::{AtRuleNames, NestingOptions};

/// State for one call to [`Nesting::process`].
#[derive(Debug, Default)]
pub(crate) struct Context {
    /// Set once any escape directive has been seen.
    pub pending_root_resolution: bool,
}

/// The nesting transform.
///
/// Configuration is resolved once; a `Nesting` holds no per-tree state and
/// can process any number of trees.
///
/// # Example
///
/// ```rust
/// use nesting::{Nesting, NestingOptions};
///
/// let nesting = Nesting::new(&NestingOptions::default());
/// let mut root = sheet::parse_stylesheet(".one, .two { &:hover { color: red } }").unwrap();
/// nesting.process(&mut root).unwrap();
///
/// assert_eq!(root.to_css(), ".one:hover, .two:hover { color: red; }");
/// ```
#[derive(Clone, Debug)]
pub struct Nesting {
    pub(crate) names: AtRuleNames,
    pub(crate) preserve_empty: bool,
}

impl Default for Nesting {
    fn default() -> Self {
        Self::new(&NestingOptions::default())
    }
}

impl Nesting {
    pub fn new(options: &NestingOptions) -> Self {
        Self {
            names: AtRuleNames::from_options(options),
            preserve_empty: options.preserve_empty,
        }
    }

    pub fn names(&self) -> &AtRuleNames {
        &self.names
    }

    /// Flattens every nested rule in `root`.
    ///
    /// On error the tree is left partially rewritten and should be
    /// discarded.
    pub fn process(&self, root: &mut Root) -> Result<(), NestingError> {
        let mut ctx = Context::default();
        self.walk(&mut root.nodes, &mut ctx)?;

        if ctx.pending_root_resolution {
            self.resolve_root_rules(root)?;
        }
        Ok(())
    }

    fn walk(&self, nodes: &mut Vec<Node>, ctx: &mut Context) -> Result<(), NestingError> {
        let mut i = 0;
        while i < nodes.len() {
            match &mut nodes[i] {
                Node::Rule(rule) => {
                    let rewritten = self.rewrite_rule(rule, ctx)?;
                    if rewritten.keeps_rule {
                        self.walk(&mut rule.nodes, ctx)?;
                        nodes.splice(i + 1..i + 1, rewritten.emitted);
                        i += 1;
                    } else {
                        nodes.splice(i..=i, rewritten.emitted);
                    }
                }
                Node::AtRule(at_rule) => {
                    if self.names.is_root_rule(&at_rule.name) {
                        normalize_directive(at_rule)?;
                        ctx.pending_root_resolution = true;
                    }
                    if let Some(children) = at_rule.nodes.as_mut() {
                        self.walk(children, ctx)?;
                    }
                    i += 1;
                }
                Node::Declaration(_) | Node::Comment(_) => i += 1,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn process(source: &str) -> String {
        let mut root = sheet::parse_stylesheet(source).unwrap();
        Nesting::default().process(&mut root).unwrap();
        root.to_css()
    }

    #[test]
    fn test_relocated_rules_are_visited_again() {
        assert_eq!(
            process("a { b { c { d { top: 0 } } } }"),
            "a b c d { top: 0; }"
        );
    }

    #[test]
    fn test_rules_inside_at_rules_are_visited() {
        assert_eq!(
            process("@media x { a { b {} } } @page { c { d {} } }"),
            "@media x { a b {} } @page { c d {} }"
        );
    }

    #[test]
    fn test_flag_is_per_call() {
        let nesting = Nesting::default();
        let mut first = sheet::parse_stylesheet("a { @at-root { b {} } }").unwrap();
        nesting.process(&mut first).unwrap();
        let mut second = sheet::parse_stylesheet("c { d {} }").unwrap();
        nesting.process(&mut second).unwrap();
        assert_eq!(first.to_css(), "b {}");
        assert_eq!(second.to_css(), "c d {}");
    }
}
