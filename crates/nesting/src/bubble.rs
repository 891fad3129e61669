//! Grouping at-rule bubbling.
//!
//! When a grouping at-rule such as `@media` sits inside a rule, the rule's
//! selector has to move inward before the at-rule can be lifted out:
//!
//! ```css
//! a { @media screen { color: red; b { top: 0 } } }
//! ```
//!
//! becomes, inside the still-nested `@media`,
//!
//! ```css
//! @media screen { a { color: red; } a b { top: 0; } }
//! ```
//!
//! The rewriter then relocates the at-rule after the rule.

use sheet::{AtRule, Node, Rule};

use crate::error::NestingError;
use crate::merge::merge_rule_selectors;
use crate::processor::Nesting;

impl Nesting {
    /// Pushes `context`'s selector into the body of `at_rule`.
    ///
    /// With `bubbling` set, loose children (declarations, comments and other
    /// at-rules) are gathered in order into a copy of `context` placed first
    /// in the body, and, with `merge` also set, nested rules get their
    /// selectors merged with `context`. Nested bubbling at-rules are always
    /// bubbled and merged. Without `bubbling` the body is left as it is.
    ///
    /// A directive body that is not merged keeps its non-bubbling block
    /// at-rules in place instead of wrapping them in the context rule.
    pub(crate) fn bubble(
        &self,
        context: &Rule,
        at_rule: &mut AtRule,
        bubbling: bool,
        merge: bool,
    ) -> Result<(), NestingError> {
        if !at_rule.has_block() {
            return Ok(());
        }
        let keeps_blocks = !merge && self.names.is_root_rule(&at_rule.name);

        let mut body = Vec::new();
        let mut loose = Vec::new();
        for mut child in at_rule.take_nodes() {
            let stays = match &mut child {
                Node::Rule(rule) => {
                    if bubbling && merge {
                        let merged = merge_rule_selectors(context, rule)?;
                        rule.set_selectors(merged);
                    }
                    true
                }
                Node::AtRule(nested) if nested.has_block() => {
                    if self.names.bubbles(&nested.name) {
                        self.bubble(context, nested, true, true)?;
                        true
                    } else {
                        keeps_blocks
                    }
                }
                Node::AtRule(_) | Node::Declaration(_) | Node::Comment(_) => false,
            };

            if stays || !bubbling {
                body.push(child);
            } else {
                loose.push(child);
            }
        }

        if !loose.is_empty() {
            let mut scoped = context.clone_empty();
            scoped.nodes = loose;
            body.insert(0, Node::Rule(scoped));
        }
        at_rule.nodes = Some(body);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::NestingOptions;

    fn at_rule(source: &str) -> AtRule {
        let root = sheet::parse_stylesheet(source).unwrap();
        match root.nodes.into_iter().next() {
            Some(Node::AtRule(at_rule)) => at_rule,
            other => panic!("expected an at-rule, got {other:?}"),
        }
    }

    fn bubbled(source: &str, bubbling: bool, merge: bool) -> String {
        let nesting = Nesting::new(&NestingOptions::default());
        let mut at_rule = at_rule(source);
        nesting
            .bubble(&Rule::new("a"), &mut at_rule, bubbling, merge)
            .unwrap();
        at_rule.to_string()
    }

    #[test]
    fn test_declarations_are_scoped_under_context() {
        assert_eq!(
            bubbled("@media x { color: red; b { top: 0 } /*c*/ }", true, true),
            "@media x { a { color: red; /*c*/ } a b { top: 0; } }"
        );
    }

    #[test]
    fn test_nested_bubbling_at_rules_compose() {
        assert_eq!(
            bubbled("@media x { @supports (y: 1) { z: 1; b {} } }", true, true),
            "@media x { @supports (y: 1) { a { z: 1; } a b {} } }"
        );
    }

    #[test]
    fn test_without_bubbling_body_is_untouched() {
        assert_eq!(
            bubbled("@keyframes k { to { color: black } }", false, false),
            "@keyframes k { to { color: black; } }"
        );
    }

    #[test]
    fn test_bubbling_without_merge_keeps_rule_selectors() {
        assert_eq!(
            bubbled("@media x { color: red; b {} }", true, false),
            "@media x { a { color: red; } b {} }"
        );
    }

    #[test]
    fn test_unmerged_directive_keeps_block_at_rules() {
        assert_eq!(
            bubbled("@at-root { @font-face { src: x } b {} }", true, false),
            "@at-root { @font-face { src: x; } b {} }"
        );
        assert_eq!(
            bubbled("@at-root (with: all) { @font-face { src: x } }", true, true),
            "@at-root (with: all) { a { @font-face { src: x; } } }"
        );
    }

    #[test]
    fn test_nested_bubbling_at_rule_merges_without_outer_merge() {
        assert_eq!(
            bubbled("@at-root { @media x { b {} } }", true, false),
            "@at-root { @media x { a b {} } }"
        );
    }

    #[test]
    fn test_statement_at_rule_is_ignored() {
        assert_eq!(bubbled("@media print;", true, true), "@media print;");
    }
}
