//! Per-rule rewriting.
//!
//! A rule's direct children are walked once, in order. Nested rules and
//! bubbling, unwrapping or escaping at-rules are moved out of the rule and
//! emitted after it; declarations that follow a moved child are collected and
//! emitted under a copy of the rule at the point where the next child moves
//! out, so their order relative to the moved children never changes:
//!
//! ```css
//! a { a: 1; &b { b: 2 } c: 1; &c { d: 5 } e: 6 }
//! ```
//!
//! becomes
//!
//! ```css
//! a { a: 1; } ab { b: 2; } a { c: 1; } ac { d: 5; } a { e: 6; }
//! ```

use bitflags::bitflags;
use sheet::{Node, Rule};

use crate::error::NestingError;
use crate::merge::merge_rule_selectors;
use crate::options::AtRuleRole;
use crate::processor::{Context, Nesting};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub(crate) struct RewriteState: u8 {
        /// A child has moved out; later declarations must follow it.
        const COPY_DECLARATIONS = 0b01;
        /// The rule lost children and may now be empty.
        const UNWRAPPED         = 0b10;
    }
}

/// Output of rewriting one rule.
#[derive(Debug)]
pub(crate) struct Rewritten {
    /// False when the rule emptied out and should be removed.
    pub keeps_rule: bool,
    /// Nodes to place right after the rule, in order.
    pub emitted: Vec<Node>,
}

/// Insertion point while rewriting a rule.
///
/// The cursor is always the last emitted node, so inserting after it is a
/// push onto `emitted`.
pub(crate) struct Cursor {
    /// Header of the rule being rewritten, used for merging and for the
    /// copies that hold flushed declarations.
    pub context: Rule,
    kept: Vec<Node>,
    pending: Vec<Node>,
    emitted: Vec<Node>,
    state: RewriteState,
}

impl Cursor {
    pub(crate) fn new(context: Rule) -> Self {
        Self {
            context,
            kept: Vec::new(),
            pending: Vec::new(),
            emitted: Vec::new(),
            state: RewriteState::empty(),
        }
    }

    /// Leaves a child in the rule, or queues it once something has moved out.
    pub(crate) fn keep(&mut self, node: Node) {
        if self.state.contains(RewriteState::COPY_DECLARATIONS) {
            self.pending.push(node);
        } else {
            self.kept.push(node);
        }
    }

    /// Moves `node` after the cursor together with the comments directly
    /// before it in the source.
    pub(crate) fn relocate(&mut self, node: Node) {
        let source = if self.state.contains(RewriteState::COPY_DECLARATIONS) {
            &mut self.pending
        } else {
            &mut self.kept
        };
        let comments = take_trailing_comments(source);

        self.flush();
        self.emitted.extend(comments);
        self.emitted.push(node);
        self.state |= RewriteState::COPY_DECLARATIONS | RewriteState::UNWRAPPED;
    }

    /// Places `nodes` after the cursor. The cursor ends on the last of them.
    pub(crate) fn splice(&mut self, nodes: Vec<Node>) {
        self.flush();
        self.emitted.extend(nodes);
        self.state |= RewriteState::COPY_DECLARATIONS | RewriteState::UNWRAPPED;
    }

    /// Emits queued declarations under a copy of the context rule. A queue
    /// holding only comments is emitted bare.
    pub(crate) fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        if self.pending.iter().all(Node::is_comment) {
            self.emitted.append(&mut self.pending);
            return;
        }
        let mut copy = self.context.clone_empty();
        copy.nodes = std::mem::take(&mut self.pending);
        self.emitted.push(Node::Rule(copy));
    }

    fn finish(mut self) -> (Vec<Node>, Vec<Node>, RewriteState) {
        self.flush();
        (self.kept, self.emitted, self.state)
    }
}

/// Splits off the run of comments at the end of `nodes`.
fn take_trailing_comments(nodes: &mut Vec<Node>) -> Vec<Node> {
    let start = nodes
        .iter()
        .rposition(|node| !node.is_comment())
        .map_or(0, |i| i + 1);
    nodes.split_off(start)
}

impl Nesting {
    /// Rewrites one rule in place. What stays in the rule is left in
    /// `rule.nodes`; everything moved out is returned in order.
    pub(crate) fn rewrite_rule(
        &self,
        rule: &mut Rule,
        ctx: &mut Context,
    ) -> Result<Rewritten, NestingError> {
        let mut cursor = Cursor::new(rule.clone_empty());

        for child in std::mem::take(&mut rule.nodes) {
            match child {
                Node::Rule(mut nested) => {
                    let merged = merge_rule_selectors(&cursor.context, &nested)?;
                    nested.set_selectors(merged);
                    cursor.relocate(Node::Rule(nested));
                }
                Node::AtRule(mut at_rule) => match self.names.role(&at_rule.name) {
                    AtRuleRole::Escape => self.escape_from_rule(at_rule, &mut cursor, ctx)?,
                    AtRuleRole::Bubble => {
                        self.bubble(&cursor.context, &mut at_rule, true, true)?;
                        cursor.relocate(Node::AtRule(at_rule));
                    }
                    AtRuleRole::Unwrap => {
                        self.bubble(&cursor.context, &mut at_rule, false, false)?;
                        cursor.relocate(Node::AtRule(at_rule));
                    }
                    AtRuleRole::Other => cursor.keep(Node::AtRule(at_rule)),
                },
                other @ (Node::Declaration(_) | Node::Comment(_)) => cursor.keep(other),
            }
        }

        let (kept, emitted, state) = cursor.finish();
        rule.nodes = kept;

        let keeps_rule =
            self.preserve_empty || !state.contains(RewriteState::UNWRAPPED) || !rule.nodes.is_empty();
        if state.contains(RewriteState::UNWRAPPED) {
            log::debug!(
                "unwrapped {:?}: {} node(s) moved out, rule {}",
                rule.selector(),
                emitted.len(),
                if keeps_rule { "kept" } else { "removed" }
            );
        }

        Ok(Rewritten {
            keeps_rule,
            emitted,
        })
    }
}
