//! The `@at-root` escape directive.
//!
//! ```css
//! .parent { @at-root .child { color: red } }
//! /* .child { color: red; } */
//!
//! @media x { a { color: red; @at-root (without: media) { b {} } } }
//! /* @media x { a { color: red; } } a b {} */
//! ```
//!
//! Resolution happens in two phases. While rules are rewritten, a directive
//! found directly in a rule is bubbled against that rule; plain directives
//! release their content on the spot, while `(with: ...)`/`(without: ...)`
//! directives move out of the rule whole. Once every rule is rewritten and
//! the ancestor chains are final, [`Nesting::resolve_root_rules`] walks the
//! tree and lifts each remaining directive's content past the at-rules it
//! escapes.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, multispace0},
    combinator::all_consuming,
    multi::many1,
    sequence::{delimited, pair, separated_pair, terminated},
};
use sheet::{AtRule, Node, Root, Rule};

use crate::error::{Location, NestingError};
use crate::options::AtRuleNames;
use crate::processor::{Context, Nesting};
use crate::rewrite::Cursor;

/// Which ancestor at-rules a `(with: ...)`/`(without: ...)` directive escapes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EscapeRule {
    /// Every ancestor.
    All,
    /// `(with: names)`: only the named ancestors. The literal name `all` is
    /// never matched.
    With(Vec<String>),
    /// `(without: names)`: the named ancestors.
    Without(Vec<String>),
}

impl EscapeRule {
    pub fn escapes(&self, name: &str) -> bool {
        match self {
            EscapeRule::All => true,
            EscapeRule::With(names) => name != "all" && names.iter().any(|n| n == name),
            EscapeRule::Without(names) => names.iter().any(|n| n == name),
        }
    }
}

/// Parsed directive parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EscapeDirective {
    /// `@at-root` or `@at-root <selector>`.
    Basic { selector: String },
    /// `@at-root (with: ...)` or `@at-root (without: ...)`.
    WithRules(EscapeRule),
    /// `@at-root (with: all ...)`: escapes nothing.
    Noop,
    /// A parenthesized parameter of no known form.
    Unknown,
}

/// `( with|without : name name ... )`
fn rule_list(input: &str) -> IResult<&str, (&str, Vec<&str>)> {
    delimited(
        pair(char('('), multispace0),
        separated_pair(
            alt((tag("without"), tag("with"))),
            delimited(multispace0, char(':'), multispace0),
            many1(terminated(
                take_while1(|c: char| !c.is_whitespace() && c != ')'),
                multispace0,
            )),
        ),
        char(')'),
    )(input)
}

impl EscapeDirective {
    /// Classifies the directive's raw parameter text.
    ///
    /// ```rust
    /// use nesting::{EscapeDirective, EscapeRule};
    ///
    /// assert_eq!(
    ///     EscapeDirective::parse(" .x "),
    ///     EscapeDirective::Basic { selector: ".x".into() }
    /// );
    /// assert_eq!(EscapeDirective::parse("(with: all)"), EscapeDirective::Noop);
    /// assert_eq!(
    ///     EscapeDirective::parse("(without: media)"),
    ///     EscapeDirective::WithRules(EscapeRule::Without(vec!["media".into()]))
    /// );
    /// assert_eq!(EscapeDirective::parse("(foo: bar)"), EscapeDirective::Unknown);
    /// ```
    pub fn parse(params: &str) -> Self {
        let params = params.trim();
        if !(params.starts_with('(') && params.ends_with(')')) {
            return EscapeDirective::Basic {
                selector: params.to_string(),
            };
        }

        let Ok((_, (kind, names))) = all_consuming(rule_list)(params) else {
            return EscapeDirective::Unknown;
        };
        let names: Vec<String> = names.into_iter().map(str::to_string).collect();
        let allowlist = kind == "with";
        let has_all = names.iter().any(|name| name == "all");

        match (allowlist, has_all) {
            (true, true) => EscapeDirective::Noop,
            (false, true) => EscapeDirective::WithRules(EscapeRule::All),
            (true, false) => EscapeDirective::WithRules(EscapeRule::With(names)),
            (false, false) => EscapeDirective::WithRules(EscapeRule::Without(names)),
        }
    }

    /// Whether rules inside the directive merge with the enclosing rule's
    /// selector. Content escaping the enclosing rule itself does not.
    pub fn merges_selectors(&self) -> bool {
        match self {
            EscapeDirective::Basic { .. } | EscapeDirective::Unknown => false,
            EscapeDirective::Noop => true,
            EscapeDirective::WithRules(rule) => !rule.escapes("all"),
        }
    }
}

/// Parses a directive's parameters and rejects unknown ones.
///
/// A basic directive with a selector has its children wrapped in a rule with
/// that selector, and its parameters cleared.
pub(crate) fn normalize_directive(directive: &mut AtRule) -> Result<EscapeDirective, NestingError> {
    let kind = EscapeDirective::parse(&directive.params);
    match &kind {
        EscapeDirective::Unknown => {
            return Err(NestingError::UnknownEscapeParameter {
                location: Location(directive.source),
                name: directive.name.clone(),
                params: directive.params.clone(),
            });
        }
        EscapeDirective::Basic { selector } if !selector.is_empty() => {
            let mut rule = Rule::new(selector).at(directive.source);
            rule.nodes = directive.take_nodes();
            directive.nodes = Some(vec![Node::Rule(rule)]);
            directive.params.clear();
        }
        _ => {}
    }
    Ok(kind)
}

/// Index path of the first directive in document order.
fn find_directive(nodes: &[Node], names: &AtRuleNames) -> Option<Vec<usize>> {
    for (i, node) in nodes.iter().enumerate() {
        if let Node::AtRule(at_rule) = node {
            if names.is_root_rule(&at_rule.name) {
                return Some(vec![i]);
            }
        }
        if let Some(mut path) = node.children().and_then(|c| find_directive(c, names)) {
            path.insert(0, i);
            return Some(path);
        }
    }
    None
}

/// Empty copies of the at-rules enclosing the container at `parent_path`,
/// innermost first. Stops at the first ancestor that is not an at-rule.
fn lineage(root: &Root, parent_path: &[usize]) -> Vec<AtRule> {
    (1..=parent_path.len())
        .rev()
        .map_while(|depth| match root.node_at(&parent_path[..depth]) {
            Some(Node::AtRule(at_rule)) => Some(at_rule.clone_empty()),
            _ => None,
        })
        .collect()
}

fn missing(path: &[usize]) -> NestingError {
    NestingError::internal(format!("no container at {path:?}"))
}

impl Nesting {
    /// Handles a directive found directly inside a rule.
    pub(crate) fn escape_from_rule(
        &self,
        mut directive: AtRule,
        cursor: &mut Cursor,
        ctx: &mut Context,
    ) -> Result<(), NestingError> {
        let kind = normalize_directive(&mut directive)?;
        ctx.pending_root_resolution = true;

        self.bubble(&cursor.context, &mut directive, true, kind.merges_selectors())?;

        if let EscapeDirective::WithRules(_) = kind {
            log::trace!(
                "moving @{} {} out of {:?}",
                directive.name,
                directive.params,
                cursor.context.selector()
            );
            cursor.relocate(Node::AtRule(directive));
        } else {
            log::trace!(
                "hoisting @{} content out of {:?}",
                directive.name,
                cursor.context.selector()
            );
            cursor.splice(directive.take_nodes());
        }
        Ok(())
    }

    /// Resolves every directive left in the tree, in document order.
    pub(crate) fn resolve_root_rules(&self, root: &mut Root) -> Result<(), NestingError> {
        log::debug!("resolving @{} directives", self.names.root_rule());
        while let Some(path) = find_directive(&root.nodes, &self.names) {
            self.unwrap_root_rule(root, &path)?;
        }
        Ok(())
    }

    fn unwrap_root_rule(&self, root: &mut Root, path: &[usize]) -> Result<(), NestingError> {
        let Some((&index, parent_path)) = path.split_last() else {
            return Err(missing(path));
        };
        let lineage = lineage(root, parent_path);

        let container = root.container_mut(parent_path).ok_or_else(|| missing(parent_path))?;
        let mut directive = match container.remove(index) {
            Node::AtRule(directive) => directive,
            other => {
                return Err(NestingError::internal(format!(
                    "expected a directive at {path:?}, found {other:?}"
                )));
            }
        };
        let content = directive.take_nodes();

        match EscapeDirective::parse(&directive.params) {
            EscapeDirective::Basic { .. } | EscapeDirective::Noop => {
                log::trace!("unwrapping @{} in place", directive.name);
                container.splice(index..index, content);
                Ok(())
            }
            EscapeDirective::WithRules(rule) => {
                break_out(root, parent_path, index, &lineage, &rule, content)
            }
            EscapeDirective::Unknown => Err(NestingError::internal(format!(
                "unresolved @{} parameter {:?}",
                directive.name, directive.params
            ))),
        }
    }
}

/// Moves `content`, taken from index `index` of the container at
/// `parent_path`, past the outermost ancestor that `rule` escapes.
///
/// Ancestors below that one which are not escaped are rebuilt around the
/// content. Siblings that followed the directive move into a copy of the
/// chain up to the escaped ancestor, placed after the content, so source
/// order is kept.
fn break_out(
    root: &mut Root,
    parent_path: &[usize],
    index: usize,
    lineage: &[AtRule],
    rule: &EscapeRule,
    content: Vec<Node>,
) -> Result<(), NestingError> {
    let Some(top) = lineage.iter().rposition(|ancestor| rule.escapes(&ancestor.name)) else {
        log::trace!("no ancestor escaped at {parent_path:?}");
        let container = root.container_mut(parent_path).ok_or_else(|| missing(parent_path))?;
        container.splice(index..index, content);
        return Ok(());
    };
    let depth = parent_path.len();

    let mut placed = content;
    for ancestor in lineage[..top].iter().filter(|a| !rule.escapes(&a.name)) {
        let mut shell = ancestor.clone();
        shell.nodes = Some(placed);
        placed = vec![Node::AtRule(shell)];
    }

    let mut rest: Option<AtRule> = None;
    for (level, ancestor) in lineage[..=top].iter().enumerate() {
        let level_path = &parent_path[..depth - level];
        let start = match level {
            0 => index,
            _ => parent_path[depth - level] + 1,
        };
        let container = root.container_mut(level_path).ok_or_else(|| missing(level_path))?;
        let siblings = if start < container.len() {
            container.split_off(start)
        } else {
            Vec::new()
        };

        let mut shell = ancestor.clone();
        if let Some(inner) = rest.take() {
            shell.append(Node::AtRule(inner));
        }
        shell.nodes.get_or_insert_with(Vec::new).extend(siblings);
        if shell.nodes.as_ref().is_some_and(|nodes| !nodes.is_empty()) {
            rest = Some(shell);
        }
    }

    let top_path = &parent_path[..depth - top];
    let Some((&top_index, outer_path)) = top_path.split_last() else {
        return Err(missing(top_path));
    };
    log::trace!(
        "escaping past @{} at {top_path:?}, {} ancestor(s) rebuilt",
        lineage[top].name,
        lineage[..top].iter().filter(|a| !rule.escapes(&a.name)).count()
    );

    let container = root.container_mut(outer_path).ok_or_else(|| missing(outer_path))?;
    let at = top_index + 1;
    container.splice(at..at, placed.into_iter().chain(rest.map(Node::AtRule)));
    Ok(())
}
