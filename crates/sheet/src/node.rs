//! Style-sheet tree.
//!
//! A parsed stylesheet is a [`Root`] holding an ordered list of [`Node`]s.
//! Rules and block at-rules own their children; every node has exactly one
//! owner, so moving a node between containers is a plain `Vec` move.
//!
//! ```rust
//! use sheet::{Node, Rule, Declaration};
//!
//! let mut rule = Rule::new("a, b");
//! rule.append(Node::Declaration(Declaration::new("color", "red")));
//!
//! assert_eq!(rule.selectors, vec!["a", "b"]);
//! assert_eq!(rule.selector(), "a, b");
//! ```

use crate::parser::scan::split_selectors;

/// Start of a node in the source text, 1-based.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Computes the position of byte `offset` inside `source`.
    pub fn at_offset(source: &str, offset: usize) -> Self {
        let before = &source[..offset.min(source.len())];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() + 1;
        Self { line, column }
    }
}

/// A node of the stylesheet tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Rule(Rule),
    AtRule(AtRule),
    Declaration(Declaration),
    Comment(Comment),
}

impl Node {
    /// Child nodes, if this node is a container.
    pub fn children(&self) -> Option<&Vec<Node>> {
        match self {
            Node::Rule(rule) => Some(&rule.nodes),
            Node::AtRule(at_rule) => at_rule.nodes.as_ref(),
            Node::Declaration(_) | Node::Comment(_) => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Rule(rule) => Some(&mut rule.nodes),
            Node::AtRule(at_rule) => at_rule.nodes.as_mut(),
            Node::Declaration(_) | Node::Comment(_) => None,
        }
    }

    pub fn source(&self) -> Option<Position> {
        match self {
            Node::Rule(rule) => rule.source,
            Node::AtRule(at_rule) => at_rule.source,
            Node::Declaration(decl) => decl.source,
            Node::Comment(comment) => comment.source,
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Node::Comment(_))
    }

    pub fn as_rule(&self) -> Option<&Rule> {
        match self {
            Node::Rule(rule) => Some(rule),
            _ => None,
        }
    }

    pub fn as_at_rule(&self) -> Option<&AtRule> {
        match self {
            Node::AtRule(at_rule) => Some(at_rule),
            _ => None,
        }
    }
}

/// A style rule: `a, b { ... }`.
#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    /// Comma-separated selector entries, raw and trimmed. An empty entry
    /// comes from a trailing comma.
    pub selectors: Vec<String>,
    pub nodes: Vec<Node>,
    pub source: Option<Position>,
}

impl Rule {
    /// Creates an empty rule from selector text such as `"a, b:hover"`.
    pub fn new(selector: &str) -> Self {
        Self {
            selectors: split_selectors(selector),
            nodes: Vec::new(),
            source: None,
        }
    }

    pub fn with_selectors(selectors: Vec<String>) -> Self {
        Self {
            selectors,
            nodes: Vec::new(),
            source: None,
        }
    }

    pub fn at(mut self, source: Option<Position>) -> Self {
        self.source = source;
        self
    }

    /// The selector list joined back into text.
    pub fn selector(&self) -> String {
        self.selectors.join(", ")
    }

    pub fn set_selectors(&mut self, selectors: Vec<String>) {
        self.selectors = selectors;
    }

    /// Copies selectors and source position, leaving the body empty.
    pub fn clone_empty(&self) -> Self {
        Self {
            selectors: self.selectors.clone(),
            nodes: Vec::new(),
            source: self.source,
        }
    }

    pub fn append(&mut self, node: Node) {
        self.nodes.push(node);
    }
}

/// An at-rule: `@media screen { ... }` or `@import "x.css";`.
#[derive(Clone, Debug, PartialEq)]
pub struct AtRule {
    /// Name without the leading `@`.
    pub name: String,
    pub params: String,
    /// `None` for statement at-rules that end with `;`.
    pub nodes: Option<Vec<Node>>,
    pub source: Option<Position>,
}

impl AtRule {
    /// Creates a block at-rule with an empty body.
    pub fn new(name: &str, params: &str) -> Self {
        Self {
            name: name.to_string(),
            params: params.to_string(),
            nodes: Some(Vec::new()),
            source: None,
        }
    }

    /// Creates a statement at-rule with no body.
    pub fn statement(name: &str, params: &str) -> Self {
        Self {
            name: name.to_string(),
            params: params.to_string(),
            nodes: None,
            source: None,
        }
    }

    pub fn at(mut self, source: Option<Position>) -> Self {
        self.source = source;
        self
    }

    pub fn has_block(&self) -> bool {
        self.nodes.is_some()
    }

    /// Copies name, params and source position with an empty block.
    pub fn clone_empty(&self) -> Self {
        Self {
            name: self.name.clone(),
            params: self.params.clone(),
            nodes: Some(Vec::new()),
            source: self.source,
        }
    }

    /// Appends a child, turning a statement into a block if needed.
    pub fn append(&mut self, node: Node) {
        self.nodes.get_or_insert_with(Vec::new).push(node);
    }

    /// Removes and returns all children.
    pub fn take_nodes(&mut self) -> Vec<Node> {
        self.nodes.as_mut().map(std::mem::take).unwrap_or_default()
    }
}

/// A property declaration: `color: red`.
#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    pub prop: String,
    /// Raw value, including any `!important`.
    pub value: String,
    pub source: Option<Position>,
}

impl Declaration {
    pub fn new(prop: &str, value: &str) -> Self {
        Self {
            prop: prop.to_string(),
            value: value.to_string(),
            source: None,
        }
    }
}

/// A block comment. `text` excludes the `/*` and `*/` delimiters.
#[derive(Clone, Debug, PartialEq)]
pub struct Comment {
    pub text: String,
    pub source: Option<Position>,
}

impl Comment {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            source: None,
        }
    }
}

/// The top of a stylesheet tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Root {
    pub nodes: Vec<Node>,
}

impl Root {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Visits every declaration in document order.
    pub fn walk_declarations<'a>(&'a self, mut visit: impl FnMut(&'a Declaration)) {
        fn walk<'a>(nodes: &'a [Node], visit: &mut impl FnMut(&'a Declaration)) {
            for node in nodes {
                match node {
                    Node::Declaration(decl) => visit(decl),
                    Node::Rule(_) | Node::AtRule(_) => {
                        if let Some(children) = node.children() {
                            walk(children, visit);
                        }
                    }
                    Node::Comment(_) => {}
                }
            }
        }
        walk(&self.nodes, &mut visit);
    }

    /// Looks up a node by its index path from the root: `[2, 0]` is the
    /// first child of the third top-level node.
    pub fn node_at(&self, path: &[usize]) -> Option<&Node> {
        let (&first, rest) = path.split_first()?;
        let mut node = self.nodes.get(first)?;
        for &index in rest {
            node = node.children()?.get(index)?;
        }
        Some(node)
    }

    pub fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let (&first, rest) = path.split_first()?;
        let mut node = self.nodes.get_mut(first)?;
        for &index in rest {
            node = node.children_mut()?.get_mut(index)?;
        }
        Some(node)
    }

    /// The child list of the node at `path`. The empty path names the root's
    /// own list.
    pub fn container_mut(&mut self, path: &[usize]) -> Option<&mut Vec<Node>> {
        if path.is_empty() {
            return Some(&mut self.nodes);
        }
        self.node_at_mut(path)?.children_mut()
    }

    /// Collects every declaration as `(prop, value)` pairs in document order.
    pub fn declarations(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        self.walk_declarations(|decl| out.push((decl.prop.clone(), decl.value.clone())));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_from_offset() {
        let source = "a {\n  color: red;\n}";
        assert_eq!(Position::at_offset(source, 0), Position::new(1, 1));
        assert_eq!(Position::at_offset(source, 6), Position::new(2, 3));
    }

    #[test]
    fn clone_empty_keeps_header_only() {
        let mut rule = Rule::new(".a, .b");
        rule.append(Node::Declaration(Declaration::new("color", "red")));
        let clone = rule.clone_empty();
        assert_eq!(clone.selectors, rule.selectors);
        assert!(clone.nodes.is_empty());

        let mut media = AtRule::new("media", "screen");
        media.append(Node::Rule(rule));
        let shell = media.clone_empty();
        assert_eq!(shell.params, "screen");
        assert_eq!(shell.nodes, Some(Vec::new()));
    }

    #[test]
    fn paths_reach_nested_containers() {
        let mut media = AtRule::new("media", "x");
        let mut rule = Rule::new("a");
        rule.append(Node::Declaration(Declaration::new("color", "red")));
        media.append(Node::Rule(rule));
        let mut root = Root::new(vec![Node::Comment(Comment::new("c")), Node::AtRule(media)]);

        assert!(root.node_at(&[]).is_none());
        assert!(root.node_at(&[1, 0]).and_then(Node::as_rule).is_some());
        assert!(root.node_at(&[1, 0, 0, 0]).is_none());
        assert!(root.node_at(&[0, 0]).is_none());

        assert_eq!(root.container_mut(&[]).map(|nodes| nodes.len()), Some(2));
        let Some(children) = root.container_mut(&[1, 0]) else {
            panic!("expected the rule's children");
        };
        children.clear();
        assert_eq!(root.to_css(), "/*c*/ @media x { a {} }");
    }

    #[test]
    fn append_turns_statement_into_block() {
        let mut at_rule = AtRule::statement("mixin", "test");
        assert!(!at_rule.has_block());
        at_rule.append(Node::Comment(Comment::new("x")));
        assert!(at_rule.has_block());
    }
}
