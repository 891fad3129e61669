//! Compact stylesheet printer.
//!
//! Every node renders on one line and siblings are separated by a single
//! space:
//!
//! ```css
//! a { color: red; } @media screen { a b { top: 0; } } @import "x.css";
//! ```

use std::fmt;

use crate::node::{AtRule, Comment, Declaration, Node, Position, Root, Rule};

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Writes `{ child child }`, or `{}` when there are no children.
fn write_block(f: &mut fmt::Formatter<'_>, nodes: &[Node]) -> fmt::Result {
    if nodes.is_empty() {
        return f.write_str("{}");
    }
    f.write_str("{ ")?;
    write_nodes(f, nodes)?;
    f.write_str(" }")
}

fn write_nodes(f: &mut fmt::Formatter<'_>, nodes: &[Node]) -> fmt::Result {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{node}")?;
    }
    Ok(())
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Rule(rule) => rule.fmt(f),
            Node::AtRule(at_rule) => at_rule.fmt(f),
            Node::Declaration(decl) => decl.fmt(f),
            Node::Comment(comment) => comment.fmt(f),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.selector())?;
        write_block(f, &self.nodes)
    }
}

impl fmt::Display for AtRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        if !self.params.is_empty() {
            write!(f, " {}", self.params)?;
        }
        match &self.nodes {
            Some(nodes) => {
                f.write_str(" ")?;
                write_block(f, nodes)
            }
            None => f.write_str(";"),
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {};", self.prop, self.value)
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/*{}*/", self.text)
    }
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_nodes(f, &self.nodes)
    }
}

impl Root {
    /// Renders the whole tree as compact CSS.
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}
