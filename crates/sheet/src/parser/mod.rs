//! Stylesheet parsing.
//!
//! [`parse_stylesheet`] turns CSS source (including SCSS-style nested rules)
//! into a [`Root`]. The parser is tolerant in the same way most CSS tools
//! are: it does not validate values and keeps selectors and at-rule params as
//! raw text.
//!
//! ## Item Classification
//!
//! Inside the stylesheet or any block:
//!
//! - `/* ... */` is a [`Comment`]
//! - `@name params { ... }` or `@name params;` is an [`AtRule`]
//! - text followed by `{` is a [`Rule`]
//! - text followed by `;` or `}` is a [`Declaration`]
//!
//! A forgotten semicolon before a nested block (`color: black @mixin b { }`)
//! therefore yields a rule whose selector contains a colon; the nesting pass
//! reports it as a missed semicolon.
//!
//! ## Example
//!
//! ```rust
//! use sheet::{parse_stylesheet, Node};
//!
//! let root = parse_stylesheet("a { color: red; b { top: 0 } }").unwrap();
//! let Node::Rule(rule) = &root.nodes[0] else { panic!("expected a rule") };
//!
//! assert_eq!(rule.selector(), "a");
//! assert_eq!(rule.nodes.len(), 2);
//! ```

pub mod scan;

use crate::error::SheetError;
use crate::node::{AtRule, Comment, Declaration, Node, Position, Root, Rule};
use crate::parser::scan::{prelude, split_selectors};

use nom::{
    IResult,
    bytes::complete::{tag, take_until, take_while1},
    character::complete::char,
    error::ErrorKind,
    sequence::{delimited, preceded},
};

/// Parses a full stylesheet.
pub fn parse_stylesheet(source: &str) -> Result<Root, SheetError> {
    let parser = Parser { source };
    let (rest, nodes) = parser.items(source, false)?;
    debug_assert!(rest.is_empty());
    Ok(Root::new(nodes))
}

/// Returns true for characters allowed in at-rule names.
fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn block_comment(input: &str) -> IResult<&str, &str> {
    delimited(tag("/*"), take_until("*/"), tag("*/"))(input)
}

fn at_keyword(input: &str) -> IResult<&str, &str> {
    preceded(char('@'), take_while1(is_name_char))(input)
}

struct Parser<'s> {
    source: &'s str,
}

impl<'s> Parser<'s> {
    /// Position of `rest`, which must be a suffix of the source.
    fn position(&self, rest: &str) -> Position {
        Position::at_offset(self.source, self.source.len() - rest.len())
    }

    /// Parses items until end of input or, when `nested`, an unconsumed `}`.
    fn items(&self, mut input: &'s str, nested: bool) -> Result<(&'s str, Vec<Node>), SheetError> {
        let mut nodes = Vec::new();

        loop {
            input = input.trim_start();

            if input.is_empty() {
                return Ok((input, nodes));
            }
            if input.starts_with('}') {
                if nested {
                    return Ok((input, nodes));
                }
                return Err(SheetError::UnexpectedBrace {
                    position: self.position(input),
                });
            }
            if let Some(rest) = input.strip_prefix(';') {
                input = rest;
                continue;
            }

            let (rest, node) = if input.starts_with("/*") {
                self.comment(input)?
            } else if input.starts_with('@') {
                self.at_rule(input)?
            } else {
                self.rule_or_declaration(input)?
            };
            nodes.push(node);
            input = rest;
        }
    }

    fn comment(&self, input: &'s str) -> Result<(&'s str, Node), SheetError> {
        let position = self.position(input);
        let (rest, text) = block_comment(input).map_err(|_| SheetError::Unclosed {
            what: "comment",
            position,
        })?;
        let comment = Comment {
            text: text.to_string(),
            source: Some(position),
        };
        Ok((rest, Node::Comment(comment)))
    }

    fn at_rule(&self, input: &'s str) -> Result<(&'s str, Node), SheetError> {
        let position = self.position(input);
        let (rest, name) = at_keyword(input).map_err(|_| SheetError::UnknownWord {
            word: "@".to_string(),
            position,
        })?;
        let (rest, params) = self.prelude(rest)?;

        let mut at_rule = AtRule::statement(name, params.trim()).at(Some(position));
        let rest = match rest.chars().next() {
            Some('{') => {
                let (rest, children) = self.block(&rest[1..], "at-rule", position)?;
                at_rule.nodes = Some(children);
                rest
            }
            Some(';') => &rest[1..],
            _ => rest,
        };
        Ok((rest, Node::AtRule(at_rule)))
    }

    fn rule_or_declaration(&self, input: &'s str) -> Result<(&'s str, Node), SheetError> {
        let position = self.position(input);
        let (rest, text) = self.prelude(input)?;

        if let Some(body) = rest.strip_prefix('{') {
            let (rest, children) = self.block(body, "block", position)?;
            let rule = Rule {
                selectors: split_selectors(text.trim()),
                nodes: children,
                source: Some(position),
            };
            return Ok((rest, Node::Rule(rule)));
        }

        let text = text.trim();
        let Some((prop, value)) = text.split_once(':') else {
            let word = text.split_whitespace().next().unwrap_or(text);
            return Err(SheetError::UnknownWord {
                word: word.to_string(),
                position,
            });
        };
        let decl = Declaration {
            prop: prop.trim().to_string(),
            value: value.trim().to_string(),
            source: Some(position),
        };
        let rest = rest.strip_prefix(';').unwrap_or(rest);
        Ok((rest, Node::Declaration(decl)))
    }

    /// Parses block contents after `{` and consumes the closing `}`.
    fn block(
        &self,
        input: &'s str,
        what: &'static str,
        opened_at: Position,
    ) -> Result<(&'s str, Vec<Node>), SheetError> {
        let (rest, children) = self.items(input, true)?;
        match rest.strip_prefix('}') {
            Some(rest) => Ok((rest, children)),
            None => Err(SheetError::Unclosed {
                what,
                position: opened_at,
            }),
        }
    }

    fn prelude(&self, input: &'s str) -> Result<(&'s str, &'s str), SheetError> {
        prelude(input).map_err(|err| match err {
            nom::Err::Error(e) | nom::Err::Failure(e) => SheetError::Unclosed {
                what: if e.code == ErrorKind::TakeUntil {
                    "comment"
                } else {
                    "string"
                },
                position: self.position(e.input),
            },
            nom::Err::Incomplete(_) => SheetError::Unclosed {
                what: "input",
                position: self.position(""),
            },
        })
    }
}
