//! Selector parsing.
//!
//! Parses one complex selector (or a comma-separated list, for pseudo-class
//! arguments) into the [`Selector`] model:
//!
//! - Type, universal, class, ID and attribute selectors, with an optional
//!   namespace prefix (`svg|a`, `*|a`)
//! - Pseudo-classes and pseudo-elements, with functional arguments
//! - Combinators: descendant (space), `>`, `+`, `~`, including a leading one
//! - The nesting placeholder `&`, optionally with attached text (`&_elem`)
//! - Comments between selector parts
//!
//! Attribute selectors and parenthesized arguments are scanned with quote
//! awareness, so the `&` in `[title="a & b"]` is never a placeholder.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_until, take_while1},
    character::complete::{anychar, char, multispace0, multispace1},
    combinator::{all_consuming, map, not, opt, recognize},
    error::{Error as ParseError, ErrorKind},
    multi::{many0, many1, separated_list1},
    sequence::{delimited, pair, preceded, terminated},
};
use phf::phf_set;
use thiserror::Error;

use crate::selector::{Combinator, Component, PseudoArgument, Selector};

/// Functional pseudo-classes whose argument is a selector list.
static SELECTOR_PSEUDOS: phf::Set<&'static str> = phf_set! {
    "not", "is", "where", "has", "matches", "any", "-webkit-any", "-moz-any",
    "host", "host-context", "slotted", "global", "local",
    "current", "past", "future",
};

/// Functional pseudo-classes that take `An+B [of <selector-list>]`.
static NTH_OF_PSEUDOS: phf::Set<&'static str> = phf_set! {
    "nth-child", "nth-last-child",
};

/// Errors produced while parsing selector text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("Unexpected '{found}'. Escaping special characters with \\ may help.")]
    Unexpected { found: char, offset: usize },

    #[error("Unexpected end of selector")]
    UnexpectedEnd,

    #[error("Expected a closing bracket for '{delimiter}' at offset {offset}")]
    Unclosed { delimiter: char, offset: usize },

    #[error("Expected a selector")]
    Empty,
}

/// Parses a single complex selector. Surrounding whitespace is ignored.
pub fn parse_selector(text: &str) -> Result<Selector, SelectorError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(SelectorError::Empty);
    }
    let (rest, selector) = complex_selector(text).map_err(|e| to_selector_error(text, e))?;
    match rest.trim_start().chars().next() {
        None => Ok(selector),
        Some(found) => Err(SelectorError::Unexpected {
            found,
            offset: text.len() - rest.trim_start().len(),
        }),
    }
}

/// Parses a comma-separated selector list, such as a pseudo-class argument.
pub fn parse_selector_list(text: &str) -> Result<Vec<Selector>, SelectorError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(SelectorError::Empty);
    }
    all_consuming(selector_list)(text)
        .map(|(_, list)| list)
        .map_err(|e| to_selector_error(text, e))
}

fn to_selector_error(text: &str, err: nom::Err<ParseError<&str>>) -> SelectorError {
    match err {
        nom::Err::Failure(e) if e.code == ErrorKind::Fail => SelectorError::Unclosed {
            delimiter: e.input.chars().next().unwrap_or('('),
            offset: text.len() - e.input.len(),
        },
        nom::Err::Error(e) | nom::Err::Failure(e) => match e.input.chars().next() {
            Some(found) => SelectorError::Unexpected {
                found,
                offset: text.len() - e.input.len(),
            },
            None => SelectorError::UnexpectedEnd,
        },
        nom::Err::Incomplete(_) => SelectorError::UnexpectedEnd,
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

/// An identifier, allowing backslash escapes (`.sm\:flex`).
fn ident(input: &str) -> IResult<&str, &str> {
    recognize(many1(alt((
        take_while1(is_ident_char),
        recognize(pair(char('\\'), anychar)),
    ))))(input)
}

/// Scans the bracket group opening at `input[0]`, returning the rest after
/// the closing bracket and the text between. Fails hard when the group never
/// closes.
fn bracket_group(input: &str, open: char, close: char) -> IResult<&str, &str> {
    let (body, _) = char(open)(input)?;
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut chars = body.char_indices();

    while let Some((i, c)) = chars.next() {
        match (quote, c) {
            (_, '\\') => {
                chars.next();
            }
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, c) if c == open => depth += 1,
            (None, c) if c == close && depth == 0 => {
                return Ok((&body[i + c.len_utf8()..], &body[..i]));
            }
            (None, c) if c == close => depth -= 1,
            _ => {}
        }
    }
    Err(nom::Err::Failure(ParseError::new(input, ErrorKind::Fail)))
}

fn parenthesized(input: &str) -> IResult<&str, &str> {
    bracket_group(input, '(', ')')
}

fn attribute(input: &str) -> IResult<&str, Component> {
    let (rest, raw) = bracket_group(input, '[', ']')?;
    Ok((rest, Component::Attribute(raw.to_string())))
}

fn pseudo(input: &str) -> IResult<&str, Component> {
    let (rest, colons) = recognize(pair(char(':'), opt(char(':'))))(input)?;
    let (rest, name) = ident(rest)?;
    let (rest, argument) = opt(parenthesized)(rest)?;

    let lowercase = name.to_ascii_lowercase();
    let argument = match argument {
        Some(raw) if SELECTOR_PSEUDOS.contains(lowercase.as_str()) => {
            Some(PseudoArgument::Selectors(argument_list(raw)?))
        }
        Some(raw) if NTH_OF_PSEUDOS.contains(lowercase.as_str()) => Some(match nth_of(raw) {
            Some((formula, list)) => PseudoArgument::NthOf {
                formula: formula.to_string(),
                selectors: argument_list(list)?,
            },
            None => PseudoArgument::Raw(raw.to_string()),
        }),
        Some(raw) => Some(PseudoArgument::Raw(raw.to_string())),
        None => None,
    };

    Ok((
        rest,
        Component::Pseudo {
            name: format!("{colons}{name}"),
            argument,
        },
    ))
}

/// Parses the selector list inside a pseudo-class argument. The argument is a
/// slice of the outer input, so errors keep their offsets; they are raised
/// as failures so the outer selector does not backtrack past them.
fn argument_list(raw: &str) -> Result<Vec<Selector>, nom::Err<ParseError<&str>>> {
    all_consuming(selector_list)(raw)
        .map(|(_, list)| list)
        .map_err(|err| match err {
            nom::Err::Error(e) => nom::Err::Failure(e),
            other => other,
        })
}

/// Splits `2n+1 of .a` into the formula and the selector list text.
fn nth_of(raw: &str) -> Option<(&str, &str)> {
    let (formula, list) = raw.split_once("of")?;
    let separated = formula.ends_with(char::is_whitespace) && list.starts_with(char::is_whitespace);
    separated.then(|| (formula.trim(), list))
}

/// `&` plus any directly attached identifier text or parenthesized groups.
fn nesting(input: &str) -> IResult<&str, Component> {
    map(
        recognize(pair(
            char('&'),
            many0(alt((take_while1(is_ident_char), recognize(parenthesized)))),
        )),
        |raw: &str| Component::Nesting(raw.to_string()),
    )(input)
}

/// `ns|`, `*|` or a bare `|`. A `||` column combinator is not a prefix.
fn namespace(input: &str) -> IResult<&str, Component> {
    map(
        terminated(
            alt((ident, tag("*"), tag(""))),
            pair(char('|'), not(char('|'))),
        ),
        |prefix: &str| Component::Namespace(prefix.to_string()),
    )(input)
}

fn comment(input: &str) -> IResult<&str, &str> {
    recognize(delimited(tag("/*"), take_until("*/"), tag("*/")))(input)
}

/// Whitespace and comments between selector parts. Returns whether anything
/// was consumed, and the comments found.
fn trivia(input: &str) -> IResult<&str, (bool, Vec<Component>)> {
    let (rest, items) = many0(alt((map(multispace1, |_: &str| None), map(comment, Some))))(input)?;
    let consumed = !items.is_empty();
    let comments = items
        .into_iter()
        .flatten()
        .map(|raw| Component::Comment(raw.to_string()))
        .collect();
    Ok((rest, (consumed, comments)))
}

fn simple_selector(input: &str) -> IResult<&str, Component> {
    alt((
        map(preceded(char('#'), ident), |s| Component::Id(s.to_string())),
        map(preceded(char('.'), ident), |s| Component::Class(s.to_string())),
        pseudo,
        nesting,
        attribute,
        namespace,
        map(char('*'), |_| Component::Universal),
        map(ident, |s| Component::Type(s.to_string())),
    ))(input)
}

fn compound_selector(input: &str) -> IResult<&str, Vec<Component>> {
    many1(simple_selector)(input)
}

fn symbolic_combinator(input: &str) -> IResult<&str, Combinator> {
    alt((
        map(char('>'), |_| Combinator::Child),
        map(char('+'), |_| Combinator::NextSibling),
        map(char('~'), |_| Combinator::SubsequentSibling),
    ))(input)
}

/// Parses a complex selector (e.g., "ul > li:hover a").
fn complex_selector(input: &str) -> IResult<&str, Selector> {
    let mut components = Vec::new();

    let (input, (_, comments)) = trivia(input)?;
    components.extend(comments);

    // Relative selectors start with a combinator: "> b"
    let (input, leading) = opt(symbolic_combinator)(input)?;
    let input = match leading {
        Some(combinator) => {
            components.push(Component::Combinator(combinator));
            let (input, (_, comments)) = trivia(input)?;
            components.extend(comments);
            input
        }
        None => input,
    };

    let (mut input, first) = compound_selector(input)?;
    components.extend(first);

    loop {
        let (rem, (spaced, comments)) = trivia(input)?;

        // Explicit symbolic combinator
        if let Ok((after_op, combinator)) = symbolic_combinator(rem) {
            let (after_ws, (_, more)) = trivia(after_op)?;
            match compound_selector(after_ws) {
                Ok((next_input, next)) => {
                    components.extend(comments);
                    components.push(Component::Combinator(combinator));
                    components.extend(more);
                    components.extend(next);
                    input = next_input;
                    continue;
                }
                Err(nom::Err::Error(_)) => break,
                Err(e) => return Err(e),
            }
        }

        // Descendant combinator (whitespace or comments)
        if spaced {
            match compound_selector(rem) {
                Ok((next_input, next)) => {
                    components.extend(comments);
                    components.push(Component::Combinator(Combinator::Descendant));
                    components.extend(next);
                    input = next_input;
                    continue;
                }
                Err(nom::Err::Error(_)) => {
                    // Trailing comments belong to this selector.
                    if !comments.is_empty() {
                        components.extend(comments);
                        input = rem;
                    }
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        break;
    }

    Ok((input, Selector::new(components)))
}

fn selector_list(input: &str) -> IResult<&str, Vec<Selector>> {
    delimited(
        multispace0,
        separated_list1(
            delimited(multispace0, tag(","), multispace0),
            complex_selector,
        ),
        multispace0,
    )(input)
}
