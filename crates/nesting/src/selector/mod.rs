//! Structural selector model.
//!
//! A [`Selector`] is one complex selector (no commas at the top level) held
//! as a flat sequence of [`Component`]s, where functional pseudo-classes that
//! take selectors (`:not(...)`, `:is(...)`, `:host(...)`) hold their own
//! nested selector lists. That makes the model a tree, and
//! [`Selector::try_replace`] walks all of it.
//!
//! Component values are kept as written and are not validated.
//!
//! ```rust
//! use nesting::selector::{Component, Selector};
//!
//! let selector = Selector::parse(".a:not(&.no)").unwrap();
//! let mut placeholders = 0;
//! selector.walk(&mut |component| {
//!     if matches!(component, Component::Nesting(_)) {
//!         placeholders += 1;
//!     }
//! });
//! assert_eq!(placeholders, 1);
//! assert_eq!(selector.to_string(), ".a:not(&.no)");
//! ```

pub mod parse;

use std::fmt::{self, Display};

pub use parse::{SelectorError, parse_selector, parse_selector_list};

/// The token that marks a nesting placeholder.
pub const NESTING_TOKEN: char = '&';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Combinator {
    /// Whitespace
    Descendant,
    /// `>`
    Child,
    /// `+`
    NextSibling,
    /// `~`
    SubsequentSibling,
}

/// Argument of a functional pseudo-class or pseudo-element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PseudoArgument {
    /// Arguments of selector-taking pseudo-classes such as `:not(a, b)`.
    Selectors(Vec<Selector>),
    /// `:nth-child(2n of .a)`: the formula verbatim, then the `of` list.
    NthOf {
        formula: String,
        selectors: Vec<Selector>,
    },
    /// Anything else, kept verbatim: `2n+1`, `en`.
    Raw(String),
}

impl PseudoArgument {
    /// The selectors held by the argument, if any.
    pub fn selectors(&self) -> &[Selector] {
        match self {
            PseudoArgument::Selectors(list) | PseudoArgument::NthOf { selectors: list, .. } => list,
            PseudoArgument::Raw(_) => &[],
        }
    }

    pub fn selectors_mut(&mut self) -> &mut [Selector] {
        match self {
            PseudoArgument::Selectors(list) | PseudoArgument::NthOf { selectors: list, .. } => list,
            PseudoArgument::Raw(_) => &mut [],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Component {
    /// Namespace prefix of the following type or universal selector, without
    /// the `|`. Empty for `|a`, `*` for any namespace.
    Namespace(String),
    Type(String),
    Universal,
    Class(String),
    Id(String),
    /// Raw text between `[` and `]`, quotes included.
    Attribute(String),
    /// `name` keeps its leading colons (`:hover`, `::before`).
    Pseudo {
        name: String,
        argument: Option<PseudoArgument>,
    },
    Combinator(Combinator),
    /// A nesting placeholder: `&` alone, or `&` with attached text such as
    /// `&_elem` or `&(:focus)`.
    Nesting(String),
    /// A comment between selector parts, delimiters included.
    Comment(String),
}

/// One parsed complex selector.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selector {
    pub components: Vec<Component>,
}

impl Selector {
    pub fn new(components: Vec<Component>) -> Self {
        Self { components }
    }

    pub fn parse(text: &str) -> Result<Self, SelectorError> {
        parse_selector(text)
    }

    /// Returns true if the selector begins with an explicit combinator, as
    /// relative selectors like `> b` do.
    pub fn starts_with_combinator(&self) -> bool {
        matches!(self.components.first(), Some(Component::Combinator(_)))
    }

    /// Visits every component in pre-order, descending into the selectors
    /// of pseudo-class arguments.
    pub fn walk(&self, visit: &mut impl FnMut(&Component)) {
        for component in &self.components {
            visit(component);
            if let Component::Pseudo {
                argument: Some(argument),
                ..
            } = component
            {
                for selector in argument.selectors() {
                    selector.walk(visit);
                }
            }
        }
    }

    /// Walks the selector like [`Selector::walk`], splicing in replacement
    /// components wherever `replace` returns `Some`.
    ///
    /// Replacements are not walked again.
    pub fn try_replace<E>(
        &mut self,
        replace: &mut impl FnMut(&Component) -> Result<Option<Vec<Component>>, E>,
    ) -> Result<(), E> {
        let mut out = Vec::with_capacity(self.components.len());
        for mut component in std::mem::take(&mut self.components) {
            if let Some(replacement) = replace(&component)? {
                out.extend(replacement);
                continue;
            }
            if let Component::Pseudo {
                argument: Some(argument),
                ..
            } = &mut component
            {
                for selector in argument.selectors_mut() {
                    selector.try_replace(replace)?;
                }
            }
            out.push(component);
        }
        self.components = out;
        Ok(())
    }

    pub fn has_nesting(&self) -> bool {
        let mut found = false;
        self.walk(&mut |component| found |= matches!(component, Component::Nesting(_)));
        found
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Combinator::Descendant => " ",
            Combinator::Child => ">",
            Combinator::NextSibling => "+",
            Combinator::SubsequentSibling => "~",
        })
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Namespace(prefix) => write!(f, "{prefix}|"),
            Component::Type(name) => f.write_str(name),
            Component::Universal => f.write_str("*"),
            Component::Class(name) => write!(f, ".{name}"),
            Component::Id(name) => write!(f, "#{name}"),
            Component::Attribute(raw) => write!(f, "[{raw}]"),
            Component::Pseudo { name, argument } => {
                f.write_str(name)?;
                match argument {
                    Some(PseudoArgument::Selectors(list)) => {
                        f.write_str("(")?;
                        write_list(f, list)?;
                        f.write_str(")")
                    }
                    Some(PseudoArgument::NthOf { formula, selectors }) => {
                        write!(f, "({formula} of ")?;
                        write_list(f, selectors)?;
                        f.write_str(")")
                    }
                    Some(PseudoArgument::Raw(raw)) => write!(f, "({raw})"),
                    None => Ok(()),
                }
            }
            Component::Combinator(combinator) => Display::fmt(combinator, f),
            Component::Nesting(raw) | Component::Comment(raw) => f.write_str(raw),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, list: &[Selector]) -> fmt::Result {
    for (i, selector) in list.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        Display::fmt(selector, f)?;
    }
    Ok(())
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let is_combinator = |i: usize| {
            matches!(self.components.get(i), Some(Component::Combinator(_)))
        };
        for (i, component) in self.components.iter().enumerate() {
            match component {
                // Comments are set off by spaces unless a combinator already
                // provides one.
                Component::Comment(raw) => {
                    if i > 0 && !is_combinator(i - 1) {
                        f.write_str(" ")?;
                    }
                    f.write_str(raw)?;
                    if !matches!(
                        self.components.get(i + 1),
                        None | Some(Component::Combinator(_) | Component::Comment(_))
                    ) {
                        f.write_str(" ")?;
                    }
                }
                Component::Combinator(Combinator::Descendant) => f.write_str(" ")?,
                // Symbolic combinators get spaces on both sides, except
                // at the start of a relative selector.
                Component::Combinator(combinator) if i == 0 => write!(f, "{combinator} ")?,
                Component::Combinator(combinator) => write!(f, " {combinator} ")?,
                other => Display::fmt(other, f)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_replace_reaches_pseudo_arguments() {
        let mut selector = Selector::parse("&:not(&.no)").unwrap();
        selector
            .try_replace(&mut |component| -> Result<_, ()> {
                Ok(match component {
                    Component::Nesting(_) => Some(vec![Component::Class("a".into())]),
                    _ => None,
                })
            })
            .unwrap();
        assert_eq!(selector.to_string(), ".a:not(.a.no)");
        assert!(!selector.has_nesting());
    }

    #[test]
    fn test_replacement_can_expand_to_many_components() {
        let mut selector = Selector::parse("& + &").unwrap();
        let parent = Selector::parse("ul li").unwrap();
        selector
            .try_replace(&mut |component| -> Result<_, ()> {
                Ok(matches!(component, Component::Nesting(_)).then(|| parent.components.clone()))
            })
            .unwrap();
        assert_eq!(selector.to_string(), "ul li + ul li");
    }

    #[test]
    fn test_try_replace_reaches_nth_of_list() {
        let mut selector = Selector::parse(":nth-child(2n of &)").unwrap();
        selector
            .try_replace(&mut |component| -> Result<_, ()> {
                Ok(matches!(component, Component::Nesting(_)).then(|| vec![Component::Type("li".into())]))
            })
            .unwrap();
        assert_eq!(selector.to_string(), ":nth-child(2n of li)");
    }

    #[test]
    fn test_comment_display() {
        for text in ["b /* c */ d", "/* c */ b", "b /* c */", "b > /* c */ d", "b /* c */ > d"] {
            assert_eq!(Selector::parse(text).unwrap().to_string(), text);
        }
    }

    #[test]
    fn test_relative_selector_display() {
        let selector = Selector::parse("> b").unwrap();
        assert!(selector.starts_with_combinator());
        assert_eq!(selector.to_string(), "> b");
    }
}
