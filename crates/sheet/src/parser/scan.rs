//! Low-level scanners shared by the stylesheet parser.
//!
//! Both scanners understand quoted strings, backslash escapes and nesting of
//! `()`/`[]`, so a `;` inside `url("a;b")` or a `,` inside `:is(a, b)` is not
//! mistaken for a separator.

use nom::IResult;
use nom::error::{Error, ErrorKind};

/// Consumes text up to (not including) the first top-level `{`, `;` or `}`.
///
/// Block comments inside the prelude are skipped over. An unterminated string
/// fails with [`ErrorKind::Char`], an unterminated comment with
/// [`ErrorKind::TakeUntil`]; both point at the opening delimiter.
pub(crate) fn prelude(input: &str) -> IResult<&str, &str> {
    let mut depth = 0usize;
    let mut quote: Option<(char, usize)> = None;
    let mut chars = input.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if let Some((q, _)) = quote {
            if c == '\\' {
                chars.next();
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\\' => {
                chars.next();
            }
            '"' | '\'' => quote = Some((c, i)),
            '/' if input[i..].starts_with("/*") => {
                let Some(end) = input[i + 2..].find("*/") else {
                    return Err(nom::Err::Failure(Error::new(
                        &input[i..],
                        ErrorKind::TakeUntil,
                    )));
                };
                let resume = i + 2 + end + 2;
                while chars.peek().is_some_and(|&(j, _)| j < resume) {
                    chars.next();
                }
            }
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            '{' | ';' | '}' if depth == 0 => return Ok((&input[i..], &input[..i])),
            _ => {}
        }
    }

    if let Some((_, start)) = quote {
        return Err(nom::Err::Failure(Error::new(&input[start..], ErrorKind::Char)));
    }
    Ok((&input[input.len()..], input))
}

/// Splits a rule prelude into trimmed selector entries on top-level commas.
///
/// A trailing comma produces a final empty entry, which selector merging
/// skips.
///
/// ```rust
/// use sheet::split_selectors;
///
/// assert_eq!(split_selectors("a, :is(b, c)"), vec!["a", ":is(b, c)"]);
/// assert_eq!(split_selectors("a,"), vec!["a", ""]);
/// ```
pub fn split_selectors(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (_, '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(text[start..i].trim().to_string());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(text[start..].trim().to_string());
    parts
}
