//! Grammar-agnostic scanning primitives shared by the tag, comment and mustache parsers

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{anychar, char, satisfy},
    combinator::{recognize, value},
    multi::many0_count,
    sequence::{delimited, pair, preceded},
    IResult,
};

/// `\w`, ASCII only
pub(crate) fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

pub(crate) fn ws0(input: &str) -> IResult<&str, &str> {
    take_while(char::is_whitespace)(input)
}

pub(crate) fn ws1(input: &str) -> IResult<&str, &str> {
    take_while1(char::is_whitespace)(input)
}

/// Offset of `rest` within `src`, where `rest` is a suffix of `src`
pub(crate) fn offset(src: &str, rest: &str) -> usize {
    src.len() - rest.len()
}

/// Advance `at` past any whitespace
pub(crate) fn skip_whitespace(src: &str, at: usize) -> usize {
    match src.get(at..) {
        Some(rest) => at + (rest.len() - rest.trim_start().len()),
        None => at,
    }
}

fn quoted_with<'a>(quote: char) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    move |input| {
        recognize(delimited(
            char(quote),
            many0_count(alt((
                preceded(char('\\'), anychar),
                value(quote, pair(char(quote), char(quote))),
                satisfy(move |c| c != quote && c != '\\'),
            ))),
            char(quote),
        ))(input)
    }
}

/// Recognize a single or double quoted literal, returning it with its quotes. Inside the
/// quotes a backslash escapes the next character and a doubled quote stands for one quote.
pub fn quoted_literal(input: &str) -> IResult<&str, &str> {
    alt((quoted_with('"'), quoted_with('\'')))(input)
}

/// Strip the quotes from a literal recognized by [`quoted_literal`] and resolve its escapes.
/// Anything that is not a quoted literal comes back unchanged.
pub fn dequote(raw: &str) -> String {
    let quote = match raw.chars().next() {
        Some(q @ ('"' | '\'' | '`')) if raw.len() >= 2 && raw.ends_with(q) => q,
        _ => return raw.to_string(),
    };
    let inner = &raw[1..raw.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else if c == quote && chars.peek() == Some(&quote) {
            chars.next();
            out.push(quote);
        } else {
            out.push(c);
        }
    }
    out
}

/// Byte length of the quoted run `s` starts with. Besides `'` and `"`, backtick strings are
/// skipped too since mustache expressions may contain template literals.
fn quoted_len(s: &str) -> Option<usize> {
    let mut chars = s.char_indices();
    let (_, quote) = chars.next()?;
    if !matches!(quote, '"' | '\'' | '`') {
        return None;
    }
    while let Some((i, c)) = chars.next() {
        if c == '\\' {
            chars.next();
        } else if c == quote {
            return Some(i + c.len_utf8());
        }
    }
    None
}

/// Find the first occurrence of `pattern` at or after `from` that is not inside a quoted
/// string. A quote that is never closed is treated as an ordinary character.
pub fn find_unquoted(text: &str, from: usize, pattern: &str) -> Option<usize> {
    let mut pos = from;
    while let Some(rest) = text.get(pos..).filter(|r| !r.is_empty()) {
        if rest.starts_with(pattern) {
            return Some(pos);
        }
        if let Some(len) = quoted_len(rest) {
            pos += len;
            continue;
        }
        pos += rest.chars().next().map_or(1, char::len_utf8);
    }
    None
}

/// Up to `len` characters of `text` starting at byte `start`. Never panics: `start` past the
/// end gives an empty string and a `start` inside a character moves forward to the next one.
pub fn substr_lenient(text: &str, start: usize, len: usize) -> &str {
    let mut start = start.min(text.len());
    while !text.is_char_boundary(start) {
        start += 1;
    }
    let rest = &text[start..];
    let end = rest.char_indices().nth(len).map_or(rest.len(), |(i, _)| i);
    &rest[..end]
}

#[cfg(test)]
#[test]
fn test_quoted_literal() {
    assert_eq!(quoted_literal(r#""abc" rest"#), Ok((" rest", r#""abc""#)));
    assert_eq!(quoted_literal("'it''s'>"), Ok((">", "'it''s'")));
    assert_eq!(quoted_literal(r#""say \"hi\"">"#), Ok((">", r#""say \"hi\"""#)));
    assert_eq!(quoted_literal("''>"), Ok((">", "''")));
    assert!(quoted_literal("'never closed").is_err());
    assert!(quoted_literal("bare").is_err());
}

#[cfg(test)]
#[test]
fn test_dequote() {
    assert_eq!(dequote(r#""abc""#), "abc");
    assert_eq!(dequote("'it''s'"), "it's");
    assert_eq!(dequote(r#""say \"hi\"""#), r#"say "hi""#);
    assert_eq!(dequote(r#"'a\\b'"#), r"a\b");
    assert_eq!(dequote("''"), "");
    assert_eq!(dequote("bare"), "bare");
    assert_eq!(dequote("'"), "'");
}

#[cfg(test)]
#[test]
fn test_find_unquoted() {
    assert_eq!(find_unquoted("a }} b", 0, "}}"), Some(2));
    assert_eq!(find_unquoted("{{ '}}' }}", 2, "}}"), Some(8));
    assert_eq!(find_unquoted(r#"{{ "a\"}}" }}"#, 2, "}}"), Some(11));
    assert_eq!(find_unquoted("{{ `}}` }}", 2, "}}"), Some(8));
    // an unmatched apostrophe does not hide the terminator
    assert_eq!(find_unquoted("{{ it's }}", 2, "}}"), Some(8));
    assert_eq!(find_unquoted("{{ open", 2, "}}"), None);
    assert_eq!(find_unquoted("abc", 10, "}}"), None);
}

#[cfg(test)]
#[test]
fn test_substr_lenient() {
    assert_eq!(substr_lenient("hello world", 6, 20), "world");
    assert_eq!(substr_lenient("hello", 2, 2), "ll");
    assert_eq!(substr_lenient("hello", 99, 5), "");
    assert_eq!(substr_lenient("héllo", 2, 2), "ll");
}

#[cfg(test)]
#[test]
fn test_skip_whitespace() {
    assert_eq!(skip_whitespace("  \n\tx", 0), 4);
    assert_eq!(skip_whitespace("x  ", 1), 3);
    assert_eq!(skip_whitespace("x", 5), 5);
}
