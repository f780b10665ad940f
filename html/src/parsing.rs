use nom::{
    bytes::complete::{tag, take_until},
    sequence::tuple,
    IResult,
};
use tracing::{debug, span, trace, Level};

use crate::dom::*;
use crate::error::{PResult, ParseError, ParseErrorKind};
use crate::scan::{find_unquoted, offset, skip_whitespace, ws0};
use crate::tag::{parse_close_tag, parse_open_tag};

/// Elements that never have a body or close tag, compared case-insensitively
const VOID_ELEMENTS: [&str; 4] = ["!doctype", "br", "meta", "link"];

fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest element nesting accepted. Without a limit, recursion is bounded only by the
    /// stack, so callers handling untrusted input should set one.
    pub max_depth: Option<usize>,
}

/// Parse a whole document as the body of an implicit root element.
///
/// Stops at the first error, in which case the returned document has no content. A `</` at
/// the top level ends the document early without an error, the same way it ends an
/// element's body; compare `length` against the input length to detect this.
pub fn parse(text: &str) -> Document {
    parse_with_options(text, ParseOptions::default())
}

pub fn parse_with_options(text: &str, options: ParseOptions) -> Document {
    let span = span!(Level::DEBUG, "Parsing markup", len = text.len());
    let _enter = span.enter();
    let parser = Parser { src: text, options };
    match parser.parse_content(0, 0) {
        Ok((end, content)) => Document {
            index: 0,
            length: end,
            content,
            error: None,
        },
        Err(error) => {
            debug!(%error, "Markup parse aborted");
            Document {
                index: 0,
                length: 0,
                content: vec![],
                error: Some(error),
            }
        }
    }
}

/// Where the next content item starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    /// `</`
    CloseTag,
    /// `{{`
    Mustache,
    /// `<`
    Element,
}

fn next_marker(src: &str, from: usize) -> Option<(usize, Marker)> {
    let rest = &src[from..];
    rest.char_indices().find_map(|(i, c)| {
        let tail = &rest[i..];
        let marker = match c {
            '<' if tail.starts_with("</") => Marker::CloseTag,
            '<' => Marker::Element,
            '{' if tail.starts_with("{{") => Marker::Mustache,
            _ => return None,
        };
        Some((from + i, marker))
    })
}

struct Parser<'s> {
    src: &'s str,
    options: ParseOptions,
}

impl<'s> Parser<'s> {
    /// Parse one element or comment starting at `at`, returning it with the offset past it
    fn parse_element(&self, at: usize, depth: usize) -> PResult<(usize, Element)> {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return Err(ParseError::new(ParseErrorKind::NestingTooDeep, self.src, at));
        }

        if self.src[at..].starts_with("<!--") {
            let comment = parse_comment(self.src, at)?;
            let element = Element {
                index: comment.index,
                length: comment.length,
                kind: ElementKind::Comment(comment),
            };
            return Ok((element.end(), element));
        }

        let open = parse_open_tag(self.src, at)?;
        trace!(name = %open.name, at, "Open tag");
        let mut end = open.end;
        let body = if open.self_closed || is_void_element(&open.name) {
            None
        } else {
            let (cursor, content) = self.parse_content(open.end, depth)?;
            end = cursor;
            // Running out of input inside an element is tolerated
            let close_tag = if cursor < self.src.len() {
                let close = parse_close_tag(self.src, cursor)?;
                end = close.end();
                Some(close)
            } else {
                None
            };
            Some(ElementBody { content, close_tag })
        };

        let element = Element {
            index: at,
            length: end - at,
            kind: ElementKind::Markup(MarkupElement {
                name: open.name,
                attributes: open.attributes,
                body,
            }),
        };
        Ok((end, element))
    }

    /// Parse the content between an opening and closing tag, stopping in front of the `</`
    /// that belongs to the enclosing element or at the end of input. Whitespace between
    /// items is skipped.
    fn parse_content(&self, at: usize, depth: usize) -> PResult<(usize, Vec<ContentItem>)> {
        let src = self.src;
        let mut items = Vec::new();
        let mut cursor = at;
        while cursor < src.len() {
            cursor = skip_whitespace(src, cursor);
            match next_marker(src, cursor) {
                None => {
                    if cursor < src.len() {
                        items.push(ContentItem::Text(TextItem {
                            index: cursor,
                            length: src.len() - cursor,
                            text: src[cursor..].to_string(),
                        }));
                    }
                    cursor = src.len();
                }
                Some((found, _)) if found > cursor => {
                    items.push(ContentItem::Text(TextItem {
                        index: cursor,
                        length: found - cursor,
                        text: src[cursor..found].to_string(),
                    }));
                    cursor = found;
                }
                Some((_, Marker::CloseTag)) => break,
                Some((_, Marker::Mustache)) => {
                    let item = parse_mustache(src, cursor)?;
                    cursor = item.end();
                    items.push(ContentItem::Mustache(item));
                }
                Some((_, Marker::Element)) => {
                    let (end, element) = self.parse_element(cursor, depth + 1)?;
                    cursor = end;
                    items.push(ContentItem::Element(element));
                }
            }
        }
        Ok((cursor, items))
    }
}

/// Parse a `{{ expression }}` item at `at`. The interior is returned verbatim; a `}}`
/// inside a quoted string does not end the item.
fn parse_mustache(src: &str, at: usize) -> PResult<MustacheItem> {
    let text_start = at + 2;
    match find_unquoted(src, text_start, "}}") {
        Some(close) => Ok(MustacheItem {
            index: at,
            length: close + 2 - at,
            text: src[text_start..close].to_string(),
            text_start,
        }),
        None => Err(ParseError::new(ParseErrorKind::UnclosedMustache, src, at)),
    }
}

/// Parse `<!-- text -->` at `at`, including any whitespace in front of the `<!--`
fn parse_comment(src: &str, at: usize) -> PResult<CommentTag> {
    let input = &src[at..];
    let (open, _) = ws0(input).map_err(|_| ParseError::new(ParseErrorKind::InvalidComment, src, at))?;
    if !open.starts_with("<!--") {
        return Err(ParseError::new(ParseErrorKind::InvalidComment, src, at));
    }

    let parsed: IResult<&str, (&str, &str, &str, &str)> =
        tuple((tag("<!--"), ws0, take_until("-->"), tag("-->")))(open);
    let (rest, (marker, leading, text, _)) =
        parsed.map_err(|_| ParseError::new(ParseErrorKind::UnclosedComment, src, offset(src, open)))?;
    let text_start = offset(src, open) + marker.len() + leading.len();
    Ok(CommentTag {
        index: at,
        length: offset(src, rest) - at,
        text: text.trim().to_string(),
        text_start,
        close_start: text_start + text.len(),
    })
}

#[cfg(test)]
#[test]
fn test_comment_parse() {
    let data = "<!--  a note \n -->rest";
    let target = CommentTag {
        index: 0,
        length: 18,
        text: "a note".to_string(),
        text_start: 6,
        close_start: 15,
    };
    assert_eq!(parse_comment(data, 0), Ok(target));

    let comment = parse_comment("x  <!---->", 1).unwrap();
    assert_eq!((comment.index, comment.length), (1, 9));
    assert_eq!(comment.text, "");

    let err = parse_comment("<!-- never closed", 0).unwrap_err();
    assert_eq!((err.kind, err.offset), (ParseErrorKind::UnclosedComment, 0));
    let err = parse_comment("<div>", 0).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidComment);
}

#[cfg(test)]
#[test]
fn test_mustache_parse() {
    let data = "a {{ user.name }} b";
    let target = MustacheItem {
        index: 2,
        length: 15,
        text: " user.name ".to_string(),
        text_start: 4,
    };
    assert_eq!(parse_mustache(data, 2), Ok(target));

    let item = parse_mustache("{{ x ? '}}' : y }}", 0).unwrap();
    assert_eq!(item.text, " x ? '}}' : y ");

    let err = parse_mustache("<p>{{ open </p>", 3).unwrap_err();
    assert_eq!((err.kind, err.offset), (ParseErrorKind::UnclosedMustache, 3));
}

#[cfg(test)]
#[test]
fn test_next_marker() {
    assert_eq!(next_marker("abc</p>", 0), Some((3, Marker::CloseTag)));
    assert_eq!(next_marker("a { b {{x}}", 0), Some((6, Marker::Mustache)));
    assert_eq!(next_marker("<p>", 0), Some((0, Marker::Element)));
    assert_eq!(next_marker("<p>", 1), None);
}

#[cfg(test)]
#[test]
fn test_void_elements() {
    assert!(is_void_element("br"));
    assert!(is_void_element("BR"));
    assert!(is_void_element("!DOCTYPE"));
    assert!(!is_void_element("img"));
}
