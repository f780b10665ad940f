use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, satisfy},
    combinator::{opt, recognize},
    sequence::{delimited, pair, preceded},
    IResult,
};

use crate::dom::{Attribute, AttributeValue, CloseTag};
use crate::error::{PResult, ParseError, ParseErrorKind};
use crate::scan::{dequote, is_word, offset, quoted_literal, ws0, ws1};

/// The parsed `<name attr ...>` or `<name .../>` of an element
#[derive(Debug, PartialEq)]
pub(crate) struct OpenTag {
    pub name: String,
    pub attributes: Vec<Attribute>,
    /// Ended with `/>`
    pub self_closed: bool,
    /// Offset just past the `>`
    pub end: usize,
}

/// Attempt to parse a tag name, optionally prefixed with `!` as in `<!doctype`
fn parse_tag_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        opt(char('!')),
        take_while1(|c| is_word(c) || c == '-'),
    ))(input)
}

/// `>` or `/>`, possibly after whitespace
fn parse_tag_end(input: &str) -> IResult<&str, &str> {
    preceded(ws0, alt((tag("/>"), tag(">"))))(input)
}

fn parse_attribute_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| is_word(c) || c == '@' || c == ':'),
        take_while(|c| is_word(c) || c == '-' || c == '.'),
    ))(input)
}

fn parse_equals(input: &str) -> IResult<&str, char> {
    char('=')(input)
}

/// Parse an open tag starting at `at`, which must hold the `<`
pub(crate) fn parse_open_tag(src: &str, at: usize) -> PResult<OpenTag> {
    let (mut input, name) = preceded(char('<'), parse_tag_name)(&src[at..])
        .map_err(|_: nom::Err<nom::error::Error<&str>>| {
            ParseError::new(ParseErrorKind::InvalidOpenTag, src, at)
        })?;

    let mut attributes = Vec::new();
    loop {
        if let Ok((rest, end)) = parse_tag_end(input) {
            return Ok(OpenTag {
                name: name.to_string(),
                attributes,
                self_closed: end == "/>",
                end: offset(src, rest),
            });
        }
        let (rest, attribute) = parse_attribute(src, input)?;
        attributes.push(attribute);
        input = rest;
    }
}

/// Parse one whitespace-led `name` or `name="value"` pair from `input`, a suffix of `src`
fn parse_attribute<'s>(src: &'s str, input: &'s str) -> PResult<(&'s str, Attribute)> {
    let fail = |kind, at: &str| ParseError::new(kind, src, offset(src, at));

    let (name_start, _) = ws1(input).map_err(|_| fail(ParseErrorKind::InvalidOpenTagText, input))?;
    let (rest, keyword) = parse_attribute_name(name_start)
        .map_err(|_| fail(ParseErrorKind::InvalidOpenTagText, input))?;
    let index = offset(src, name_start);

    let Ok((value_start, _)) = parse_equals(rest) else {
        let attribute = Attribute {
            index,
            length: offset(src, rest) - index,
            keyword: keyword.to_string(),
            value: None,
        };
        return Ok((rest, attribute));
    };

    let (rest, raw) = quoted_literal(value_start).map_err(|_| {
        let kind = if value_start.starts_with(&['"', '\''][..]) {
            ParseErrorKind::UnclosedAttributeValue
        } else {
            ParseErrorKind::InvalidAttributeValue
        };
        fail(kind, value_start)
    })?;
    let attribute = Attribute {
        index,
        length: offset(src, rest) - index,
        keyword: keyword.to_string(),
        value: Some(AttributeValue {
            value: dequote(raw),
            raw: raw.to_string(),
            raw_start: offset(src, value_start),
        }),
    };
    Ok((rest, attribute))
}

/// Parse a tag in the form `</name>` anchored at `at`. The name may be empty and is not
/// checked against the element it closes.
pub(crate) fn parse_close_tag(src: &str, at: usize) -> PResult<CloseTag> {
    let parsed: IResult<&str, &str> = delimited(
        pair(tag("</"), ws0),
        take_while(|c| is_word(c) || c == '-'),
        pair(ws0, char('>')),
    )(&src[at..]);
    match parsed {
        Ok((rest, name)) => Ok(CloseTag {
            index: at,
            length: offset(src, rest) - at,
            name: name.to_string(),
        }),
        Err(_) => Err(ParseError::new(ParseErrorKind::InvalidCloseTag, src, at)),
    }
}

#[cfg(test)]
#[test]
fn test_open_tag_parse() {
    let data = "<div>";
    let target = OpenTag {
        name: "div".to_string(),
        attributes: vec![],
        self_closed: false,
        end: 5,
    };
    assert_eq!(parse_open_tag(data, 0), Ok(target));

    let data = "<!DOCTYPE html>";
    let tag = parse_open_tag(data, 0).unwrap();
    assert_eq!(tag.name, "!DOCTYPE");
    assert_eq!(tag.attributes[0].keyword, "html");
    assert_eq!(tag.end, data.len());

    let data = "xx<img src='a.png' />";
    let tag = parse_open_tag(data, 2).unwrap();
    assert!(tag.self_closed);
    assert_eq!(tag.end, data.len());
}

#[cfg(test)]
#[test]
fn test_attribute_parse() {
    let data = r#"<input disabled v-if="ok" @click='go()' :key="k.id" data.x="1">"#;
    let tag = parse_open_tag(data, 0).unwrap();
    let keywords: Vec<&str> = tag.attributes.iter().map(|a| a.keyword.as_str()).collect();
    assert_eq!(keywords, ["disabled", "v-if", "@click", ":key", "data.x"]);

    let disabled = &tag.attributes[0];
    assert_eq!(disabled.value, None);
    assert_eq!((disabled.index, disabled.length), (7, 8));

    let v_if = &tag.attributes[1];
    assert_eq!(v_if.index, 16);
    assert_eq!(v_if.length, r#"v-if="ok""#.len());
    assert_eq!(
        v_if.value,
        Some(AttributeValue {
            value: "ok".to_string(),
            raw: r#""ok""#.to_string(),
            raw_start: 21,
        })
    );
    assert_eq!(tag.attributes[2].value(), Some("go()"));
}

#[cfg(test)]
#[test]
fn test_open_tag_malformed() {
    let err = parse_open_tag("</div>", 0).unwrap_err();
    assert_eq!((err.kind, err.offset), (ParseErrorKind::InvalidOpenTag, 0));

    let err = parse_open_tag("<div class=a>", 0).unwrap_err();
    assert_eq!((err.kind, err.offset), (ParseErrorKind::InvalidAttributeValue, 11));

    let err = parse_open_tag(r#"<div class="a>"#, 0).unwrap_err();
    assert_eq!((err.kind, err.offset), (ParseErrorKind::UnclosedAttributeValue, 11));

    let err = parse_open_tag(r#"<div "x">"#, 0).unwrap_err();
    assert_eq!((err.kind, err.offset), (ParseErrorKind::InvalidOpenTagText, 4));

    let err = parse_open_tag(r#"<div a="1"b>"#, 0).unwrap_err();
    assert_eq!((err.kind, err.offset), (ParseErrorKind::InvalidOpenTagText, 10));
}

#[cfg(test)]
#[test]
fn test_close_tag_parse() {
    let target = CloseTag {
        index: 3,
        length: 6,
        name: "div".to_string(),
    };
    assert_eq!(parse_close_tag("abc</div>", 3), Ok(target));

    let tag = parse_close_tag("</ span >", 0).unwrap();
    assert_eq!((tag.name.as_str(), tag.length), ("span", 9));

    let tag = parse_close_tag("</ >", 0).unwrap();
    assert_eq!(tag.name, "");

    let err = parse_close_tag("</div class>", 0).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidCloseTag);
    assert!(parse_close_tag(" </div>", 0).is_err());
}
