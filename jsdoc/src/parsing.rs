use nom::{
    bytes::complete::take_while1,
    character::complete::char,
    combinator::{recognize, rest},
    sequence::{pair, preceded},
    IResult,
};
use tracing::{span, trace, Level};

use crate::{JsdocParts, JsdocTag};

const BLOCK_OPEN: &str = "/**";
const BLOCK_CLOSE: &str = "*/";

/// Parse a line in the form `@name text`, returning `@name` and the untrimmed text
fn parse_tag_line(input: &str) -> IResult<&str, (&str, &str)> {
    pair(
        recognize(preceded(
            char('@'),
            take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '-'),
        )),
        rest,
    )(input)
}

/// The lines of the first doc block in `lines`, with the block delimiters removed. The block
/// ends at the first `*/`, which may share a line with the opener.
fn block_lines<S: AsRef<str>>(lines: &[S]) -> Vec<&str> {
    let mut block = Vec::new();
    let Some(start) = lines
        .iter()
        .position(|l| l.as_ref().trim_start().starts_with(BLOCK_OPEN))
    else {
        return block;
    };

    for (i, line) in lines[start..].iter().enumerate() {
        let line = line.as_ref();
        if i == 0 {
            // the closer may overlap the opener, as in `/**/`
            let open = line.find(BLOCK_OPEN).unwrap_or(0);
            let body = open + BLOCK_OPEN.len();
            if let Some(close) = line[open + 1..].find(BLOCK_CLOSE) {
                block.push(line.get(body..open + 1 + close).unwrap_or(""));
                break;
            }
            block.push(&line[body..]);
            continue;
        }
        if let Some(close) = line.find(BLOCK_CLOSE) {
            block.push(&line[..close]);
            break;
        }
        block.push(line);
    }
    block
}

/// Strip the indentation and the single `*` that decorates a doc block line
fn strip_decoration(line: &str) -> &str {
    let line = line.trim_start();
    line.strip_prefix('*').unwrap_or(line).trim()
}

/// Extract the description and tags of the first `/** ... */` block in `lines`. Without a
/// block, the result is empty.
pub fn parse_next<S: AsRef<str>>(lines: &[S]) -> JsdocParts {
    let span = span!(Level::DEBUG, "Extracting doc block", lines = lines.len());
    let _enter = span.enter();

    let mut initial = Vec::new();
    let mut tags: Vec<(&str, Vec<&str>)> = Vec::new();
    for line in block_lines(lines).into_iter().map(strip_decoration) {
        if let Ok((_, (name, text))) = parse_tag_line(line) {
            trace!(tag = name, "Tag");
            tags.push((name, vec![text.trim()]));
        } else if let Some((_, text)) = tags.last_mut() {
            text.push(line);
        } else {
            initial.push(line);
        }
    }

    JsdocParts {
        initial_text: initial.join("\n").trim().to_string(),
        tags: tags
            .into_iter()
            .map(|(name, text)| JsdocTag {
                tag_name: name.to_string(),
                tag_text: text.join("\n").trim().to_string(),
            })
            .collect(),
    }
}

#[cfg(test)]
#[test]
fn test_tag_line_parse() {
    assert_eq!(parse_tag_line("@mbrName  CUSTLIST "), Ok(("", ("@mbrName", "  CUSTLIST "))));
    assert_eq!(parse_tag_line("@srcmbr_fileName"), Ok(("", ("@srcmbr_fileName", ""))));
    assert!(parse_tag_line("plain text").is_err());
    assert!(parse_tag_line("@ alone").is_err());
}

#[cfg(test)]
#[test]
fn test_block_lines() {
    let lines = ["int x;", "  /** first", "   * second */", "/** other */"];
    assert_eq!(block_lines(&lines), [" first", "   * second "]);

    assert_eq!(block_lines(&["/** @a b */ int x;"]), [" @a b "]);
    assert_eq!(block_lines(&["/**/"]), [""]);
    assert!(block_lines(&["// nothing here"]).is_empty());
}

#[cfg(test)]
#[test]
fn test_strip_decoration() {
    assert_eq!(strip_decoration("   * text  "), "text");
    assert_eq!(strip_decoration(" ** double"), "* double");
    assert_eq!(strip_decoration("no star"), "no star");
}
