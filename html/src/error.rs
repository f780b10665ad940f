use std::fmt;

use crate::scan::substr_lenient;

/// Characters of source quoted in an error message
const PREVIEW_LEN: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// `{{` without a matching `}}`
    UnclosedMustache,
    /// `<!--` without a matching `-->`
    UnclosedComment,
    /// Comment parse invoked somewhere without `<!--`
    InvalidComment,
    /// `<` not followed by a tag name
    InvalidOpenTag,
    /// Text after the tag name that is neither an attribute nor `>`/`/>`
    InvalidOpenTagText,
    /// Quoted attribute value that is never closed
    UnclosedAttributeValue,
    /// `=` not followed by a quoted value
    InvalidAttributeValue,
    InvalidCloseTag,
    /// Elements nested deeper than the configured limit
    NestingTooDeep,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParseErrorKind::UnclosedMustache => "mustache is not closed",
            ParseErrorKind::UnclosedComment => "html comment is not closed",
            ParseErrorKind::InvalidComment => "invalid html comment",
            ParseErrorKind::InvalidOpenTag => "invalid html open tag",
            ParseErrorKind::InvalidOpenTagText => "invalid text in html open tag",
            ParseErrorKind::UnclosedAttributeValue => "attribute value is not closed",
            ParseErrorKind::InvalidAttributeValue => "invalid attribute value",
            ParseErrorKind::InvalidCloseTag => "invalid closing tag",
            ParseErrorKind::NestingTooDeep => "elements nested too deeply",
        })
    }
}

/// First error hit while parsing. Parsing does not recover, so there is only ever one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at position {offset}: {preview:?}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
    /// Source text starting at `offset`
    pub preview: String,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, src: &str, offset: usize) -> Self {
        Self {
            kind,
            offset,
            preview: substr_lenient(src, offset, PREVIEW_LEN).to_string(),
        }
    }
}

pub(crate) type PResult<T> = Result<T, ParseError>;
