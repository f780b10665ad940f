use serde::Serialize;

use crate::error::ParseError;

/// Anything that occupies a byte range of the source it was parsed from
pub trait Spanned {
    /// Offset of the first byte
    fn index(&self) -> usize;
    /// Number of bytes covered
    fn length(&self) -> usize;

    /// Offset immediately following the node
    fn end(&self) -> usize {
        self.index() + self.length()
    }

    /// Re-derive the node's text from the buffer it was parsed from. Returns `None` if `src`
    /// is not that buffer (the span falls outside it or splits a character).
    fn source_text<'a>(&self, src: &'a str) -> Option<&'a str> {
        src.get(self.index()..self.end())
    }
}

macro_rules! spanned {
    ($($ty:ty),*) => {
        $(impl Spanned for $ty {
            fn index(&self) -> usize {
                self.index
            }
            fn length(&self) -> usize {
                self.length
            }
        })*
    };
}

spanned!(Element, Attribute, CommentTag, CloseTag, TextItem, MustacheItem, Document);

/// Result of parsing a whole document as the body of an implicit root element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub index: usize,
    pub length: usize,
    pub content: Vec<ContentItem>,
    #[serde(skip)]
    pub error: Option<ParseError>,
}

impl Document {
    pub fn into_result(self) -> Result<Vec<ContentItem>, ParseError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.content),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    pub index: usize,
    pub length: usize,
    pub kind: ElementKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementKind {
    Comment(CommentTag),
    Markup(MarkupElement),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkupElement {
    pub name: String,
    pub attributes: Vec<Attribute>,
    /// `None` for self-closed and void elements
    pub body: Option<ElementBody>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementBody {
    pub content: Vec<ContentItem>,
    /// Only missing when the input ends inside the element
    pub close_tag: Option<CloseTag>,
}

impl Element {
    /// The tag name, or `None` for a comment
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Markup(markup) => Some(markup.name.as_str()),
            ElementKind::Comment(_) => None,
        }
    }

    pub fn attributes(&self) -> &[Attribute] {
        match &self.kind {
            ElementKind::Markup(markup) => &markup.attributes,
            ElementKind::Comment(_) => &[],
        }
    }

    pub fn content(&self) -> Option<&[ContentItem]> {
        match &self.kind {
            ElementKind::Markup(MarkupElement {
                body: Some(body), ..
            }) => Some(&body.content),
            _ => None,
        }
    }

    pub fn close_tag(&self) -> Option<&CloseTag> {
        match &self.kind {
            ElementKind::Markup(MarkupElement {
                body: Some(body), ..
            }) => body.close_tag.as_ref(),
            _ => None,
        }
    }

    pub fn comment(&self) -> Option<&CommentTag> {
        match &self.kind {
            ElementKind::Comment(comment) => Some(comment),
            ElementKind::Markup(_) => None,
        }
    }

    /// Whether the element is fully described by its open tag (self-closed or void)
    pub fn is_open_tag_only(&self) -> bool {
        matches!(&self.kind, ElementKind::Markup(markup) if markup.body.is_none())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub index: usize,
    pub length: usize,
    pub keyword: String,
    /// Present only when the keyword was followed by `=`
    pub value: Option<AttributeValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeValue {
    /// Dequoted text
    pub value: String,
    /// The quoted literal as written, quotes included
    pub raw: String,
    pub raw_start: usize,
}

impl Attribute {
    /// Dequoted value, if the attribute has one
    pub fn value(&self) -> Option<&str> {
        self.value.as_ref().map(|v| v.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentTag {
    pub index: usize,
    pub length: usize,
    /// Interior text with surrounding whitespace trimmed
    pub text: String,
    pub text_start: usize,
    /// Offset of the closing `-->`
    pub close_start: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloseTag {
    pub index: usize,
    pub length: usize,
    /// May be empty, as in `</ >`
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "item", rename_all = "snake_case")]
pub enum ContentItem {
    Text(TextItem),
    Mustache(MustacheItem),
    Element(Element),
}

impl Spanned for ContentItem {
    fn index(&self) -> usize {
        match self {
            ContentItem::Text(t) => t.index,
            ContentItem::Mustache(m) => m.index,
            ContentItem::Element(e) => e.index,
        }
    }
    fn length(&self) -> usize {
        match self {
            ContentItem::Text(t) => t.length,
            ContentItem::Mustache(m) => m.length,
            ContentItem::Element(e) => e.length,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextItem {
    pub index: usize,
    pub length: usize,
    pub text: String,
}

/// A `{{ ... }}` item. The span covers both markers, `text` is the raw interior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MustacheItem {
    pub index: usize,
    pub length: usize,
    pub text: String,
    pub text_start: usize,
}
