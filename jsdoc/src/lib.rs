//! Extraction of `@tag` documentation from the first `/** ... */` block of a source member

use serde::Serialize;

mod parsing;

pub use parsing::parse_next;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JsdocTag {
    /// Including the leading `@`
    pub tag_name: String,
    pub tag_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JsdocParts {
    /// Free text ahead of the first tag
    pub initial_text: String,
    pub tags: Vec<JsdocTag>,
}

impl JsdocParts {
    /// Text of the last tag named `tag_name`
    pub fn get_tag(&self, tag_name: &str) -> Option<&str> {
        self.tags
            .iter()
            .rev()
            .find(|t| t.tag_name == tag_name)
            .map(|t| t.tag_text.as_str())
    }
}

/// Source member description carried in a member's leading doc block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SrcmbrDoc {
    pub mbr_name: String,
    pub text_desc: String,
    pub src_type: String,
    pub srcmbr_file_name: String,
}

impl From<&JsdocParts> for SrcmbrDoc {
    fn from(parts: &JsdocParts) -> Self {
        let tag = |name| parts.get_tag(name).unwrap_or_default().to_string();
        Self {
            mbr_name: tag("@mbrName"),
            text_desc: tag("@textDesc"),
            src_type: tag("@srcType"),
            srcmbr_file_name: tag("@srcmbr_fileName"),
        }
    }
}

/// Scan `lines` for the first doc block and pick out the source member tags
pub fn srcmbr_doc<S: AsRef<str>>(lines: &[S]) -> SrcmbrDoc {
    SrcmbrDoc::from(&parse_next(lines))
}
