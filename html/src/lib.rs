//! Span-preserving parser for HTML-like markup with `{{ }}` interpolations.
//!
//! Every node records the byte range it was parsed from, so its text can be re-derived from
//! the original buffer with [`Spanned::source_text`].

mod dom;
mod error;
mod parsing;
mod query;
pub mod scan;
mod tag;

pub use dom::*;
pub use error::{ParseError, ParseErrorKind};
pub use parsing::{parse, parse_with_options, ParseOptions};
pub use query::get_elements_by_name;

#[cfg(test)]
mod tests;
