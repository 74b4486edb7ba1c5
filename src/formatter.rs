//! Markdown serialization of a document tree.
//!
//! The output is normalized rather than source-preserving: headings are
//! always ATX, code blocks are always fenced, and blocks are separated by
//! one blank line. Parsing the output again yields an equivalent tree, so
//! formatting is idempotent.

use crate::error::RenderError;
use crate::syntax::Document;

mod core;
mod inline;
mod lists;
mod tables;
mod utils;

pub use core::Formatter;

/// Serialize `doc` back to Markdown.
///
/// # Examples
///
/// ```rust
/// use docmark::formatter::format_document;
///
/// let doc = docmark::parse("Title\n=====\n\n* a\n* b", None);
/// assert_eq!(format_document(&doc).unwrap(), "# Title\n\n* a\n* b\n");
/// ```
pub fn format_document(doc: &Document) -> Result<String, RenderError> {
    Formatter::new(doc).format()
}
