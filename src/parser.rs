//! Parser module containing the scanner and the block and inline passes.

use crate::config::Config;
use crate::syntax::Document;

mod content;
mod scanner;
mod side_table;

pub mod block_parser;
pub mod inline_parser;

pub use block_parser::{BlockParser, BlockRegistry};
pub use inline_parser::{InlineParser, InlineRegistry};

/// Parses a document into an editable tree.
///
/// The block pass runs over the whole input first; only then does every leaf
/// block get its inline content, so reference links can use definitions that
/// appear later in the document.
///
/// # Examples
///
/// ```rust
/// use docmark::config::Config;
/// use docmark::parser::parse;
///
/// let doc = parse("# Heading\n\nParagraph text.", &Config::default());
/// println!("{}", doc.debug_tree(doc.root()));
/// ```
pub fn parse(input: &str, config: &Config) -> Document {
    let blocks = BlockRegistry::new(config);
    let (mut doc, queue) = BlockParser::new(input, config, &blocks).parse();

    let inlines = InlineRegistry::new(config);
    for (block, content) in &queue {
        inline_parser::parse_block(&inlines, config, &mut doc, *block, content);
    }
    doc
}
