//! Paragraphs: the fallback block for text no other syntax claims.

use indextree::NodeId;

use crate::parser::content::ContentWriter;
use crate::syntax::Span;

use super::reference_definitions;
use super::{BlockContinue, BlockParser, BlockSyntax};

pub(crate) struct Paragraphs;

impl BlockSyntax for Paragraphs {
    fn name(&self) -> &'static str {
        "paragraph"
    }

    fn try_continue_block(&self, parser: &mut BlockParser<'_>, _node: NodeId) -> BlockContinue {
        if parser.scanner.is_blank() {
            BlockContinue::NotMatched
        } else {
            BlockContinue::Matched
        }
    }

    fn finish_block(&self, parser: &mut BlockParser<'_>, node: NodeId) {
        let Some(mut content) = parser.side_table.remove::<ContentWriter>(node) else {
            return;
        };
        reference_definitions::extract(parser, node, &mut content);
        if content.is_blank() {
            log::debug!("paragraph held only reference definitions");
            parser.doc.remove_node(node);
            return;
        }
        // Definitions peeled off the front no longer belong to the paragraph.
        if let (Some(rest), Some(span)) = (content.source_span(), parser.doc.span(node))
            && rest.start > span.start
        {
            let start = rest.start.min(span.end);
            parser.doc.set_span(node, Some(Span::new(start, span.end)));
        }
        parser.queue_inlines(node, content);
    }

    fn accepts_lines(&self) -> bool {
        true
    }

    fn interruptible(&self) -> bool {
        true
    }
}
