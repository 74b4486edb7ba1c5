//! Block quotes: `>` followed by an optional space.

use indextree::NodeId;

use crate::syntax::NodeValue;

use super::{BlockContinue, BlockParser, BlockStart, BlockSyntax};

pub(crate) struct BlockQuotes;

/// Consume `>` and one optional following space or tab column.
fn consume_marker(parser: &mut BlockParser<'_>) -> bool {
    if parser.scanner.is_indented() || parser.scanner.peek_nonspace() != Some('>') {
        return false;
    }
    parser.scanner.advance_next_nonspace();
    parser.scanner.advance_offset(1, false);
    if matches!(parser.scanner.peek(), Some(' ' | '\t')) {
        parser.scanner.advance_offset(1, true);
    }
    true
}

impl BlockSyntax for BlockQuotes {
    fn name(&self) -> &'static str {
        "blockquote"
    }

    fn try_start_block(&self, parser: &mut BlockParser<'_>, _container: NodeId) -> Option<BlockStart> {
        let start = parser.scanner.next_nonspace();
        if !consume_marker(parser) {
            return None;
        }
        parser.close_unmatched_blocks();
        parser.add_child(NodeValue::BlockQuote, start);
        Some(BlockStart::Container)
    }

    fn try_continue_block(&self, parser: &mut BlockParser<'_>, _node: NodeId) -> BlockContinue {
        if consume_marker(parser) {
            BlockContinue::Matched
        } else {
            BlockContinue::NotMatched
        }
    }

    fn finish_block(&self, parser: &mut BlockParser<'_>, node: NodeId) {
        // A quote ends where its last child does, not on the line that closed it.
        if let Some(last) = parser.doc.last_child(node)
            && let Some(span) = parser.doc.span(last)
        {
            parser.set_span_end(node, span.end);
        }
    }
}
