//! Thematic breaks: three or more `*`, `-` or `_`, optionally spaced.

use indextree::NodeId;

use crate::syntax::NodeValue;

use super::{BlockContinue, BlockParser, BlockStart, BlockSyntax};

/// Returns the marker character and how many times it appears.
pub(crate) fn try_parse_thematic_break(rest: &str) -> Option<(char, usize)> {
    let marker = rest.chars().next().filter(|c| matches!(c, '*' | '-' | '_'))?;
    let mut count = 0;
    for c in rest.chars() {
        if c == marker {
            count += 1;
        } else if c != ' ' && c != '\t' {
            return None;
        }
    }
    (count >= 3).then_some((marker, count))
}

pub(crate) struct ThematicBreaks;

impl BlockSyntax for ThematicBreaks {
    fn name(&self) -> &'static str {
        "thematic-break"
    }

    fn try_start_block(&self, parser: &mut BlockParser<'_>, _container: NodeId) -> Option<BlockStart> {
        if parser.scanner.is_indented() {
            return None;
        }
        let (marker, count) = try_parse_thematic_break(parser.scanner.rest_from_nonspace())?;
        let start = parser.scanner.next_nonspace();
        parser.close_unmatched_blocks();
        parser.add_child(NodeValue::ThematicBreak { marker, count }, start);
        parser.scanner.advance_to_line_end();
        Some(BlockStart::Leaf)
    }

    fn try_continue_block(&self, _parser: &mut BlockParser<'_>, _node: NodeId) -> BlockContinue {
        BlockContinue::NotMatched
    }
}
