//! ATX (`## Title ##`) and setext (`Title` underlined with `===` or `---`) headings.

use std::sync::LazyLock;

use indextree::NodeId;
use regex::Regex;

use crate::parser::content::ContentWriter;
use crate::syntax::{NodeValue, SyntaxKind};

use super::reference_definitions;
use super::utils::count_leading;
use super::{BlockContinue, BlockParser, BlockStart, BlockSyntax};

static SETEXT_UNDERLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:=+|-+)[ \t]*$").expect("invalid setext regex"));

/// Try to read an ATX opening sequence, returning the heading level.
pub(crate) fn atx_level(rest: &str) -> Option<usize> {
    let level = count_leading(rest, '#');
    if level == 0 || level > 6 {
        return None;
    }
    match rest[level..].chars().next() {
        None | Some(' ' | '\t') => Some(level),
        Some(_) => None,
    }
}

/// Strip an optional closing sequence of `#`s (and the whitespace around it).
fn strip_closing_sequence(text: &str) -> &str {
    let trimmed = text.trim_end_matches([' ', '\t']);
    let without_hashes = trimmed.trim_end_matches('#');
    if without_hashes.len() == trimmed.len() {
        return trimmed;
    }
    if without_hashes.is_empty() {
        return "";
    }
    if without_hashes.ends_with([' ', '\t']) {
        without_hashes.trim_end_matches([' ', '\t'])
    } else {
        trimmed
    }
}

pub(crate) struct AtxHeadings;

impl BlockSyntax for AtxHeadings {
    fn name(&self) -> &'static str {
        "atx-heading"
    }

    fn try_start_block(&self, parser: &mut BlockParser<'_>, _container: NodeId) -> Option<BlockStart> {
        if parser.scanner.is_indented() {
            return None;
        }
        let level = atx_level(parser.scanner.rest_from_nonspace())?;
        let start = parser.scanner.next_nonspace();
        parser.scanner.advance_next_nonspace();
        parser.scanner.advance_offset(level, false);
        parser.scanner.find_next_nonspace();
        parser.scanner.advance_next_nonspace();

        parser.close_unmatched_blocks();
        let heading = parser.add_child(
            NodeValue::Heading {
                level: level as u8,
                setext: false,
            },
            start,
        );

        let rest = parser.scanner.rest_of_line();
        let text = strip_closing_sequence(rest);
        let mut content = ContentWriter::new();
        content.append(text, parser.scanner.pos());
        parser.side_table.insert(heading, content);
        parser.scanner.advance_to_line_end();
        Some(BlockStart::Leaf)
    }

    fn try_continue_block(&self, _parser: &mut BlockParser<'_>, _node: NodeId) -> BlockContinue {
        BlockContinue::NotMatched
    }

    fn finish_block(&self, parser: &mut BlockParser<'_>, node: NodeId) {
        let content = parser
            .side_table
            .remove::<ContentWriter>(node)
            .unwrap_or_default();
        parser.queue_inlines(node, content);
    }

    fn accepts_lines(&self) -> bool {
        true
    }

    fn add_line(&self, _parser: &mut BlockParser<'_>, _node: NodeId) {}
}

pub(crate) struct SetextHeadings;

impl BlockSyntax for SetextHeadings {
    fn name(&self) -> &'static str {
        "setext-heading"
    }

    fn try_start_block(&self, parser: &mut BlockParser<'_>, container: NodeId) -> Option<BlockStart> {
        if parser.scanner.is_indented() || parser.doc.kind(container) != SyntaxKind::Paragraph {
            return None;
        }
        let rest = parser.scanner.rest_from_nonspace();
        if !SETEXT_UNDERLINE.is_match(rest) {
            return None;
        }
        let level = if rest.starts_with('=') { 1 } else { 2 };

        parser.close_unmatched_blocks();
        let mut content = parser.side_table.remove::<ContentWriter>(container)?;
        reference_definitions::extract(parser, container, &mut content);
        if content.is_blank() {
            // Only definitions: the underline is ordinary text or a thematic break.
            parser.side_table.insert(container, content);
            return None;
        }
        content.trim_end();
        if let Some(span) = content.source_span() {
            parser.doc.set_span(container, Some(span));
        }
        parser.side_table.insert(container, content);

        parser.replace_tip(NodeValue::Heading {
            level,
            setext: true,
        });
        log::debug!("paragraph became a level {} setext heading", level);
        parser.scanner.advance_to_line_end();
        Some(BlockStart::Leaf)
    }

    fn try_continue_block(&self, _parser: &mut BlockParser<'_>, _node: NodeId) -> BlockContinue {
        BlockContinue::NotMatched
    }

    fn finish_block(&self, parser: &mut BlockParser<'_>, node: NodeId) {
        let content = parser
            .side_table
            .remove::<ContentWriter>(node)
            .unwrap_or_default();
        parser.queue_inlines(node, content);
    }

    fn accepts_lines(&self) -> bool {
        true
    }

    fn add_line(&self, _parser: &mut BlockParser<'_>, _node: NodeId) {}
}
