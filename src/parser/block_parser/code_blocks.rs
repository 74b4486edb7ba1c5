//! Fenced and indented code blocks.

use indextree::NodeId;

use crate::parser::content::ContentWriter;
use crate::syntax::{ElementKind, Fence, NodeValue, Span, SyntaxElement, SyntaxKind};
use crate::utils::unescape;

use super::utils::count_leading;
use super::{BlockContinue, BlockParser, BlockStart, BlockSyntax};

const CODE_INDENT: usize = 4;

/// Try to read an opening fence. Backtick fences may not carry a backtick
/// in their info string.
pub(crate) fn opening_fence(rest: &str) -> Option<(char, usize)> {
    let ch = rest.chars().next().filter(|c| matches!(c, '`' | '~'))?;
    let length = count_leading(rest, ch);
    if length < 3 {
        return None;
    }
    if ch == '`' && rest[length..].contains('`') {
        return None;
    }
    Some((ch, length))
}

/// Length of a closing fence made of `ch`, if the line is one.
fn closing_fence(rest: &str, ch: char) -> Option<usize> {
    let length = count_leading(rest, ch);
    if length < 3 || !rest[length..].trim_matches([' ', '\t']).is_empty() {
        return None;
    }
    Some(length)
}

pub(crate) struct FencedCode;

impl BlockSyntax for FencedCode {
    fn name(&self) -> &'static str {
        "fenced-code"
    }

    fn try_start_block(&self, parser: &mut BlockParser<'_>, _container: NodeId) -> Option<BlockStart> {
        if parser.scanner.is_indented() {
            return None;
        }
        let (ch, length) = opening_fence(parser.scanner.rest_from_nonspace())?;
        let indent = parser.scanner.indent();
        let start = parser.scanner.next_nonspace();

        parser.close_unmatched_blocks();
        parser.add_child(
            NodeValue::CodeBlock {
                fence: Some(Fence { ch, length, indent }),
                info: String::new(),
                literal: String::new(),
            },
            start,
        );
        parser.scanner.advance_next_nonspace();
        parser.scanner.advance_offset(length, false);
        Some(BlockStart::Leaf)
    }

    fn try_continue_block(&self, parser: &mut BlockParser<'_>, node: NodeId) -> BlockContinue {
        let Some(fence) = fence_of(parser, node) else {
            return BlockContinue::NotMatched;
        };
        if parser.scanner.indent() <= 3
            && parser.scanner.peek_nonspace() == Some(fence.ch)
            && let Some(length) = closing_fence(parser.scanner.rest_from_nonspace(), fence.ch)
            && length >= fence.length
        {
            log::trace!("closing fence at line {}", parser.line_number());
            parser.finish(parser.line_number());
            return BlockContinue::LineConsumed;
        }

        // Content lines lose up to as much indentation as the opening fence had.
        let mut remaining = fence.indent;
        while remaining > 0 && matches!(parser.scanner.peek(), Some(' ' | '\t')) {
            parser.scanner.advance_offset(1, true);
            remaining -= 1;
        }
        BlockContinue::Matched
    }

    fn finish_block(&self, parser: &mut BlockParser<'_>, node: NodeId) {
        let content = parser
            .side_table
            .remove::<ContentWriter>(node)
            .unwrap_or_default();
        let text = content.text();
        let (first_line, literal) = match text.find('\n') {
            Some(newline) => (&text[..newline], &text[newline + 1..]),
            None => (text, ""),
        };

        let trimmed = first_line.trim();
        let info = unescape(trimmed);
        if !trimmed.is_empty() {
            let offset = first_line.len() - first_line.trim_start().len();
            let span = content.span(offset, offset + trimmed.len());
            parser.doc.attach_element(
                node,
                SyntaxElement::new(ElementKind::InfoString, trimmed, Some(span)),
            );
        }

        let literal = literal.to_string();
        parser.doc.update(node, |value| {
            if let NodeValue::CodeBlock {
                info: slot_info,
                literal: slot_literal,
                ..
            } = value
            {
                *slot_info = info;
                *slot_literal = literal;
            }
        });
    }

    fn accepts_lines(&self) -> bool {
        true
    }
}

fn fence_of(parser: &BlockParser<'_>, node: NodeId) -> Option<Fence> {
    match parser.doc.value(node) {
        NodeValue::CodeBlock { fence, .. } => fence.clone(),
        _ => None,
    }
}

pub(crate) struct IndentedCode;

impl BlockSyntax for IndentedCode {
    fn name(&self) -> &'static str {
        "indented-code"
    }

    fn try_start_block(&self, parser: &mut BlockParser<'_>, _container: NodeId) -> Option<BlockStart> {
        if !parser.scanner.is_indented()
            || parser.scanner.is_blank()
            || matches!(parser.tip_kind(), SyntaxKind::Paragraph | SyntaxKind::Table)
        {
            return None;
        }
        parser.scanner.advance_offset(CODE_INDENT, true);
        parser.close_unmatched_blocks();
        let start = parser.scanner.pos();
        parser.add_child(
            NodeValue::CodeBlock {
                fence: None,
                info: String::new(),
                literal: String::new(),
            },
            start,
        );
        Some(BlockStart::Leaf)
    }

    fn try_continue_block(&self, parser: &mut BlockParser<'_>, _node: NodeId) -> BlockContinue {
        if parser.scanner.indent() >= CODE_INDENT {
            parser.scanner.advance_offset(CODE_INDENT, true);
        } else if parser.scanner.is_blank() {
            parser.scanner.advance_next_nonspace();
        } else {
            return BlockContinue::NotMatched;
        }
        BlockContinue::Matched
    }

    fn finish_block(&self, parser: &mut BlockParser<'_>, node: NodeId) {
        let content = parser
            .side_table
            .remove::<ContentWriter>(node)
            .unwrap_or_default();

        // Trailing blank lines belong to whatever follows.
        let text = content.text();
        let body = text.trim_end_matches(['\n', ' ']);
        let keep = text[body.len()..]
            .find('\n')
            .map_or(text.len(), |newline| body.len() + newline + 1);
        let literal = text[..keep].to_string();

        if let Some(span) = parser.doc.span(node) {
            let end = content.to_source_end(body.len()).max(span.start);
            parser.doc.set_span(node, Some(Span::new(span.start, end)));
        }
        parser.doc.update(node, |value| {
            if let NodeValue::CodeBlock {
                literal: slot_literal,
                ..
            } = value
            {
                *slot_literal = literal;
            }
        });
    }

    fn accepts_lines(&self) -> bool {
        true
    }
}
