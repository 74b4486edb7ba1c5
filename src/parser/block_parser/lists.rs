//! Bullet and ordered lists, with GFM task list items.
//!
//! One syntax owns both node kinds: a `List` opens implicitly in front of its
//! first item and stays matched for as long as its items keep continuing.

use std::sync::LazyLock;

use indextree::NodeId;
use regex::Regex;

use crate::syntax::{ElementKind, ListMarker, NodeValue, Span, SyntaxElement, SyntaxKind};

use super::utils::LineRange;
use super::{BlockContinue, BlockParser, BlockStart, BlockSyntax};

static TASK_CHECKBOX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([ xX])\][ \t]+").expect("invalid task checkbox regex"));

/// Read a bullet (`-`, `+`, `*`) or ordered (`1.`, `1)`) marker at the start
/// of `rest`. Returns the marker and its width in bytes.
pub(crate) fn try_parse_list_marker(rest: &str, in_paragraph: bool) -> Option<(ListMarker, usize)> {
    let first = rest.chars().next()?;
    let (marker, width) = if matches!(first, '-' | '+' | '*') {
        (ListMarker::bullet(first), 1)
    } else {
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 || digits > 9 {
            return None;
        }
        let delimiter = rest[digits..].chars().next().filter(|c| matches!(c, '.' | ')'))?;
        let start: u64 = rest[..digits].parse().ok()?;
        // Only a list starting at 1 may interrupt a paragraph.
        if in_paragraph && start != 1 {
            return None;
        }
        let mut marker = ListMarker::ordered(start, delimiter);
        marker.width = digits + 1;
        (marker, digits + 1)
    };

    let after = &rest[width..];
    if !matches!(after.chars().next(), None | Some(' ' | '\t')) {
        return None;
    }
    // An empty item cannot interrupt a paragraph.
    if in_paragraph && after.trim_matches([' ', '\t']).is_empty() {
        return None;
    }
    Some((marker, width))
}

pub(crate) struct Lists;

impl Lists {
    fn start_item(&self, parser: &mut BlockParser<'_>, container: NodeId) -> Option<BlockStart> {
        if parser.scanner.is_indented() {
            return None;
        }
        let in_paragraph = parser.doc.kind(container) == SyntaxKind::Paragraph;
        let (mut marker, width) =
            try_parse_list_marker(parser.scanner.rest_from_nonspace(), in_paragraph)?;
        marker.marker_offset = parser.scanner.indent();
        let start = parser.scanner.next_nonspace();
        let marker_text = &parser.scanner.rest_from_nonspace()[..width];

        parser.scanner.advance_next_nonspace();
        parser.scanner.advance_offset(width, true);
        // Columns of whitespace after the marker, counting at most five.
        let (spaces_after_marker, blank_item) = parser.scanner.look_ahead(|scanner| {
            let start_column = scanner.column();
            loop {
                scanner.advance_offset(1, true);
                let more = matches!(scanner.peek(), Some(' ' | '\t'));
                if !more || scanner.column() - start_column >= 5 {
                    break;
                }
            }
            (scanner.column() - start_column, scanner.peek().is_none())
        });
        if spaces_after_marker >= 5 || spaces_after_marker < 1 || blank_item {
            // Content starts one space after the marker; anything more is
            // indentation inside the item (or the item is empty).
            marker.padding = width + 1;
            if matches!(parser.scanner.peek(), Some(' ' | '\t')) {
                parser.scanner.advance_offset(1, true);
            }
        } else {
            marker.padding = width + spaces_after_marker;
            parser.scanner.advance_offset(spaces_after_marker, true);
        }

        parser.close_unmatched_blocks();
        let continues_list = matches!(
            parser.doc.value(parser.tip()),
            NodeValue::List(open) if open.matches(&marker)
        );
        if !continues_list {
            log::debug!("new {} list", if marker.is_ordered() { "ordered" } else { "bullet" });
            parser.add_child(NodeValue::List(marker.clone()), start);
        }
        let item = parser.add_child(
            NodeValue::ListItem { marker, task: None },
            start,
        );
        parser.doc.attach_element(
            item,
            SyntaxElement::new(
                ElementKind::Marker,
                marker_text,
                Some(Span::new(start, start + width)),
            ),
        );

        if parser.config.extensions.task_lists && !parser.scanner.partially_consumed_tab() {
            return Some(self.try_task_checkbox(parser, item).unwrap_or(BlockStart::Container));
        }
        Some(BlockStart::Container)
    }

    /// Consume a `[ ]` / `[x]` checkbox at the start of the item's content and
    /// open its paragraph directly, so the rest of the line is plain text.
    fn try_task_checkbox(&self, parser: &mut BlockParser<'_>, item: NodeId) -> Option<BlockStart> {
        let rest = parser.scanner.rest_of_line();
        let captures = TASK_CHECKBOX.captures(rest)?;
        let matched = captures.get(0)?;
        if rest[matched.end()..].trim().is_empty() {
            return None;
        }
        let checked = captures.get(1).is_some_and(|m| m.as_str() != " ");
        let box_start = parser.scanner.pos();

        parser.doc.update(item, |value| {
            if let NodeValue::ListItem { task, .. } = value {
                *task = Some(checked);
            }
        });
        parser.doc.attach_element(
            item,
            SyntaxElement::new(
                ElementKind::Marker,
                &rest[..3],
                Some(Span::new(box_start, box_start + 3)),
            ),
        );
        parser.scanner.advance_offset(rest[..matched.end()].chars().count(), true);
        let start = parser.scanner.pos();
        parser.add_paragraph(start);
        log::trace!("task list item, checked: {}", checked);
        Some(BlockStart::Leaf)
    }

    fn continue_item(&self, parser: &mut BlockParser<'_>, item: NodeId) -> BlockContinue {
        let content_indent = match parser.doc.value(item) {
            NodeValue::ListItem { marker, .. } => marker.marker_offset + marker.padding,
            _ => return BlockContinue::NotMatched,
        };
        if parser.scanner.is_blank() {
            if parser.doc.first_child(item).is_none() {
                // An item can begin with at most one blank line.
                return BlockContinue::NotMatched;
            }
            parser.scanner.advance_next_nonspace();
        } else if parser.scanner.indent() >= content_indent {
            parser.scanner.advance_offset(content_indent, true);
        } else {
            return BlockContinue::NotMatched;
        }
        BlockContinue::Matched
    }

    fn finish_item(&self, parser: &mut BlockParser<'_>, item: NodeId) {
        let last_child = parser
            .doc
            .children(item)
            .filter_map(|child| parser.line_range(child).map(|range| (child, range)))
            .last();
        let Some(range) = parser.line_range(item) else {
            return;
        };
        let (end_line, end) = match last_child {
            Some((child, child_range)) => (
                child_range.end,
                parser.doc.span(child).map(|span| span.end),
            ),
            None => (range.start, parser.line_end(range.start)),
        };
        parser.side_table.insert(
            item,
            LineRange {
                start: range.start,
                end: end_line,
            },
        );
        if let Some(end) = end {
            parser.set_span_end(item, end);
        }
    }

    fn finish_list(&self, parser: &mut BlockParser<'_>, list: NodeId) {
        let items: Vec<NodeId> = parser.doc.children(list).collect();
        let tight = !items.iter().enumerate().any(|(index, &item)| {
            let item_gap = index + 1 < items.len()
                && ends_with_blank_line(parser, item, items[index + 1]);
            item_gap || children_separated_by_blank_lines(parser, item)
        });

        if let Some(&last) = items.last() {
            if let (Some(range), Some(last_range)) = (parser.line_range(list), parser.line_range(last)) {
                parser.side_table.insert(
                    list,
                    LineRange {
                        start: range.start,
                        end: last_range.end,
                    },
                );
            }
            if let Some(span) = parser.doc.span(last) {
                parser.set_span_end(list, span.end);
            }
        }

        log::debug!("list finished, tight: {}", tight);
        parser.doc.update(list, |value| {
            if let NodeValue::List(marker) = value {
                marker.tight = tight;
            }
        });
        for item in items {
            parser.doc.update(item, |value| {
                if let NodeValue::ListItem { marker, .. } = value {
                    marker.tight = tight;
                }
            });
        }
    }
}

/// Whether a blank line separates `block` from the `next` sibling.
fn ends_with_blank_line(parser: &BlockParser<'_>, block: NodeId, next: NodeId) -> bool {
    match (parser.line_range(block), parser.line_range(next)) {
        (Some(block), Some(next)) => block.end + 1 != next.start,
        _ => false,
    }
}

fn children_separated_by_blank_lines(parser: &BlockParser<'_>, item: NodeId) -> bool {
    let ranges: Vec<LineRange> = parser
        .doc
        .children(item)
        .filter_map(|child| parser.line_range(child))
        .collect();
    ranges
        .windows(2)
        .any(|pair| pair[0].end + 1 != pair[1].start)
}

impl BlockSyntax for Lists {
    fn name(&self) -> &'static str {
        "list"
    }

    fn try_start_block(&self, parser: &mut BlockParser<'_>, container: NodeId) -> Option<BlockStart> {
        self.start_item(parser, container)
    }

    fn try_continue_block(&self, parser: &mut BlockParser<'_>, node: NodeId) -> BlockContinue {
        match parser.doc.kind(node) {
            SyntaxKind::List => BlockContinue::Matched,
            _ => self.continue_item(parser, node),
        }
    }

    fn finish_block(&self, parser: &mut BlockParser<'_>, node: NodeId) {
        match parser.doc.kind(node) {
            SyntaxKind::List => self.finish_list(parser, node),
            _ => self.finish_item(parser, node),
        }
    }
}
