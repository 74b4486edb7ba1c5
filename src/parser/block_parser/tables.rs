//! GFM pipe tables.
//!
//! ```markdown
//! | Left | Center | Right |
//! |:-----|:------:|------:|
//! | a    | b      | c     |
//! ```
//!
//! A table is only recognized when its delimiter row arrives: the last line
//! of the open paragraph is then reclassified as the header row.

use std::sync::LazyLock;

use indextree::NodeId;
use regex::Regex;

use crate::parser::content::ContentWriter;
use crate::syntax::{NodeValue, SyntaxKind, TableAlignment};

use super::utils::LineRange;
use super::{BlockContinue, BlockParser, BlockStart, BlockSyntax};

static DELIMITER_CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:?-+:?$").expect("invalid delimiter cell regex"));

/// Split a row into trimmed cell ranges. A leading and a trailing pipe are
/// optional; `\|` does not separate cells.
pub(crate) fn split_cells(text: &str) -> Vec<(usize, usize)> {
    let mut start = text.len() - text.trim_start().len();
    let mut end = text.trim_end().len();
    if end <= start {
        return vec![(start, start)];
    }
    if text[start..end].starts_with('|') {
        start += 1;
    }
    if end > start && text[start..end].ends_with('|') && !is_escaped(text, end - 1) {
        end -= 1;
    }

    let mut cells = Vec::new();
    let mut cell_start = start;
    let mut chars = text[start..end].char_indices();
    while let Some((offset, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '|' => {
                cells.push((cell_start, start + offset));
                cell_start = start + offset + 1;
            }
            _ => {}
        }
    }
    cells.push((cell_start, end));

    cells
        .into_iter()
        .map(|(from, to)| {
            let cell = &text[from..to];
            let leading = cell.len() - cell.trim_start_matches([' ', '\t']).len();
            let trimmed = cell.trim_matches([' ', '\t']).len();
            (from + leading, from + leading + trimmed)
        })
        .collect()
}

fn is_escaped(text: &str, index: usize) -> bool {
    let backslashes = text[..index].bytes().rev().take_while(|&b| b == b'\\').count();
    backslashes % 2 == 1
}

/// Alignments of a delimiter row, or `None` if the line is not one.
pub(crate) fn parse_delimiter_row(line: &str) -> Option<Vec<TableAlignment>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    split_cells(line)
        .into_iter()
        .map(|(start, end)| {
            let cell = &line[start..end];
            if !DELIMITER_CELL.is_match(cell) {
                return None;
            }
            Some(match (cell.starts_with(':'), cell.ends_with(':')) {
                (true, true) => TableAlignment::Center,
                (true, false) => TableAlignment::Left,
                (false, true) => TableAlignment::Right,
                (false, false) => TableAlignment::None,
            })
        })
        .collect()
}

pub(crate) struct Tables;

impl Tables {
    /// Append a row of cells built from `row`'s buffered text.
    fn add_row(
        parser: &mut BlockParser<'_>,
        table: NodeId,
        row: &ContentWriter,
        header: bool,
        line: usize,
    ) {
        let row_node = parser.doc.create(NodeValue::TableRow { header });
        let text = row.text();
        if !row.is_empty() {
            let start = text.len() - text.trim_start().len();
            let end = text.trim_end().len().max(start);
            parser.doc.set_span(row_node, Some(row.span(start, end)));
        }
        parser.doc.append_child(table, row_node);
        parser.side_table.insert(row_node, LineRange { start: line, end: line });

        for (start, end) in split_cells(text) {
            let cell = parser
                .doc
                .create_with_span(NodeValue::TableCell, Some(row.span(start, end)));
            parser.doc.append_child(row_node, cell);
            parser.side_table.insert(cell, row.slice(start, end));
        }
    }
}

impl BlockSyntax for Tables {
    fn name(&self) -> &'static str {
        "table"
    }

    fn try_start_block(&self, parser: &mut BlockParser<'_>, container: NodeId) -> Option<BlockStart> {
        if parser.scanner.is_indented() || parser.doc.kind(container) != SyntaxKind::Paragraph {
            return None;
        }
        let delimiter_line = parser.scanner.rest_from_nonspace();
        let alignments = parse_delimiter_row(delimiter_line)?;

        let content = parser.side_table.get::<ContentWriter>(container)?;
        let header_start = content.last_line_start();
        let header_line = content.last_line();
        if split_cells(header_line).len() != alignments.len() {
            return None;
        }
        if !header_line.contains('|') && !delimiter_line.contains('|') {
            return None;
        }

        let mut content = parser.side_table.remove::<ContentWriter>(container)?;
        let header = content.split_off(header_start);
        let line = parser.line_number();
        if content.is_empty() {
            parser.discard_tip();
        } else {
            // Earlier lines stay a paragraph of their own.
            parser.side_table.insert(container, content);
            parser.finish(line - 2);
        }

        let start = header.source_span().map_or(parser.scanner.pos(), |span| span.start);
        log::debug!("table with {} columns at line {}", alignments.len(), line - 1);
        let table = parser.add_child(NodeValue::Table { alignments }, start);
        parser.side_table.insert(
            table,
            LineRange {
                start: line - 1,
                end: line,
            },
        );
        Self::add_row(parser, table, &header, true, line - 1);
        parser.scanner.advance_to_line_end();
        Some(BlockStart::Leaf)
    }

    fn try_continue_block(&self, parser: &mut BlockParser<'_>, _node: NodeId) -> BlockContinue {
        if parser.scanner.is_blank() {
            BlockContinue::NotMatched
        } else {
            BlockContinue::Matched
        }
    }

    fn add_line(&self, parser: &mut BlockParser<'_>, node: NodeId) {
        let rest = parser.scanner.rest_of_line();
        if rest.trim().is_empty() {
            return;
        }
        let mut row = ContentWriter::new();
        row.append(rest, parser.scanner.pos());
        let line = parser.line_number();
        Self::add_row(parser, node, &row, false, line);
    }

    fn finish_block(&self, parser: &mut BlockParser<'_>, node: NodeId) {
        let columns = match parser.doc.value(node) {
            NodeValue::Table { alignments } => alignments.len(),
            _ => return,
        };
        let rows: Vec<NodeId> = parser.doc.children(node).collect();
        for &row in &rows {
            let cells: Vec<NodeId> = parser.doc.children(row).collect();
            if cells.len() > columns {
                log::trace!("truncating row from {} to {} cells", cells.len(), columns);
                for &extra in &cells[columns..] {
                    parser.side_table.remove::<ContentWriter>(extra);
                    parser.doc.remove_node(extra);
                }
            }
            for _ in cells.len()..columns {
                let filler = parser.doc.create(NodeValue::TableCell);
                parser.doc.append_child(row, filler);
            }
        }

        if let Some(last) = rows.last()
            && let Some(span) = parser.doc.span(*last)
        {
            parser.set_span_end(node, span.end);
        }

        for row in rows {
            let cells: Vec<NodeId> = parser.doc.children(row).collect();
            for cell in cells {
                let content = parser
                    .side_table
                    .remove::<ContentWriter>(cell)
                    .unwrap_or_default();
                parser.queue_inlines(cell, content);
            }
        }
    }

    fn accepts_lines(&self) -> bool {
        true
    }

    fn interruptible(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(text: &str) -> Vec<&str> {
        split_cells(text)
            .into_iter()
            .map(|(start, end)| &text[start..end])
            .collect()
    }

    #[test]
    fn splits_with_and_without_outer_pipes() {
        assert_eq!(cells("| a | b |"), vec!["a", "b"]);
        assert_eq!(cells("a | b"), vec!["a", "b"]);
        assert_eq!(cells("| a |  |\n"), vec!["a", ""]);
    }

    #[test]
    fn escaped_pipes_stay_in_the_cell() {
        assert_eq!(cells(r"| a \| b | c |"), vec![r"a \| b", "c"]);
        assert_eq!(cells(r"a | b \|"), vec!["a", r"b \|"]);
    }

    #[test]
    fn delimiter_rows() {
        assert_eq!(
            parse_delimiter_row("|:--|:-:|--:|---|"),
            Some(vec![
                TableAlignment::Left,
                TableAlignment::Center,
                TableAlignment::Right,
                TableAlignment::None,
            ])
        );
        assert_eq!(parse_delimiter_row("--- | ---"), Some(vec![TableAlignment::None; 2]));
        assert_eq!(parse_delimiter_row("| --- | x |"), None);
        assert_eq!(parse_delimiter_row("| : |"), None);
        assert_eq!(parse_delimiter_row(""), None);
    }
}
