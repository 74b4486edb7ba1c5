use indextree::NodeId;
use unicode_width::UnicodeWidthStr;

use crate::error::RenderError;
use crate::syntax::{AstNode, Table, TableAlignment};

use super::core::Formatter;
use super::inline::InlineContext;

/// Calculate the maximum width needed for each column
fn calculate_column_widths(rows: &[Vec<String>], columns: usize) -> Vec<usize> {
    let mut widths = vec![3; columns]; // Minimum width of 3 for "---"
    for row in rows {
        for (col_idx, cell) in row.iter().enumerate().take(columns) {
            widths[col_idx] = widths[col_idx].max(cell.width());
        }
    }
    widths
}

fn pad_cell(cell: &str, width: usize, alignment: TableAlignment) -> String {
    let total_padding = width.saturating_sub(cell.width());
    match alignment {
        TableAlignment::None | TableAlignment::Left => {
            format!("{}{}", cell, " ".repeat(total_padding))
        }
        TableAlignment::Right => format!("{}{}", " ".repeat(total_padding), cell),
        TableAlignment::Center => {
            let left_padding = total_padding / 2;
            let right_padding = total_padding - left_padding;
            format!(
                "{}{}{}",
                " ".repeat(left_padding),
                cell,
                " ".repeat(right_padding)
            )
        }
    }
}

fn delimiter_cell(width: usize, alignment: TableAlignment) -> String {
    match alignment {
        TableAlignment::Left => format!(":{:-<width$}", "", width = width - 1),
        TableAlignment::Right => format!("{:->width$}:", "", width = width - 1),
        TableAlignment::Center => format!(":{:-<width$}:", "", width = width - 2),
        TableAlignment::None => format!("{:-<width$}", "", width = width),
    }
}

impl<'d> Formatter<'d> {
    pub(super) fn format_table(&self, node: NodeId) -> Result<String, RenderError> {
        let doc = self.doc;
        let Some(table) = Table::cast(doc, node) else {
            return Ok(String::new());
        };
        let alignments = table.alignments(doc);

        let mut rows = Vec::new();
        for row in table.rows(doc) {
            let mut cells = Vec::new();
            for cell in row.cells(doc) {
                cells.push(self.format_inlines(cell.id(), InlineContext::TableCell)?);
            }
            rows.push(cells);
        }
        let columns = rows
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(alignments.len());
        let widths = calculate_column_widths(&rows, columns);

        let mut lines = Vec::with_capacity(rows.len() + 1);
        for (row_idx, row) in rows.iter().enumerate() {
            let mut line = String::from("|");
            for (col_idx, width) in widths.iter().enumerate() {
                let cell = row.get(col_idx).map(String::as_str).unwrap_or_default();
                // Header row: always left-align
                let alignment = if row_idx == 0 {
                    TableAlignment::None
                } else {
                    alignments.get(col_idx).copied().unwrap_or_default()
                };
                line.push(' ');
                line.push_str(&pad_cell(cell, *width, alignment));
                line.push_str(" |");
            }
            lines.push(line);

            if row_idx == 0 {
                let mut separator = String::from("|");
                for (col_idx, width) in widths.iter().enumerate() {
                    let alignment = alignments.get(col_idx).copied().unwrap_or_default();
                    separator.push(' ');
                    separator.push_str(&delimiter_cell(*width, alignment));
                    separator.push_str(" |");
                }
                lines.push(separator);
            }
        }
        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::formatter::format_document;
    use crate::parser::parse;

    #[test]
    fn delimiter_cells_carry_alignment() {
        assert_eq!(delimiter_cell(3, TableAlignment::None), "---");
        assert_eq!(delimiter_cell(4, TableAlignment::Left), ":---");
        assert_eq!(delimiter_cell(5, TableAlignment::Center), ":---:");
        assert_eq!(delimiter_cell(3, TableAlignment::Right), "--:");
    }

    #[test]
    fn cells_pad_to_column_width() {
        assert_eq!(pad_cell("a", 3, TableAlignment::Right), "  a");
        assert_eq!(pad_cell("a", 4, TableAlignment::Center), " a  ");
        assert_eq!(pad_cell("漢", 3, TableAlignment::Left), "漢 ");
    }

    #[test]
    fn tables_are_aligned() {
        let doc = parse("a|bb\n-|:-:\nccc|d\n", &Config::default());
        assert_eq!(
            format_document(&doc).unwrap(),
            "| a   | bb  |\n| --- | :-: |\n| ccc |  d  |\n"
        );
    }

    #[test]
    fn pipes_in_cells_stay_escaped() {
        let doc = parse("| a \\| b | `c\\|d` |\n| --- | --- |\n", &Config::default());
        assert_eq!(
            format_document(&doc).unwrap(),
            "| a \\| b | `c\\|d` |\n| ------ | ------ |\n"
        );
    }
}
