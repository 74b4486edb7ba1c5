//! Table node wrappers and the derived, version-cached cell properties.

use super::ast::{ast_node, support};
use super::{AstNode, Document, NodeValue, TableAlignment};

ast_node!(
    /// GFM pipe table.
    Table,
    Table
);

ast_node!(TableRow, TableRow);

ast_node!(TableCell, TableCell);

impl Table {
    pub fn alignments<'d>(&self, doc: &'d Document) -> &'d [TableAlignment] {
        match doc.value(self.0) {
            NodeValue::Table { alignments } => alignments,
            _ => unreachable!("Table handle on a non-table node"),
        }
    }

    pub fn set_alignment(&self, doc: &mut Document, column: usize, alignment: TableAlignment) {
        doc.update(self.0, |value| {
            if let NodeValue::Table { alignments } = value {
                if alignments.len() <= column {
                    alignments.resize(column + 1, TableAlignment::None);
                }
                alignments[column] = alignment;
            }
        });
    }

    /// Returns all table rows, header first.
    pub fn rows<'d>(&self, doc: &'d Document) -> impl Iterator<Item = TableRow> + 'd {
        support::children(doc, self.0)
    }

    pub fn header_row(&self, doc: &Document) -> Option<TableRow> {
        support::child(doc, self.0)
    }
}

impl TableRow {
    pub fn is_header(&self, doc: &Document) -> bool {
        matches!(doc.value(self.0), NodeValue::TableRow { header: true })
    }

    pub fn cells<'d>(&self, doc: &'d Document) -> impl Iterator<Item = TableCell> + 'd {
        support::children(doc, self.0)
    }

    /// Number of cells in the row, cached until the row changes.
    pub fn column_count(&self, doc: &Document) -> usize {
        let data = doc.node_data(self.0);
        let version = data.version;
        if let Some((cached_version, count)) = data.cache.get()
            && cached_version == version
        {
            return count;
        }
        let count = doc.child_count(self.0);
        data.cache.set(Some((version, count)));
        count
    }

    pub fn table(&self, doc: &Document) -> Option<Table> {
        doc.parent(self.0).and_then(|parent| Table::cast(doc, parent))
    }
}

impl TableCell {
    pub fn row(&self, doc: &Document) -> Option<TableRow> {
        doc.parent(self.0).and_then(|parent| TableRow::cast(doc, parent))
    }

    /// Position of the cell among its row's cells, cached against the row's version.
    pub fn column_index(&self, doc: &Document) -> Option<usize> {
        let row = doc.parent(self.0)?;
        let row_version = doc.version(row);
        let data = doc.node_data(self.0);
        if let Some((cached_version, index)) = data.cache.get()
            && cached_version == row_version
        {
            return Some(index);
        }
        let index = doc.children(row).position(|child| child == self.0)?;
        data.cache.set(Some((row_version, index)));
        Some(index)
    }

    /// Alignment of the cell's column, or `None` alignment when detached.
    pub fn alignment(&self, doc: &Document) -> TableAlignment {
        let Some(index) = self.column_index(doc) else {
            return TableAlignment::None;
        };
        self.row(doc)
            .and_then(|row| row.table(doc))
            .and_then(|table| table.alignments(doc).get(index).copied())
            .unwrap_or_default()
    }
}
