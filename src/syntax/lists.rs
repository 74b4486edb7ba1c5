//! List marker data shared by `List` and `ListItem` nodes, and their wrappers.

use super::ast::{ast_node, support};
use super::{AstNode, Document, NodeValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// `-`, `+` or `*`
    Bullet(char),
    /// `1.` or `1)`
    Ordered { delimiter: char },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMarker {
    pub kind: ListKind,
    /// First number of an ordered list; 1 for bullets.
    pub start: u64,
    pub tight: bool,
    /// Columns of indentation before the marker.
    pub marker_offset: usize,
    /// Width of the marker itself in columns (`-` is 1, `10.` is 3).
    pub width: usize,
    /// Marker width plus the spaces that follow it; content starts here.
    pub padding: usize,
}

impl ListMarker {
    pub fn bullet(ch: char) -> Self {
        Self {
            kind: ListKind::Bullet(ch),
            start: 1,
            tight: true,
            marker_offset: 0,
            width: 1,
            padding: 2,
        }
    }

    pub fn ordered(start: u64, delimiter: char) -> Self {
        let width = start.to_string().len() + 1;
        Self {
            kind: ListKind::Ordered { delimiter },
            start,
            tight: true,
            marker_offset: 0,
            width,
            padding: width + 1,
        }
    }

    pub fn is_ordered(&self) -> bool {
        matches!(self.kind, ListKind::Ordered { .. })
    }

    /// Two markers continue the same list when their kind and delimiter agree.
    pub fn matches(&self, other: &ListMarker) -> bool {
        self.kind == other.kind
    }
}

ast_node!(
    /// A run of list items sharing one marker kind.
    List,
    List
);

ast_node!(ListItem, ListItem);

impl List {
    pub fn marker<'d>(&self, doc: &'d Document) -> &'d ListMarker {
        match doc.value(self.0) {
            NodeValue::List(marker) => marker,
            _ => unreachable!("List handle on a non-list node"),
        }
    }

    pub fn is_ordered(&self, doc: &Document) -> bool {
        self.marker(doc).is_ordered()
    }

    pub fn is_tight(&self, doc: &Document) -> bool {
        self.marker(doc).tight
    }

    pub fn set_tight(&self, doc: &mut Document, tight: bool) {
        doc.update(self.0, |value| {
            if let NodeValue::List(marker) = value {
                marker.tight = tight;
            }
        });
    }

    pub fn start(&self, doc: &Document) -> u64 {
        self.marker(doc).start
    }

    pub fn set_start(&self, doc: &mut Document, start: u64) {
        doc.update(self.0, |value| {
            if let NodeValue::List(marker) = value {
                marker.start = start;
            }
        });
    }

    pub fn items<'d>(&self, doc: &'d Document) -> impl Iterator<Item = ListItem> + 'd {
        support::children(doc, self.0)
    }
}

impl ListItem {
    pub fn marker<'d>(&self, doc: &'d Document) -> &'d ListMarker {
        match doc.value(self.0) {
            NodeValue::ListItem { marker, .. } => marker,
            _ => unreachable!("ListItem handle on a non-item node"),
        }
    }

    /// `Some(checked)` for task list items.
    pub fn task(&self, doc: &Document) -> Option<bool> {
        match doc.value(self.0) {
            NodeValue::ListItem { task, .. } => *task,
            _ => None,
        }
    }

    pub fn set_task(&self, doc: &mut Document, state: Option<bool>) {
        doc.update(self.0, |value| {
            if let NodeValue::ListItem { task, .. } = value {
                *task = state;
            }
        });
    }

    pub fn list(&self, doc: &Document) -> Option<List> {
        doc.parent(self.0).and_then(|parent| List::cast(doc, parent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_match_by_kind_and_delimiter() {
        assert!(ListMarker::bullet('-').matches(&ListMarker::bullet('-')));
        assert!(!ListMarker::bullet('-').matches(&ListMarker::bullet('*')));
        assert!(ListMarker::ordered(1, '.').matches(&ListMarker::ordered(7, '.')));
        assert!(!ListMarker::ordered(1, '.').matches(&ListMarker::ordered(1, ')')));
    }

    #[test]
    fn ordered_width_counts_digits() {
        let marker = ListMarker::ordered(10, '.');
        assert_eq!(marker.width, 3);
        assert_eq!(marker.padding, 4);
    }

    #[test]
    fn task_state_is_editable() {
        let mut doc = Document::new();
        let list = doc.create(NodeValue::List(ListMarker::bullet('-')));
        let item = doc.create(NodeValue::ListItem {
            marker: ListMarker::bullet('-'),
            task: Some(false),
        });
        assert!(doc.append_child(list, item));
        let handle = ListItem::cast(&doc, item).unwrap();
        handle.set_task(&mut doc, Some(true));
        assert_eq!(handle.task(&doc), Some(true));
        assert!(handle.list(&doc).unwrap().is_tight(&doc));
    }
}
