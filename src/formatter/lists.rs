use indextree::NodeId;

use crate::error::RenderError;
use crate::syntax::{AstNode, List, ListKind, NodeValue};

use super::core::Formatter;
use super::utils::indent_lines;

/// The bullet or delimiter a list is written with. A list that directly
/// follows another list of the same kind switches characters so the two
/// stay separate lists.
fn marker_kind(kind: ListKind, previous: Option<ListKind>) -> ListKind {
    if previous != Some(kind) {
        return kind;
    }
    match kind {
        ListKind::Bullet('-') => ListKind::Bullet('*'),
        ListKind::Bullet(_) => ListKind::Bullet('-'),
        ListKind::Ordered { delimiter: '.' } => ListKind::Ordered { delimiter: ')' },
        ListKind::Ordered { .. } => ListKind::Ordered { delimiter: '.' },
    }
}

fn item_marker(kind: ListKind, number: u64) -> String {
    match kind {
        ListKind::Bullet(ch) => ch.to_string(),
        ListKind::Ordered { delimiter } => format!("{}{}", number, delimiter),
    }
}

impl<'d> Formatter<'d> {
    pub(super) fn format_list(&self, node: NodeId) -> Result<String, RenderError> {
        let doc = self.doc;
        let Some(list) = List::cast(doc, node) else {
            return Ok(String::new());
        };
        let marker = list.marker(doc);
        let previous = doc
            .previous_sibling(node)
            .and_then(|sibling| List::cast(doc, sibling))
            .map(|sibling| sibling.marker(doc).kind);
        let kind = marker_kind(marker.kind, previous);
        let separator = if marker.tight { "\n" } else { "\n\n" };
        log::trace!(
            "formatting {} list with {} items",
            if marker.tight { "tight" } else { "loose" },
            doc.child_count(node)
        );

        let mut output = String::new();
        for (i, item) in list.items(doc).enumerate() {
            if i > 0 {
                output.push_str(separator);
            }
            let number = marker.start.saturating_add(i as u64);
            let marker_text = item_marker(kind, number);

            let mut content = self.format_blocks(item.id(), separator)?;
            if let NodeValue::ListItem {
                task: Some(checked),
                ..
            } = doc.value(item.id())
            {
                let checkbox = if *checked { "[x]" } else { "[ ]" };
                content = if content.is_empty() {
                    checkbox.to_string()
                } else {
                    format!("{} {}", checkbox, content)
                };
            }

            if content.is_empty() {
                output.push_str(&marker_text);
            } else {
                let first = format!("{} ", marker_text);
                let rest = " ".repeat(first.len());
                output.push_str(&indent_lines(&content, &first, &rest));
            }
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::formatter::format_document;
    use crate::parser::parse;

    fn format(input: &str) -> String {
        format_document(&parse(input, &Config::default())).unwrap()
    }

    #[test]
    fn adjacent_lists_alternate_markers() {
        assert_eq!(
            marker_kind(ListKind::Bullet('-'), Some(ListKind::Bullet('-'))),
            ListKind::Bullet('*')
        );
        assert_eq!(
            marker_kind(ListKind::Bullet('+'), Some(ListKind::Bullet('-'))),
            ListKind::Bullet('+')
        );
        assert_eq!(
            marker_kind(
                ListKind::Ordered { delimiter: '.' },
                Some(ListKind::Ordered { delimiter: '.' })
            ),
            ListKind::Ordered { delimiter: ')' }
        );
    }

    #[test]
    fn tight_and_loose_lists() {
        assert_eq!(format("- a\n- b\n"), "- a\n- b\n");
        assert_eq!(format("- a\n\n- b\n"), "- a\n\n- b\n");
        assert_eq!(format("1. a\n1. b\n"), "1. a\n2. b\n");
    }

    #[test]
    fn nested_content_is_indented_under_the_marker() {
        assert_eq!(
            format("- a\n  - b\n  - c\n- d\n"),
            "- a\n  - b\n  - c\n- d\n"
        );
        assert_eq!(format("10. a\n\n    b\n"), "10. a\n\n    b\n");
    }

    #[test]
    fn task_items() {
        assert_eq!(format("- [ ] todo\n- [x] done\n"), "- [ ] todo\n- [x] done\n");
    }

    #[test]
    fn fenced_code_in_items() {
        assert_eq!(
            format("- a\n\n  ```\n  x\n  ```\n"),
            "- a\n\n  ```\n  x\n  ```\n"
        );
    }
}
