//! Wrappers for leaf blocks with editable payloads and for text runs.

use super::ast::ast_node;
use super::{Document, Fence, NodeValue, TreeError};

ast_node!(CodeBlock, CodeBlock);

ast_node!(ThematicBreak, ThematicBreak);

ast_node!(Paragraph, Paragraph);

ast_node!(
    /// A plain text run.
    Text,
    Text
);

impl CodeBlock {
    pub fn is_fenced(&self, doc: &Document) -> bool {
        self.fence(doc).is_some()
    }

    pub fn fence<'d>(&self, doc: &'d Document) -> Option<&'d Fence> {
        match doc.value(self.0) {
            NodeValue::CodeBlock { fence, .. } => fence.as_ref(),
            _ => None,
        }
    }

    pub fn info<'d>(&self, doc: &'d Document) -> &'d str {
        match doc.value(self.0) {
            NodeValue::CodeBlock { info, .. } => info,
            _ => unreachable!("CodeBlock handle on a non-code node"),
        }
    }

    /// First word of the info string.
    pub fn language<'d>(&self, doc: &'d Document) -> Option<&'d str> {
        self.info(doc).split_whitespace().next()
    }

    pub fn literal<'d>(&self, doc: &'d Document) -> &'d str {
        match doc.value(self.0) {
            NodeValue::CodeBlock { literal, .. } => literal,
            _ => unreachable!("CodeBlock handle on a non-code node"),
        }
    }

    pub fn set_literal(&self, doc: &mut Document, text: &str) {
        doc.update(self.0, |value| {
            if let NodeValue::CodeBlock { literal, .. } = value {
                *literal = text.to_string();
            }
        });
    }

    pub fn set_info(&self, doc: &mut Document, text: &str) {
        doc.update(self.0, |value| {
            if let NodeValue::CodeBlock { info, .. } = value {
                *info = text.to_string();
            }
        });
    }

    /// Turn the block into a fenced block with `length` fence characters.
    pub fn set_fence(&self, doc: &mut Document, ch: char, length: usize) -> Result<(), TreeError> {
        if length < 3 {
            return Err(TreeError::InvalidMarkerCount(length));
        }
        doc.update(self.0, |value| {
            if let NodeValue::CodeBlock { fence, .. } = value {
                *fence = Some(Fence {
                    ch,
                    length,
                    indent: 0,
                });
            }
        });
        Ok(())
    }
}

impl ThematicBreak {
    pub fn marker(&self, doc: &Document) -> char {
        match doc.value(self.0) {
            NodeValue::ThematicBreak { marker, .. } => *marker,
            _ => unreachable!("ThematicBreak handle on a non-break node"),
        }
    }

    pub fn count(&self, doc: &Document) -> usize {
        match doc.value(self.0) {
            NodeValue::ThematicBreak { count, .. } => *count,
            _ => unreachable!("ThematicBreak handle on a non-break node"),
        }
    }

    pub fn set_count(&self, doc: &mut Document, new_count: usize) -> Result<(), TreeError> {
        if new_count < 3 {
            return Err(TreeError::InvalidMarkerCount(new_count));
        }
        doc.update(self.0, |value| {
            if let NodeValue::ThematicBreak { count, .. } = value {
                *count = new_count;
            }
        });
        Ok(())
    }
}

impl Paragraph {
    pub fn text(&self, doc: &Document) -> String {
        doc.text_content(self.0)
    }
}

impl Text {
    pub fn text<'d>(&self, doc: &'d Document) -> &'d str {
        match doc.value(self.0) {
            NodeValue::Text(text) => text,
            _ => unreachable!("Text handle on a non-text node"),
        }
    }

    pub fn set_text(&self, doc: &mut Document, text: &str) {
        doc.update(self.0, |value| {
            if let NodeValue::Text(current) = value {
                *current = text.to_string();
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::AstNode;

    #[test]
    fn marker_counts_below_three_are_rejected() {
        let mut doc = Document::new();
        let id = doc.create(NodeValue::ThematicBreak {
            marker: '*',
            count: 3,
        });
        let rule = ThematicBreak::cast(&doc, id).unwrap();
        assert_eq!(
            rule.set_count(&mut doc, 2),
            Err(TreeError::InvalidMarkerCount(2))
        );
        rule.set_count(&mut doc, 5).unwrap();
        assert_eq!(rule.count(&doc), 5);
    }

    #[test]
    fn code_block_language_is_first_info_word() {
        let mut doc = Document::new();
        let id = doc.create(NodeValue::CodeBlock {
            fence: None,
            info: String::new(),
            literal: "x\n".into(),
        });
        let code = CodeBlock::cast(&doc, id).unwrap();
        assert!(!code.is_fenced(&doc));
        assert_eq!(code.language(&doc), None);
        code.set_fence(&mut doc, '`', 3).unwrap();
        code.set_info(&mut doc, "rust ignore");
        assert_eq!(code.language(&doc), Some("rust"));
        assert!(code.set_fence(&mut doc, '~', 1).is_err());
    }
}
