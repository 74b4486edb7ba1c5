//! Heading node wrapper.

use super::ast::ast_node;
use super::{Document, NodeValue, TreeError};

ast_node!(
    /// ATX (`## title`) or setext (`title\n---`) heading.
    Heading,
    Heading
);

impl Heading {
    /// Returns the heading level (1-6).
    pub fn level(&self, doc: &Document) -> u8 {
        match doc.value(self.0) {
            NodeValue::Heading { level, .. } => *level,
            _ => unreachable!("Heading handle on a non-heading node"),
        }
    }

    pub fn is_setext(&self, doc: &Document) -> bool {
        matches!(doc.value(self.0), NodeValue::Heading { setext: true, .. })
    }

    pub fn set_level(&self, doc: &mut Document, new_level: u8) -> Result<(), TreeError> {
        if !(1..=6).contains(&new_level) {
            return Err(TreeError::InvalidHeadingLevel(new_level));
        }
        doc.update(self.0, |value| {
            if let NodeValue::Heading { level, setext } = value {
                *level = new_level;
                // Setext underlines only express levels 1 and 2.
                if new_level > 2 {
                    *setext = false;
                }
            }
        });
        Ok(())
    }

    /// Returns the heading text as a string.
    pub fn text(&self, doc: &Document) -> String {
        doc.text_content(self.0)
    }
}
