//! Documentation tag wrappers: `@remarks` blocks, `@beta` modifiers and
//! `{@link ...}` inline tags.

use std::sync::LazyLock;

use regex::Regex;

use super::ast::ast_node;
use super::{Document, ElementKind, NodeValue, TreeError};

static TAG_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@[A-Za-z][A-Za-z0-9]*$").expect("invalid tag name regex"));

/// Whether `name` is a well-formed tag name such as `@param`.
pub fn is_valid_tag_name(name: &str) -> bool {
    TAG_NAME.is_match(name)
}

fn validate(name: &str) -> Result<(), TreeError> {
    if is_valid_tag_name(name) {
        Ok(())
    } else {
        Err(TreeError::InvalidTagName(name.to_string()))
    }
}

ast_node!(
    /// A block tag section; its children are the section's blocks.
    BlockTag,
    BlockTag
);

ast_node!(ModifierTag, ModifierTag);

ast_node!(InlineTag, InlineTag);

impl BlockTag {
    pub fn tag_name<'d>(&self, doc: &'d Document) -> &'d str {
        match doc.value(self.0) {
            NodeValue::BlockTag { tag_name, .. } => tag_name,
            _ => unreachable!("BlockTag handle on a non-tag node"),
        }
    }

    /// The documented parameter, for `@param name - ...` and `@typeParam`.
    pub fn parameter_name<'d>(&self, doc: &'d Document) -> Option<&'d str> {
        match doc.value(self.0) {
            NodeValue::BlockTag { parameter_name, .. } => parameter_name.as_deref(),
            _ => None,
        }
    }

    pub fn set_tag_name(&self, doc: &mut Document, name: &str) -> Result<(), TreeError> {
        validate(name)?;
        doc.update(self.0, |value| {
            if let NodeValue::BlockTag { tag_name, .. } = value {
                *tag_name = name.to_string();
            }
        });
        doc.set_element_text(self.0, ElementKind::TagName, name);
        Ok(())
    }

    pub fn set_parameter_name(&self, doc: &mut Document, name: Option<&str>) {
        doc.update(self.0, |value| {
            if let NodeValue::BlockTag { parameter_name, .. } = value {
                *parameter_name = name.map(str::to_string);
            }
        });
        if let Some(name) = name {
            doc.set_element_text(self.0, ElementKind::ParameterName, name);
        }
    }
}

impl ModifierTag {
    pub fn tag_name<'d>(&self, doc: &'d Document) -> &'d str {
        match doc.value(self.0) {
            NodeValue::ModifierTag { tag_name } => tag_name,
            _ => unreachable!("ModifierTag handle on a non-tag node"),
        }
    }

    pub fn set_tag_name(&self, doc: &mut Document, name: &str) -> Result<(), TreeError> {
        validate(name)?;
        doc.update(self.0, |value| {
            if let NodeValue::ModifierTag { tag_name } = value {
                *tag_name = name.to_string();
            }
        });
        doc.set_element_text(self.0, ElementKind::TagName, name);
        Ok(())
    }
}

impl InlineTag {
    pub fn tag_name<'d>(&self, doc: &'d Document) -> &'d str {
        match doc.value(self.0) {
            NodeValue::InlineTag { tag_name, .. } => tag_name,
            _ => unreachable!("InlineTag handle on a non-tag node"),
        }
    }

    /// The link target of `{@link target | text}`.
    pub fn destination<'d>(&self, doc: &'d Document) -> Option<&'d str> {
        match doc.value(self.0) {
            NodeValue::InlineTag { destination, .. } => destination.as_deref(),
            _ => None,
        }
    }

    /// Raw content of tags that are not link-like, e.g. `{@inheritDoc Base.method}`.
    pub fn content<'d>(&self, doc: &'d Document) -> Option<&'d str> {
        match doc.value(self.0) {
            NodeValue::InlineTag { content, .. } => content.as_deref(),
            _ => None,
        }
    }

    /// Whether the tag carries link text as inline children.
    pub fn is_link_like(&self, doc: &Document) -> bool {
        self.destination(doc).is_some()
    }

    pub fn set_tag_name(&self, doc: &mut Document, name: &str) -> Result<(), TreeError> {
        validate(name)?;
        doc.update(self.0, |value| {
            if let NodeValue::InlineTag { tag_name, .. } = value {
                *tag_name = name.to_string();
            }
        });
        doc.set_element_text(self.0, ElementKind::TagName, name);
        Ok(())
    }

    pub fn set_destination(&self, doc: &mut Document, target: &str) {
        doc.update(self.0, |value| {
            if let NodeValue::InlineTag { destination, .. } = value {
                *destination = Some(target.to_string());
            }
        });
        doc.set_element_text(self.0, ElementKind::Destination, target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::AstNode;

    #[test]
    fn tag_names_are_validated() {
        assert!(is_valid_tag_name("@param"));
        assert!(is_valid_tag_name("@typeParam2"));
        assert!(!is_valid_tag_name("param"));
        assert!(!is_valid_tag_name("@2d"));
        assert!(!is_valid_tag_name("@type-param"));
        assert!(!is_valid_tag_name("@"));
    }

    #[test]
    fn rejected_rename_keeps_old_name() {
        let mut doc = Document::new();
        let id = doc.create(NodeValue::BlockTag {
            tag_name: "@remarks".into(),
            parameter_name: None,
        });
        let tag = BlockTag::cast(&doc, id).unwrap();
        assert_eq!(
            tag.set_tag_name(&mut doc, "remarks"),
            Err(TreeError::InvalidTagName("remarks".into()))
        );
        assert_eq!(tag.tag_name(&doc), "@remarks");
        tag.set_tag_name(&mut doc, "@example").unwrap();
        assert_eq!(tag.tag_name(&doc), "@example");
        assert_eq!(
            doc.element(id, ElementKind::TagName).map(|e| e.text.as_str()),
            Some("@example")
        );
    }
}
