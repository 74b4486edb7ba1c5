//! Link reference definitions and the document-wide index over them.
//!
//! The index keeps every attached `[label]: destination` definition per
//! normalized label. The definition a label resolves to is the first one in
//! document order; that answer is cached against the root's version, so any
//! structural edit (moving a definition, relabelling it, inserting an earlier
//! one) is picked up on the next lookup.

use std::cell::RefCell;
use std::collections::HashMap;

use indextree::NodeId;

use super::ast::ast_node;
use super::{Document, DocumentPosition, ElementKind, NodeValue};

/// Normalize a link label for matching: trim, collapse every internal
/// whitespace run to one space, and case-fold.
pub fn normalize_label(label: &str) -> String {
    let collapsed = label.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase().to_uppercase().to_lowercase()
}

#[derive(Debug, Default)]
pub struct LinkReferenceIndex {
    by_label: HashMap<String, Vec<NodeId>>,
    first: RefCell<HashMap<String, (u64, NodeId)>>,
}

impl LinkReferenceIndex {
    pub(crate) fn insert(&mut self, key: String, id: NodeId) {
        let entries = self.by_label.entry(key).or_default();
        if !entries.contains(&id) {
            entries.push(id);
        }
    }

    pub(crate) fn remove(&mut self, key: &str, id: NodeId) {
        if let Some(entries) = self.by_label.get_mut(key) {
            entries.retain(|&entry| entry != id);
            if entries.is_empty() {
                self.by_label.remove(key);
            }
        }
    }

    /// Every attached definition carrying this normalized label, in insertion order.
    pub fn candidates(&self, key: &str) -> &[NodeId] {
        self.by_label.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.by_label.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }
}

impl Document {
    pub fn reference_index(&self) -> &LinkReferenceIndex {
        &self.references
    }

    /// The definition `label` resolves to: the earliest in document order.
    pub fn resolve_reference(&self, label: &str) -> Option<NodeId> {
        let key = normalize_label(label);
        if key.is_empty() {
            return None;
        }
        let version = self.version(self.root());
        if let Some(&(cached_version, id)) = self.references.first.borrow().get(&key)
            && cached_version == version
        {
            return Some(id);
        }

        let candidates = self.references.candidates(&key);
        let mut first = *candidates.first()?;
        for &candidate in &candidates[1..] {
            if self.compare_document_position(candidate, first) == DocumentPosition::Precedes {
                first = candidate;
            }
        }
        self.references
            .first
            .borrow_mut()
            .insert(key, (version, first));
        Some(first)
    }
}

ast_node!(
    /// `[label]: destination "title"`
    LinkReference,
    LinkReference
);

impl LinkReference {
    pub fn label<'d>(&self, doc: &'d Document) -> &'d str {
        match doc.value(self.0) {
            NodeValue::LinkReference { label, .. } => label,
            _ => unreachable!("LinkReference handle on a non-reference node"),
        }
    }

    pub fn destination<'d>(&self, doc: &'d Document) -> &'d str {
        match doc.value(self.0) {
            NodeValue::LinkReference { destination, .. } => destination,
            _ => unreachable!("LinkReference handle on a non-reference node"),
        }
    }

    pub fn title<'d>(&self, doc: &'d Document) -> Option<&'d str> {
        match doc.value(self.0) {
            NodeValue::LinkReference { title, .. } => title.as_deref(),
            _ => unreachable!("LinkReference handle on a non-reference node"),
        }
    }

    pub fn set_label(&self, doc: &mut Document, new_label: &str) {
        doc.update(self.0, |value| {
            if let NodeValue::LinkReference { label, .. } = value {
                *label = new_label.to_string();
            }
        });
        doc.set_element_text(self.0, ElementKind::Label, new_label);
    }

    pub fn set_destination(&self, doc: &mut Document, new_destination: &str) {
        doc.update(self.0, |value| {
            if let NodeValue::LinkReference { destination, .. } = value {
                *destination = new_destination.to_string();
            }
        });
        doc.set_element_text(self.0, ElementKind::Destination, new_destination);
    }

    pub fn set_title(&self, doc: &mut Document, new_title: Option<&str>) {
        doc.update(self.0, |value| {
            if let NodeValue::LinkReference { title, .. } = value {
                *title = new_title.map(str::to_string);
            }
        });
    }
}
