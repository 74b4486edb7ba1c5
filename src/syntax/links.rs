//! Link and image node wrappers.
//!
//! Reference-style links keep only their label; destination and title are
//! read through the document's link-reference index every time, so editing
//! or moving a definition is reflected immediately.

use indextree::NodeId;

use super::ast::ast_node;
use super::references::LinkReference;
use super::{AstNode, Document, ElementKind, LinkData, LinkStyle, NodeValue};

ast_node!(
    /// `[text](destination)` or `![alt](destination)` in any of their forms.
    Link,
    Link | Image
);

ast_node!(Autolink, Autolink);

fn link_data(doc: &Document, id: NodeId) -> &LinkData {
    match doc.value(id) {
        NodeValue::Link(data) | NodeValue::Image(data) => data,
        _ => unreachable!("Link handle on a non-link node"),
    }
}

impl Link {
    pub fn is_image(&self, doc: &Document) -> bool {
        matches!(doc.value(self.0), NodeValue::Image(_))
    }

    pub fn style(&self, doc: &Document) -> LinkStyle {
        link_data(doc, self.0).style
    }

    /// The raw reference label, for reference-style links.
    pub fn label<'d>(&self, doc: &'d Document) -> Option<&'d str> {
        link_data(doc, self.0).label.as_deref()
    }

    /// The definition a reference-style link currently resolves to.
    pub fn reference(&self, doc: &Document) -> Option<LinkReference> {
        let label = self.label(doc)?;
        let id = doc.resolve_reference(label)?;
        LinkReference::cast(doc, id)
    }

    /// The link's own destination, or its reference definition's.
    pub fn destination<'d>(&self, doc: &'d Document) -> Option<&'d str> {
        let data = link_data(doc, self.0);
        match data.destination.as_deref() {
            Some(destination) => Some(destination),
            None => self.reference(doc).map(|r| r.destination(doc)),
        }
    }

    pub fn title<'d>(&self, doc: &'d Document) -> Option<&'d str> {
        let data = link_data(doc, self.0);
        if data.destination.is_some() {
            data.title.as_deref()
        } else {
            self.reference(doc).and_then(|r| r.title(doc))
        }
    }

    /// Give the link a literal destination, turning it into an inline link.
    pub fn set_destination(&self, doc: &mut Document, destination: &str) {
        doc.update(self.0, |value| {
            if let NodeValue::Link(data) | NodeValue::Image(data) = value {
                data.destination = Some(destination.to_string());
                data.style = LinkStyle::Inline;
                data.label = None;
            }
        });
        doc.set_element_text(self.0, ElementKind::Destination, destination);
    }

    pub fn set_title(&self, doc: &mut Document, title: Option<&str>) {
        doc.update(self.0, |value| {
            if let NodeValue::Link(data) | NodeValue::Image(data) = value {
                data.title = title.map(str::to_string);
            }
        });
    }

    /// Point the link at a reference label, dropping any literal destination.
    pub fn set_reference(&self, doc: &mut Document, style: LinkStyle, label: &str) {
        doc.update(self.0, |value| {
            if let NodeValue::Link(data) | NodeValue::Image(data) = value {
                *data = LinkData::reference(style, label);
            }
        });
        doc.set_element_text(self.0, ElementKind::Label, label);
    }
}

impl Autolink {
    pub fn destination<'d>(&self, doc: &'d Document) -> &'d str {
        match doc.value(self.0) {
            NodeValue::Autolink { destination, .. } => destination,
            _ => unreachable!("Autolink handle on a non-autolink node"),
        }
    }

    pub fn is_email(&self, doc: &Document) -> bool {
        matches!(doc.value(self.0), NodeValue::Autolink { email: true, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_links_read_through_the_index() {
        let mut doc = Document::new();
        let root = doc.root();
        let paragraph = doc.create(NodeValue::Paragraph);
        let link = doc.create(NodeValue::Link(LinkData::reference(LinkStyle::Full, "Docs")));
        doc.append_child(root, paragraph);
        doc.append_child(paragraph, link);
        let handle = Link::cast(&doc, link).unwrap();
        assert_eq!(handle.destination(&doc), None);

        let def = doc.create(NodeValue::LinkReference {
            label: "docs".into(),
            destination: "/docs".into(),
            title: Some("Docs".into()),
        });
        doc.append_child(root, def);
        assert_eq!(handle.destination(&doc), Some("/docs"));
        assert_eq!(handle.title(&doc), Some("Docs"));

        LinkReference::cast(&doc, def)
            .unwrap()
            .set_destination(&mut doc, "/v2/docs");
        assert_eq!(handle.destination(&doc), Some("/v2/docs"));
    }

    #[test]
    fn literal_destination_wins() {
        let mut doc = Document::new();
        let link = doc.create(NodeValue::Link(LinkData::reference(LinkStyle::Shortcut, "x")));
        let handle = Link::cast(&doc, link).unwrap();
        handle.set_destination(&mut doc, "https://example.com");
        assert_eq!(handle.destination(&doc), Some("https://example.com"));
        assert_eq!(handle.style(&doc), LinkStyle::Inline);
        assert_eq!(handle.label(&doc), None);
    }
}
