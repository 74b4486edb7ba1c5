//! The arena-backed, mutable document tree.
//!
//! Every node lives in the document's arena and is addressed by a [`NodeId`].
//! Nodes that are not reachable from [`Document::root`] are *detached*: they
//! still exist and can be edited or re-attached, but they are not part of the
//! document (their link references are not indexed, for instance).
//!
//! All structural edits go through this type so that three things stay
//! consistent:
//! - the `version` counter of the edited node and all of its ancestors,
//! - the `attached` flag of every node in a moved subtree,
//! - the link-reference index, which only tracks attached references.

use indextree::{Arena, NodeId};

use super::node::{NodeData, NodeValue, Span, SyntaxElement};
use super::references::{LinkReferenceIndex, normalize_label};
use super::{ElementKind, SyntaxKind};
use crate::diagnostics::Diagnostic;

/// Relative position of a second node with respect to a first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentPosition {
    /// Both handles name the same node.
    Same,
    /// The first node is an ancestor of the second.
    Contains,
    /// The first node is a descendant of the second.
    ContainedBy,
    /// The first node comes before the second in document order.
    Precedes,
    /// The first node comes after the second in document order.
    Follows,
    /// The nodes live in different trees.
    Unrelated,
}

pub struct Document {
    arena: Arena<NodeData>,
    root: NodeId,
    clock: u64,
    source: String,
    pub(crate) references: LinkReferenceIndex,
    diagnostics: Vec<Diagnostic>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.debug_tree(self.root))
    }
}

impl Document {
    /// An empty document with no source text.
    pub fn new() -> Self {
        Self::with_source(String::new())
    }

    pub(crate) fn with_source(source: String) -> Self {
        let mut arena = Arena::new();
        let mut data = NodeData::new(NodeValue::Document, Some(Span::new(0, source.len())), 1);
        data.attached = true;
        let root = arena.new_node(data);
        Self {
            arena,
            root,
            clock: 1,
            source,
            references: LinkReferenceIndex::default(),
            diagnostics: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The text this document was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub(crate) fn report(&mut self, diagnostic: Diagnostic) {
        log::debug!("diagnostic {}: {}", diagnostic.message_id, diagnostic.message);
        self.diagnostics.push(diagnostic);
    }

    /// Create a new detached, synthetic node.
    pub fn create(&mut self, value: NodeValue) -> NodeId {
        self.create_with_span(value, None)
    }

    pub fn create_with_span(&mut self, value: NodeValue, span: Option<Span>) -> NodeId {
        let version = self.tick();
        self.arena.new_node(NodeData::new(value, span, version))
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn data(&self, id: NodeId) -> &NodeData {
        self.arena[id].get()
    }

    fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        self.arena[id].get_mut()
    }

    pub(crate) fn node_data(&self, id: NodeId) -> &NodeData {
        self.data(id)
    }

    pub fn kind(&self, id: NodeId) -> SyntaxKind {
        self.data(id).kind()
    }

    pub fn value(&self, id: NodeId) -> &NodeValue {
        &self.data(id).value
    }

    pub fn span(&self, id: NodeId) -> Option<Span> {
        self.data(id).span
    }

    pub fn set_span(&mut self, id: NodeId, span: Option<Span>) {
        if self.data(id).span != span {
            self.data_mut(id).span = span;
            self.invalidate(id);
        }
    }

    pub fn version(&self, id: NodeId) -> u64 {
        self.data(id).version
    }

    /// Whether the node is part of this document's tree (reachable from the root).
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.data(id).attached
    }

    pub fn elements(&self, id: NodeId) -> &[SyntaxElement] {
        &self.data(id).elements
    }

    pub fn element(&self, id: NodeId, kind: ElementKind) -> Option<&SyntaxElement> {
        self.data(id).elements.iter().find(|e| e.kind == kind)
    }

    pub fn attach_element(&mut self, id: NodeId, element: SyntaxElement) {
        self.data_mut(id).elements.push(element);
        self.invalidate(id);
    }

    /// Replace the text of an owned element; an edited element no longer has a source span.
    pub(crate) fn set_element_text(&mut self, id: NodeId, kind: ElementKind, text: &str) {
        let elements = &mut self.data_mut(id).elements;
        match elements.iter_mut().find(|e| e.kind == kind) {
            Some(element) => {
                element.text = text.to_string();
                element.span = None;
            }
            None => elements.push(SyntaxElement::new(kind, text, None)),
        }
    }

    // ---- navigation ----

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].parent()
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].first_child()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].last_child()
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].previous_sibling()
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].next_sibling()
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    /// The node itself followed by all of its descendants in document order.
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.descendants(&self.arena)
    }

    /// The node itself followed by its parent, grandparent and so on.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.ancestors(&self.arena)
    }

    pub fn for_each_child(&self, id: NodeId, mut f: impl FnMut(NodeId)) {
        for child in id.children(&self.arena) {
            f(child);
        }
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        id.children(&self.arena).count()
    }

    // ---- mutation ----

    /// Whether `node` may become a child of `parent`.
    pub fn can_adopt(&self, parent: NodeId, node: NodeId) -> bool {
        if node == self.root || self.ancestors(parent).any(|a| a == node) {
            return false;
        }
        self.kind(parent).admits(self.kind(node))
    }

    /// Append `node` as the last child of `parent`, removing it from wherever it
    /// was before. Returns `false` and changes nothing if the pair is not admitted.
    pub fn append_child(&mut self, parent: NodeId, node: NodeId) -> bool {
        if !self.can_adopt(parent, node) {
            return false;
        }
        self.detach(node);
        parent.append(node, &mut self.arena);
        self.linked(node);
        true
    }

    /// Insert `node` as the first child of `parent`.
    pub fn prepend_child(&mut self, parent: NodeId, node: NodeId) -> bool {
        if !self.can_adopt(parent, node) {
            return false;
        }
        self.detach(node);
        parent.prepend(node, &mut self.arena);
        self.linked(node);
        true
    }

    pub fn insert_sibling_before(&mut self, anchor: NodeId, node: NodeId) -> bool {
        let Some(parent) = self.parent(anchor) else {
            return false;
        };
        if anchor == node || !self.can_adopt(parent, node) {
            return false;
        }
        self.detach(node);
        anchor.insert_before(node, &mut self.arena);
        self.linked(node);
        true
    }

    pub fn insert_sibling_after(&mut self, anchor: NodeId, node: NodeId) -> bool {
        let Some(parent) = self.parent(anchor) else {
            return false;
        };
        if anchor == node || !self.can_adopt(parent, node) {
            return false;
        }
        self.detach(node);
        anchor.insert_after(node, &mut self.arena);
        self.linked(node);
        true
    }

    /// Put `replacement` where `old` is and detach `old`.
    pub fn replace_node(&mut self, old: NodeId, replacement: NodeId) -> bool {
        if old == replacement {
            return false;
        }
        if !self.insert_sibling_before(old, replacement) {
            return false;
        }
        self.remove_node(old);
        true
    }

    /// Unlink a node (and its subtree) from its parent and siblings.
    /// No-op for nodes without a parent.
    pub fn remove_node(&mut self, id: NodeId) {
        self.detach(id);
    }

    /// Move every child of `from` to the end of `to`, in order.
    pub fn move_children(&mut self, from: NodeId, to: NodeId) -> bool {
        let children: Vec<NodeId> = self.children(from).collect();
        if children.iter().any(|&c| !self.can_adopt(to, c)) {
            return false;
        }
        for child in children {
            self.append_child(to, child);
        }
        true
    }

    fn detach(&mut self, id: NodeId) {
        let Some(old_parent) = self.parent(id) else {
            return;
        };
        let was_attached = self.data(id).attached;
        self.invalidate(old_parent);
        id.detach(&mut self.arena);
        if was_attached {
            self.set_subtree_attached(id, false);
        }
        let version = self.tick();
        self.data_mut(id).version = version;
    }

    fn linked(&mut self, id: NodeId) {
        let attached = self
            .parent(id)
            .is_some_and(|parent| self.data(parent).attached);
        if attached {
            self.set_subtree_attached(id, true);
        }
        self.invalidate(id);
    }

    fn set_subtree_attached(&mut self, id: NodeId, attached: bool) {
        let ids: Vec<NodeId> = id.descendants(&self.arena).collect();
        for node in ids {
            self.data_mut(node).attached = attached;
            if let NodeValue::LinkReference { label, .. } = &self.data(node).value {
                let key = normalize_label(label);
                if attached {
                    log::trace!("indexing link reference {:?}", key);
                    self.references.insert(key, node);
                } else {
                    log::trace!("unindexing link reference {:?}", key);
                    self.references.remove(&key, node);
                }
            }
        }
    }

    /// Bump the version of `id` and every ancestor.
    pub fn invalidate(&mut self, id: NodeId) {
        let version = self.tick();
        let chain: Vec<NodeId> = id.ancestors(&self.arena).collect();
        for node in chain {
            self.data_mut(node).version = version;
        }
    }

    /// Edit a node's payload, keeping the reference index in step with label changes.
    pub(crate) fn update<R>(&mut self, id: NodeId, f: impl FnOnce(&mut NodeValue) -> R) -> R {
        self.changing(id);
        let result = f(&mut self.data_mut(id).value);
        self.changed(id);
        self.invalidate(id);
        result
    }

    fn changing(&mut self, id: NodeId) {
        let data = self.data(id);
        if data.attached
            && let NodeValue::LinkReference { label, .. } = &data.value
        {
            let key = normalize_label(label);
            self.references.remove(&key, id);
        }
    }

    fn changed(&mut self, id: NodeId) {
        let data = self.data(id);
        if data.attached
            && let NodeValue::LinkReference { label, .. } = &data.value
        {
            let key = normalize_label(label);
            self.references.insert(key, id);
        }
    }

    // ---- ordering ----

    pub fn compare_document_position(&self, a: NodeId, b: NodeId) -> DocumentPosition {
        if a == b {
            return DocumentPosition::Same;
        }
        let a_chain: Vec<NodeId> = self.ancestors(a).collect();
        let b_chain: Vec<NodeId> = self.ancestors(b).collect();
        if a_chain.contains(&b) {
            return DocumentPosition::ContainedBy;
        }
        if b_chain.contains(&a) {
            return DocumentPosition::Contains;
        }
        if a_chain.last() != b_chain.last() {
            return DocumentPosition::Unrelated;
        }

        // Walk down from the shared root until the chains diverge; the two
        // nodes found there are siblings under the lowest common ancestor.
        let mut i = a_chain.len() - 1;
        let mut j = b_chain.len() - 1;
        while a_chain[i] == b_chain[j] {
            i -= 1;
            j -= 1;
        }
        let (context_a, context_b) = (a_chain[i], b_chain[j]);
        if context_a
            .following_siblings(&self.arena)
            .any(|sibling| sibling == context_b)
        {
            DocumentPosition::Precedes
        } else {
            DocumentPosition::Follows
        }
    }

    // ---- content ----

    /// Plain text of a subtree, as used for image alt text and labels.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.value(id) {
            NodeValue::Text(text) | NodeValue::CodeSpan(text) | NodeValue::HtmlInline(text) => {
                out.push_str(text)
            }
            NodeValue::SoftBreak => out.push(' '),
            NodeValue::HardBreak => out.push('\n'),
            NodeValue::Autolink { destination, .. } => out.push_str(destination),
            NodeValue::InlineTag {
                content: Some(content),
                ..
            } => out.push_str(content),
            NodeValue::CodeBlock { literal, .. } | NodeValue::HtmlBlock { literal } => {
                out.push_str(literal)
            }
            _ => {
                for child in self.children(id) {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// Indented dump of a subtree, one node per line.
    pub fn debug_tree(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_debug(id, 0, &mut out);
        out
    }

    fn write_debug(&self, id: NodeId, depth: usize, out: &mut String) {
        use std::fmt::Write;

        let data = self.data(id);
        let _ = write!(out, "{}{:?}", "  ".repeat(depth), data.kind());
        match data.span {
            Some(span) => {
                let _ = write!(out, "@{}..{}", span.start, span.end);
            }
            None => out.push_str("@?"),
        }
        match &data.value {
            NodeValue::Text(text) | NodeValue::CodeSpan(text) | NodeValue::HtmlInline(text) => {
                let _ = write!(out, " {:?}", text);
            }
            NodeValue::Heading { level, .. } => {
                let _ = write!(out, " level={}", level);
            }
            NodeValue::List(marker) => {
                let _ = write!(out, " tight={}", marker.tight);
            }
            NodeValue::ListItem {
                task: Some(checked),
                ..
            } => {
                let _ = write!(out, " checked={}", checked);
            }
            NodeValue::CodeBlock { info, literal, .. } => {
                let _ = write!(out, " info={:?} {:?}", info, literal);
            }
            NodeValue::Link(link) | NodeValue::Image(link) => {
                if let Some(destination) = &link.destination {
                    let _ = write!(out, " dest={:?}", destination);
                }
                if let Some(label) = &link.label {
                    let _ = write!(out, " ref={:?}", label);
                }
            }
            NodeValue::LinkReference {
                label, destination, ..
            } => {
                let _ = write!(out, " [{}] -> {:?}", label, destination);
            }
            NodeValue::BlockTag {
                tag_name,
                parameter_name,
            } => {
                let _ = write!(out, " {}", tag_name);
                if let Some(name) = parameter_name {
                    let _ = write!(out, " {}", name);
                }
            }
            NodeValue::ModifierTag { tag_name } => {
                let _ = write!(out, " {}", tag_name);
            }
            NodeValue::InlineTag {
                tag_name,
                destination,
                content,
            } => {
                let _ = write!(out, " {}", tag_name);
                if let Some(destination) = destination {
                    let _ = write!(out, " dest={:?}", destination);
                }
                if let Some(content) = content {
                    let _ = write!(out, " {:?}", content);
                }
            }
            NodeValue::Autolink { destination, .. } => {
                let _ = write!(out, " {:?}", destination);
            }
            _ => {}
        }
        out.push('\n');
        for child in self.children(id) {
            self.write_debug(child, depth + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph_with_text(doc: &mut Document, text: &str) -> (NodeId, NodeId) {
        let paragraph = doc.create(NodeValue::Paragraph);
        let run = doc.create(NodeValue::text(text));
        assert!(doc.append_child(paragraph, run));
        (paragraph, run)
    }

    #[test]
    fn append_sets_parent_and_last_child() {
        let mut doc = Document::new();
        let (paragraph, _) = paragraph_with_text(&mut doc, "a");
        let root = doc.root();
        assert!(doc.append_child(root, paragraph));
        let second = doc.create(NodeValue::text("b"));
        assert!(doc.append_child(paragraph, second));
        assert_eq!(doc.parent(second), Some(paragraph));
        assert_eq!(doc.last_child(paragraph), Some(second));
        assert!(doc.is_attached(second));
    }

    #[test]
    fn remove_clears_links() {
        let mut doc = Document::new();
        let (paragraph, first) = paragraph_with_text(&mut doc, "a");
        let second = doc.create(NodeValue::text("b"));
        doc.append_child(paragraph, second);
        doc.remove_node(first);
        assert_eq!(doc.parent(first), None);
        assert_eq!(doc.next_sibling(first), None);
        assert_eq!(doc.previous_sibling(second), None);
        assert_eq!(doc.children(paragraph).collect::<Vec<_>>(), vec![second]);
    }

    #[test]
    fn rejected_append_changes_nothing() {
        let mut doc = Document::new();
        let (paragraph, run) = paragraph_with_text(&mut doc, "a");
        let quote = doc.create(NodeValue::BlockQuote);
        let before = doc.version(paragraph);
        assert!(!doc.append_child(run, quote));
        assert!(!doc.append_child(quote, run));
        assert_eq!(doc.parent(run), Some(paragraph));
        assert_eq!(doc.version(paragraph), before);
        assert_eq!(doc.first_child(quote), None);
    }

    #[test]
    fn cannot_append_ancestor_to_descendant() {
        let mut doc = Document::new();
        let outer = doc.create(NodeValue::BlockQuote);
        let inner = doc.create(NodeValue::BlockQuote);
        assert!(doc.append_child(outer, inner));
        assert!(!doc.append_child(inner, outer));
        assert!(!doc.append_child(outer, outer));
    }

    #[test]
    fn reappending_moves_the_node() {
        let mut doc = Document::new();
        let (first, run) = paragraph_with_text(&mut doc, "a");
        let second = doc.create(NodeValue::Paragraph);
        assert!(doc.append_child(second, run));
        assert_eq!(doc.first_child(first), None);
        assert_eq!(doc.parent(run), Some(second));
    }

    #[test]
    fn versions_propagate_to_ancestors() {
        let mut doc = Document::new();
        let (paragraph, run) = paragraph_with_text(&mut doc, "a");
        let root = doc.root();
        doc.append_child(root, paragraph);
        let root_before = doc.version(root);
        let paragraph_before = doc.version(paragraph);
        doc.set_span(run, Some(Span::new(0, 1)));
        assert!(doc.version(run) > paragraph_before);
        assert!(doc.version(paragraph) > paragraph_before);
        assert!(doc.version(root) > root_before);
    }

    #[test]
    fn document_position() {
        let mut doc = Document::new();
        let root = doc.root();
        let (p1, a) = paragraph_with_text(&mut doc, "a");
        let (p2, b) = paragraph_with_text(&mut doc, "b");
        doc.append_child(root, p1);
        doc.append_child(root, p2);
        let stray = doc.create(NodeValue::text("c"));

        assert_eq!(doc.compare_document_position(a, a), DocumentPosition::Same);
        assert_eq!(doc.compare_document_position(a, b), DocumentPosition::Precedes);
        assert_eq!(doc.compare_document_position(b, a), DocumentPosition::Follows);
        assert_eq!(doc.compare_document_position(p1, a), DocumentPosition::Contains);
        assert_eq!(doc.compare_document_position(a, root), DocumentPosition::ContainedBy);
        assert_eq!(doc.compare_document_position(a, stray), DocumentPosition::Unrelated);
    }

    #[test]
    fn replace_node_swaps_in_place() {
        let mut doc = Document::new();
        let root = doc.root();
        let (p1, _) = paragraph_with_text(&mut doc, "a");
        let (p2, _) = paragraph_with_text(&mut doc, "b");
        doc.append_child(root, p1);
        let rule = doc.create(NodeValue::ThematicBreak {
            marker: '-',
            count: 3,
        });
        doc.append_child(root, p2);
        assert!(doc.replace_node(p1, rule));
        assert_eq!(doc.children(root).collect::<Vec<_>>(), vec![rule, p2]);
        assert!(!doc.is_attached(p1));
    }
}
