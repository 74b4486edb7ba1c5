//! Typed handles over [`NodeId`]s.
//!
//! A typed handle is only a `NodeId` that has been checked to have the right
//! kind; all data stays in the [`Document`]. Accessors therefore take the
//! document as an argument.

use indextree::NodeId;

use super::{Document, SyntaxKind};

pub trait AstNode: Sized + Copy {
    fn can_cast(kind: SyntaxKind) -> bool;

    fn from_id(id: NodeId) -> Self;

    fn id(&self) -> NodeId;

    fn cast(doc: &Document, id: NodeId) -> Option<Self> {
        if Self::can_cast(doc.kind(id)) {
            Some(Self::from_id(id))
        } else {
            None
        }
    }
}

macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident, $($kind:ident)|+) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(indextree::NodeId);

        impl $crate::syntax::AstNode for $name {
            fn can_cast(kind: $crate::syntax::SyntaxKind) -> bool {
                matches!(kind, $($crate::syntax::SyntaxKind::$kind)|+)
            }

            fn from_id(id: indextree::NodeId) -> Self {
                Self(id)
            }

            fn id(&self) -> indextree::NodeId {
                self.0
            }
        }
    };
}

pub(crate) use ast_node;

pub(crate) mod support {
    use indextree::NodeId;

    use crate::syntax::{AstNode, Document};

    pub(crate) fn child<N: AstNode>(doc: &Document, parent: NodeId) -> Option<N> {
        doc.children(parent).find_map(|child| N::cast(doc, child))
    }

    pub(crate) fn children<'d, N: AstNode + 'd>(
        doc: &'d Document,
        parent: NodeId,
    ) -> impl Iterator<Item = N> + 'd {
        doc.children(parent).filter_map(move |child| N::cast(doc, child))
    }
}
