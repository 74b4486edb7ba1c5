//! The mutable document tree.
//!
//! Nodes live in an arena owned by [`Document`] and are addressed by
//! [`NodeId`]. Typed wrappers ([`Heading`], [`Link`], [`TableCell`], ...) are
//! thin, copyable handles that check the node kind once and then read and
//! write through the document.

mod ast;
mod blocks;
mod document;
mod error;
mod headings;
mod kind;
mod links;
mod lists;
mod node;
mod references;
mod tables;
mod tags;

pub use indextree::NodeId;

pub use ast::AstNode;
pub use blocks::{CodeBlock, Paragraph, Text, ThematicBreak};
pub use document::{Document, DocumentPosition};
pub use error::TreeError;
pub use headings::Heading;
pub use kind::{Capability, SyntaxKind};
pub use links::{Autolink, Link};
pub use lists::{List, ListItem, ListKind, ListMarker};
pub use node::{
    ElementKind, Fence, LinkData, LinkStyle, NodeData, NodeValue, Span, SyntaxElement,
    TableAlignment,
};
pub use references::{LinkReference, LinkReferenceIndex, normalize_label};
pub use tables::{Table, TableCell, TableRow};
pub use tags::{BlockTag, InlineTag, ModifierTag, is_valid_tag_name};
