//! Per-node payloads stored in the document arena.

use std::cell::Cell;

use super::SyntaxKind;
use super::lists::ListMarker;

/// Byte range into the parsed source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {start} after end {end}");
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn cover(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableAlignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

/// How a link or image found its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStyle {
    /// `[text](destination "title")`
    Inline,
    /// `[text][label]`
    Full,
    /// `[text][]`
    Collapsed,
    /// `[text]`
    Shortcut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fence {
    pub ch: char,
    pub length: usize,
    pub indent: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkData {
    pub style: LinkStyle,
    pub destination: Option<String>,
    pub title: Option<String>,
    /// Raw label for reference-style links, resolved lazily against the index.
    pub label: Option<String>,
}

impl LinkData {
    pub fn inline(destination: impl Into<String>, title: Option<String>) -> Self {
        Self {
            style: LinkStyle::Inline,
            destination: Some(destination.into()),
            title,
            label: None,
        }
    }

    pub fn reference(style: LinkStyle, label: impl Into<String>) -> Self {
        Self {
            style,
            destination: None,
            title: None,
            label: Some(label.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeValue {
    Document,
    BlockQuote,
    List(ListMarker),
    ListItem {
        marker: ListMarker,
        /// `Some(checked)` for GFM task list items.
        task: Option<bool>,
    },
    Table {
        alignments: Vec<TableAlignment>,
    },
    TableRow {
        header: bool,
    },
    BlockTag {
        tag_name: String,
        parameter_name: Option<String>,
    },
    Paragraph,
    Heading {
        level: u8,
        setext: bool,
    },
    ThematicBreak {
        marker: char,
        count: usize,
    },
    CodeBlock {
        fence: Option<Fence>,
        info: String,
        literal: String,
    },
    HtmlBlock {
        literal: String,
    },
    TableCell,
    LinkReference {
        label: String,
        destination: String,
        title: Option<String>,
    },
    ModifierTag {
        tag_name: String,
    },
    Emphasis {
        delimiter: char,
    },
    Strong {
        delimiter: char,
    },
    Strikethrough,
    Link(LinkData),
    Image(LinkData),
    InlineTag {
        tag_name: String,
        destination: Option<String>,
        /// Raw content for tags that carry no inline children.
        content: Option<String>,
    },
    Text(String),
    SoftBreak,
    HardBreak,
    CodeSpan(String),
    Autolink {
        destination: String,
        email: bool,
    },
    HtmlInline(String),
}

impl NodeValue {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            NodeValue::Document => SyntaxKind::Document,
            NodeValue::BlockQuote => SyntaxKind::BlockQuote,
            NodeValue::List(_) => SyntaxKind::List,
            NodeValue::ListItem { .. } => SyntaxKind::ListItem,
            NodeValue::Table { .. } => SyntaxKind::Table,
            NodeValue::TableRow { .. } => SyntaxKind::TableRow,
            NodeValue::BlockTag { .. } => SyntaxKind::BlockTag,
            NodeValue::Paragraph => SyntaxKind::Paragraph,
            NodeValue::Heading { .. } => SyntaxKind::Heading,
            NodeValue::ThematicBreak { .. } => SyntaxKind::ThematicBreak,
            NodeValue::CodeBlock { .. } => SyntaxKind::CodeBlock,
            NodeValue::HtmlBlock { .. } => SyntaxKind::HtmlBlock,
            NodeValue::TableCell => SyntaxKind::TableCell,
            NodeValue::LinkReference { .. } => SyntaxKind::LinkReference,
            NodeValue::ModifierTag { .. } => SyntaxKind::ModifierTag,
            NodeValue::Emphasis { .. } => SyntaxKind::Emphasis,
            NodeValue::Strong { .. } => SyntaxKind::Strong,
            NodeValue::Strikethrough => SyntaxKind::Strikethrough,
            NodeValue::Link(_) => SyntaxKind::Link,
            NodeValue::Image(_) => SyntaxKind::Image,
            NodeValue::InlineTag { .. } => SyntaxKind::InlineTag,
            NodeValue::Text(_) => SyntaxKind::Text,
            NodeValue::SoftBreak => SyntaxKind::SoftBreak,
            NodeValue::HardBreak => SyntaxKind::HardBreak,
            NodeValue::CodeSpan(_) => SyntaxKind::CodeSpan,
            NodeValue::Autolink { .. } => SyntaxKind::Autolink,
            NodeValue::HtmlInline(_) => SyntaxKind::HtmlInline,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        NodeValue::Text(text.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    TagName,
    ParameterName,
    Destination,
    Title,
    Label,
    Marker,
    InfoString,
}

/// A piece of syntax owned by a node rather than linked among its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxElement {
    pub kind: ElementKind,
    pub text: String,
    pub span: Option<Span>,
}

impl SyntaxElement {
    pub fn new(kind: ElementKind, text: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}

#[derive(Debug)]
pub struct NodeData {
    pub(crate) value: NodeValue,
    pub(crate) span: Option<Span>,
    pub(crate) version: u64,
    pub(crate) attached: bool,
    pub(crate) elements: Vec<SyntaxElement>,
    /// Derived value cached together with the version it was computed against.
    pub(crate) cache: Cell<Option<(u64, usize)>>,
}

impl NodeData {
    pub(crate) fn new(value: NodeValue, span: Option<Span>, version: u64) -> Self {
        Self {
            value,
            span,
            version,
            attached: false,
            elements: Vec::new(),
            cache: Cell::new(None),
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.value.kind()
    }
}
