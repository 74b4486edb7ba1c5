//! Node kinds and the capability table that governs parent/child admission.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SyntaxKind {
    // Root
    Document,

    // Container blocks
    BlockQuote,
    List,
    ListItem,
    Table,
    TableRow,
    BlockTag, // @remarks, @param name - ...

    // Leaf blocks
    Paragraph,
    Heading,
    ThematicBreak,
    CodeBlock,
    HtmlBlock,
    TableCell,
    LinkReference, // [label]: destination "title"
    ModifierTag,   // @public, @beta

    // Inline containers
    Emphasis,
    Strong,
    Strikethrough,
    Link,
    Image,
    InlineTag, // {@link dest | text}

    // Inline leaves
    Text,
    SoftBreak,
    HardBreak,
    CodeSpan,
    Autolink,
    HtmlInline,
}

/// What a node is, as seen by a prospective parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Block,
    ListItem,
    TableRow,
    TableCell,
    Inline,
}

impl SyntaxKind {
    /// The capability this kind offers to a parent. `Document` offers none.
    pub fn capability(self) -> Option<Capability> {
        use SyntaxKind::*;
        match self {
            Document => None,
            BlockQuote | List | Table | BlockTag | Paragraph | Heading | ThematicBreak
            | CodeBlock | HtmlBlock | LinkReference | ModifierTag => Some(Capability::Block),
            ListItem => Some(Capability::ListItem),
            TableRow => Some(Capability::TableRow),
            TableCell => Some(Capability::TableCell),
            Emphasis | Strong | Strikethrough | Link | Image | InlineTag | Text | SoftBreak
            | HardBreak | CodeSpan | Autolink | HtmlInline => Some(Capability::Inline),
        }
    }

    /// The capability this kind accepts from its children, if any.
    pub fn accepts(self) -> Option<Capability> {
        use SyntaxKind::*;
        match self {
            Document | BlockQuote | ListItem | BlockTag => Some(Capability::Block),
            List => Some(Capability::ListItem),
            Table => Some(Capability::TableRow),
            TableRow => Some(Capability::TableCell),
            Paragraph | Heading | TableCell | Emphasis | Strong | Strikethrough | Link
            | Image | InlineTag => Some(Capability::Inline),
            ThematicBreak | CodeBlock | HtmlBlock | LinkReference | ModifierTag | Text
            | SoftBreak | HardBreak | CodeSpan | Autolink | HtmlInline => None,
        }
    }

    /// Whether a node of this kind may sit directly under `parent`.
    pub fn accepts_parent(self, parent: SyntaxKind) -> bool {
        use SyntaxKind::*;
        match self {
            Document => false,
            BlockTag | ModifierTag => parent == Document,
            ListItem => parent == List,
            TableRow => parent == Table,
            TableCell => parent == TableRow,
            Link => parent != Link,
            _ => true,
        }
    }

    /// Symmetric admission check between a parent kind and a child kind.
    pub fn admits(self, child: SyntaxKind) -> bool {
        match (self.accepts(), child.capability()) {
            (Some(accepted), Some(offered)) => {
                accepted == offered && child.accepts_parent(self)
            }
            _ => false,
        }
    }

    pub fn is_block(self) -> bool {
        matches!(
            self.capability(),
            Some(Capability::Block | Capability::ListItem | Capability::TableRow | Capability::TableCell)
        )
    }

    pub fn is_inline(self) -> bool {
        self.capability() == Some(Capability::Inline)
    }

    /// Leaf blocks whose buffered text is handed to the inline parser.
    pub fn holds_inlines(self) -> bool {
        matches!(
            self,
            SyntaxKind::Paragraph | SyntaxKind::Heading | SyntaxKind::TableCell
        )
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
