use super::SyntaxKind;

/// Misuse of the tree editing API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Heading levels run from 1 to 6.
    InvalidHeadingLevel(u8),
    /// Tag names are `@` followed by an ASCII letter and ASCII alphanumerics.
    InvalidTagName(String),
    /// Thematic breaks and code fences need at least three marker characters.
    InvalidMarkerCount(usize),
    /// The operation does not apply to a node of this kind.
    UnexpectedKind {
        expected: &'static str,
        found: SyntaxKind,
    },
}

impl std::fmt::Display for TreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidHeadingLevel(level) => {
                write!(f, "heading level must be between 1 and 6, got {}", level)
            }
            Self::InvalidTagName(name) => write!(f, "invalid tag name: {:?}", name),
            Self::InvalidMarkerCount(count) => {
                write!(f, "marker count must be at least 3, got {}", count)
            }
            Self::UnexpectedKind { expected, found } => {
                write!(f, "expected {} node, found {}", expected, found)
            }
        }
    }
}

impl std::error::Error for TreeError {}
