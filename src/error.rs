//! Errors raised by the emitters.

use crate::syntax::SyntaxKind;

/// A tree an emitter cannot turn into output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A node reached a position its kind cannot be written in, such as an
    /// inline node among blocks.
    UnexpectedNode {
        kind: SyntaxKind,
        context: &'static str,
    },
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedNode { kind, context } => {
                write!(f, "cannot render a {} node in {} context", kind, context)
            }
        }
    }
}

impl std::error::Error for RenderError {}
