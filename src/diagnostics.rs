use crate::syntax::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A recoverable problem found while parsing. Parsing never stops because of one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message_id: MessageId,
    pub message: String,
    pub span: Span,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageId {
    MalformedTagName,
    UndefinedTag,
    MalformedInlineTag,
    InlineTagUnclosed,
    ParamTagMissingHyphen,
    ParamTagMissingName,
    ParamTagWithJsdocType,
    LinkTagMissingPipe,
}

impl MessageId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MalformedTagName => "tsdoc-malformed-tag-name",
            Self::UndefinedTag => "tsdoc-undefined-tag",
            Self::MalformedInlineTag => "tsdoc-malformed-inline-tag",
            Self::InlineTagUnclosed => "tsdoc-inline-tag-unclosed",
            Self::ParamTagMissingHyphen => "tsdoc-param-tag-missing-hyphen",
            Self::ParamTagMissingName => "tsdoc-param-tag-missing-name",
            Self::ParamTagWithJsdocType => "tsdoc-param-tag-with-jsdoc-type",
            Self::LinkTagMissingPipe => "tsdoc-link-tag-missing-pipe",
        }
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Diagnostic {
    pub fn error(message_id: MessageId, span: Span, message: impl Into<String>) -> Self {
        Self {
            message_id,
            message: message.into(),
            span,
            severity: Severity::Error,
        }
    }

    pub fn warning(message_id: MessageId, span: Span, message: impl Into<String>) -> Self {
        Self {
            message_id,
            message: message.into(),
            span,
            severity: Severity::Warning,
        }
    }

    /// 1-based line and column of the diagnostic's start in `input`.
    pub fn line_col(&self, input: &str) -> (usize, usize) {
        offset_to_line_col(input, self.span.start)
    }
}

fn offset_to_line_col(input: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;

    for (i, ch) in input.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }

    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_to_line_col() {
        let input = "line 1\nline 2\nline 3";
        assert_eq!(offset_to_line_col(input, 0), (1, 1));
        assert_eq!(offset_to_line_col(input, 7), (2, 1));
        assert_eq!(offset_to_line_col(input, 10), (2, 4));
    }

    #[test]
    fn message_ids_use_tsdoc_names() {
        assert_eq!(MessageId::UndefinedTag.to_string(), "tsdoc-undefined-tag");
        assert_eq!(
            MessageId::ParamTagWithJsdocType.as_str(),
            "tsdoc-param-tag-with-jsdoc-type"
        );
    }
}
