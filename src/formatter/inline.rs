use indextree::NodeId;

use crate::error::RenderError;
use crate::syntax::{AstNode, InlineTag, Link, LinkStyle, NodeValue, SyntaxKind};

use super::core::Formatter;
use super::utils::{format_destination, format_title, starts_entity};

/// Where inline content is being written. Line breaks and some escapes
/// depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum InlineContext {
    Paragraph,
    Heading,
    TableCell,
}

/// Escape text so it reads back as the same text.
fn escape_text(text: &str, line_start: bool, before_link: bool, context: InlineContext) -> String {
    let mut out = String::with_capacity(text.len());

    // Ordered list markers: `1.` or `1)` at the start of a line.
    let digits = text.bytes().take_while(u8::is_ascii_digit).count();
    let marker_delimiter = (line_start && digits > 0 && digits <= 9)
        .then(|| text[digits..].chars().next())
        .flatten()
        .filter(|c| matches!(*c, '.' | ')'))
        .map(|_| digits);

    for (i, c) in text.char_indices() {
        let escape = match c {
            '\\' | '*' | '_' | '`' | '[' | ']' | '<' | '~' | '{' | '}' => true,
            '&' => starts_entity(&text[i..]),
            '|' => context == InlineContext::TableCell,
            '#' => context == InlineContext::Heading || (line_start && i == 0),
            '>' | '-' | '+' | '=' | '@' => line_start && i == 0,
            '.' | ')' => marker_delimiter == Some(i),
            '!' => before_link && i + 1 == text.len(),
            _ => false,
        };
        if escape {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Wrap `code` in a backtick run that does not occur inside it.
fn format_code_span(code: &str, context: InlineContext) -> String {
    let mut ticks = 1;
    while code.split(|c| c != '`').any(|run| run.len() == ticks) {
        ticks += 1;
    }
    let fence = "`".repeat(ticks);
    let pad = code.starts_with('`')
        || code.ends_with('`')
        || code.is_empty()
        || (code.starts_with(' ') && code.ends_with(' ') && code.bytes().any(|b| b != b' '));

    let mut body = String::with_capacity(code.len());
    let mut previous = None;
    for c in code.chars() {
        if c == '|' && context == InlineContext::TableCell && previous != Some('\\') {
            body.push('\\');
        }
        body.push(c);
        previous = Some(c);
    }
    if pad {
        format!("{fence} {body} {fence}")
    } else {
        format!("{fence}{body}{fence}")
    }
}

impl<'d> Formatter<'d> {
    /// Format the inline children of `parent` on as many lines as its soft
    /// and hard breaks call for.
    pub(super) fn format_inlines(
        &self,
        parent: NodeId,
        context: InlineContext,
    ) -> Result<String, RenderError> {
        let mut output = String::new();
        let mut after_shortcut = false;
        for child in self.doc.children(parent) {
            let before_link = self
                .doc
                .next_sibling(child)
                .is_some_and(|next| self.doc.kind(next) == SyntaxKind::Link);
            let line_start = output.is_empty() || output.ends_with('\n');
            match self.doc.value(child) {
                NodeValue::Text(text) => {
                    let escaped = escape_text(text, line_start, before_link, context);
                    // `[a]\(b)` must not turn into an inline link.
                    if after_shortcut && text.starts_with('(') {
                        output.push('\\');
                    }
                    output.push_str(&escaped);
                }
                _ => output.push_str(&self.format_inline(child, context)?),
            }
            after_shortcut = Link::cast(self.doc, child)
                .is_some_and(|link| link.style(self.doc) == LinkStyle::Shortcut);
        }
        Ok(output)
    }

    fn format_inline(&self, node: NodeId, context: InlineContext) -> Result<String, RenderError> {
        let doc = self.doc;
        let formatted = match doc.value(node) {
            NodeValue::SoftBreak => match context {
                InlineContext::Paragraph => "\n".to_string(),
                _ => " ".to_string(),
            },
            NodeValue::HardBreak => match context {
                InlineContext::Paragraph => "\\\n".to_string(),
                _ => " ".to_string(),
            },
            NodeValue::CodeSpan(code) => format_code_span(code, context),
            NodeValue::HtmlInline(html) => html.clone(),
            NodeValue::Autolink { destination, .. } => format!("<{}>", destination),
            NodeValue::Emphasis { delimiter } => {
                let inner = self.format_inlines(node, context)?;
                format!("{d}{inner}{d}", d = delimiter)
            }
            NodeValue::Strong { delimiter } => {
                let inner = self.format_inlines(node, context)?;
                format!("{d}{d}{inner}{d}{d}", d = delimiter)
            }
            NodeValue::Strikethrough => format!("~~{}~~", self.format_inlines(node, context)?),
            NodeValue::Link(_) | NodeValue::Image(_) => self.format_link(node, context)?,
            NodeValue::InlineTag { .. } => self.format_inline_tag(node, context)?,
            _ => {
                return Err(RenderError::UnexpectedNode {
                    kind: doc.kind(node),
                    context: "inline",
                });
            }
        };
        Ok(formatted)
    }

    fn format_link(&self, node: NodeId, context: InlineContext) -> Result<String, RenderError> {
        let doc = self.doc;
        let Some(link) = Link::cast(doc, node) else {
            return Ok(String::new());
        };
        let mut output = String::new();
        if link.is_image(doc) {
            output.push('!');
        }
        output.push('[');
        output.push_str(&self.format_inlines(node, context)?);
        output.push(']');

        match link.style(doc) {
            LinkStyle::Inline => {
                output.push('(');
                output.push_str(&format_destination(link.destination(doc).unwrap_or_default()));
                if let Some(title) = link.title(doc) {
                    output.push(' ');
                    output.push_str(&format_title(title));
                }
                output.push(')');
            }
            LinkStyle::Full => {
                output.push('[');
                output.push_str(link.label(doc).unwrap_or_default());
                output.push(']');
            }
            LinkStyle::Collapsed => output.push_str("[]"),
            LinkStyle::Shortcut => {}
        }
        Ok(output)
    }

    fn format_inline_tag(&self, node: NodeId, context: InlineContext) -> Result<String, RenderError> {
        let doc = self.doc;
        let Some(tag) = InlineTag::cast(doc, node) else {
            return Ok(String::new());
        };
        let mut output = format!("{{{}", tag.tag_name(doc));
        if let Some(destination) = tag.destination(doc) {
            output.push(' ');
            output.push_str(destination);
        }
        if doc.first_child(node).is_some() {
            let text = self.format_inlines(node, context)?;
            if tag.is_link_like(doc) {
                output.push_str(" | ");
            } else {
                output.push(' ');
            }
            output.push_str(&text);
        } else if let Some(content) = tag.content(doc) {
            output.push(' ');
            output.push_str(content);
        }
        output.push('}');
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punctuation_that_would_start_syntax_is_escaped() {
        let p = InlineContext::Paragraph;
        assert_eq!(escape_text("a*b_c", false, false, p), "a\\*b\\_c");
        assert_eq!(escape_text("# not a heading", true, false, p), "\\# not a heading");
        assert_eq!(escape_text("# mid line", false, false, p), "# mid line");
        assert_eq!(escape_text("1. one", true, false, p), "1\\. one");
        assert_eq!(escape_text("2024) year", false, false, p), "2024) year");
        assert_eq!(escape_text("a &amp; b & c", false, false, p), "a \\&amp; b & c");
        assert_eq!(escape_text("wow!", false, true, p), "wow\\!");
        assert_eq!(escape_text("wow!", false, false, p), "wow!");
    }

    #[test]
    fn context_specific_escapes() {
        assert_eq!(escape_text("a|b", false, false, InlineContext::TableCell), "a\\|b");
        assert_eq!(escape_text("a|b", false, false, InlineContext::Paragraph), "a|b");
        assert_eq!(escape_text("C#", false, false, InlineContext::Heading), "C\\#");
    }

    #[test]
    fn code_span_fences() {
        let p = InlineContext::Paragraph;
        assert_eq!(format_code_span("a", p), "`a`");
        assert_eq!(format_code_span("a`b", p), "``a`b``");
        assert_eq!(format_code_span("`a", p), "`` `a ``");
        assert_eq!(format_code_span(" a ", p), "`  a  `");
        assert_eq!(format_code_span("a|b", InlineContext::TableCell), "`a\\|b`");
    }
}
