use indextree::NodeId;

use crate::error::RenderError;
use crate::syntax::{AstNode, CodeBlock, Document, NodeValue};

use super::inline::InlineContext;
use super::utils::{format_destination, format_title, indent_lines, longest_run};

pub struct Formatter<'d> {
    pub(super) doc: &'d Document,
}

impl<'d> Formatter<'d> {
    pub fn new(doc: &'d Document) -> Self {
        Self { doc }
    }

    pub fn format(&self) -> Result<String, RenderError> {
        let mut output = self.format_blocks(self.doc.root(), "\n\n")?;
        if !output.is_empty() {
            output.push('\n');
        }
        log::debug!("formatted document into {} bytes", output.len());
        Ok(output)
    }

    /// Format the block children of `parent`, joined by `separator`.
    pub(super) fn format_blocks(&self, parent: NodeId, separator: &str) -> Result<String, RenderError> {
        let mut output = String::new();
        for (i, child) in self.doc.children(parent).enumerate() {
            if i > 0 {
                output.push_str(separator);
            }
            output.push_str(&self.format_block(child)?);
        }
        Ok(output)
    }

    fn format_block(&self, node: NodeId) -> Result<String, RenderError> {
        let doc = self.doc;
        log::trace!("formatting {}", doc.kind(node));
        let formatted = match doc.value(node) {
            NodeValue::Paragraph => self.format_inlines(node, InlineContext::Paragraph)?,
            NodeValue::Heading { level, .. } => {
                let content = self.format_inlines(node, InlineContext::Heading)?;
                let marker = "#".repeat(usize::from(*level));
                if content.is_empty() {
                    marker
                } else {
                    format!("{} {}", marker, content)
                }
            }
            NodeValue::ThematicBreak { marker, count } => marker.to_string().repeat(*count),
            NodeValue::CodeBlock { .. } => self.format_code_block(node),
            NodeValue::HtmlBlock { literal } => literal.trim_end_matches('\n').to_string(),
            NodeValue::BlockQuote => {
                let inner = self.format_blocks(node, "\n\n")?;
                if inner.is_empty() {
                    ">".to_string()
                } else {
                    indent_lines(&inner, "> ", "> ")
                }
            }
            NodeValue::List(_) => self.format_list(node)?,
            NodeValue::Table { .. } => self.format_table(node)?,
            NodeValue::LinkReference {
                label,
                destination,
                title,
            } => {
                let mut line = format!("[{}]: {}", label, format_destination(destination));
                if let Some(title) = title {
                    line.push(' ');
                    line.push_str(&format_title(title));
                }
                line
            }
            NodeValue::BlockTag {
                tag_name,
                parameter_name,
            } => {
                let mut header = tag_name.clone();
                if let Some(name) = parameter_name {
                    header.push(' ');
                    header.push_str(name);
                    header.push_str(" -");
                }
                let body = self.format_blocks(node, "\n\n")?;
                if body.is_empty() {
                    header
                } else {
                    format!("{}\n{}", header, body)
                }
            }
            NodeValue::ModifierTag { tag_name } => tag_name.clone(),
            _ => {
                return Err(RenderError::UnexpectedNode {
                    kind: doc.kind(node),
                    context: "block",
                });
            }
        };
        Ok(formatted)
    }

    fn format_code_block(&self, node: NodeId) -> String {
        let Some(code) = CodeBlock::cast(self.doc, node) else {
            return String::new();
        };
        let info = code.info(self.doc);
        let literal = code.literal(self.doc);
        let fence_char = if info.contains('`') { '~' } else { '`' };
        let fence = fence_char
            .to_string()
            .repeat(longest_run(literal, fence_char).max(2) + 1);

        let mut output = format!("{}{}\n", fence, info);
        output.push_str(literal);
        if !literal.is_empty() && !literal.ends_with('\n') {
            output.push('\n');
        }
        output.push_str(&fence);
        output
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::formatter::format_document;
    use crate::parser::parse;

    fn format(input: &str) -> String {
        format_document(&parse(input, &Config::default())).unwrap()
    }

    #[test]
    fn setext_headings_become_atx() {
        assert_eq!(format("Title\n===\n\nSub\n---\n"), "# Title\n\n## Sub\n");
    }

    #[test]
    fn code_blocks_are_fenced() {
        assert_eq!(format("    let x;\n"), "```\nlet x;\n```\n");
        assert_eq!(format("```rust\na ``` b\n```\n"), "````rust\na ``` b\n````\n");
        assert_eq!(format("~~~ a`b\nx\n~~~\n"), "~~~a`b\nx\n~~~\n");
    }

    #[test]
    fn block_quotes_prefix_every_line() {
        assert_eq!(format("> a\n>\n> b\n"), "> a\n>\n> b\n");
    }

    #[test]
    fn link_reference_definitions() {
        assert_eq!(
            format("[Foo]: /url 'the \"title\"'\n"),
            "[Foo]: /url \"the \\\"title\\\"\"\n"
        );
        assert_eq!(format("[a]: <b c>\n"), "[a]: <b c>\n");
    }

    #[test]
    fn block_tags_keep_their_sections() {
        assert_eq!(
            format("Summary.\n@param x - The x.\n"),
            "Summary.\n\n@param x -\nThe x.\n"
        );
    }

    #[test]
    fn empty_document() {
        assert_eq!(format(""), "");
        assert_eq!(format("\n\n"), "");
    }
}
