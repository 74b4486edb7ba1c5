//! CommonMark-style HTML output.
//!
//! Documentation tags have no HTML counterpart: block tags become
//! `<section data-tag="...">`, inline link tags become links, and modifier
//! tags and link reference definitions produce nothing.

use html_escape::{encode_double_quoted_attribute, encode_text};
use indextree::NodeId;

use crate::error::RenderError;
use crate::syntax::{
    AstNode, CodeBlock, Document, InlineTag, Link, ListKind, NodeValue, SyntaxKind, Table,
    TableAlignment, TableCell,
};

/// Render the whole document.
pub fn render(doc: &Document) -> Result<String, RenderError> {
    let mut renderer = HtmlRenderer::new(doc);
    renderer.children(doc.root())?;
    log::debug!("rendered {} bytes of html", renderer.out.len());
    Ok(renderer.out)
}

struct HtmlRenderer<'d> {
    doc: &'d Document,
    out: String,
}

impl<'d> HtmlRenderer<'d> {
    fn new(doc: &'d Document) -> Self {
        Self {
            doc,
            out: String::new(),
        }
    }

    /// Start a new line unless already at one.
    fn cr(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }

    fn children(&mut self, node: NodeId) -> Result<(), RenderError> {
        for child in self.doc.children(node) {
            self.node(child)?;
        }
        Ok(())
    }

    fn in_tight_list(&self, paragraph: NodeId) -> bool {
        self.doc
            .parent(paragraph)
            .filter(|&item| self.doc.kind(item) == SyntaxKind::ListItem)
            .and_then(|item| self.doc.parent(item))
            .is_some_and(|list| matches!(self.doc.value(list), NodeValue::List(marker) if marker.tight))
    }

    fn node(&mut self, node: NodeId) -> Result<(), RenderError> {
        let doc = self.doc;
        match doc.value(node) {
            NodeValue::Document => self.children(node)?,
            NodeValue::Paragraph => {
                if self.in_tight_list(node) {
                    self.children(node)?;
                } else {
                    self.cr();
                    self.out.push_str("<p>");
                    self.children(node)?;
                    self.out.push_str("</p>\n");
                }
            }
            NodeValue::Heading { level, .. } => {
                self.cr();
                self.out.push_str(&format!("<h{}>", level));
                self.children(node)?;
                self.out.push_str(&format!("</h{}>\n", level));
            }
            NodeValue::ThematicBreak { .. } => {
                self.cr();
                self.out.push_str("<hr />\n");
            }
            NodeValue::CodeBlock { .. } => {
                let Some(code) = CodeBlock::cast(doc, node) else {
                    return Ok(());
                };
                self.cr();
                match code.language(doc) {
                    Some(language) => self.out.push_str(&format!(
                        "<pre><code class=\"language-{}\">",
                        encode_double_quoted_attribute(language)
                    )),
                    None => self.out.push_str("<pre><code>"),
                }
                self.out.push_str(&encode_text(code.literal(doc)));
                self.out.push_str("</code></pre>\n");
            }
            NodeValue::HtmlBlock { literal } => {
                self.cr();
                self.out.push_str(literal);
                self.cr();
            }
            NodeValue::BlockQuote => {
                self.cr();
                self.out.push_str("<blockquote>\n");
                self.children(node)?;
                self.cr();
                self.out.push_str("</blockquote>\n");
            }
            NodeValue::List(marker) => {
                let tag = match marker.kind {
                    ListKind::Bullet(_) => "ul",
                    ListKind::Ordered { .. } => "ol",
                };
                self.cr();
                if marker.is_ordered() && marker.start != 1 {
                    self.out.push_str(&format!("<ol start=\"{}\">\n", marker.start));
                } else {
                    self.out.push_str(&format!("<{}>\n", tag));
                }
                self.children(node)?;
                self.cr();
                self.out.push_str(&format!("</{}>\n", tag));
            }
            NodeValue::ListItem { task, .. } => {
                self.cr();
                self.out.push_str("<li>");
                match task {
                    Some(true) => self
                        .out
                        .push_str("<input type=\"checkbox\" checked=\"\" disabled=\"\" /> "),
                    Some(false) => self.out.push_str("<input type=\"checkbox\" disabled=\"\" /> "),
                    None => {}
                }
                self.children(node)?;
                self.out.push_str("</li>\n");
            }
            NodeValue::Table { .. } => self.table(node)?,
            NodeValue::LinkReference { .. } | NodeValue::ModifierTag { .. } => {}
            NodeValue::BlockTag {
                tag_name,
                parameter_name,
            } => {
                self.cr();
                self.out.push_str(&format!(
                    "<section data-tag=\"{}\"",
                    encode_double_quoted_attribute(tag_name)
                ));
                if let Some(name) = parameter_name {
                    self.out.push_str(&format!(
                        " data-parameter=\"{}\"",
                        encode_double_quoted_attribute(name)
                    ));
                }
                self.out.push_str(">\n");
                self.children(node)?;
                self.cr();
                self.out.push_str("</section>\n");
            }
            NodeValue::TableRow { .. } | NodeValue::TableCell => {
                return Err(RenderError::UnexpectedNode {
                    kind: doc.kind(node),
                    context: "block",
                });
            }
            _ => self.inline(node)?,
        }
        Ok(())
    }

    fn table(&mut self, table: NodeId) -> Result<(), RenderError> {
        let doc = self.doc;
        let Some(table) = Table::cast(doc, table) else {
            return Ok(());
        };
        self.cr();
        self.out.push_str("<table>\n");
        let mut in_body = false;
        for row in table.rows(doc) {
            let header = row.is_header(doc);
            if header {
                self.out.push_str("<thead>\n");
            } else if !in_body {
                self.out.push_str("<tbody>\n");
                in_body = true;
            }
            self.out.push_str("<tr>\n");
            for cell in row.cells(doc) {
                self.cell(cell, header)?;
            }
            self.out.push_str("</tr>\n");
            if header {
                self.out.push_str("</thead>\n");
            }
        }
        if in_body {
            self.out.push_str("</tbody>\n");
        }
        self.out.push_str("</table>\n");
        Ok(())
    }

    fn cell(&mut self, cell: TableCell, header: bool) -> Result<(), RenderError> {
        let tag = if header { "th" } else { "td" };
        let align = match cell.alignment(self.doc) {
            TableAlignment::None => "",
            TableAlignment::Left => " align=\"left\"",
            TableAlignment::Center => " align=\"center\"",
            TableAlignment::Right => " align=\"right\"",
        };
        self.out.push_str(&format!("<{}{}>", tag, align));
        self.children(cell.id())?;
        self.out.push_str(&format!("</{}>\n", tag));
        Ok(())
    }

    fn inline(&mut self, node: NodeId) -> Result<(), RenderError> {
        let doc = self.doc;
        match doc.value(node) {
            NodeValue::Text(text) => self.out.push_str(&encode_text(text)),
            NodeValue::SoftBreak => self.out.push('\n'),
            NodeValue::HardBreak => self.out.push_str("<br />\n"),
            NodeValue::CodeSpan(code) => {
                self.out.push_str("<code>");
                self.out.push_str(&encode_text(code));
                self.out.push_str("</code>");
            }
            NodeValue::HtmlInline(html) => self.out.push_str(html),
            NodeValue::Emphasis { .. } => self.wrap(node, "em")?,
            NodeValue::Strong { .. } => self.wrap(node, "strong")?,
            NodeValue::Strikethrough => self.wrap(node, "del")?,
            NodeValue::Autolink { destination, email } => {
                let href = if *email {
                    format!("mailto:{}", destination)
                } else {
                    destination.clone()
                };
                self.out.push_str(&format!(
                    "<a href=\"{}\">{}</a>",
                    encode_double_quoted_attribute(&href),
                    encode_text(destination)
                ));
            }
            NodeValue::Link(_) | NodeValue::Image(_) => {
                let Some(link) = Link::cast(doc, node) else {
                    return Ok(());
                };
                let destination = link.destination(doc).unwrap_or_default();
                let title = link
                    .title(doc)
                    .map(|title| format!(" title=\"{}\"", encode_double_quoted_attribute(title)))
                    .unwrap_or_default();
                if link.is_image(doc) {
                    self.out.push_str(&format!(
                        "<img src=\"{}\" alt=\"{}\"{} />",
                        encode_double_quoted_attribute(destination),
                        encode_double_quoted_attribute(&doc.text_content(node)),
                        title
                    ));
                } else {
                    self.out.push_str(&format!(
                        "<a href=\"{}\"{}>",
                        encode_double_quoted_attribute(destination),
                        title
                    ));
                    self.children(node)?;
                    self.out.push_str("</a>");
                }
            }
            NodeValue::InlineTag { .. } => {
                let Some(tag) = InlineTag::cast(doc, node) else {
                    return Ok(());
                };
                match tag.destination(doc) {
                    Some(destination) => {
                        self.out.push_str(&format!(
                            "<a href=\"{}\">",
                            encode_double_quoted_attribute(destination)
                        ));
                        if doc.first_child(node).is_some() {
                            self.children(node)?;
                        } else {
                            self.out.push_str(&format!("<code>{}</code>", encode_text(destination)));
                        }
                        self.out.push_str("</a>");
                    }
                    None => {
                        self.out.push_str(&format!(
                            "<span data-tag=\"{}\">",
                            encode_double_quoted_attribute(tag.tag_name(doc))
                        ));
                        self.out.push_str(&encode_text(tag.content(doc).unwrap_or_default()));
                        self.out.push_str("</span>");
                    }
                }
            }
            _ => {
                return Err(RenderError::UnexpectedNode {
                    kind: doc.kind(node),
                    context: "inline",
                });
            }
        }
        Ok(())
    }

    fn wrap(&mut self, node: NodeId, tag: &str) -> Result<(), RenderError> {
        self.out.push_str(&format!("<{}>", tag));
        self.children(node)?;
        self.out.push_str(&format!("</{}>", tag));
        Ok(())
    }
}
