//! Documentation block tags and modifier tags.
//!
//! ```markdown
//! Summary paragraph.
//!
//! @param name - Description of the parameter.
//! @remarks
//! Everything up to the next block tag belongs to this section.
//! @beta @sealed
//! ```
//!
//! A block tag opens a section that lasts until the next block tag (or the
//! end of the comment). Modifier tags are flags with no content of their own.

use indextree::NodeId;

use crate::config::{TagDefinition, TagSyntax};
use crate::diagnostics::{Diagnostic, MessageId};
use crate::syntax::{ElementKind, NodeValue, Span, SyntaxElement, SyntaxKind, is_valid_tag_name};

use super::{BlockContinue, BlockParser, BlockStart, BlockSyntax};

/// Length of the `@word` at the start of `rest`.
fn tag_token_len(rest: &str) -> usize {
    rest.find(char::is_whitespace).unwrap_or(rest.len())
}

fn leading_whitespace(rest: &str) -> usize {
    rest.len() - rest.trim_start_matches([' ', '\t']).len()
}

pub(crate) struct BlockTags;

impl BlockTags {
    /// Whether a tag on this line would sit at the top level of the comment.
    /// A list is only the container when none of its items continued.
    fn at_top_level(parser: &BlockParser<'_>, container: NodeId) -> bool {
        let mut node = container;
        while matches!(
            parser.doc.kind(node),
            SyntaxKind::Paragraph | SyntaxKind::List
        ) {
            match parser.doc.parent(node) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
        matches!(
            parser.doc.kind(node),
            SyntaxKind::Document | SyntaxKind::BlockTag
        )
    }

    /// Read and validate the tag name under the cursor. Reports malformed and
    /// undefined names; undefined tags are treated as block tags.
    fn read_tag(parser: &mut BlockParser<'_>) -> Option<(String, Span, TagDefinition)> {
        let rest = parser.scanner.rest_from_nonspace();
        let start = parser.scanner.next_nonspace();
        let name = &rest[..tag_token_len(rest)];
        let span = Span::new(start, start + name.len());

        if !is_valid_tag_name(name) {
            log::debug!("malformed tag name {:?}", name);
            parser.report(Diagnostic::error(
                MessageId::MalformedTagName,
                span,
                format!(
                    "The tag name {name:?} is not valid: expected \"@\" followed by ASCII letters and digits"
                ),
            ));
            return None;
        }

        let definition = match parser.config.tags.find(name) {
            Some(definition) => definition.clone(),
            None => {
                if parser.config.tags.report_undefined {
                    parser.report(Diagnostic::warning(
                        MessageId::UndefinedTag,
                        span,
                        format!("The tag {name:?} is not defined in this configuration"),
                    ));
                }
                TagDefinition::new(name, TagSyntax::Block)
            }
        };
        Some((name.to_string(), span, definition))
    }

    /// Open one `ModifierTag` per consecutive modifier on the line.
    fn start_modifiers(
        parser: &mut BlockParser<'_>,
        mut name: String,
        mut span: Span,
    ) -> BlockStart {
        parser.close_unmatched_blocks();
        loop {
            let node = parser.add_child(NodeValue::ModifierTag { tag_name: name.clone() }, span.start);
            parser
                .doc
                .attach_element(node, SyntaxElement::new(ElementKind::TagName, &name, Some(span)));
            parser.scanner.advance_next_nonspace();
            parser.scanner.advance_offset(name.chars().count(), false);
            parser.finish(parser.line_number());
            parser.set_span_end(node, span.end);
            parser.scanner.find_next_nonspace();

            // Only defined modifiers chain on the same line.
            let rest = parser.scanner.rest_from_nonspace();
            let next = &rest[..tag_token_len(rest)];
            match parser.config.tags.find(next) {
                Some(definition) if definition.syntax == TagSyntax::Modifier && is_valid_tag_name(next) => {
                    let start = parser.scanner.next_nonspace();
                    span = Span::new(start, start + next.len());
                    name = next.to_string();
                }
                _ => break,
            }
        }
        if parser.scanner.is_blank() {
            BlockStart::Leaf
        } else {
            BlockStart::Container
        }
    }

    /// Read `name - ` after a parameter tag, reporting what is missing.
    fn read_parameter(parser: &mut BlockParser<'_>, tag: NodeId) -> Option<String> {
        parser.scanner.find_next_nonspace();
        parser.scanner.advance_next_nonspace();

        let rest = parser.scanner.rest_of_line();
        if rest.starts_with('{') {
            // JSDoc-style `{type}` annotation.
            let start = parser.scanner.pos();
            let len = rest.find('}').map_or(rest.len(), |close| close + 1);
            parser.report(Diagnostic::error(
                MessageId::ParamTagWithJsdocType,
                Span::new(start, start + len),
                "The parameter tag should not include a JSDoc-style \"{type}\" annotation",
            ));
            parser.scanner.advance_offset(rest[..len].chars().count(), false);
            parser.scanner.find_next_nonspace();
            parser.scanner.advance_next_nonspace();
        }

        let rest = parser.scanner.rest_of_line();
        let start = parser.scanner.pos();
        let name_len = tag_token_len(rest);
        let name = &rest[..name_len];
        if name.is_empty() || name.starts_with('-') {
            parser.report(Diagnostic::error(
                MessageId::ParamTagMissingName,
                Span::new(start, start + name_len),
                "The parameter tag must be followed by a parameter name",
            ));
            // The description after a lone hyphen is section text, not a list item.
            if let Some(after) = rest.strip_prefix('-') {
                let consumed = 1 + leading_whitespace(after);
                parser.scanner.advance_offset(consumed, false);
            }
            return None;
        }
        parser.doc.attach_element(
            tag,
            SyntaxElement::new(
                ElementKind::ParameterName,
                name,
                Some(Span::new(start, start + name_len)),
            ),
        );
        parser.scanner.advance_offset(name.chars().count(), false);

        let after = &rest[name_len..];
        let spaces = leading_whitespace(after);
        if after[spaces..].starts_with('-') {
            let consumed = spaces + 1 + leading_whitespace(&after[spaces + 1..]);
            parser.scanner.advance_offset(consumed, false);
        } else {
            let position = start + name_len + spaces;
            parser.report(Diagnostic::error(
                MessageId::ParamTagMissingHyphen,
                Span::new(position, position),
                "The parameter name must be followed by a hyphen",
            ));
        }
        Some(name.to_string())
    }
}

impl BlockSyntax for BlockTags {
    fn name(&self) -> &'static str {
        "block-tag"
    }

    fn try_start_block(&self, parser: &mut BlockParser<'_>, container: NodeId) -> Option<BlockStart> {
        if parser.scanner.is_indented()
            || parser.scanner.peek_nonspace() != Some('@')
            || !Self::at_top_level(parser, container)
        {
            return None;
        }
        let (name, span, definition) = Self::read_tag(parser)?;
        match definition.syntax {
            TagSyntax::Inline => return None,
            TagSyntax::Modifier => return Some(Self::start_modifiers(parser, name, span)),
            TagSyntax::Block => {}
        }

        parser.close_unmatched_blocks();
        let tag = parser.add_child(
            NodeValue::BlockTag {
                tag_name: name.clone(),
                parameter_name: None,
            },
            span.start,
        );
        parser
            .doc
            .attach_element(tag, SyntaxElement::new(ElementKind::TagName, &name, Some(span)));
        parser.scanner.advance_next_nonspace();
        parser.scanner.advance_offset(name.chars().count(), false);

        if definition.parameter
            && let Some(parameter) = Self::read_parameter(parser, tag)
        {
            parser.doc.update(tag, |value| {
                if let NodeValue::BlockTag { parameter_name, .. } = value {
                    *parameter_name = Some(parameter);
                }
            });
        }
        log::debug!("block tag {} opened a section", name);
        Some(BlockStart::Container)
    }

    fn try_continue_block(&self, parser: &mut BlockParser<'_>, node: NodeId) -> BlockContinue {
        match parser.doc.kind(node) {
            SyntaxKind::BlockTag => BlockContinue::Matched,
            _ => BlockContinue::NotMatched,
        }
    }

    fn finish_block(&self, parser: &mut BlockParser<'_>, node: NodeId) {
        // A section ends with its last block, not with the line that closed it.
        if parser.doc.kind(node) == SyntaxKind::BlockTag
            && let Some(last) = parser.doc.last_child(node)
            && let Some(span) = parser.doc.span(last)
        {
            parser.set_span_end(node, span.end);
        }
    }
}
