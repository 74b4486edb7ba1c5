//! Inline documentation tags.
//!
//! ```markdown
//! See {@link Widget.render | the render method} for details.
//! {@inheritDoc Base.method}
//! ```
//!
//! Link-like tags read a destination and then, after `|`, link text that is
//! parsed like any other inline content; they sit on the bracket stack until
//! their `}`. Every other tag keeps the text up to `}` as raw content.

use crate::config::TagSyntax;
use crate::diagnostics::MessageId;
use crate::parser::scanner::{Scanner, Token};
use crate::syntax::{ElementKind, NodeValue, SyntaxElement, is_valid_tag_name};

use super::{BracketKind, InlineParser, InlineSyntax};

fn is_name_char(c: char) -> bool {
    !(c.is_whitespace() || c == '}' || c == '|')
}

/// The part of a tag after `{`.
struct TagHead<'a> {
    name: &'a str,
    /// Everything between the name and the first `}`, when there is one.
    body: Option<&'a str>,
}

fn read_head<'a>(scanner: &mut Scanner<'a>) -> Option<TagHead<'a>> {
    if scanner.char_at(scanner.pos()) != Some('@') {
        return None;
    }
    let name = scanner.eat_while(is_name_char);
    let body = scanner.eat_while(|c| c != '}');
    let body = scanner.eat('}').then_some(body);
    Some(TagHead { name, body })
}

/// `destination`, then `}` or `|` for a link-like tag.
struct LinkHead<'a> {
    destination: &'a str,
    destination_start: usize,
    /// Where the `|` was expected.
    after_destination: usize,
    closed: bool,
    pipe: bool,
}

fn read_link_head<'a>(scanner: &mut Scanner<'a>) -> LinkHead<'a> {
    scanner.eat_while(is_name_char);
    scanner.eat_while(char::is_whitespace);
    let destination_start = scanner.pos();
    let destination = scanner.eat_while(is_name_char);
    scanner.eat_while(char::is_whitespace);
    let after_destination = scanner.pos();
    let closed = scanner.eat('}');
    let pipe = !closed && scanner.eat('|');
    if pipe {
        scanner.eat_while(char::is_whitespace);
    }
    LinkHead {
        destination,
        destination_start,
        after_destination,
        closed,
        pipe,
    }
}

pub(crate) struct InlineTags;

impl InlineTags {
    fn open(parser: &mut InlineParser<'_>) -> bool {
        let start = parser.scanner.token_start();
        let name_start = parser.scanner.pos();
        let Some(head) = parser.scanner.look_ahead(read_head) else {
            return false;
        };
        let name = head.name;
        let name_end = name_start + name.len();

        if !is_valid_tag_name(name) {
            log::debug!("malformed inline tag {:?}", name);
            parser.report(
                MessageId::MalformedInlineTag,
                start,
                name_end,
                format!("The inline tag {name:?} is not valid: expected \"{{@\" followed by a tag name"),
            );
            return false;
        }
        let Some(body) = head.body else {
            parser.report(
                MessageId::InlineTagUnclosed,
                start,
                name_end,
                format!("The inline tag {name:?} is missing its closing \"}}\""),
            );
            return false;
        };

        let definition = parser.config.tags.find(name).cloned();
        let link = match &definition {
            Some(definition) if definition.syntax != TagSyntax::Inline => {
                parser.report(
                    MessageId::MalformedInlineTag,
                    start,
                    name_end,
                    format!("The tag {name:?} cannot be used as an inline tag"),
                );
                return false;
            }
            Some(definition) => definition.link,
            None => {
                if parser.config.tags.report_undefined {
                    parser.warn(
                        MessageId::UndefinedTag,
                        name_start,
                        name_end,
                        format!("The tag {name:?} is not defined in this configuration"),
                    );
                }
                false
            }
        };

        let name_element =
            SyntaxElement::new(ElementKind::TagName, name, Some(parser.span(name_start, name_end)));
        if link {
            return Self::open_link(parser, name, name_element);
        }

        // Raw content up to the closing brace.
        if parser.scanner.try_parse(read_head).is_none() {
            return false;
        }
        let end = parser.scanner.pos();
        let content = body.trim();
        let node = parser.add_node(
            NodeValue::InlineTag {
                tag_name: name.to_string(),
                destination: None,
                content: (!content.is_empty()).then(|| content.to_string()),
            },
            start,
            end,
        );
        parser.doc.attach_element(node, name_element);
        true
    }

    /// `{@link destination` followed by `}`, or by `|` and link text.
    fn open_link(parser: &mut InlineParser<'_>, name: &str, name_element: SyntaxElement) -> bool {
        let start = parser.scanner.token_start();
        let head = read_link_head(&mut parser.scanner);
        let destination = head.destination;

        if destination.is_empty() {
            parser.report(
                MessageId::MalformedInlineTag,
                start,
                head.after_destination,
                format!("The {name} tag is missing its destination"),
            );
        }
        let mut elements = vec![name_element];
        if !destination.is_empty() {
            let destination_end = head.destination_start + destination.len();
            elements.push(SyntaxElement::new(
                ElementKind::Destination,
                destination,
                Some(parser.span(head.destination_start, destination_end)),
            ));
        }

        let end = parser.scanner.pos();
        if head.closed {
            let node = parser.add_node(
                NodeValue::InlineTag {
                    tag_name: name.to_string(),
                    destination: (!destination.is_empty()).then(|| destination.to_string()),
                    content: None,
                },
                start,
                end,
            );
            for element in elements {
                parser.doc.attach_element(node, element);
            }
            return true;
        }

        if !head.pipe {
            parser.report(
                MessageId::LinkTagMissingPipe,
                head.after_destination,
                head.after_destination,
                format!("The {name} tag needs a \"|\" between the destination and the link text"),
            );
        }

        let opener = parser.add_text(start, end);
        parser.push_bracket(
            BracketKind::InlineTag {
                tag_name: name.to_string(),
                destination: destination.to_string(),
                elements,
            },
            opener,
        );
        true
    }

    fn close(parser: &mut InlineParser<'_>) -> bool {
        let Some(index) = parser
            .brackets
            .iter()
            .rposition(|b| matches!(b.kind, BracketKind::InlineTag { .. }))
        else {
            return false;
        };
        // Brackets opened inside the tag and never closed stay literal.
        parser.brackets.truncate(index + 1);
        let Some(frame) = parser.brackets.pop() else {
            return false;
        };
        let BracketKind::InlineTag {
            tag_name,
            destination,
            elements,
        } = frame.kind
        else {
            return false;
        };

        let end = parser.scanner.pos();
        let span = parser.span_from(frame.node, end);
        log::trace!("inline tag {} closed at {}", tag_name, end);
        let node = parser.wrap_between(
            NodeValue::InlineTag {
                tag_name,
                destination: (!destination.is_empty()).then_some(destination),
                content: None,
            },
            frame.node,
            None,
            span,
        );
        parser.process_emphasis(frame.delimiter_bottom);
        parser.doc.remove_node(frame.node);
        for element in elements {
            parser.doc.attach_element(node, element);
        }
        true
    }
}

impl InlineSyntax for InlineTags {
    fn name(&self) -> &'static str {
        "inline-tags"
    }

    fn triggers(&self) -> &'static [Token] {
        &[Token::OpenBrace, Token::CloseBrace]
    }

    fn try_parse_inline(&self, parser: &mut InlineParser<'_>) -> bool {
        match parser.scanner.token() {
            Token::OpenBrace => Self::open(parser),
            Token::CloseBrace => Self::close(parser),
            _ => false,
        }
    }
}
