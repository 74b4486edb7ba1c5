//! Link reference definitions.
//!
//! ```markdown
//! [label]: url "optional title"
//! [label]: <url> 'optional title'
//! [label]:
//!   url
//!   (optional title)
//! ```
//!
//! Definitions are only recognized at the start of a paragraph, so they are
//! peeled off when the paragraph finishes (or when it turns into a setext
//! heading or table) and inserted as `LinkReference` nodes before it.

use indextree::NodeId;

use crate::parser::content::ContentWriter;
use crate::parser::scanner::Scanner;
use crate::parser::inline_parser::links::{
    parse_link_destination, parse_link_label, parse_link_title, skip_spnl,
};
use crate::syntax::{ElementKind, NodeValue, SyntaxElement, normalize_label};

use super::BlockParser;

/// A definition found at the start of some text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReferenceDefinition {
    /// Label text between the brackets, as written.
    pub label: String,
    pub destination: String,
    pub title: Option<String>,
    /// Bytes consumed, including the line ending.
    pub len: usize,
    /// Bytes of the definition itself, without trailing whitespace.
    pub text_len: usize,
    pub destination_range: (usize, usize),
    pub title_range: Option<(usize, usize)>,
}

/// Match `^[ \t]*(?:\n|$)` and return its length.
fn space_at_end_of_line(s: &str) -> Option<usize> {
    let spaces = s.len() - s.trim_start_matches([' ', '\t']).len();
    match s[spaces..].chars().next() {
        None => Some(spaces),
        Some('\n') => Some(spaces + 1),
        Some(_) => None,
    }
}

/// Try to read one reference definition at the start of `s`.
pub(crate) fn parse_reference(s: &str) -> Option<ReferenceDefinition> {
    Scanner::new(s).try_parse(read_definition)
}

fn read_definition(scanner: &mut Scanner<'_>) -> Option<ReferenceDefinition> {
    let label_len = parse_link_label(scanner.remaining())?;
    let written = scanner.consume(label_len);
    let label = &written[1..label_len - 1];
    if !scanner.eat(':') {
        return None;
    }
    skip_spnl(scanner);

    let destination_start = scanner.pos();
    let (destination, destination_len) = parse_link_destination(scanner.remaining())?;
    scanner.bump(destination_len);
    let destination_range = (destination_start, scanner.pos());

    // The title is dropped again when anything but spaces follows it on its
    // line; the destination must then end its own line.
    let title = scanner.try_parse(|scanner| {
        if skip_spnl(scanner) == 0 {
            return None;
        }
        let title_start = scanner.pos();
        let (text, len) = parse_link_title(scanner.remaining())?;
        scanner.bump(len);
        space_at_end_of_line(scanner.remaining())?;
        Some((text, (title_start, scanner.pos())))
    });
    let text_len = scanner.pos();
    let trailing = space_at_end_of_line(scanner.remaining())?;
    scanner.bump(trailing);

    if normalize_label(label).is_empty() {
        return None;
    }

    let (title, title_range) = match title {
        Some((text, range)) => (Some(text), Some(range)),
        None => (None, None),
    };
    Some(ReferenceDefinition {
        label: label.to_string(),
        destination,
        title,
        len: scanner.pos(),
        text_len,
        destination_range,
        title_range,
    })
}

/// Peel definitions off the start of `content` and insert them before
/// `anchor`. Returns how many were found.
pub(crate) fn extract(parser: &mut BlockParser<'_>, anchor: NodeId, content: &mut ContentWriter) -> usize {
    let mut found = 0;
    while content.text().starts_with('[') {
        let Some(definition) = parse_reference(content.text()) else {
            break;
        };
        log::debug!(
            "reference definition [{}] -> {:?}",
            definition.label,
            definition.destination
        );

        let span = content.span(0, definition.text_len);
        let node = parser.doc.create_with_span(
            NodeValue::LinkReference {
                label: definition.label.clone(),
                destination: definition.destination.clone(),
                title: definition.title.clone(),
            },
            Some(span),
        );
        let label_span = content.span(1, 1 + definition.label.len());
        parser.doc.attach_element(
            node,
            SyntaxElement::new(ElementKind::Label, &definition.label, Some(label_span)),
        );
        let (start, end) = definition.destination_range;
        parser.doc.attach_element(
            node,
            SyntaxElement::new(
                ElementKind::Destination,
                &content.text()[start..end],
                Some(content.span(start, end)),
            ),
        );
        if let Some((start, end)) = definition.title_range {
            parser.doc.attach_element(
                node,
                SyntaxElement::new(
                    ElementKind::Title,
                    &content.text()[start..end],
                    Some(content.span(start, end)),
                ),
            );
        }
        parser.doc.insert_sibling_before(anchor, node);

        content.drain_prefix(definition.len);
        found += 1;
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_definition() {
        let def = parse_reference("[foo]: /url \"title\"\nrest").unwrap();
        assert_eq!(def.label, "foo");
        assert_eq!(def.destination, "/url");
        assert_eq!(def.title.as_deref(), Some("title"));
        assert_eq!(def.len, 20);
        assert_eq!(def.text_len, 19);
    }

    #[test]
    fn angle_destination_may_be_empty() {
        let def = parse_reference("[foo]: <>\n").unwrap();
        assert_eq!(def.destination, "");
    }

    #[test]
    fn destination_and_title_on_following_lines() {
        let def = parse_reference("[Foo bar]:\n<my url>\n'title'\n").unwrap();
        assert_eq!(def.destination, "my url");
        assert_eq!(def.title.as_deref(), Some("title"));
    }

    #[test]
    fn trailing_text_after_title_drops_the_title() {
        // The title line is not part of the definition, so it stays behind.
        let def = parse_reference("[foo]: /url\n\"title\" ok\n").unwrap();
        assert_eq!(def.title, None);
        assert_eq!(def.len, "[foo]: /url\n".len());
    }

    #[test]
    fn trailing_text_on_destination_line_is_not_a_definition() {
        assert_eq!(parse_reference("[foo]: /url \"title\" ok\n"), None);
        assert_eq!(parse_reference("[foo]: /url bar\n"), None);
    }

    #[test]
    fn missing_destination_or_colon() {
        assert_eq!(parse_reference("[foo]:\n"), None);
        assert_eq!(parse_reference("[foo] /url\n"), None);
        assert_eq!(parse_reference("[]: /url\n"), None);
        assert_eq!(parse_reference("[ ]: /url\n"), None);
    }

    #[test]
    fn escapes_in_destination_and_title() {
        let def = parse_reference("[foo]: /url\\bar\\*baz \"foo\\\"bar\\baz\"\n").unwrap();
        assert_eq!(def.destination, "/url\\bar*baz");
        assert_eq!(def.title.as_deref(), Some("foo\"bar\\baz"));
    }
}
