//! Links and images: `[text](dest "title")`, `[text][label]`, `[text][]`,
//! `[text]`, and the same forms prefixed with `!`.
//!
//! The destination, title and label helpers are also used by the block pass
//! to read link reference definitions.

use std::sync::LazyLock;

use regex::Regex;

use crate::parser::scanner::{Scanner, Token};
use crate::syntax::{Document, ElementKind, LinkData, LinkStyle, NodeValue, SyntaxElement};
use crate::utils::unescape;

use super::{BracketKind, InlineParser, InlineSyntax};

static LINK_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(?:[^\\\[\]]|\\.){0,999}\]").expect("invalid link label regex")
});

/// Deepest parenthesis nesting accepted in a bare destination.
const MAX_PAREN_DEPTH: usize = 32;

/// Length of a `[label]` at the start of `s`, brackets included.
pub(crate) fn parse_link_label(s: &str) -> Option<usize> {
    LINK_LABEL.find(s).map(|m| m.end())
}

/// Read a destination at the start of `s`: either `<...>` or a run of
/// non-space characters with balanced parentheses. Returns the unescaped
/// destination and the bytes consumed.
pub(crate) fn parse_link_destination(s: &str) -> Option<(String, usize)> {
    let bytes = s.as_bytes();
    if bytes.first() == Some(&b'<') {
        let mut i = 1;
        while i < bytes.len() {
            match bytes[i] {
                b'>' => return Some((unescape(&s[1..i]), i + 1)),
                b'<' | b'\n' | b'\r' => return None,
                b'\\' if bytes.get(i + 1).is_some_and(u8::is_ascii_punctuation) => i += 2,
                _ => i += 1,
            }
        }
        return None;
    }

    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if bytes.get(i + 1).is_some_and(u8::is_ascii_punctuation) => {
                i += 2;
                continue;
            }
            b'(' => {
                depth += 1;
                if depth > MAX_PAREN_DEPTH {
                    return None;
                }
            }
            b')' => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            b if b <= b' ' || b == 0x7f => break,
            _ => {}
        }
        i += 1;
    }
    if (i == 0 && bytes.first() != Some(&b')')) || depth != 0 {
        return None;
    }
    Some((unescape(&s[..i]), i))
}

/// Read a `"title"`, `'title'` or `(title)` at the start of `s`. Returns the
/// unescaped title and the bytes consumed, delimiters included.
pub(crate) fn parse_link_title(s: &str) -> Option<(String, usize)> {
    let close = match s.as_bytes().first()? {
        b'"' => b'"',
        b'\'' => b'\'',
        b'(' => b')',
        _ => return None,
    };
    let open = s.as_bytes()[0];
    let bytes = s.as_bytes();
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if i + 1 < bytes.len() => i += 2,
            b if b == close => return Some((unescape(&s[1..i]), i + 1)),
            b'(' if open == b'(' => return None,
            _ => i += 1,
        }
    }
    None
}

/// Spaces and tabs with at most one line ending among them.
fn spnl(s: &str) -> usize {
    let spaces = |s: &str| s.len() - s.trim_start_matches([' ', '\t']).len();
    let mut pos = spaces(s);
    let rest = &s[pos..];
    if let Some(after) = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n')) {
        pos = s.len() - after.len();
        pos += spaces(after);
    }
    pos
}

/// What followed a closing bracket.
struct LinkTarget {
    data: LinkData,
    /// Buffer ranges of the parts written after `]`.
    destination: Option<(usize, usize)>,
    title: Option<(usize, usize)>,
    label: Option<(usize, usize)>,
}

/// Skip spaces and tabs with at most one line ending among them.
pub(crate) fn skip_spnl(scanner: &mut Scanner<'_>) -> usize {
    let len = spnl(scanner.remaining());
    scanner.bump(len);
    len
}

/// `(dest "title")` right after the closing bracket.
fn inline_target(scanner: &mut Scanner<'_>) -> Option<LinkTarget> {
    if !scanner.eat('(') {
        return None;
    }
    skip_spnl(scanner);
    let destination_start = scanner.pos();
    let (destination, len) = parse_link_destination(scanner.remaining())?;
    scanner.bump(len);
    let destination_range = (destination_start, scanner.pos());

    // A title must be separated from the destination by whitespace.
    let mut title = None;
    if skip_spnl(scanner) > 0
        && let Some((text, len)) = parse_link_title(scanner.remaining())
    {
        let title_start = scanner.pos();
        scanner.bump(len);
        title = Some((text, (title_start, scanner.pos())));
        skip_spnl(scanner);
    }
    if !scanner.eat(')') {
        return None;
    }
    let (title, title_range) = match title {
        Some((text, range)) => (Some(text), Some(range)),
        None => (None, None),
    };
    Some(LinkTarget {
        data: LinkData::inline(destination, title),
        destination: (len > 0).then_some(destination_range),
        title: title_range,
        label: None,
    })
}

/// Reference forms, tried when no inline destination follows. Only labels
/// with a definition make a link.
fn reference_target(
    doc: &Document,
    scanner: &mut Scanner<'_>,
    link_text: &str,
    bracket_after: bool,
) -> Option<LinkTarget> {
    let label_len = parse_link_label(scanner.remaining()).unwrap_or(0);
    let (style, label, label_range) = if label_len > 2 {
        let label_start = scanner.pos() + 1;
        let written = scanner.consume(label_len);
        (
            LinkStyle::Full,
            &written[1..label_len - 1],
            Some((label_start, label_start + label_len - 2)),
        )
    } else if bracket_after {
        return None;
    } else if label_len == 2 {
        scanner.consume(2);
        (LinkStyle::Collapsed, link_text, None)
    } else {
        (LinkStyle::Shortcut, link_text, None)
    };

    doc.resolve_reference(label)?;
    Some(LinkTarget {
        data: LinkData::reference(style, label),
        destination: None,
        title: None,
        label: label_range,
    })
}

pub(crate) struct Links;

impl Links {
    fn open(parser: &mut InlineParser<'_>, kind: BracketKind) -> bool {
        let start = parser.scanner.token_start();
        let node = parser.add_text(start, parser.scanner.pos());
        parser.push_bracket(kind, node);
        true
    }

    fn close(parser: &mut InlineParser<'_>) -> bool {
        let Some(frame) = parser.brackets.last().cloned() else {
            return false;
        };
        if matches!(frame.kind, BracketKind::InlineTag { .. }) {
            return false;
        }
        if !frame.active {
            log::trace!("inactive bracket, literal ]");
            parser.brackets.pop();
            return false;
        }

        let text = parser.text();
        let link_text = &text[frame.text_start..parser.scanner.token_start()];
        let doc: &Document = parser.doc;
        let target = parser.scanner.try_parse(inline_target).or_else(|| {
            parser.scanner.try_parse(|scanner| {
                reference_target(doc, scanner, link_text, frame.bracket_after)
            })
        });
        let Some(target) = target else {
            parser.brackets.pop();
            return false;
        };

        let end = parser.scanner.pos();
        let is_image = frame.kind == BracketKind::Image;
        log::trace!(
            "{} {:?} closed at {}",
            if is_image { "image" } else { "link" },
            target.data.style,
            end
        );
        let value = if is_image {
            NodeValue::Image(target.data)
        } else {
            NodeValue::Link(target.data)
        };
        let span = parser.span_from(frame.node, end);
        let node = parser.wrap_between(value, frame.node, None, span);

        parser.process_emphasis(frame.delimiter_bottom);
        parser.brackets.pop();
        parser.doc.remove_node(frame.node);
        if !is_image {
            // No links inside links.
            for bracket in &mut parser.brackets {
                if bracket.kind == BracketKind::Link {
                    bracket.active = false;
                }
            }
        }

        for (kind, range) in [
            (ElementKind::Destination, target.destination),
            (ElementKind::Title, target.title),
            (ElementKind::Label, target.label),
        ] {
            if let Some((start, end)) = range {
                let span = parser.span(start, end);
                parser.doc.attach_element(
                    node,
                    SyntaxElement::new(kind, &text[start..end], Some(span)),
                );
            }
        }
        true
    }
}

impl InlineSyntax for Links {
    fn name(&self) -> &'static str {
        "links"
    }

    fn triggers(&self) -> &'static [Token] {
        &[Token::OpenBracket, Token::Exclamation, Token::CloseBracket]
    }

    fn try_parse_inline(&self, parser: &mut InlineParser<'_>) -> bool {
        match parser.scanner.token() {
            Token::OpenBracket => Self::open(parser, BracketKind::Link),
            Token::Exclamation => {
                if parser.scanner.char_at(parser.scanner.pos()) != Some('[') {
                    return false;
                }
                parser.scanner.bump(1);
                Self::open(parser, BracketKind::Image)
            }
            Token::CloseBracket => Self::close(parser),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_allow_escaped_brackets() {
        assert_eq!(parse_link_label("[foo] x"), Some(5));
        assert_eq!(parse_link_label("[a\\]b]"), Some(6));
        assert_eq!(parse_link_label("[a[b]"), None);
        assert_eq!(parse_link_label("[]"), Some(2));
    }

    #[test]
    fn angle_destinations() {
        assert_eq!(
            parse_link_destination("<my url> x"),
            Some(("my url".to_string(), 8))
        );
        assert_eq!(parse_link_destination("<>"), Some((String::new(), 2)));
        assert_eq!(parse_link_destination("<a\nb>"), None);
        assert_eq!(parse_link_destination("<unclosed"), None);
    }

    #[test]
    fn bare_destinations_balance_parentheses() {
        assert_eq!(
            parse_link_destination("/a(b)c) rest"),
            Some(("/a(b)c".to_string(), 6))
        );
        assert_eq!(parse_link_destination("(unbalanced"), None);
        assert_eq!(parse_link_destination(")"), Some((String::new(), 0)));
        assert_eq!(parse_link_destination("\n"), None);
        assert_eq!(
            parse_link_destination("a\\)b"),
            Some(("a)b".to_string(), 4))
        );
    }

    #[test]
    fn titles_in_three_styles() {
        assert_eq!(parse_link_title("\"t\" x"), Some(("t".to_string(), 3)));
        assert_eq!(parse_link_title("'t\\'s'"), Some(("t's".to_string(), 6)));
        assert_eq!(parse_link_title("(t)"), Some(("t".to_string(), 3)));
        assert_eq!(parse_link_title("(a(b)"), None);
        assert_eq!(parse_link_title("\"open"), None);
    }

    #[test]
    fn spnl_takes_one_line_ending() {
        assert_eq!(spnl("  \n  x"), 5);
        assert_eq!(spnl(" \n\nx"), 2);
        assert_eq!(spnl("x"), 0);
    }
}
