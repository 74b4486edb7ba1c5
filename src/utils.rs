//! Character classes and string helpers shared by the block and inline passes.

use std::sync::LazyLock;

use regex::Regex;

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^&(?:#[xX][0-9a-fA-F]{1,6}|#[0-9]{1,7}|[A-Za-z][A-Za-z0-9]{1,31});")
        .expect("invalid entity regex")
});

const TAG_NAME: &str = "[A-Za-z][A-Za-z0-9-]*";
const ATTRIBUTE: &str = r#"(?:\s+[a-zA-Z_:][a-zA-Z0-9:._-]*(?:\s*=\s*(?:[^"'=<>`\x00-\x20]+|'[^']*'|"[^"]*"))?)"#;

/// `<tag attr="value">`
pub(crate) static OPEN_TAG: LazyLock<String> =
    LazyLock::new(|| format!(r"<{TAG_NAME}{ATTRIBUTE}*\s*/?>"));

/// `</tag>`
pub(crate) static CLOSE_TAG: LazyLock<String> = LazyLock::new(|| format!(r"</{TAG_NAME}\s*>"));

/// Any raw HTML construct allowed inline: tags, comments, processing
/// instructions, declarations and CDATA sections.
pub(crate) static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| {
    let comment = r"<!-->|<!--->|<!--[\s\S]*?-->";
    let processing = r"<\?[\s\S]*?\?>";
    let declaration = r"<![A-Za-z]+[^>]*>";
    let cdata = r"<!\[CDATA\[[\s\S]*?\]\]>";
    Regex::new(&format!(
        "^(?:{}|{}|{comment}|{processing}|{declaration}|{cdata})",
        *OPEN_TAG, *CLOSE_TAG
    ))
    .expect("invalid html tag regex")
});

pub(crate) fn is_whitespace(c: char) -> bool {
    c.is_whitespace()
}

/// ASCII punctuation, or any other character that is neither alphanumeric,
/// whitespace nor a control character.
pub(crate) fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || (!c.is_ascii() && !c.is_alphanumeric() && !c.is_whitespace() && !c.is_control())
}

pub(crate) fn is_blank(s: &str) -> bool {
    s.chars().all(|c| matches!(c, ' ' | '\t' | '\n' | '\r'))
}

/// Decode one entity or numeric character reference (`&amp;`, `&#35;`, `&#x22;`)
/// at the start of `s`. Returns the decoded text and the bytes consumed.
pub(crate) fn decode_entity(s: &str) -> Option<(String, usize)> {
    let m = ENTITY.find(s)?;
    let raw = m.as_str();
    let body = &raw[1..raw.len() - 1];

    if let Some(number) = body.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse::<u32>().ok()?,
        };
        let ch = match code {
            0 => '\u{FFFD}',
            code => char::from_u32(code).unwrap_or('\u{FFFD}'),
        };
        return Some((ch.to_string(), raw.len()));
    }

    let decoded = html_escape::decode_html_entities(raw);
    if decoded == raw {
        None
    } else {
        Some((decoded.into_owned(), raw.len()))
    }
}

/// Resolve backslash escapes and entity references in one pass.
pub(crate) fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(ch) = rest.chars().next() {
        match ch {
            '\\' => {
                let next = rest[1..].chars().next();
                if let Some(escaped) = next.filter(char::is_ascii_punctuation) {
                    out.push(escaped);
                    rest = &rest[2..];
                    continue;
                }
            }
            '&' => {
                if let Some((decoded, len)) = decode_entity(rest) {
                    out.push_str(&decoded);
                    rest = &rest[len..];
                    continue;
                }
            }
            _ => {}
        }
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punctuation_includes_unicode_symbols() {
        assert!(is_punctuation('!'));
        assert!(is_punctuation('€'));
        assert!(is_punctuation('“'));
        assert!(!is_punctuation('a'));
        assert!(!is_punctuation('é'));
        assert!(!is_punctuation(' '));
    }

    #[test]
    fn numeric_references_decode() {
        assert_eq!(decode_entity("&#35; x"), Some(("#".to_string(), 5)));
        assert_eq!(decode_entity("&#X22;"), Some(("\"".to_string(), 6)));
        assert_eq!(decode_entity("&#0;"), Some(("\u{FFFD}".to_string(), 4)));
        assert_eq!(decode_entity("&amp;"), Some(("&".to_string(), 5)));
        assert_eq!(decode_entity("&notanentity;"), None);
        assert_eq!(decode_entity("&#;"), None);
    }

    #[test]
    fn unescape_handles_escapes_and_entities() {
        assert_eq!(unescape(r"foo\*bar"), "foo*bar");
        assert_eq!(unescape(r"\&amp;"), "&amp;");
        assert_eq!(unescape("a&amp;b"), "a&b");
        assert_eq!(unescape(r"\a"), r"\a");
    }

    #[test]
    fn raw_html_constructs() {
        assert!(HTML_TAG.is_match(r#"<a href="x" data-y='z'>"#));
        assert!(HTML_TAG.is_match("</div >"));
        assert!(HTML_TAG.is_match("<br/>"));
        assert!(HTML_TAG.is_match("<!-- note -->"));
        assert!(HTML_TAG.is_match("<?php echo 1; ?>"));
        assert!(HTML_TAG.is_match("<!DOCTYPE html>"));
        assert!(HTML_TAG.is_match("<![CDATA[x]]>"));
        assert!(!HTML_TAG.is_match("<33>"));
        assert!(!HTML_TAG.is_match("<a href=\"x>"));
    }
}
