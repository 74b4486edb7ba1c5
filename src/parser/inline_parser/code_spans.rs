//! Code spans: a backtick run closed by the next run of the same length.
//!
//! Line endings inside become spaces, and one space is stripped from each
//! side when both sides have one and the content is not all spaces. A run
//! with no closer is literal text, whole.

use crate::parser::scanner::Token;
use crate::syntax::NodeValue;

use super::{InlineParser, InlineSyntax};

fn backtick_run(s: &str) -> usize {
    s.bytes().take_while(|&b| b == b'`').count()
}

/// Find the closing run for an opening run of `ticks` backticks. Returns the
/// content length and the length including the closer.
fn find_closing_ticks(rest: &str, ticks: usize) -> Option<(usize, usize)> {
    let mut pos = 0;
    while let Some(offset) = rest[pos..].find('`') {
        let run_start = pos + offset;
        let run = backtick_run(&rest[run_start..]);
        if run == ticks {
            return Some((run_start, run_start + run));
        }
        pos = run_start + run;
    }
    None
}

fn normalize_code(raw: &str) -> String {
    let code = raw.replace("\r\n", " ").replace(['\n', '\r'], " ");
    let bytes = code.as_bytes();
    if bytes.len() >= 2
        && bytes[0] == b' '
        && bytes[bytes.len() - 1] == b' '
        && bytes.iter().any(|&b| b != b' ')
    {
        code[1..code.len() - 1].to_string()
    } else {
        code
    }
}

pub(crate) struct CodeSpans;

impl InlineSyntax for CodeSpans {
    fn name(&self) -> &'static str {
        "code-spans"
    }

    fn triggers(&self) -> &'static [Token] {
        &[Token::Backtick]
    }

    fn try_parse_inline(&self, parser: &mut InlineParser<'_>) -> bool {
        let start = parser.scanner.token_start();
        parser
            .scanner
            .rescan(|s| Some((Token::BacktickString, backtick_run(s))));
        let ticks = parser.scanner.pos() - start;

        let rest = parser.scanner.remaining();
        let Some((content_len, total)) = find_closing_ticks(rest, ticks) else {
            log::trace!("unclosed backtick run of {}", ticks);
            return false;
        };
        let code = normalize_code(&rest[..content_len]);
        parser.scanner.bump(total);
        let end = parser.scanner.pos();
        parser.add_node(NodeValue::CodeSpan(code), start, end);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closer_must_have_the_same_length() {
        assert_eq!(find_closing_ticks("a `` b` c", 1), Some((6, 7)));
        assert_eq!(find_closing_ticks("a ``` b", 2), None);
    }

    #[test]
    fn one_space_is_stripped_from_each_side() {
        assert_eq!(normalize_code(" a "), "a");
        assert_eq!(normalize_code("  a  "), " a ");
        assert_eq!(normalize_code("   "), "   ");
        assert_eq!(normalize_code(" a"), " a");
        assert_eq!(normalize_code("a\nb"), "a b");
    }
}
