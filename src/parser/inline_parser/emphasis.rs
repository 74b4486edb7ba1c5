//! Emphasis and strong emphasis with `*` and `_`.
//!
//! Runs are pushed on the delimiter stack with their flanking flags. When a
//! closer meets an opener, two characters are used (strong) if both runs still
//! have two, otherwise one (emphasis).
//!
//! `_` is stricter than `*` inside words: `snake_case_name` has no emphasis.

use crate::parser::scanner::Token;
use crate::syntax::NodeValue;
use crate::utils::{is_punctuation, is_whitespace};

use super::{DelimiterOutcome, InlineParser, InlineSyntax};

/// Left- and right-flanking for a run between `before` and `after`. Line
/// boundaries count as whitespace.
pub(crate) fn flanking(before: char, after: char) -> (bool, bool) {
    let left = !is_whitespace(after)
        && (!is_punctuation(after) || is_whitespace(before) || is_punctuation(before));
    let right = !is_whitespace(before)
        && (!is_punctuation(before) || is_whitespace(after) || is_punctuation(after));
    (left, right)
}

/// Rescan the current token as a run of `ch` and return its open/close flags
/// as plain flanking.
pub(crate) fn scan_run(parser: &mut InlineParser<'_>, ch: char) -> (usize, usize, bool, bool) {
    let start = parser.scanner.token_start();
    parser.scanner.rescan(|s| {
        let len = s.len() - s.trim_start_matches(ch).len();
        Some((Token::DelimiterRun, len))
    });
    let end = parser.scanner.pos();
    let before = parser.scanner.char_before(start).unwrap_or('\n');
    let after = parser.scanner.char_at(end).unwrap_or('\n');
    let (left, right) = flanking(before, after);

    if ch == '_' {
        let can_open = left && (!right || is_punctuation(before));
        let can_close = right && (!left || is_punctuation(after));
        (start, end, can_open, can_close)
    } else {
        (start, end, left, right)
    }
}

pub(crate) struct Emphasis;

impl InlineSyntax for Emphasis {
    fn name(&self) -> &'static str {
        "emphasis"
    }

    fn triggers(&self) -> &'static [Token] {
        &[Token::Asterisk, Token::Underscore]
    }

    fn try_parse_inline(&self, parser: &mut InlineParser<'_>) -> bool {
        let ch = if parser.scanner.token() == Token::Asterisk {
            '*'
        } else {
            '_'
        };
        let (start, end, can_open, can_close) = scan_run(parser, ch);
        let node = parser.add_text(start, end);
        if can_open || can_close {
            parser.push_delimiter(ch, end - start, can_open, can_close, node);
        }
        true
    }

    fn process_delimiter(
        &self,
        parser: &mut InlineParser<'_>,
        opener: usize,
        closer: usize,
    ) -> DelimiterOutcome {
        let delimiter = parser.delimiters[opener].ch;
        let strong = parser.delimiters[opener].count >= 2 && parser.delimiters[closer].count >= 2;
        let (used, value) = if strong {
            (2, NodeValue::Strong { delimiter })
        } else {
            (1, NodeValue::Emphasis { delimiter })
        };
        parser.wrap_delimiters(opener, closer, used, value);

        if parser.delimiters[closer].count == 0 {
            DelimiterOutcome::Processed(closer + 1)
        } else {
            DelimiterOutcome::Processed(closer)
        }
    }
}
