//! Line endings inside a block: a hard break after two or more trailing
//! spaces, a soft break otherwise. Trailing spaces before the line ending and
//! leading spaces on the next line are dropped.

use crate::parser::scanner::Token;
use crate::syntax::NodeValue;

use super::{InlineParser, InlineSyntax};

pub(crate) struct LineBreaks;

fn line_ending_len(s: &str) -> Option<usize> {
    if s.starts_with("\r\n") {
        Some(2)
    } else if s.starts_with(['\n', '\r']) {
        Some(1)
    } else {
        None
    }
}

impl InlineSyntax for LineBreaks {
    fn name(&self) -> &'static str {
        "line-breaks"
    }

    fn triggers(&self) -> &'static [Token] {
        &[Token::Whitespace, Token::NewLine]
    }

    fn try_parse_inline(&self, parser: &mut InlineParser<'_>) -> bool {
        let start = parser.scanner.token_start();
        let value = match parser.scanner.token() {
            Token::NewLine => NodeValue::SoftBreak,
            Token::Whitespace => {
                let Some(len) = line_ending_len(parser.scanner.remaining()) else {
                    return false;
                };
                let spaces = parser.scanner.token_text();
                let hard = spaces.ends_with("  ");
                parser.scanner.bump(len);
                if hard {
                    NodeValue::HardBreak
                } else {
                    NodeValue::SoftBreak
                }
            }
            _ => return false,
        };
        let end = parser.scanner.pos();
        parser.add_node(value, start, end);
        parser.skip_line_indent();
        true
    }
}
