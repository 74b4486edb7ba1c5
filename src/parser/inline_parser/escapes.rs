//! Backslash escapes.
//!
//! - `\` before ASCII punctuation makes that character literal
//! - `\` at the end of a line is a hard line break
//! - any other backslash is literal

use crate::parser::scanner::Token;
use crate::syntax::NodeValue;

use super::{InlineParser, InlineSyntax};

pub(crate) struct Escapes;

impl InlineSyntax for Escapes {
    fn name(&self) -> &'static str {
        "escapes"
    }

    fn triggers(&self) -> &'static [Token] {
        &[Token::Backslash]
    }

    fn try_parse_inline(&self, parser: &mut InlineParser<'_>) -> bool {
        let start = parser.scanner.token_start();
        let escaped = parser.scanner.rescan(|s| {
            let next = s[1..].chars().next()?;
            if next == '\n' {
                Some((Token::HardBreak, 2))
            } else if s[1..].starts_with("\r\n") {
                Some((Token::HardBreak, 3))
            } else if next.is_ascii_punctuation() {
                Some((Token::EscapedChar, 2))
            } else {
                None
            }
        });

        match escaped {
            Some(Token::HardBreak) => {
                // The span covers the backslash only.
                parser.add_node(NodeValue::HardBreak, start, start + 1);
                parser.skip_line_indent();
                true
            }
            Some(_) => {
                let end = parser.scanner.pos();
                let ch = &parser.text()[start + 1..end];
                parser.add_node(NodeValue::text(ch), start, end);
                true
            }
            None => false,
        }
    }
}
