//! Inline raw HTML: open and close tags, comments, processing instructions,
//! declarations and CDATA sections, kept verbatim.

use crate::parser::scanner::Token;
use crate::syntax::NodeValue;
use crate::utils::HTML_TAG;

use super::{InlineParser, InlineSyntax};

pub(crate) struct RawHtml;

impl InlineSyntax for RawHtml {
    fn name(&self) -> &'static str {
        "raw-html"
    }

    fn triggers(&self) -> &'static [Token] {
        &[Token::LessThan]
    }

    fn try_parse_inline(&self, parser: &mut InlineParser<'_>) -> bool {
        let start = parser.scanner.token_start();
        if parser
            .scanner
            .rescan(|s| HTML_TAG.find(s).map(|m| (Token::HtmlTag, m.end())))
            .is_none()
        {
            return false;
        }
        let end = parser.scanner.pos();
        let html = parser.text()[start..end].to_string();
        parser.add_node(NodeValue::HtmlInline(html), start, end);
        true
    }
}
