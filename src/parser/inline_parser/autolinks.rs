//! `<scheme:target>` and `<user@example.com>`.

use std::sync::LazyLock;

use regex::Regex;

use crate::parser::scanner::Token;
use crate::syntax::NodeValue;

use super::{InlineParser, InlineSyntax};

static URI_AUTOLINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<[A-Za-z][A-Za-z0-9.+-]{1,31}:[^<>\x00-\x20]*>").expect("invalid autolink regex")
});

static EMAIL_AUTOLINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^<[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*>",
    )
    .expect("invalid email autolink regex")
});

pub(crate) struct Autolinks;

impl InlineSyntax for Autolinks {
    fn name(&self) -> &'static str {
        "autolinks"
    }

    fn triggers(&self) -> &'static [Token] {
        &[Token::LessThan]
    }

    fn try_parse_inline(&self, parser: &mut InlineParser<'_>) -> bool {
        let start = parser.scanner.token_start();
        let rest = &parser.text()[start..];
        let (len, email) = if let Some(m) = EMAIL_AUTOLINK.find(rest) {
            (m.end(), true)
        } else if let Some(m) = URI_AUTOLINK.find(rest) {
            (m.end(), false)
        } else {
            return false;
        };
        parser.scanner.rescan(|_| Some((Token::Autolink, len)));
        let destination = rest[1..len - 1].to_string();
        log::trace!("autolink {:?}", destination);
        parser.add_node(NodeValue::Autolink { destination, email }, start, start + len);
        true
    }
}
