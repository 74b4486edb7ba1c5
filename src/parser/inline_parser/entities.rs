//! Entity and numeric character references: `&amp;`, `&#35;`, `&#x22;`.

use crate::parser::scanner::Token;
use crate::syntax::NodeValue;
use crate::utils::decode_entity;

use super::{InlineParser, InlineSyntax};

pub(crate) struct Entities;

impl InlineSyntax for Entities {
    fn name(&self) -> &'static str {
        "entities"
    }

    fn triggers(&self) -> &'static [Token] {
        &[Token::Ampersand]
    }

    fn try_parse_inline(&self, parser: &mut InlineParser<'_>) -> bool {
        let start = parser.scanner.token_start();
        let Some((decoded, len)) = decode_entity(&parser.text()[start..]) else {
            return false;
        };
        parser
            .scanner
            .rescan(|_| Some((Token::CharacterEntity, len)));
        parser.add_node(NodeValue::Text(decoded), start, start + len);
        true
    }
}
