//! GFM strikethrough: `~~text~~`. Only runs of exactly two tildes take part;
//! any other run stays literal.

use crate::parser::scanner::Token;
use crate::syntax::NodeValue;

use super::emphasis::scan_run;
use super::{DelimiterOutcome, InlineParser, InlineSyntax};

const RUN_LENGTH: usize = 2;

pub(crate) struct Strikethrough;

impl InlineSyntax for Strikethrough {
    fn name(&self) -> &'static str {
        "strikethrough"
    }

    fn triggers(&self) -> &'static [Token] {
        &[Token::Tilde]
    }

    fn try_parse_inline(&self, parser: &mut InlineParser<'_>) -> bool {
        let (start, end, can_open, can_close) = scan_run(parser, '~');
        if end - start != RUN_LENGTH {
            return false;
        }
        let node = parser.add_text(start, end);
        if can_open || can_close {
            parser.push_delimiter('~', RUN_LENGTH, can_open, can_close, node);
        }
        true
    }

    fn process_delimiter(
        &self,
        parser: &mut InlineParser<'_>,
        opener: usize,
        closer: usize,
    ) -> DelimiterOutcome {
        if parser.delimiters[opener].count != RUN_LENGTH
            || parser.delimiters[closer].count != RUN_LENGTH
        {
            return DelimiterOutcome::NotProcessed;
        }
        parser.wrap_delimiters(opener, closer, RUN_LENGTH, NodeValue::Strikethrough);
        DelimiterOutcome::Processed(closer + 1)
    }
}
