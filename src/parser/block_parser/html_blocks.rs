//! HTML blocks: the seven CommonMark start/end condition pairs.

use std::sync::LazyLock;

use indextree::NodeId;
use regex::Regex;

use crate::parser::content::ContentWriter;
use crate::syntax::{NodeValue, SyntaxKind};
use crate::utils::{CLOSE_TAG, OPEN_TAG};

use super::utils::strip_trailing_blank_lines;
use super::{BlockContinue, BlockParser, BlockStart, BlockSyntax};

const BLOCK_TAGS: &str = "address|article|aside|base|basefont|blockquote|body|caption|center|col|colgroup|dd|details|dialog|dir|div|dl|dt|fieldset|figcaption|figure|footer|form|frame|frameset|h[123456]|head|header|hr|html|iframe|legend|li|link|main|menu|menuitem|nav|noframes|ol|optgroup|option|p|param|search|section|summary|table|tbody|td|tfoot|th|thead|title|tr|track|ul";

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("invalid html block regex")
}

/// Start conditions, indexed by block kind - 1.
static OPEN: LazyLock<[Regex; 7]> = LazyLock::new(|| {
    [
        regex(r"(?i)^<(?:script|pre|textarea|style)(?:\s|>|$)"),
        regex(r"^<!--"),
        regex(r"^<\?"),
        regex(r"^<![A-Za-z]"),
        regex(r"^<!\[CDATA\["),
        regex(&format!(r"(?i)^</?(?:{BLOCK_TAGS})(?:\s|/?>|$)")),
        regex(&format!(r"(?i)^(?:{}|{})\s*$", *OPEN_TAG, *CLOSE_TAG)),
    ]
});

/// End conditions for kinds 1 to 5; kinds 6 and 7 end at a blank line.
static CLOSE: LazyLock<[Regex; 5]> = LazyLock::new(|| {
    [
        regex(r"(?i)</(?:script|pre|textarea|style)>"),
        regex(r"-->"),
        regex(r"\?>"),
        regex(r">"),
        regex(r"\]\]>"),
    ]
});

/// Which of the seven kinds an open HTML block is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HtmlBlockKind(usize);

impl HtmlBlockKind {
    fn ends_at_blank_line(self) -> bool {
        self.0 >= 6
    }

    fn end_condition(self) -> Option<&'static Regex> {
        CLOSE.get(self.0.checked_sub(1)?)
    }
}

/// Kind of HTML block `rest` would open. Kind 7 cannot interrupt a paragraph.
fn start_kind(rest: &str, in_paragraph: bool) -> Option<HtmlBlockKind> {
    OPEN.iter()
        .enumerate()
        .find(|(index, open)| open.is_match(rest) && (*index < 6 || !in_paragraph))
        .map(|(index, _)| HtmlBlockKind(index + 1))
}

pub(crate) struct HtmlBlocks;

impl BlockSyntax for HtmlBlocks {
    fn name(&self) -> &'static str {
        "html-block"
    }

    fn try_start_block(&self, parser: &mut BlockParser<'_>, container: NodeId) -> Option<BlockStart> {
        if parser.scanner.is_indented() || parser.scanner.peek_nonspace() != Some('<') {
            return None;
        }
        let lazy_paragraph = !parser.all_closed()
            && !parser.scanner.is_blank()
            && parser.tip_kind() == SyntaxKind::Paragraph;
        let in_paragraph = parser.doc.kind(container) == SyntaxKind::Paragraph || lazy_paragraph;
        let kind = start_kind(parser.scanner.rest_from_nonspace(), in_paragraph)?;

        parser.close_unmatched_blocks();
        let start = parser.scanner.pos();
        let node = parser.add_child(
            NodeValue::HtmlBlock {
                literal: String::new(),
            },
            start,
        );
        parser.side_table.insert(node, kind);
        log::trace!("html block of kind {}", kind.0);
        Some(BlockStart::Leaf)
    }

    fn try_continue_block(&self, parser: &mut BlockParser<'_>, node: NodeId) -> BlockContinue {
        let ends_at_blank = parser
            .side_table
            .get::<HtmlBlockKind>(node)
            .is_some_and(|kind| kind.ends_at_blank_line());
        if parser.scanner.is_blank() && ends_at_blank {
            BlockContinue::NotMatched
        } else {
            BlockContinue::Matched
        }
    }

    fn add_line(&self, parser: &mut BlockParser<'_>, node: NodeId) {
        let rest = parser.scanner.rest_of_line();
        parser.append_line(node);
        let closes = parser
            .side_table
            .get::<HtmlBlockKind>(node)
            .and_then(|kind| kind.end_condition())
            .is_some_and(|close| close.is_match(rest));
        if closes {
            parser.finish(parser.line_number());
        }
    }

    fn finish_block(&self, parser: &mut BlockParser<'_>, node: NodeId) {
        parser.side_table.remove::<HtmlBlockKind>(node);
        let content = parser
            .side_table
            .remove::<ContentWriter>(node)
            .unwrap_or_default();
        let literal = strip_trailing_blank_lines(content.text()).to_string();
        parser.doc.update(node, |value| {
            if let NodeValue::HtmlBlock { literal: slot } = value {
                *slot = literal;
            }
        });
    }

    fn accepts_lines(&self) -> bool {
        true
    }
}
