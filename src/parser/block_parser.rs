//! Line-oriented block pass.
//!
//! Each line first walks the stack of open blocks, asking every block whether
//! the line continues it. Whatever is left of the line is then offered to the
//! block-start recognizers in precedence order; finally the remaining text is
//! appended to the innermost block that takes lines, or opens a paragraph.
//! Blocks are finished (tip first) when a line fails to continue them, when a
//! new block cannot live inside them, or at the end of the input.

use indextree::NodeId;

use crate::config::Config;
use crate::diagnostics::Diagnostic;
use crate::syntax::{Document, NodeValue, Span, SyntaxKind};

use super::content::ContentWriter;
use super::scanner::Scanner;
use super::side_table::SideTable;

mod block_tags;
mod blockquotes;
mod code_blocks;
mod container_stack;
mod headings;
mod html_blocks;
mod lists;
mod paragraphs;
pub(crate) mod reference_definitions;
mod tables;
mod thematic_breaks;
mod utils;

use block_tags::BlockTags;
use blockquotes::BlockQuotes;
use code_blocks::{FencedCode, IndentedCode};
use container_stack::{ContainerStack, OpenBlock};
use headings::{AtxHeadings, SetextHeadings};
use html_blocks::HtmlBlocks;
use lists::Lists;
use paragraphs::Paragraphs;
use tables::Tables;
use thematic_breaks::ThematicBreaks;

pub(crate) use utils::LineRange;

/// What a successful block start left on the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockStart {
    /// A container was opened; keep looking for starts inside it.
    Container,
    /// A leaf was opened; the rest of the line is its content.
    Leaf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockContinue {
    Matched,
    NotMatched,
    /// The block used up the whole line (a closing code fence).
    LineConsumed,
}

/// A block-level construct: how it starts, continues and finishes.
pub(crate) trait BlockSyntax {
    fn name(&self) -> &'static str;

    fn try_start_block(&self, _parser: &mut BlockParser<'_>, _container: NodeId) -> Option<BlockStart> {
        None
    }

    fn try_continue_block(&self, parser: &mut BlockParser<'_>, node: NodeId) -> BlockContinue;

    fn finish_block(&self, _parser: &mut BlockParser<'_>, _node: NodeId) {}

    /// Whether the block buffers the text left on its lines.
    fn accepts_lines(&self) -> bool {
        false
    }

    fn can_contain(&self, parser: &BlockParser<'_>, node: NodeId, child: SyntaxKind) -> bool {
        parser.doc.kind(node).admits(child)
    }

    fn add_line(&self, parser: &mut BlockParser<'_>, node: NodeId) {
        parser.append_line(node);
    }

    /// Whether other blocks may start on a line that would continue this one.
    fn interruptible(&self) -> bool {
        false
    }
}

struct DocumentSyntax;

impl BlockSyntax for DocumentSyntax {
    fn name(&self) -> &'static str {
        "document"
    }

    fn try_continue_block(&self, _parser: &mut BlockParser<'_>, _node: NodeId) -> BlockContinue {
        BlockContinue::Matched
    }
}

const DOCUMENT: usize = 0;
const PARAGRAPH: usize = 1;

/// Block syntaxes in start precedence order, built once per configuration.
pub struct BlockRegistry {
    syntaxes: Vec<Box<dyn BlockSyntax>>,
}

impl BlockRegistry {
    pub fn new(config: &Config) -> Self {
        let extensions = &config.extensions;
        let mut syntaxes: Vec<Box<dyn BlockSyntax>> =
            vec![Box::new(DocumentSyntax), Box::new(Paragraphs)];

        if extensions.doc_tags {
            syntaxes.push(Box::new(BlockTags));
        }
        syntaxes.push(Box::new(BlockQuotes));
        syntaxes.push(Box::new(AtxHeadings));
        syntaxes.push(Box::new(FencedCode));
        if extensions.raw_html {
            syntaxes.push(Box::new(HtmlBlocks));
        }
        syntaxes.push(Box::new(SetextHeadings));
        if extensions.tables {
            syntaxes.push(Box::new(Tables));
        }
        syntaxes.push(Box::new(ThematicBreaks));
        syntaxes.push(Box::new(Lists));
        syntaxes.push(Box::new(IndentedCode));

        log::debug!(
            "block syntaxes: {:?}",
            syntaxes.iter().map(|s| s.name()).collect::<Vec<_>>()
        );
        Self { syntaxes }
    }

    fn get(&self, index: usize) -> &dyn BlockSyntax {
        self.syntaxes[index].as_ref()
    }

    /// Recognizers that can open blocks, with their registry index.
    fn starts(&self) -> impl Iterator<Item = (usize, &dyn BlockSyntax)> {
        self.syntaxes
            .iter()
            .enumerate()
            .skip(PARAGRAPH + 1)
            .map(|(index, syntax)| (index, syntax.as_ref()))
    }
}

pub struct BlockParser<'a> {
    registry: &'a BlockRegistry,
    pub(crate) config: &'a Config,
    pub(crate) scanner: Scanner<'a>,
    pub(crate) doc: Document,
    pub(crate) side_table: SideTable,
    stack: ContainerStack,
    /// Stack index of the deepest block the current line continued.
    last_matched: usize,
    all_closed: bool,
    current_syntax: usize,
    /// Source offset where each line's text ends, by line number - 1.
    line_ends: Vec<usize>,
    inline_queue: Vec<(NodeId, ContentWriter)>,
}

impl<'a> BlockParser<'a> {
    pub fn new(input: &'a str, config: &'a Config, registry: &'a BlockRegistry) -> Self {
        let doc = Document::with_source(input.to_string());
        let mut stack = ContainerStack::new();
        stack.push(OpenBlock {
            node: doc.root(),
            syntax: DOCUMENT,
        });
        Self {
            registry,
            config,
            scanner: Scanner::new(input),
            doc,
            side_table: SideTable::default(),
            stack,
            last_matched: 0,
            all_closed: true,
            current_syntax: DOCUMENT,
            line_ends: Vec::new(),
            inline_queue: Vec::new(),
        }
    }

    /// Run the block pass. Returns the block tree and, in finish order, the
    /// leaf blocks whose buffered text still needs the inline pass.
    pub fn parse(mut self) -> (Document, Vec<(NodeId, ContentWriter)>) {
        let root = self.doc.root();
        self.side_table.insert(root, LineRange { start: 1, end: 1 });

        if self.scanner.has_lines() {
            loop {
                self.incorporate_line();
                if !self.scanner.next_line() {
                    break;
                }
            }
        }

        let last_line = self.line_ends.len();
        while !self.stack.is_empty() {
            self.finish(last_line);
        }
        log::debug!(
            "block pass done: {} lines, {} blocks queued for inlines",
            last_line,
            self.inline_queue.len()
        );
        (self.doc, self.inline_queue)
    }

    fn incorporate_line(&mut self) {
        let registry = self.registry;
        self.line_ends.push(self.scanner.line_end());
        log::trace!(
            "line {}: {:?}",
            self.scanner.line_number(),
            self.scanner.current_line()
        );

        // Which open blocks does this line continue?
        let mut last_matched = 0;
        let mut index = 1;
        while let Some(&open) = self.stack.get(index) {
            self.scanner.find_next_nonspace();
            match registry
                .get(open.syntax)
                .try_continue_block(self, open.node)
            {
                BlockContinue::Matched => {
                    last_matched = index;
                    index += 1;
                }
                BlockContinue::NotMatched => break,
                BlockContinue::LineConsumed => return,
            }
        }
        self.last_matched = last_matched;
        self.all_closed = last_matched + 1 == self.stack.depth();

        // Look for new block starts, unless the line belongs to a leaf that
        // nothing can interrupt.
        let mut container = self.stack.get(last_matched).copied().unwrap_or(OpenBlock {
            node: self.doc.root(),
            syntax: DOCUMENT,
        });
        let mut matched_leaf = {
            let syntax = registry.get(container.syntax);
            syntax.accepts_lines() && !syntax.interruptible()
        };
        while !matched_leaf {
            self.scanner.find_next_nonspace();
            let mut started = None;
            for (index, syntax) in registry.starts() {
                self.current_syntax = index;
                if let Some(start) = syntax.try_start_block(self, container.node) {
                    log::trace!("{} started at line {}", syntax.name(), self.line_number());
                    started = Some(start);
                    break;
                }
            }
            match started {
                Some(BlockStart::Container) => container = self.tip_block(),
                Some(BlockStart::Leaf) => {
                    container = self.tip_block();
                    matched_leaf = true;
                }
                None => {
                    self.scanner.advance_next_nonspace();
                    break;
                }
            }
        }
        // A leaf start may have consumed the rest of the line.
        self.scanner.find_next_nonspace();
        log::trace!("container for the rest of the line: {}", self.doc.kind(container.node));

        // What remains is text for the innermost block that takes lines.
        let tip = self.tip_block();
        if !self.all_closed && !self.scanner.is_blank() && self.doc.kind(tip.node) == SyntaxKind::Paragraph
        {
            // Lazy paragraph continuation.
            registry.get(tip.syntax).add_line(self, tip.node);
            return;
        }

        self.close_unmatched_blocks();
        let tip = self.tip_block();
        let syntax = registry.get(tip.syntax);
        if syntax.accepts_lines() {
            syntax.add_line(self, tip.node);
        } else if !self.scanner.is_blank() {
            let start = self.scanner.next_nonspace();
            let paragraph = self.add_paragraph(start);
            self.scanner.advance_next_nonspace();
            self.append_line(paragraph);
        }
    }

    // ---- API for block syntaxes ----

    pub(crate) fn line_number(&self) -> usize {
        self.scanner.line_number()
    }

    pub(crate) fn tip(&self) -> NodeId {
        self.tip_block().node
    }

    fn tip_block(&self) -> OpenBlock {
        match self.stack.last() {
            Some(open) => *open,
            None => OpenBlock {
                node: self.doc.root(),
                syntax: DOCUMENT,
            },
        }
    }

    pub(crate) fn tip_kind(&self) -> SyntaxKind {
        self.doc.kind(self.tip())
    }

    /// Whether every block open before this line was continued by it.
    pub(crate) fn all_closed(&self) -> bool {
        self.all_closed
    }

    pub(crate) fn report(&mut self, diagnostic: Diagnostic) {
        self.doc.report(diagnostic);
    }

    /// Finish the blocks the current line did not continue.
    pub(crate) fn close_unmatched_blocks(&mut self) {
        if self.all_closed {
            return;
        }
        let line = self.line_number() - 1;
        while self.stack.depth() > self.last_matched + 1 {
            self.finish(line);
        }
        self.all_closed = true;
    }

    /// Open a block of `value`'s kind as a child of the innermost block that
    /// can hold it, finishing the blocks that cannot. `start` is the source
    /// offset where the block begins.
    pub(crate) fn add_child(&mut self, value: NodeValue, start: usize) -> NodeId {
        let registry = self.registry;
        let kind = value.kind();
        let line = self.line_number();
        while self.stack.depth() > 1 {
            let tip = self.tip_block();
            if registry.get(tip.syntax).can_contain(self, tip.node, kind) {
                break;
            }
            self.finish(line - 1);
        }

        let node = self
            .doc
            .create_with_span(value, Some(Span::new(start, start)));
        let parent = self.tip();
        if !self.doc.append_child(parent, node) {
            log::debug!("{} rejected a {} child", self.doc.kind(parent), kind);
        }
        self.side_table.insert(node, LineRange { start: line, end: line });
        self.stack.push(OpenBlock {
            node,
            syntax: self.current_syntax,
        });
        log::debug!("opened {} at line {}", kind, line);
        node
    }

    /// Open a paragraph as if no recognizer had claimed the line.
    pub(crate) fn add_paragraph(&mut self, start: usize) -> NodeId {
        let current = std::mem::replace(&mut self.current_syntax, PARAGRAPH);
        let paragraph = self.add_child(NodeValue::Paragraph, start);
        self.current_syntax = current;
        paragraph
    }

    /// Swap the tip block for a new node of `value`'s kind, keeping its span,
    /// line range and buffered content.
    pub(crate) fn replace_tip(&mut self, value: NodeValue) -> NodeId {
        let Some(old) = self.stack.pop() else {
            return self.add_child(value, 0);
        };
        let span = self.doc.span(old.node);
        let node = self.doc.create_with_span(value, span);
        self.doc.replace_node(old.node, node);
        if let Some(content) = self.side_table.remove::<ContentWriter>(old.node) {
            self.side_table.insert(node, content);
        }
        if let Some(range) = self.side_table.remove::<LineRange>(old.node) {
            self.side_table.insert(node, range);
        }
        self.stack.push(OpenBlock {
            node,
            syntax: self.current_syntax,
        });
        node
    }

    /// Drop the tip block without finishing it.
    pub(crate) fn discard_tip(&mut self) {
        if self.stack.depth() <= 1 {
            return;
        }
        if let Some(open) = self.stack.pop() {
            self.doc.remove_node(open.node);
            self.side_table.remove::<ContentWriter>(open.node);
            self.side_table.remove::<LineRange>(open.node);
        }
    }

    /// Finish the tip block as ending on `line`.
    pub(crate) fn finish(&mut self, line: usize) {
        let registry = self.registry;
        let Some(open) = self.stack.pop() else {
            return;
        };
        if let Some(range) = self.side_table.get_mut::<LineRange>(open.node) {
            range.end = line.max(range.start);
        }
        if open.node != self.doc.root()
            && let Some(end) = self.line_end(line)
        {
            self.set_span_end(open.node, end);
        }
        log::debug!("closing {} at line {}", self.doc.kind(open.node), line);
        registry.get(open.syntax).finish_block(self, open.node);
    }

    pub(crate) fn line_range(&self, node: NodeId) -> Option<LineRange> {
        self.side_table.get::<LineRange>(node).copied()
    }

    /// Source offset where line `line` (1-based) ends, before its line ending.
    pub(crate) fn line_end(&self, line: usize) -> Option<usize> {
        line.checked_sub(1)
            .and_then(|index| self.line_ends.get(index))
            .copied()
    }

    pub(crate) fn set_span_end(&mut self, node: NodeId, end: usize) {
        let start = self.doc.span(node).map_or(end, |span| span.start);
        self.doc.set_span(node, Some(Span::new(start, end.max(start))));
    }

    /// Append the rest of the current line to `node`'s buffered content.
    pub(crate) fn append_line(&mut self, node: NodeId) {
        let mut padding = None;
        if self.scanner.partially_consumed_tab() {
            let tab = self.scanner.pos();
            let columns = 4 - self.scanner.column() % 4;
            self.scanner.advance_offset(1, false);
            padding = Some((columns, tab));
        }
        let rest = self.scanner.rest_of_line();
        let pos = self.scanner.pos();
        let line_end = self.scanner.line_end();
        let ending = self.scanner.line_ending_len();

        let content = self.side_table.get_or_default::<ContentWriter>(node);
        if let Some((columns, tab)) = padding {
            content.pad(columns, tab);
        }
        content.append(rest, pos);
        content.newline(line_end, ending);
    }

    /// Hand a finished leaf block's text to the inline pass.
    pub(crate) fn queue_inlines(&mut self, node: NodeId, content: ContentWriter) {
        self.inline_queue.push((node, content));
    }
}
