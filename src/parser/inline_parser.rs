//! Inline pass over the text of one finished leaf block.
//!
//! The block's buffered text is scanned token by token. Each token is offered
//! to the inline syntaxes registered for it, in order; whatever no syntax
//! claims becomes text. Inline nodes are first appended flat to the block.
//! Emphasis-like runs are pushed on the delimiter stack, `[`, `![` and
//! `{@tag ... |` on the bracket stack, and closing them re-parents the nodes
//! between opener and closer.

use std::collections::HashMap;

use indextree::NodeId;

use crate::config::Config;
use crate::diagnostics::{Diagnostic, MessageId};
use crate::syntax::{Document, NodeValue, Span, SyntaxElement, SyntaxKind};

use super::content::ContentWriter;
use super::scanner::{Scanner, Token};

mod autolinks;
mod code_spans;
mod emphasis;
mod entities;
mod escapes;
mod inline_tags;
mod line_breaks;
pub(crate) mod links;
mod raw_html;
mod strikethrough;

use autolinks::Autolinks;
use code_spans::CodeSpans;
use emphasis::Emphasis;
use entities::Entities;
use escapes::Escapes;
use inline_tags::InlineTags;
use line_breaks::LineBreaks;
use links::Links;
use raw_html::RawHtml;
use strikethrough::Strikethrough;

/// Result of asking a syntax to resolve an opener/closer pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DelimiterOutcome {
    /// The pair was used; continue with the closer at this index.
    Processed(usize),
    NotProcessed,
}

/// An inline construct.
pub(crate) trait InlineSyntax {
    fn name(&self) -> &'static str;

    /// Tokens this syntax may start at.
    fn triggers(&self) -> &'static [Token];

    /// Try to parse at the current token. On `false` the scanner must be
    /// where it was, and the token becomes text.
    fn try_parse_inline(&self, parser: &mut InlineParser<'_>) -> bool;

    /// Resolve a matched opener/closer pair from the delimiter stack.
    fn process_delimiter(
        &self,
        _parser: &mut InlineParser<'_>,
        _opener: usize,
        _closer: usize,
    ) -> DelimiterOutcome {
        DelimiterOutcome::NotProcessed
    }
}

/// A run of delimiter characters waiting for a partner.
#[derive(Debug, Clone)]
pub(crate) struct Delimiter {
    /// Registry index of the syntax that pushed the run.
    pub(crate) syntax: usize,
    pub(crate) ch: char,
    /// Characters not yet used by a match.
    pub(crate) count: usize,
    pub(crate) original: usize,
    pub(crate) can_open: bool,
    pub(crate) can_close: bool,
    /// The text node holding the run.
    pub(crate) node: NodeId,
    active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BracketKind {
    Link,
    Image,
    InlineTag {
        tag_name: String,
        destination: String,
        /// Tag name and destination, attached once the tag closes.
        elements: Vec<SyntaxElement>,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct Bracket {
    pub(crate) kind: BracketKind,
    /// The text node holding the opener.
    pub(crate) node: NodeId,
    /// Cleared when a link closes around this opener's position.
    pub(crate) active: bool,
    /// Delimiter stack height when the bracket was pushed.
    pub(crate) delimiter_bottom: usize,
    /// Buffer offset just past the opener.
    pub(crate) text_start: usize,
    /// Another bracket was opened after this one.
    pub(crate) bracket_after: bool,
}

/// Inline syntaxes in the order they are tried, built once per configuration.
pub struct InlineRegistry {
    syntaxes: Vec<Box<dyn InlineSyntax>>,
}

impl InlineRegistry {
    pub fn new(config: &Config) -> Self {
        let extensions = &config.extensions;
        let mut syntaxes: Vec<Box<dyn InlineSyntax>> = vec![
            Box::new(LineBreaks),
            Box::new(Escapes),
            Box::new(CodeSpans),
            Box::new(Emphasis),
        ];
        if extensions.strikethrough {
            syntaxes.push(Box::new(Strikethrough));
        }
        syntaxes.push(Box::new(Links));
        if extensions.doc_tags {
            syntaxes.push(Box::new(InlineTags));
        }
        if extensions.autolinks {
            syntaxes.push(Box::new(Autolinks));
        }
        if extensions.raw_html {
            syntaxes.push(Box::new(RawHtml));
        }
        syntaxes.push(Box::new(Entities));

        log::debug!(
            "inline syntaxes: {:?}",
            syntaxes.iter().map(|s| s.name()).collect::<Vec<_>>()
        );
        Self { syntaxes }
    }

    fn get(&self, index: usize) -> &dyn InlineSyntax {
        self.syntaxes[index].as_ref()
    }

    fn for_token(&self, token: Token) -> impl Iterator<Item = (usize, &dyn InlineSyntax)> {
        self.syntaxes
            .iter()
            .enumerate()
            .filter(move |(_, syntax)| syntax.triggers().contains(&token))
            .map(|(index, syntax)| (index, syntax.as_ref()))
    }
}

/// Parse the inlines of one block. Leading and trailing whitespace of the
/// block's text is not part of any inline.
pub(crate) fn parse_block(
    registry: &InlineRegistry,
    config: &Config,
    doc: &mut Document,
    block: NodeId,
    content: &ContentWriter,
) {
    let text = content.text();
    let start = text.len() - text.trim_start().len();
    let end = text.trim_end().len();
    if start >= end {
        return;
    }
    let content = content.slice(start, end);
    InlineParser::new(registry, config, doc, block, &content).parse();
}

pub struct InlineParser<'a> {
    registry: &'a InlineRegistry,
    pub(crate) config: &'a Config,
    pub(crate) doc: &'a mut Document,
    pub(crate) scanner: Scanner<'a>,
    content: &'a ContentWriter,
    block: NodeId,
    pub(crate) delimiters: Vec<Delimiter>,
    pub(crate) brackets: Vec<Bracket>,
    current_syntax: usize,
}

impl<'a> InlineParser<'a> {
    pub fn new(
        registry: &'a InlineRegistry,
        config: &'a Config,
        doc: &'a mut Document,
        block: NodeId,
        content: &'a ContentWriter,
    ) -> Self {
        Self {
            registry,
            config,
            doc,
            scanner: Scanner::new(content.text()),
            content,
            block,
            delimiters: Vec::new(),
            brackets: Vec::new(),
            current_syntax: 0,
        }
    }

    pub fn parse(mut self) {
        let registry = self.registry;
        log::debug!(
            "inlines for {} ({} bytes)",
            self.doc.kind(self.block),
            self.content.len()
        );

        loop {
            let token = self.scanner.scan();
            if token == Token::EndOfFile {
                break;
            }
            let mut handled = false;
            for (index, syntax) in registry.for_token(token) {
                self.current_syntax = index;
                if syntax.try_parse_inline(&mut self) {
                    handled = true;
                    break;
                }
            }
            if !handled {
                self.add_text(self.scanner.token_start(), self.scanner.token_end());
            }
        }

        self.process_emphasis(0);
        for bracket in std::mem::take(&mut self.brackets) {
            if let BracketKind::InlineTag { tag_name, .. } = &bracket.kind {
                let span = self.doc.span(bracket.node).unwrap_or(Span::new(0, 0));
                self.doc.report(Diagnostic::error(
                    MessageId::InlineTagUnclosed,
                    span,
                    format!("The inline tag {tag_name:?} is missing its closing \"}}\""),
                ));
            }
        }
        merge_text(self.doc, self.block);
    }

    // ---- API for inline syntaxes ----

    pub(crate) fn text(&self) -> &'a str {
        self.content.text()
    }

    pub(crate) fn report(&mut self, message_id: MessageId, start: usize, end: usize, message: String) {
        let span = self.span(start, end);
        self.doc.report(Diagnostic::error(message_id, span, message));
    }

    pub(crate) fn warn(&mut self, message_id: MessageId, start: usize, end: usize, message: String) {
        let span = self.span(start, end);
        self.doc.report(Diagnostic::warning(message_id, span, message));
    }

    /// Source span of the buffer range `start..end`.
    pub(crate) fn span(&self, start: usize, end: usize) -> Span {
        self.content.span(start, end)
    }

    /// Source span from the start of `node` to buffer offset `end`.
    pub(crate) fn span_from(&self, node: NodeId, end: usize) -> Span {
        let end = self.content.to_source_end(end);
        let start = self.doc.span(node).map_or(end, |span| span.start);
        Span::new(start.min(end), end)
    }

    /// Append a node covering the buffer range `start..end` to the block.
    pub(crate) fn add_node(&mut self, value: NodeValue, start: usize, end: usize) -> NodeId {
        let span = self.span(start, end);
        let node = self.doc.create_with_span(value, Some(span));
        if !self.doc.append_child(self.block, node) {
            log::debug!("{} rejected an inline child", self.doc.kind(self.block));
        }
        node
    }

    pub(crate) fn add_text(&mut self, start: usize, end: usize) -> NodeId {
        let text = &self.content.text()[start..end];
        self.add_node(NodeValue::text(text), start, end)
    }

    /// Skip spaces and tabs at the start of the next line.
    pub(crate) fn skip_line_indent(&mut self) {
        let spaces = self
            .scanner
            .remaining()
            .bytes()
            .take_while(|&b| b == b' ' || b == b'\t')
            .count();
        self.scanner.bump(spaces);
    }

    pub(crate) fn push_delimiter(
        &mut self,
        ch: char,
        count: usize,
        can_open: bool,
        can_close: bool,
        node: NodeId,
    ) {
        log::trace!(
            "delimiter {:?}x{} open={} close={}",
            ch,
            count,
            can_open,
            can_close
        );
        self.delimiters.push(Delimiter {
            syntax: self.current_syntax,
            ch,
            count,
            original: count,
            can_open,
            can_close,
            node,
            active: true,
        });
    }

    pub(crate) fn push_bracket(&mut self, kind: BracketKind, node: NodeId) {
        if let Some(previous) = self.brackets.last_mut() {
            previous.bracket_after = true;
        }
        log::trace!("bracket {:?} at {}", kind, self.scanner.token_start());
        self.brackets.push(Bracket {
            kind,
            node,
            active: true,
            delimiter_bottom: self.delimiters.len(),
            text_start: self.scanner.pos(),
            bracket_after: false,
        });
    }

    /// Create a node and move every sibling after `from` (up to `to`, or to
    /// the end) into it. The new node takes the place right after `from`.
    pub(crate) fn wrap_between(
        &mut self,
        value: NodeValue,
        from: NodeId,
        to: Option<NodeId>,
        span: Span,
    ) -> NodeId {
        let mut children = Vec::new();
        let mut next = self.doc.next_sibling(from);
        while let Some(child) = next {
            if Some(child) == to {
                break;
            }
            children.push(child);
            next = self.doc.next_sibling(child);
        }

        let node = self.doc.create_with_span(value, Some(span));
        self.doc.insert_sibling_after(from, node);
        for child in children {
            if !self.doc.append_child(node, child) {
                log::debug!(
                    "{} rejected a {} child",
                    self.doc.kind(node),
                    self.doc.kind(child)
                );
            }
        }
        node
    }

    /// Use `used` characters from both runs and wrap the nodes between them
    /// in a node of `value`'s kind. Exhausted runs lose their text node.
    pub(crate) fn wrap_delimiters(
        &mut self,
        opener: usize,
        closer: usize,
        used: usize,
        value: NodeValue,
    ) -> NodeId {
        let opener_node = self.delimiters[opener].node;
        let closer_node = self.delimiters[closer].node;
        self.delimiters[opener].count -= used;
        self.delimiters[closer].count -= used;
        let opener_left = self.delimiters[opener].count;
        let closer_left = self.delimiters[closer].count;
        let ch = self.delimiters[opener].ch;

        let opener_span = self.doc.span(opener_node).unwrap_or(Span::new(0, 0));
        let closer_span = self.doc.span(closer_node).unwrap_or(Span::new(0, 0));
        let start = opener_span.start + opener_left;
        let end = closer_span.start + used;

        // The opener gives up its last characters, the closer its first.
        self.set_run(opener_node, ch, opener_left, Span::new(opener_span.start, start));
        self.set_run(closer_node, ch, closer_left, Span::new(end, closer_span.end));

        let node = self.wrap_between(value, opener_node, Some(closer_node), Span::new(start, end));
        for delimiter in &mut self.delimiters[opener + 1..closer] {
            delimiter.active = false;
        }
        if opener_left == 0 {
            self.doc.remove_node(opener_node);
            self.delimiters[opener].active = false;
        }
        if closer_left == 0 {
            self.doc.remove_node(closer_node);
            self.delimiters[closer].active = false;
        }
        node
    }

    fn set_run(&mut self, node: NodeId, ch: char, count: usize, span: Span) {
        let run = ch.to_string().repeat(count);
        self.doc.update(node, |value| *value = NodeValue::Text(run));
        self.doc.set_span(node, Some(span));
    }

    /// Match closers against openers above `bottom`, then drop every
    /// delimiter above `bottom`.
    pub(crate) fn process_emphasis(&mut self, bottom: usize) {
        let registry = self.registry;
        // Search floor per (char, closer can open, closer length mod 3).
        let mut openers_bottom: HashMap<(char, bool, usize), usize> = HashMap::new();
        let mut closer = bottom;

        while closer < self.delimiters.len() {
            let current = self.delimiters[closer].clone();
            if !current.active || !current.can_close {
                closer += 1;
                continue;
            }
            let key = (current.ch, current.can_open, current.original % 3);
            let floor = openers_bottom.get(&key).copied().unwrap_or(bottom).max(bottom);
            let opener = (floor..closer).rev().find(|&index| {
                let candidate = &self.delimiters[index];
                candidate.active
                    && candidate.can_open
                    && candidate.ch == current.ch
                    && candidate.syntax == current.syntax
                    && !odd_match(candidate, &current)
            });

            let outcome = match opener {
                Some(opener) => {
                    log::trace!("matching delimiters {} and {}", opener, closer);
                    registry
                        .get(current.syntax)
                        .process_delimiter(self, opener, closer)
                }
                None => DelimiterOutcome::NotProcessed,
            };
            match outcome {
                DelimiterOutcome::Processed(next) => closer = next,
                DelimiterOutcome::NotProcessed => {
                    openers_bottom.insert(key, closer);
                    if !current.can_open {
                        self.delimiters[closer].active = false;
                    }
                    closer += 1;
                }
            }
        }
        self.delimiters.truncate(bottom);
    }
}

/// Rule of three: a run that can both open and close only pairs with another
/// run when their combined length is not a multiple of three, unless both are.
fn odd_match(opener: &Delimiter, closer: &Delimiter) -> bool {
    (opener.can_close || closer.can_open)
        && (opener.original + closer.original) % 3 == 0
        && !(opener.original % 3 == 0 && closer.original % 3 == 0)
}

/// Merge adjacent text runs below `node` and drop empty ones.
fn merge_text(doc: &mut Document, node: NodeId) {
    let parents: Vec<NodeId> = doc
        .descendants(node)
        .filter(|&id| doc.first_child(id).is_some())
        .collect();
    for parent in parents {
        let mut child = doc.first_child(parent);
        while let Some(current) = child {
            child = doc.next_sibling(current);
            if doc.kind(current) != SyntaxKind::Text {
                continue;
            }
            while let Some(next) = child.filter(|&next| doc.kind(next) == SyntaxKind::Text) {
                child = doc.next_sibling(next);
                let tail = match doc.value(next) {
                    NodeValue::Text(text) => text.clone(),
                    _ => String::new(),
                };
                let span = match (doc.span(current), doc.span(next)) {
                    (Some(a), Some(b)) => Some(a.cover(b)),
                    _ => None,
                };
                doc.update(current, |value| {
                    if let NodeValue::Text(text) = value {
                        text.push_str(&tail);
                    }
                });
                doc.set_span(current, span);
                doc.remove_node(next);
            }
            if matches!(doc.value(current), NodeValue::Text(text) if text.is_empty()) {
                doc.remove_node(current);
            }
        }
    }
}
