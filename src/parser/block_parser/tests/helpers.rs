use indextree::NodeId;

use crate::config::Config;
use crate::parser::block_parser::{BlockParser, BlockRegistry};
use crate::syntax::{Document, SyntaxKind};

/// Run the block pass only; leaf blocks keep no inline children.
pub fn parse_blocks(input: &str) -> Document {
    parse_blocks_with(input, &Config::default())
}

pub fn parse_blocks_with(input: &str, config: &Config) -> Document {
    let registry = BlockRegistry::new(config);
    let (doc, _queue) = BlockParser::new(input, config, &registry).parse();
    doc
}

/// Run both passes.
pub fn parse_full(input: &str) -> Document {
    crate::parser::parse(input, &Config::default())
}

pub fn find_first(doc: &Document, kind: SyntaxKind) -> Option<NodeId> {
    doc.descendants(doc.root()).find(|&n| doc.kind(n) == kind)
}

pub fn find_all(doc: &Document, kind: SyntaxKind) -> Vec<NodeId> {
    doc.descendants(doc.root())
        .filter(|&n| doc.kind(n) == kind)
        .collect()
}

pub fn get_blocks(doc: &Document) -> Vec<NodeId> {
    doc.children(doc.root()).collect()
}

pub fn assert_block_kinds(input: &str, expected: &[SyntaxKind]) {
    let doc = parse_blocks(input);
    let actual: Vec<_> = get_blocks(&doc).iter().map(|&n| doc.kind(n)).collect();
    assert_eq!(
        actual, expected,
        "Block kinds did not match for input:\n{}",
        input
    );
}

/// Text content of the first node of `kind` after both passes.
pub fn get_text(input: &str, kind: SyntaxKind) -> Option<String> {
    let doc = parse_full(input);
    find_first(&doc, kind).map(|n| doc.text_content(n))
}

/// Count direct children of a specific kind
pub fn count_children(doc: &Document, node: NodeId, kind: SyntaxKind) -> usize {
    doc.children(node).filter(|&n| doc.kind(n) == kind).count()
}
