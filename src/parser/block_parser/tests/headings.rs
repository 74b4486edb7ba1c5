use crate::parser::block_parser::tests::helpers::{
    assert_block_kinds, find_first, get_text, parse_blocks,
};
use crate::syntax::{NodeValue, SyntaxKind};

fn heading_level(input: &str) -> Option<u8> {
    let doc = parse_blocks(input);
    let heading = find_first(&doc, SyntaxKind::Heading)?;
    match doc.value(heading) {
        NodeValue::Heading { level, .. } => Some(*level),
        _ => None,
    }
}

#[test]
fn atx_levels() {
    assert_eq!(heading_level("# one\n"), Some(1));
    assert_eq!(heading_level("### three\n"), Some(3));
    assert_eq!(heading_level("###### six\n"), Some(6));
    assert_eq!(heading_level("####### seven\n"), None);
}

#[test]
fn atx_requires_space_after_hashes() {
    assert_block_kinds("#hashtag\n", &[SyntaxKind::Paragraph]);
}

#[test]
fn atx_closing_sequence_is_dropped() {
    assert_eq!(get_text("## Title ##\n", SyntaxKind::Heading).as_deref(), Some("Title"));
    assert_eq!(get_text("# Title #not\n", SyntaxKind::Heading).as_deref(), Some("Title #not"));
}

#[test]
fn empty_atx_heading() {
    let doc = parse_blocks("#\n");
    assert!(find_first(&doc, SyntaxKind::Heading).is_some());
    assert_eq!(get_text("#\n", SyntaxKind::Heading).as_deref(), Some(""));
}

#[test]
fn atx_interrupts_paragraph() {
    assert_block_kinds(
        "text\n# Heading\n",
        &[SyntaxKind::Paragraph, SyntaxKind::Heading],
    );
}

#[test]
fn setext_levels() {
    assert_eq!(heading_level("Title\n=====\n"), Some(1));
    assert_eq!(heading_level("Title\n---\n"), Some(2));
}

#[test]
fn setext_heading_spans_multiple_lines() {
    let input = "first line\nsecond line\n===\n";
    assert_block_kinds(input, &[SyntaxKind::Heading]);
    assert_eq!(
        get_text(input, SyntaxKind::Heading).as_deref(),
        Some("first line second line")
    );
}

#[test]
fn setext_flag_is_recorded() {
    let doc = parse_blocks("Title\n---\n");
    let heading = find_first(&doc, SyntaxKind::Heading).unwrap();
    assert!(matches!(
        doc.value(heading),
        NodeValue::Heading { setext: true, .. }
    ));
}

#[test]
fn dashes_without_paragraph_are_a_thematic_break() {
    assert_block_kinds("---\n", &[SyntaxKind::ThematicBreak]);
    assert_block_kinds(
        "para\n\n---\n",
        &[SyntaxKind::Paragraph, SyntaxKind::ThematicBreak],
    );
}

#[test]
fn setext_after_only_reference_definitions_is_not_a_heading() {
    assert_block_kinds(
        "[foo]: /url\n===\n",
        &[SyntaxKind::LinkReference, SyntaxKind::Paragraph],
    );
}

#[test]
fn heading_span_excludes_line_ending() {
    let input = "## Title\nnext\n";
    let doc = parse_blocks(input);
    let heading = find_first(&doc, SyntaxKind::Heading).unwrap();
    let span = doc.span(heading).unwrap();
    assert_eq!(&input[span.start..span.end], "## Title");
}
