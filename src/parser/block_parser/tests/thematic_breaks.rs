use crate::parser::block_parser::tests::helpers::{
    assert_block_kinds, find_first, get_blocks, parse_blocks, parse_full,
};
use crate::syntax::{NodeValue, SyntaxKind};

#[test]
fn break_is_the_only_block() {
    let input = "---\n";
    assert_block_kinds(input, &[SyntaxKind::ThematicBreak]);
    let doc = parse_blocks(input);
    let rule = find_first(&doc, SyntaxKind::ThematicBreak).unwrap();
    let span = doc.span(rule).unwrap();
    assert_eq!((span.start, span.end), (0, 3));
    assert!(matches!(
        doc.value(rule),
        NodeValue::ThematicBreak { marker: '-', count: 3 }
    ));
}

#[test]
fn following_line_starts_a_new_paragraph() {
    let input = "***\nfoo\n";
    assert_block_kinds(input, &[SyntaxKind::ThematicBreak, SyntaxKind::Paragraph]);

    let doc = parse_full(input);
    let blocks = get_blocks(&doc);
    assert_eq!(doc.text_content(blocks[1]), "foo");
    assert!(find_first(&doc, SyntaxKind::SoftBreak).is_none());
}

#[test]
fn indented_break_span_starts_at_the_marker() {
    let input = "  * * *\n";
    let doc = parse_blocks(input);
    let rule = find_first(&doc, SyntaxKind::ThematicBreak).unwrap();
    let span = doc.span(rule).unwrap();
    assert_eq!(&input[span.start..span.end], "* * *");
}

#[test]
fn breaks_inside_containers() {
    let doc = parse_blocks("> ___\n- ***\n");
    let kinds: Vec<_> = doc
        .descendants(doc.root())
        .map(|n| doc.kind(n))
        .filter(|kind| matches!(kind, SyntaxKind::ThematicBreak | SyntaxKind::Paragraph))
        .collect();
    assert_eq!(kinds, vec![SyntaxKind::ThematicBreak, SyntaxKind::ThematicBreak]);
}
