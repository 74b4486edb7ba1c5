use crate::parser::block_parser::tests::helpers::{assert_block_kinds, find_first, parse_blocks};
use crate::syntax::{ElementKind, NodeValue, SyntaxKind};

/// Info string and literal of the first code block.
fn code_block(input: &str) -> (String, String, bool) {
    let doc = parse_blocks(input);
    let node = find_first(&doc, SyntaxKind::CodeBlock).expect("should find code block");
    match doc.value(node) {
        NodeValue::CodeBlock {
            fence,
            info,
            literal,
        } => (info.clone(), literal.clone(), fence.is_some()),
        _ => unreachable!(),
    }
}

#[test]
fn backtick_fence() {
    let (info, literal, fenced) = code_block("```\nlet x = 1;\n```\n");
    assert!(fenced);
    assert_eq!(info, "");
    assert_eq!(literal, "let x = 1;\n");
}

#[test]
fn tilde_fence_with_info_string() {
    let (info, literal, _) = code_block("~~~ rust  \nfn main() {}\n~~~\n");
    assert_eq!(info, "rust");
    assert_eq!(literal, "fn main() {}\n");
}

#[test]
fn info_string_is_unescaped() {
    let (info, _, _) = code_block("``` foo\\+bar\n```\n");
    assert_eq!(info, "foo+bar");
}

#[test]
fn info_string_element_keeps_raw_text() {
    let input = "```  js\ncode\n```\n";
    let doc = parse_blocks(input);
    let node = find_first(&doc, SyntaxKind::CodeBlock).unwrap();
    let element = doc
        .element(node, ElementKind::InfoString)
        .expect("info string element");
    let span = element.span.unwrap();
    assert_eq!(&input[span.start..span.end], "js");
}

#[test]
fn closing_fence_must_be_at_least_as_long() {
    let (_, literal, _) = code_block("````\na\n```\nb\n````\n");
    assert_eq!(literal, "a\n```\nb\n");
}

#[test]
fn closing_fence_must_use_same_character() {
    let (_, literal, _) = code_block("```\na\n~~~\n```\n");
    assert_eq!(literal, "a\n~~~\n");
}

#[test]
fn unclosed_fence_runs_to_end_of_document() {
    let (_, literal, _) = code_block("```\na\n\nb\n");
    assert_eq!(literal, "a\n\nb\n");
}

#[test]
fn backtick_info_cannot_contain_backticks() {
    assert_block_kinds("``` a`b\ncode\n", &[SyntaxKind::Paragraph]);
}

#[test]
fn fence_indentation_is_removed_from_content() {
    let (_, literal, _) = code_block("  ```\n  a\n    b\nc\n  ```\n");
    assert_eq!(literal, "a\n  b\nc\n");
}

#[test]
fn fenced_code_interrupts_paragraph() {
    assert_block_kinds(
        "text\n```\ncode\n```\n",
        &[SyntaxKind::Paragraph, SyntaxKind::CodeBlock],
    );
}

#[test]
fn indented_code() {
    let (info, literal, fenced) = code_block("    a\n      b\n");
    assert!(!fenced);
    assert_eq!(info, "");
    assert_eq!(literal, "a\n  b\n");
}

#[test]
fn indented_code_keeps_interior_blank_lines_only() {
    let (_, literal, _) = code_block("    a\n\n    b\n\n\nafter\n");
    assert_eq!(literal, "a\n\nb\n");
}

#[test]
fn indented_code_cannot_interrupt_paragraph() {
    assert_block_kinds("text\n    more text\n", &[SyntaxKind::Paragraph]);
}

#[test]
fn tab_indented_code() {
    let (_, literal, _) = code_block("\tfoo\tbaz\n");
    assert_eq!(literal, "foo\tbaz\n");
}

#[test]
fn indented_code_span_stops_at_last_content_line() {
    let input = "    code\n\n\npara\n";
    let doc = parse_blocks(input);
    let node = find_first(&doc, SyntaxKind::CodeBlock).unwrap();
    let span = doc.span(node).unwrap();
    assert_eq!(&input[span.start..span.end], "code");
}
