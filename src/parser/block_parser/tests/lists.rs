use crate::config::{Config, Flavor};
use crate::parser::block_parser::tests::helpers::{
    assert_block_kinds, count_children, find_all, find_first, parse_blocks, parse_blocks_with,
};
use crate::syntax::{ElementKind, ListKind, NodeValue, SyntaxKind};

fn first_list_tight(input: &str) -> bool {
    let doc = parse_blocks(input);
    let list = find_first(&doc, SyntaxKind::List).expect("should find list");
    match doc.value(list) {
        NodeValue::List(marker) => marker.tight,
        _ => unreachable!(),
    }
}

fn task_states(input: &str, config: &Config) -> Vec<Option<bool>> {
    let doc = parse_blocks_with(input, config);
    find_all(&doc, SyntaxKind::ListItem)
        .into_iter()
        .map(|item| match doc.value(item) {
            NodeValue::ListItem { task, .. } => *task,
            _ => unreachable!(),
        })
        .collect()
}

#[test]
fn consecutive_items_share_a_list() {
    let doc = parse_blocks("- a\n- b\n- c\n");
    let list = find_first(&doc, SyntaxKind::List).unwrap();
    assert_eq!(count_children(&doc, list, SyntaxKind::ListItem), 3);
    assert_eq!(find_all(&doc, SyntaxKind::List).len(), 1);
}

#[test]
fn changing_the_bullet_starts_a_new_list() {
    assert_block_kinds("- a\n* b\n", &[SyntaxKind::List, SyntaxKind::List]);
    assert_block_kinds("1. a\n1) b\n", &[SyntaxKind::List, SyntaxKind::List]);
}

#[test]
fn ordered_list_start_number() {
    let doc = parse_blocks("3. three\n4. four\n");
    let list = find_first(&doc, SyntaxKind::List).unwrap();
    match doc.value(list) {
        NodeValue::List(marker) => {
            assert_eq!(marker.start, 3);
            assert_eq!(marker.kind, ListKind::Ordered { delimiter: '.' });
        }
        _ => unreachable!(),
    }
}

#[test]
fn tight_and_loose_lists() {
    assert!(first_list_tight("- a\n- b\n"));
    assert!(first_list_tight("- a\n- b\n\n"));
    assert!(!first_list_tight("- a\n\n- b\n"));
}

#[test]
fn blank_line_between_item_children_makes_list_loose() {
    assert!(!first_list_tight("- a\n\n  b\n- c\n"));
}

#[test]
fn blank_line_inside_nested_list_does_not_loosen_outer() {
    let doc = parse_blocks("- a\n  - b\n\n  - c\n- d\n");
    let lists = find_all(&doc, SyntaxKind::List);
    assert_eq!(lists.len(), 2);
    let tightness: Vec<bool> = lists
        .iter()
        .map(|&list| match doc.value(list) {
            NodeValue::List(marker) => marker.tight,
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(tightness, vec![true, false]);
}

#[test]
fn items_copy_list_tightness() {
    let doc = parse_blocks("- a\n\n- b\n");
    for item in find_all(&doc, SyntaxKind::ListItem) {
        match doc.value(item) {
            NodeValue::ListItem { marker, .. } => assert!(!marker.tight),
            _ => unreachable!(),
        }
    }
}

#[test]
fn nested_list_inside_item() {
    let doc = parse_blocks("- a\n  - b\n");
    let item = find_first(&doc, SyntaxKind::ListItem).unwrap();
    let kinds: Vec<_> = doc.children(item).map(|n| doc.kind(n)).collect();
    assert_eq!(kinds, vec![SyntaxKind::Paragraph, SyntaxKind::List]);
}

#[test]
fn insufficient_indent_ends_the_item() {
    // ` b` is a lazy continuation of the item's paragraph.
    let doc = parse_blocks("- a\n b\n");
    assert_eq!(find_all(&doc, SyntaxKind::Paragraph).len(), 1);
    assert_block_kinds("- a\n\n b\n", &[SyntaxKind::List, SyntaxKind::Paragraph]);
}

#[test]
fn item_may_start_with_a_blank_line() {
    let doc = parse_blocks("-\n  foo\n");
    let item = find_first(&doc, SyntaxKind::ListItem).unwrap();
    assert_eq!(count_children(&doc, item, SyntaxKind::Paragraph), 1);
}

#[test]
fn only_lists_starting_at_one_interrupt_a_paragraph() {
    assert_block_kinds("text\n2. two\n", &[SyntaxKind::Paragraph]);
    assert_block_kinds("text\n1. one\n", &[SyntaxKind::Paragraph, SyntaxKind::List]);
    assert_block_kinds("text\n-\n", &[SyntaxKind::Heading]);
}

#[test]
fn marker_element_is_attached() {
    let input = "  * item\n";
    let doc = parse_blocks(input);
    let item = find_first(&doc, SyntaxKind::ListItem).unwrap();
    let marker = doc.element(item, ElementKind::Marker).unwrap();
    assert_eq!(marker.text, "*");
    let span = marker.span.unwrap();
    assert_eq!(&input[span.start..span.end], "*");
}

#[test]
fn list_span_ends_with_last_item() {
    let input = "- a\n- b\n\nafter\n";
    let doc = parse_blocks(input);
    let list = find_first(&doc, SyntaxKind::List).unwrap();
    let span = doc.span(list).unwrap();
    assert_eq!(&input[span.start..span.end], "- a\n- b");
}

#[test]
fn task_list_items() {
    let config = Config::default();
    assert_eq!(
        task_states("- [ ] todo\n- [x] done\n- plain\n", &config),
        vec![Some(false), Some(true), None]
    );
}

#[test]
fn checkbox_needs_following_content() {
    let config = Config::default();
    assert_eq!(task_states("- [ ]\n", &config), vec![None]);
    assert_eq!(task_states("- [x]done\n", &config), vec![None]);
}

#[test]
fn task_lists_follow_the_extension_switch() {
    let config = Config::for_flavor(Flavor::CommonMark);
    assert_eq!(task_states("- [x] done\n", &config), vec![None]);
}

#[test]
fn task_item_paragraph_excludes_checkbox() {
    let input = "- [x] done\n";
    let doc = parse_blocks(input);
    let paragraph = find_first(&doc, SyntaxKind::Paragraph).unwrap();
    let span = doc.span(paragraph).unwrap();
    assert_eq!(&input[span.start..span.end], "done");
}
