use crate::config::{Config, Flavor};
use crate::diagnostics::{MessageId, Severity};
use crate::parser::block_parser::tests::helpers::{
    assert_block_kinds, count_children, find_all, find_first, get_text, parse_blocks,
    parse_blocks_with,
};
use crate::syntax::{ElementKind, NodeValue, SyntaxKind};

fn message_ids(input: &str) -> Vec<MessageId> {
    parse_blocks(input)
        .diagnostics()
        .iter()
        .map(|d| d.message_id)
        .collect()
}

fn parameter_name(input: &str) -> Option<String> {
    let doc = parse_blocks(input);
    let tag = find_first(&doc, SyntaxKind::BlockTag)?;
    match doc.value(tag) {
        NodeValue::BlockTag { parameter_name, .. } => parameter_name.clone(),
        _ => None,
    }
}

#[test]
fn summary_then_section() {
    let input = "Summary.\n\n@remarks\nDetails here.\n";
    assert_block_kinds(input, &[SyntaxKind::Paragraph, SyntaxKind::BlockTag]);
    let doc = parse_blocks(input);
    let tag = find_first(&doc, SyntaxKind::BlockTag).unwrap();
    assert_eq!(count_children(&doc, tag, SyntaxKind::Paragraph), 1);
    assert!(message_ids(input).is_empty());
}

#[test]
fn block_tag_interrupts_summary() {
    assert_block_kinds(
        "Summary text\n@remarks more\n",
        &[SyntaxKind::Paragraph, SyntaxKind::BlockTag],
    );
}

#[test]
fn text_on_the_tag_line_belongs_to_the_section() {
    assert_eq!(
        get_text("@returns The answer.\n", SyntaxKind::BlockTag).as_deref(),
        Some("The answer.")
    );
}

#[test]
fn next_block_tag_closes_the_section() {
    let input = "@remarks\na\n\n- item\n@example\nb\n";
    assert_block_kinds(input, &[SyntaxKind::BlockTag, SyntaxKind::BlockTag]);
    let doc = parse_blocks(input);
    let first = find_first(&doc, SyntaxKind::BlockTag).unwrap();
    let kinds: Vec<_> = doc.children(first).map(|n| doc.kind(n)).collect();
    assert_eq!(kinds, vec![SyntaxKind::Paragraph, SyntaxKind::List]);
}

#[test]
fn tag_name_element_and_span() {
    let input = "@remarks\nbody\n\nafter the section\n";
    let doc = parse_blocks(input);
    let tag = find_first(&doc, SyntaxKind::BlockTag).unwrap();
    let name = doc.element(tag, ElementKind::TagName).unwrap();
    assert_eq!(name.text, "@remarks");
    let span = doc.span(tag).unwrap();
    assert_eq!(&input[span.start..span.end], "@remarks\nbody\n\nafter the section");
}

#[test]
fn tags_inside_containers_are_text() {
    assert_block_kinds("> @remarks\n", &[SyntaxKind::BlockQuote]);
    let doc = parse_blocks("> @remarks\n");
    assert!(find_first(&doc, SyntaxKind::BlockTag).is_none());
}

#[test]
fn param_tag_reads_name_and_hyphen() {
    let input = "@param name - The name.\n";
    assert_eq!(parameter_name(input).as_deref(), Some("name"));
    assert!(message_ids(input).is_empty());
    assert_eq!(
        get_text(input, SyntaxKind::BlockTag).as_deref(),
        Some("The name.")
    );

    let doc = parse_blocks(input);
    let tag = find_first(&doc, SyntaxKind::BlockTag).unwrap();
    let element = doc.element(tag, ElementKind::ParameterName).unwrap();
    let span = element.span.unwrap();
    assert_eq!(&input[span.start..span.end], "name");
}

#[test]
fn param_tag_without_hyphen() {
    let input = "@param name The name.\n";
    assert_eq!(parameter_name(input).as_deref(), Some("name"));
    assert_eq!(message_ids(input), vec![MessageId::ParamTagMissingHyphen]);
}

#[test]
fn param_tag_without_name() {
    assert_eq!(message_ids("@param\n"), vec![MessageId::ParamTagMissingName]);
    assert_eq!(parameter_name("@param - text\n"), None);
}

#[test]
fn description_after_a_missing_name_stays_a_paragraph() {
    let input = "@param - d\n";
    let doc = parse_blocks(input);
    let tag = find_first(&doc, SyntaxKind::BlockTag).unwrap();
    let kinds: Vec<_> = doc.children(tag).map(|n| doc.kind(n)).collect();
    assert_eq!(kinds, vec![SyntaxKind::Paragraph]);
    assert!(find_first(&doc, SyntaxKind::List).is_none());
    assert_eq!(get_text(input, SyntaxKind::Paragraph).as_deref(), Some("d"));

    let diagnostic = &doc.diagnostics()[0];
    assert_eq!(diagnostic.message_id, MessageId::ParamTagMissingName);
    assert_eq!(diagnostic.message_id.as_str(), "tsdoc-param-tag-missing-name");
    assert_eq!(doc.diagnostics().len(), 1);
}

#[test]
fn param_tag_with_jsdoc_type() {
    let input = "@param {string} name - The name.\n";
    assert_eq!(message_ids(input), vec![MessageId::ParamTagWithJsdocType]);
    assert_eq!(parameter_name(input).as_deref(), Some("name"));
}

#[test]
fn modifiers_on_one_line() {
    let input = "@beta @sealed\n";
    let doc = parse_blocks(input);
    let modifiers = find_all(&doc, SyntaxKind::ModifierTag);
    let names: Vec<String> = modifiers
        .iter()
        .map(|&m| match doc.value(m) {
            NodeValue::ModifierTag { tag_name } => tag_name.clone(),
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(names, vec!["@beta", "@sealed"]);

    let span = doc.span(modifiers[1]).unwrap();
    assert_eq!(&input[span.start..span.end], "@sealed");
}

#[test]
fn text_after_a_modifier_is_a_paragraph() {
    assert_block_kinds(
        "@beta not a tag\n",
        &[SyntaxKind::ModifierTag, SyntaxKind::Paragraph],
    );
}

#[test]
fn undefined_tags_warn_and_open_a_section() {
    let input = "@custom\ntext\n";
    assert_block_kinds(input, &[SyntaxKind::BlockTag]);
    let doc = parse_blocks(input);
    let diagnostic = &doc.diagnostics()[0];
    assert_eq!(diagnostic.message_id, MessageId::UndefinedTag);
    assert_eq!(diagnostic.severity, Severity::Warning);
    assert_eq!(&input[diagnostic.span.start..diagnostic.span.end], "@custom");
}

#[test]
fn undefined_tag_warning_can_be_disabled() {
    let mut config = Config::default();
    config.tags.report_undefined = false;
    let doc = parse_blocks_with("@custom\n", &config);
    assert!(doc.diagnostics().is_empty());
}

#[test]
fn malformed_tag_names() {
    let input = "@1abc text\n";
    assert_block_kinds(input, &[SyntaxKind::Paragraph]);
    assert_eq!(message_ids(input), vec![MessageId::MalformedTagName]);
}

#[test]
fn tags_need_the_extension() {
    let config = Config::for_flavor(Flavor::Gfm);
    let doc = parse_blocks_with("@remarks\n", &config);
    assert!(find_first(&doc, SyntaxKind::BlockTag).is_none());
    assert!(doc.diagnostics().is_empty());
}
