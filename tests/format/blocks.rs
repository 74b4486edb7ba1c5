use super::helpers::format;

#[test]
fn headings_are_normalized_to_atx() {
    assert_eq!(format("Title\n=====\n"), "# Title\n");
    assert_eq!(format("   ##   Title   ##\n"), "## Title\n");
    assert_eq!(format("#\n"), "#\n");
}

#[test]
fn blocks_are_separated_by_one_blank_line() {
    let input = "# Title\nSome text\nmore text\n\n\n\n***\n> quoted\n";
    let expected = "# Title\n\nSome text\nmore text\n\n***\n\n> quoted\n";
    similar_asserts::assert_eq!(format(input), expected);
}

#[test]
fn thematic_breaks_keep_their_marker() {
    assert_eq!(format("- - - -\n"), "----\n");
    assert_eq!(format("___\n"), "___\n");
}

#[test]
fn indented_code_becomes_fenced() {
    assert_eq!(format("    a\n    b\n"), "```\na\nb\n```\n");
}

#[test]
fn html_blocks_are_verbatim() {
    assert_eq!(format("<div>\n*hi*\n</div>\n"), "<div>\n*hi*\n</div>\n");
}

#[test]
fn nested_quotes_and_lists() {
    let input = "> - a\n>   > b\n> - c\n";
    similar_asserts::assert_eq!(format(input), "> - a\n>   > b\n> - c\n");
}

#[test]
fn loose_list_with_code() {
    let input = "1. one\n\n   ```sh\n   ls\n   ```\n2. two\n";
    let expected = "1. one\n\n   ```sh\n   ls\n   ```\n\n2. two\n";
    similar_asserts::assert_eq!(format(input), expected);
}

#[test]
fn ordered_list_start_is_kept() {
    assert_eq!(format("7) a\n8) b\n"), "7) a\n8) b\n");
}

#[test]
fn reference_definitions_are_normalized() {
    let input = "[Foo Bar]:\n  /url\n  (title)\n\n[foo bar]\n";
    similar_asserts::assert_eq!(format(input), "[Foo Bar]: /url \"title\"\n\n[foo bar]\n");
}

#[test]
fn tables_are_padded() {
    let input = "| Name | Age |\n|:-|-:|\n| Alice | 3 |\n";
    let expected = "| Name  | Age |\n| :---- | --: |\n| Alice |   3 |\n";
    similar_asserts::assert_eq!(format(input), expected);
}
