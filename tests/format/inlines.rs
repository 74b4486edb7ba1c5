use docmark::Config;
use docmark::config::Flavor;

use super::helpers::{format, format_with};

#[test]
fn emphasis_keeps_its_delimiter() {
    assert_eq!(format("*a* _b_ **c** __d__\n"), "*a* _b_ **c** __d__\n");
    assert_eq!(format("***both***\n"), "***both***\n");
}

#[test]
fn literal_delimiters_are_escaped() {
    assert_eq!(format("a * b\n"), "a \\* b\n");
    assert_eq!(format("snake_case_name\n"), "snake\\_case\\_name\n");
    assert_eq!(format("**unclosed\n"), "\\*\\*unclosed\n");
}

#[test]
fn text_that_would_start_a_block_is_escaped() {
    assert_eq!(format("\\# not a heading\n"), "\\# not a heading\n");
    assert_eq!(format("1\\. not a list\n"), "1\\. not a list\n");
    assert_eq!(format("a\n\\- b\n"), "a\n\\- b\n");
}

#[test]
fn code_spans_pick_a_safe_fence() {
    assert_eq!(format("`` a`b ``\n"), "``a`b``\n");
    assert_eq!(format("` `` `\n"), "` `` `\n");
}

#[test]
fn line_breaks() {
    assert_eq!(format("a  \nb\n"), "a\\\nb\n");
    assert_eq!(format("a\\\nb\n"), "a\\\nb\n");
    assert_eq!(format("a\n   b\n"), "a\nb\n");
}

#[test]
fn links_keep_their_style() {
    let input = "[a](/x \"T\") [b][r] [r][] [r] ![img](<a b>)\n\n[r]: /r\n";
    similar_asserts::assert_eq!(format(input), input);
}

#[test]
fn brackets_that_are_not_links_stay_literal() {
    assert_eq!(format("[not a link]\n"), "\\[not a link\\]\n");
    assert_eq!(format("[a]\\(b)\n\n[a]: /a\n"), "[a]\\(b)\n\n[a]: /a\n");
}

#[test]
fn autolinks_and_html() {
    assert_eq!(
        format("<https://example.com> <me@example.com> <span>x</span>\n"),
        "<https://example.com> <me@example.com> <span>x</span>\n"
    );
}

#[test]
fn entities_are_decoded() {
    assert_eq!(format("&copy; &amp;amp;\n"), "© \\&amp;\n");
}

#[test]
fn strikethrough_needs_the_extension() {
    assert_eq!(format("~~gone~~\n"), "~~gone~~\n");
    let commonmark = Config::for_flavor(Flavor::CommonMark);
    assert_eq!(format_with("~~gone~~\n", Some(commonmark)), "\\~\\~gone\\~\\~\n");
}
