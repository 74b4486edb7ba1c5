//! HTML rendering of whole documents.

use docmark::config::{Config, Flavor};
use docmark::syntax::{NodeValue, SyntaxKind};
use docmark::{RenderError, html, parse, to_html};

fn render(input: &str) -> String {
    to_html(input, None).expect("parsed trees always render")
}

#[test]
fn commonmark_blocks() {
    let input = "# Title\n\nText *em*.\n\n> quote\n\n---\n\n    code\n";
    let expected = "<h1>Title</h1>\n<p>Text <em>em</em>.</p>\n<blockquote>\n<p>quote</p>\n</blockquote>\n<hr />\n<pre><code>code\n</code></pre>\n";
    similar_asserts::assert_eq!(render(input), expected);
}

#[test]
fn nested_tight_list() {
    let expected = "<ul>\n<li>a\n<ul>\n<li>b</li>\n</ul>\n</li>\n<li>c</li>\n</ul>\n";
    similar_asserts::assert_eq!(render("- a\n  - b\n- c\n"), expected);
}

#[test]
fn ordered_list_start() {
    assert_eq!(render("3. x\n"), "<ol start=\"3\">\n<li>x</li>\n</ol>\n");
}

#[test]
fn links_and_images() {
    assert_eq!(
        render("[a](/u \"t\") ![i](/p.png)\n"),
        "<p><a href=\"/u\" title=\"t\">a</a> <img src=\"/p.png\" alt=\"i\" /></p>\n"
    );
    assert_eq!(
        render("<me@example.com>\n"),
        "<p><a href=\"mailto:me@example.com\">me@example.com</a></p>\n"
    );
}

#[test]
fn line_breaks() {
    assert_eq!(render("a  \nb\nc\n"), "<p>a<br />\nb\nc</p>\n");
}

#[test]
fn task_lists_and_strikethrough() {
    assert_eq!(
        render("- [x] ~~done~~\n"),
        "<ul>\n<li><input type=\"checkbox\" checked=\"\" disabled=\"\" /> <del>done</del></li>\n</ul>\n"
    );
}

#[test]
fn extensions_off_in_commonmark() {
    let config = Config::for_flavor(Flavor::CommonMark);
    assert_eq!(
        to_html("~~x~~ {@link y}\n", Some(config)).unwrap(),
        "<p>~~x~~ {@link y}</p>\n"
    );
}

#[test]
fn doc_tags() {
    let input = "Summary {@inheritDoc Base}.\n\n@remarks\nSee {@link Other | other}.\n";
    let expected = "<p>Summary <span data-tag=\"@inheritDoc\">Base</span>.</p>\n<section data-tag=\"@remarks\">\n<p>See <a href=\"Other\">other</a>.</p>\n</section>\n";
    similar_asserts::assert_eq!(render(input), expected);
}

#[test]
fn empty_containers() {
    let mut doc = parse("para\n", None);
    let root = doc.root();
    let paragraph = doc.first_child(root).unwrap();
    let text = doc.first_child(paragraph).unwrap();
    assert_eq!(doc.kind(text), SyntaxKind::Text);

    let quote = doc.create(NodeValue::BlockQuote);
    assert!(!doc.append_child(quote, text));
    assert!(doc.append_child(root, quote));
    assert_eq!(
        html::render(&doc),
        Ok("<p>para</p>\n<blockquote>\n</blockquote>\n".to_string())
    );
}

#[test]
fn render_errors_describe_the_node() {
    let error = RenderError::UnexpectedNode {
        kind: SyntaxKind::TableCell,
        context: "block",
    };
    assert_eq!(error.to_string(), "cannot render a TableCell node in block context");
}
