//! Formatting its own output must change nothing, whatever the input.

use super::helpers::format;

const DOCUMENTS: &[&str] = &[
    "Setext\n------\n\n* one\n* two\n\n  continued\n\n+ other list\n",
    "> quote with `code` and **strong _nested_ text**\n> lazy\ncontinuation\n",
    "1. a\n   1. b\n      - c\n2) new list\n",
    "| a | b |\n| - | - |\n| `x\\|y` | [link](/u) |\n| only one |\n",
    "- [ ] task\n- [x] done\n\n- [ ] loose\n",
    "Text with a\\\nhard break and trailing spaces  \nhere.\n",
    "```\n```` inner fence\n```\n\n~~~ js`x\ncode\n~~~\n",
    "<!-- comment -->\n\n<div>\nraw\n</div>\n\nafter\n",
    "[ref]: <with space> 'title \"quoted\"'\n\n[ref] and [other][ref] and ![alt *em*][ref]\n",
    "Summary {@link A.b | see *b*}.\n\n@remarks\nDetails\n\n- list in section\n\n@example\n```ts\nfoo();\n```\n@beta\n",
    "**a*b*c** _a **b** c_ ~~del *em*~~ `` ` `` \\* literal\n",
    "1986\\. A great year.\n\n\\+ not a list\n\n\\> not a quote\n",
    "# Heading with `code` and #hash\n\n## C#\n",
    "&copy;&#35;&#x41; &bogus; AT&T\n",
    "[unclosed *emphasis\n\n*]closing\n",
];

#[test]
fn formatting_is_idempotent() {
    for document in DOCUMENTS {
        // The helper asserts format(format(x)) == format(x).
        let _ = format(document);
    }
}
