use super::helpers::format;

#[test]
fn summary_and_sections() {
    let input = "Adds two numbers.\n@param a - The first.\n@param b - The second.\n@returns The sum.\n";
    let expected = "Adds two numbers.\n\n@param a -\nThe first.\n\n@param b -\nThe second.\n\n@returns\nThe sum.\n";
    similar_asserts::assert_eq!(format(input), expected);
}

#[test]
fn modifiers_stand_alone() {
    assert_eq!(format("@beta\n"), "@beta\n");
}

#[test]
fn inline_tags() {
    let input = "See {@link Foo.bar | the *bar* method} and {@link Baz}. {@inheritDoc Base}\n";
    similar_asserts::assert_eq!(format(input), input);
}

#[test]
fn at_signs_in_text_are_escaped_at_line_start() {
    assert_eq!(format("\\@notATag here\n"), "\\@notATag here\n");
    assert_eq!(format("mail me @home\n"), "mail me @home\n");
}
