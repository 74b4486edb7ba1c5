use docmark::{Config, format_document, parse};

pub fn format(input: &str) -> String {
    format_with(input, None)
}

pub fn format_with(input: &str, config: Option<Config>) -> String {
    let doc = parse(input, config.clone());
    let output = format_document(&doc).expect("parsed trees always format");
    let again = format_document(&parse(&output, config)).expect("parsed trees always format");
    similar_asserts::assert_eq!(again, output, "formatting is not idempotent");
    output
}
